use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pinecone::clock::SystemClock;
use pinecone::config::Config;
use pinecone::logging::init_tracing;
use pinecone::shutdown::ShutdownCoordinator;
use pinecone::ui::runtime::{RunOptions, ViewDriver};
use pinecone::vdom::MatchStrategy;

#[derive(Parser)]
#[command(name = "pinecone", version, about = "Auction lot board rendered through a virtual tree")]
struct Cli {
    /// Config file (default: <config dir>/pinecone/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many renders
    #[arg(long)]
    frames: Option<u64>,

    /// Print the root's HTML after every render
    #[arg(long)]
    html: bool,

    /// Match children by key instead of position
    #[arg(long)]
    keyed: bool,

    /// Never load lots; the board stays on "Loading…"
    #[arg(long)]
    no_fetch: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    if cli.keyed {
        config.render.matching = MatchStrategy::Keyed;
    }

    let options = RunOptions {
        max_frames: cli.frames,
        print_html: cli.html,
        fetch: !cli.no_fetch,
    };

    let coordinator = ShutdownCoordinator::new();
    let on_interrupt = coordinator.handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => on_interrupt.signal(),
            Err(err) => tracing::warn!(error = %err, "Ctrl-C handler unavailable"),
        }
    });

    let driver = ViewDriver::new(config, options, SystemClock)?;
    let mut stdout = std::io::stdout();
    let summary = driver.run(coordinator.handle(), &mut stdout).await?;

    if !cli.html {
        println!("{}", summary.html);
    }
    Ok(())
}
