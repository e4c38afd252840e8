//! View driver: the composition root of a running view.
//!
//! Owns the store, the document and every timer or data task. All of them
//! feed one `select!` loop on a current-thread runtime, so dispatches and
//! renders never overlap:
//!
//! ```text
//! clock tick ─┐
//! lots loaded ├─→ Store::dispatch ─→ listener ─→ render request
//! price tick ─┘                                      │
//!                      evaluate + reconcile ←────────┘
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::auction::{AuctionIntent, AuctionReducer, AuctionState, Lot};
use crate::clock::Clock;
use crate::config::Config;
use crate::dom::{Document, HostError, Mutation, NodeId};
use crate::shutdown::ShutdownHandle;
use crate::source::{LotApi, PriceStream, PriceTick, SourceError};
use crate::store::{Dispatcher, Store};
use crate::ui::view::app_view;
use crate::vdom::{evaluate, Reconciler, VNode};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Render target unavailable: {0}")]
    Target(#[from] HostError),

    #[error("Failed to write rendered output: {0}")]
    Output(#[from] io::Error),
}

/// Per-run switches, usually from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many renders.
    pub max_frames: Option<u64>,
    /// Write the root's HTML after each render.
    pub print_html: bool,
    /// Request the lot listing on start.
    pub fetch: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            print_html: false,
            fetch: true,
        }
    }
}

/// What a finished run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub failed_frames: u64,
    /// Outer HTML of the render root after the last render.
    pub html: String,
}

/// Renders evaluated trees into one root of a [`Document`].
#[derive(Debug)]
pub struct Renderer {
    document: Document,
    root: NodeId,
    reconciler: Reconciler,
}

impl Renderer {
    pub fn new(document: Document, root_id: &str, reconciler: Reconciler) -> Result<Self, HostError> {
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| HostError::MissingRoot {
                id: root_id.to_string(),
            })?;
        Ok(Self {
            document,
            root,
            reconciler,
        })
    }

    /// Evaluates `tree` and patches the root, returning the mutations the
    /// pass applied. A failed pass still drains its partial journal.
    pub fn render(&mut self, tree: &VNode) -> Result<Vec<Mutation>, HostError> {
        let evaluated = evaluate(tree);
        let result = self.reconciler.render(&mut self.document, &self.root, &evaluated);
        let mutations = self.document.take_journal();
        result.map(|()| mutations)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn html(&self) -> String {
        self.document.to_html(self.root)
    }
}

enum ViewEvent {
    LotsLoaded(Result<Vec<Lot>, SourceError>),
    Price(PriceTick),
}

/// Drives the auction view until shutdown or the frame limit.
pub struct ViewDriver<C: Clock> {
    config: Config,
    options: RunOptions,
    clock: C,
    store: Arc<Store<AuctionReducer>>,
    renderer: Renderer,
    tasks: Vec<JoinHandle<()>>,
}

impl<C: Clock> ViewDriver<C> {
    pub fn new(config: Config, options: RunOptions, clock: C) -> Result<Self, RuntimeError> {
        let document = Document::with_root(&config.view.root_id);
        let renderer = Renderer::new(document, &config.view.root_id, config.render.reconciler())?;
        let store = Arc::new(Store::new(AuctionState::new(clock.now())));
        Ok(Self {
            config,
            options,
            clock,
            store,
            renderer,
            tasks: Vec::new(),
        })
    }

    pub fn store(&self) -> &Arc<Store<AuctionReducer>> {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Runs the event loop, writing HTML frames to `out` when enabled.
    pub async fn run<W: Write>(
        mut self,
        shutdown: ShutdownHandle,
        out: &mut W,
    ) -> Result<RunSummary, RuntimeError> {
        let render_requested = Arc::new(Notify::new());
        let subscription = self.store.subscribe({
            let render_requested = Arc::clone(&render_requested);
            move || render_requested.notify_one()
        });
        let dispatcher = self.store.dispatcher();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        if self.options.fetch {
            self.spawn_fetch(events_tx.clone());
        }

        let mut ticker = tokio::time::interval(self.config.view.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut summary = RunSummary {
            frames: 0,
            failed_frames: 0,
            html: String::new(),
        };
        tracing::info!(
            root = %self.config.view.root_id,
            strategy = ?self.renderer.reconciler.strategy(),
            "view driver started"
        );
        self.render_frame(&dispatcher, &mut summary, out)?;

        while !self.frame_limit_reached(&summary) {
            tokio::select! {
                _ = shutdown.wait() => break,
                _ = ticker.tick() => {
                    self.store.dispatch(AuctionIntent::SetCurrentTime { time: self.clock.now() });
                }
                Some(event) = events_rx.recv() => self.handle_event(event, &events_tx),
                _ = render_requested.notified() => {
                    self.render_frame(&dispatcher, &mut summary, out)?;
                }
            }
        }

        subscription.unsubscribe();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        summary.html = self.renderer.html();
        tracing::info!(frames = summary.frames, failed = summary.failed_frames, "view driver stopped");
        Ok(summary)
    }

    fn frame_limit_reached(&self, summary: &RunSummary) -> bool {
        self.options
            .max_frames
            .is_some_and(|limit| summary.frames >= limit)
    }

    fn spawn_fetch(&mut self, events: mpsc::UnboundedSender<ViewEvent>) {
        let api = LotApi::new(self.config.source.latency());
        let resource = self.config.source.resource.clone();
        self.tasks.push(tokio::spawn(async move {
            let result = api.fetch(&resource).await;
            let _ = events.send(ViewEvent::LotsLoaded(result));
        }));
    }

    fn handle_event(&mut self, event: ViewEvent, events: &mpsc::UnboundedSender<ViewEvent>) {
        match event {
            ViewEvent::LotsLoaded(Ok(lots)) => {
                let ids: Vec<u64> = lots.iter().map(|lot| lot.id).collect();
                tracing::info!(count = ids.len(), "lot collection arrived");
                self.store.dispatch(AuctionIntent::SetLotCollection { lots });
                self.subscribe_prices(&ids, events);
            }
            ViewEvent::LotsLoaded(Err(err)) => {
                tracing::warn!(error = %err, "lot fetch failed, staying on the loading view");
            }
            ViewEvent::Price(tick) => {
                self.store.dispatch(AuctionIntent::SetLotPrice {
                    id: tick.id,
                    price: tick.price,
                });
            }
        }
    }

    fn subscribe_prices(&mut self, ids: &[u64], events: &mpsc::UnboundedSender<ViewEvent>) {
        let stream = PriceStream::new(
            self.config.source.price_interval(),
            self.config.source.price_base,
            self.config.source.price_spread,
        );
        for id in ids {
            let events = events.clone();
            let channel = format!("price-{}", id);
            match stream.subscribe(&channel, move |tick| {
                let _ = events.send(ViewEvent::Price(tick));
            }) {
                Ok(task) => self.tasks.push(task),
                Err(err) => tracing::warn!(error = %err, "price subscription failed"),
            }
        }
    }

    /// One render pass. A failing pass is logged and counted; the store and
    /// the next pass are unaffected.
    fn render_frame<W: Write>(
        &mut self,
        dispatcher: &Dispatcher<AuctionIntent>,
        summary: &mut RunSummary,
        out: &mut W,
    ) -> Result<(), RuntimeError> {
        let tree = app_view(self.store.get_state(), dispatcher.clone());
        summary.frames += 1;
        match self.renderer.render(&tree) {
            Ok(mutations) => {
                tracing::debug!(frame = summary.frames, mutations = mutations.len(), "rendered")
            }
            Err(err) => {
                summary.failed_frames += 1;
                tracing::error!(frame = summary.frames, error = %err, "render failed");
                return Ok(());
            }
        }

        if self.options.print_html {
            writeln!(out, "{}", self.renderer.html())?;
            out.flush()?;
        }
        Ok(())
    }
}
