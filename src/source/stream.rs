//! Mock price channel.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::source::error::SourceError;

const CHANNEL_PREFIX: &str = "price-";

/// One price update for one lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTick {
    pub id: u64,
    pub price: i64,
}

/// Extracts the lot id from a `price-{id}` channel name.
pub fn parse_channel(channel: &str) -> Result<u64, SourceError> {
    channel
        .strip_prefix(CHANNEL_PREFIX)
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| SourceError::InvalidChannel {
            channel: channel.to_string(),
        })
}

/// Emits random prices in `base..=base + spread` on a fixed cadence.
#[derive(Debug, Clone)]
pub struct PriceStream {
    interval: Duration,
    base: i64,
    spread: i64,
}

impl PriceStream {
    pub fn new(interval: Duration, base: i64, spread: i64) -> Self {
        Self {
            interval,
            base,
            spread: spread.max(0),
        }
    }

    /// Starts delivering ticks for `channel` to `handler`, forever.
    ///
    /// There is no unsubscribe at this layer; the returned task handle is
    /// for the owner of the runtime to abort on shutdown.
    pub fn subscribe<F>(&self, channel: &str, handler: F) -> Result<JoinHandle<()>, SourceError>
    where
        F: Fn(PriceTick) + Send + 'static,
    {
        let id = parse_channel(channel)?;
        let (period, base, spread) = (self.interval, self.base, self.spread);
        tracing::debug!(channel, ?period, "price channel subscribed");

        Ok(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let price = base.saturating_add(rand::thread_rng().gen_range(0..=spread));
                handler(PriceTick { id, price });
            }
        }))
    }
}
