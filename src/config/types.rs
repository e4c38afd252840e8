use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::vdom::{MatchStrategy, Reconciler};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Render target and clock cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Id of the pre-existing element the view renders into (default: "root").
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// Clock tick period in milliseconds (default: 1000).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Mock data source behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Resource path fetched for the lot listing (default: "/lots").
    #[serde(default = "default_resource")]
    pub resource: String,
    /// Simulated fetch latency in milliseconds (default: 1000).
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Price tick period per lot in milliseconds (default: 400).
    #[serde(default = "default_price_interval_ms")]
    pub price_interval_ms: u64,
    /// Lowest generated price (default: 42).
    #[serde(default = "default_price_base")]
    pub price_base: i64,
    /// Width of the generated price range (default: 10).
    #[serde(default = "default_price_spread")]
    pub price_spread: i64,
}

/// Reconciler options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Child matching: "positional" (default) or "keyed".
    #[serde(default)]
    pub matching: MatchStrategy,
    /// Remove live attributes the new tree no longer sets (default: true).
    #[serde(default = "default_clear_stale_attributes")]
    pub clear_stale_attributes: bool,
}

fn default_root_id() -> String {
    "root".to_string()
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_resource() -> String {
    crate::source::LOTS_RESOURCE.to_string()
}

fn default_latency_ms() -> u64 {
    1000
}

fn default_price_interval_ms() -> u64 {
    400
}

fn default_price_base() -> i64 {
    42
}

fn default_price_spread() -> i64 {
    10
}

fn default_clear_stale_attributes() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            resource: default_resource(),
            latency_ms: default_latency_ms(),
            price_interval_ms: default_price_interval_ms(),
            price_base: default_price_base(),
            price_spread: default_price_spread(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            matching: MatchStrategy::default(),
            clear_stale_attributes: default_clear_stale_attributes(),
        }
    }
}

impl ViewConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl SourceConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn price_interval(&self) -> Duration {
        Duration::from_millis(self.price_interval_ms)
    }
}

impl RenderConfig {
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.matching, self.clear_stale_attributes)
    }
}
