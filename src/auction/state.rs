use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ui::mvi::UiState;

/// One auction lot as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuctionState {
    pub time: OffsetDateTime,
    /// `None` until the lot listing has arrived.
    pub lots: Option<Vec<Arc<Lot>>>,
}

impl Default for AuctionState {
    fn default() -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH)
    }
}

impl UiState for AuctionState {}

impl AuctionState {
    pub fn new(time: OffsetDateTime) -> Self {
        Self { time, lots: None }
    }

    pub fn is_loading(&self) -> bool {
        self.lots.is_none()
    }

    pub fn lot(&self, id: u64) -> Option<&Arc<Lot>> {
        self.lots.as_ref()?.iter().find(|lot| lot.id == id)
    }
}
