//! Shared fixtures for integration tests.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use pinecone::auction::{AuctionState, Lot};
use time::macros::datetime;
use time::OffsetDateTime;

pub const T0: OffsetDateTime = datetime!(2024-05-01 12:00:00 UTC);

pub fn lot(id: u64, name: &str, price: i64, favorite: bool) -> Lot {
    Lot {
        id,
        name: name.to_string(),
        description: format!("{} description", name),
        price,
        favorite,
    }
}

/// Two lots, the second one already a favorite.
pub fn two_lots() -> Vec<Lot> {
    vec![lot(1, "A", 42, false), lot(2, "B", 42, true)]
}

pub fn loaded_state(lots: Vec<Lot>) -> AuctionState {
    AuctionState {
        time: T0,
        lots: Some(lots.into_iter().map(Arc::new).collect()),
    }
}

/// Counts listener invocations.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
        let count = Arc::clone(&self.0);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records labelled events in arrival order.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}
