//! Intent/reducer/state traits shared by every reducer in the crate.
//!
//! ```text
//! AuctionIntent ──→ AuctionReducer ──→ AuctionState ──→ view
//!       ↑                                               │
//!       └──────────── Dispatcher (click handlers) ──────┘
//! ```
//!
//! A reducer is a pure function; [`crate::store::Store`] owns the state it
//! produces and tells listeners when it changes.

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
