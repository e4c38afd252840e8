//! Auction-lot application state.
//!
//! The state has two independent slices: the wall-clock time and the lot
//! collection. Updates to one never touch the other, and repeated price
//! updates for the same lot are last-write-wins in delivery order.

mod intent;
mod reducer;
mod state;

pub use intent::AuctionIntent;
pub use reducer::AuctionReducer;
pub use state::{AuctionState, Lot};
