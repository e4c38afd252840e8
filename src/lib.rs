//! Virtual-tree UI core with a single-writer store, and the auction-lot
//! view built on top of it.

pub mod auction;
pub mod clock;
pub mod config;
pub mod dom;
pub mod logging;
pub mod shutdown;
pub mod source;
pub mod store;
pub mod ui;
pub mod vdom;
