//! Auction views and the driver that renders them.

pub mod mvi;
pub mod runtime;
pub mod view;
