//! External data: the lot listing API and the per-lot price channel.
//!
//! Both are stand-ins for a network client. They run on the tokio runtime
//! and hand results back through plain callbacks and futures.

mod api;
mod error;
mod stream;

pub use api::{LotApi, LOTS_RESOURCE};
pub use error::SourceError;
pub use stream::{parse_channel, PriceStream, PriceTick};
