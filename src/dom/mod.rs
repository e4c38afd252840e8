//! Live document: the host the reconciler mutates.

mod document;
mod error;
mod host;

pub use document::{Document, Mutation, NodeId};
pub use error::HostError;
pub use host::Host;
