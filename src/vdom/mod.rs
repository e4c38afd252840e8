//! Virtual tree: node model, component evaluation, reconciliation.
//!
//! ```text
//! VNode ──evaluate──→ ENode ──Reconciler::render──→ live document
//! ```

mod evaluate;
mod node;
mod reconcile;

pub use evaluate::{evaluate, EElement, ENode};
pub use node::{
    element, text, Children, Component, Handler, Key, NodeType, PropValue, Props, VElement, VNode,
    KEY,
};
pub use reconcile::{MatchStrategy, Reconciler, KEY_ATTRIBUTE};
