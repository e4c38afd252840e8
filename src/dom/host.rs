use std::fmt;

use crate::vdom::PropValue;

/// The environment that owns live nodes.
///
/// The reconciler drives a host through node handles; it never creates or
/// destroys the render root, only the subtrees beneath it.
pub trait Host {
    /// Handle to a live node. Equal handles refer to the same node.
    type Node: Clone + PartialEq + fmt::Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;
    fn create_text(&mut self, text: &str) -> Result<Self::Node, Self::Error>;

    /// Element tag, `None` for text nodes.
    fn tag(&self, node: &Self::Node) -> Option<&str>;
    /// Text payload, `None` for elements.
    fn text(&self, node: &Self::Node) -> Option<&str>;
    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), Self::Error>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<&PropValue>;
    fn attribute_names(&self, node: &Self::Node) -> Vec<String>;
    fn set_attribute(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: PropValue,
    ) -> Result<(), Self::Error>;
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
    /// Inserts `child` at `index`, detaching it from wherever it lives first.
    fn insert_child(
        &mut self,
        parent: &Self::Node,
        index: usize,
        child: &Self::Node,
    ) -> Result<(), Self::Error>;
    /// Takes `child` out of the tree. The host may discard it and its
    /// subtree, so the handle must not be used again.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
    /// Puts `new_child` where `old_child` was. `old_child` is discarded as
    /// with `remove_child`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> Result<(), Self::Error>;
}
