//! Virtual-node model.
//!
//! A [`VNode`] is either a text leaf or an element record whose type is a
//! primitive tag or a [`Component`]. Trees are rebuilt on every render pass
//! and never mutated afterwards.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Reserved property name carrying a node's identity token.
pub const KEY: &str = "key";

/// Event callback stored in a property map.
///
/// Two handlers that both carry an identity are equal when the identities
/// match; otherwise equality is pointer identity. A view that rebuilds an
/// equivalent closure every pass gives it an identity so the live node keeps
/// the handler it already has.
#[derive(Clone)]
pub struct Handler {
    callback: Arc<dyn Fn() + Send + Sync>,
    identity: Option<String>,
}

impl Handler {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            identity: None,
        }
    }

    /// A handler equal to every other handler with the same `identity`.
    pub fn with_identity(
        identity: impl Into<String>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            callback: Arc::new(callback),
            identity: Some(identity.into()),
        }
    }

    pub fn call(&self) {
        (self.callback)()
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (&self.identity, &other.identity) {
            (Some(a), Some(b)) => a == b,
            _ => Arc::ptr_eq(&self.callback, &other.callback),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.identity {
            Some(identity) => write!(f, "<handler {}>", identity),
            None => f.write_str("<handler>"),
        }
    }
}

/// Stable identity token, unique among siblings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_prop(value: PropValue) -> Option<Self> {
        match value {
            PropValue::Str(value) => Some(Self(value)),
            PropValue::Int(value) => Some(Self(value.to_string())),
            PropValue::Bool(value) => Some(Self(value.to_string())),
            PropValue::Handler(_) | PropValue::Data(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for Key {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// A single property value.
///
/// `Data` compares by pointer identity and `Handler` by its own rule: two
/// renders that build a fresh payload or anonymous closure produce values that
/// differ.
#[derive(Clone)]
pub enum PropValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Handler(Handler),
    /// Opaque payload handed from a view to a component.
    Data(Arc<dyn Any + Send + Sync>),
}

impl PropValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a == b,
            (PropValue::Data(a), PropValue::Data(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(value) => write!(f, "{:?}", value),
            PropValue::Int(value) => write!(f, "{}", value),
            PropValue::Bool(value) => write!(f, "{}", value),
            PropValue::Handler(handler) => write!(f, "{:?}", handler),
            PropValue::Data(_) => f.write_str("<data>"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

/// The reserved `children` slot of a property map.
///
/// Exactly one child is kept bare; zero or several are kept as a sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Children {
    One(Box<VNode>),
    Many(Vec<VNode>),
}

impl Default for Children {
    fn default() -> Self {
        Children::Many(Vec::new())
    }
}

impl From<Vec<VNode>> for Children {
    fn from(children: Vec<VNode>) -> Self {
        match <[VNode; 1]>::try_from(children) {
            Ok([only]) => Children::One(Box::new(only)),
            Err(children) => Children::Many(children),
        }
    }
}

/// Property map of an element or component invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    attrs: BTreeMap<String, PropValue>,
    children: Children,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class.into())
    }

    /// Sets the identity token. [`element`] hoists it out of the map.
    pub fn key(self, key: impl Into<Key>) -> Self {
        self.attr(KEY, key.into().0)
    }

    pub fn handler(self, name: impl Into<String>, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.attr(name, PropValue::Handler(Handler::new(handler)))
    }

    /// Like [`Props::handler`], with an identity that survives re-renders.
    pub fn handler_with_identity(
        self,
        name: impl Into<String>,
        identity: impl Into<String>,
        handler: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.attr(name, PropValue::Handler(Handler::with_identity(identity, handler)))
    }

    pub fn data<T: Any + Send + Sync>(self, name: impl Into<String>, value: Arc<T>) -> Self {
        self.attr(name, PropValue::Data(value))
    }

    /// Copies `name` from another property map, if present.
    pub fn forward(mut self, from: &Props, name: &str) -> Self {
        if let Some(value) = from.get(name) {
            self.attrs.insert(name.to_string(), value.clone());
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.attrs.get(name)
    }

    /// Typed access to a `Data` property.
    pub fn get_data<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        match self.attrs.get(name)? {
            PropValue::Data(data) => Arc::clone(data).downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn attrs(&self) -> &BTreeMap<String, PropValue> {
        &self.attrs
    }

    pub fn children(&self) -> &Children {
        &self.children
    }
}

/// A component: a pure view over its props.
#[derive(Clone, Copy)]
pub struct Component {
    name: &'static str,
    render: fn(&Props) -> VNode,
}

impl Component {
    pub const fn new(name: &'static str, render: fn(&Props) -> VNode) -> Self {
        Self { name, render }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn render(&self, props: &Props) -> VNode {
        (self.render)(props)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.render as usize == other.render as usize
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeType {
    /// Primitive element kind, e.g. `"div"`.
    Tag(String),
    Component(Component),
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        NodeType::Tag(tag.to_string())
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::Tag(tag)
    }
}

impl From<Component> for NodeType {
    fn from(component: Component) -> Self {
        NodeType::Component(component)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VElement {
    pub kind: NodeType,
    pub props: Props,
    pub key: Option<Key>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

impl From<&str> for VNode {
    fn from(value: &str) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<String> for VNode {
    fn from(value: String) -> Self {
        VNode::Text(value)
    }
}

impl From<i64> for VNode {
    fn from(value: i64) -> Self {
        VNode::Text(value.to_string())
    }
}

impl From<u64> for VNode {
    fn from(value: u64) -> Self {
        VNode::Text(value.to_string())
    }
}

/// Text leaf.
pub fn text(value: impl Into<String>) -> VNode {
    VNode::Text(value.into())
}

/// Builds an element or component invocation.
///
/// Children are normalized into the `children` slot and a `key` property is
/// hoisted into [`VElement::key`].
pub fn element(kind: impl Into<NodeType>, mut props: Props, children: Vec<VNode>) -> VNode {
    let key = props.attrs.remove(KEY).and_then(Key::from_prop);
    props.children = Children::from(children);
    VNode::Element(VElement {
        kind: kind.into(),
        props,
        key,
    })
}
