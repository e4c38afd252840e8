//! Component expansion.

use std::collections::BTreeMap;

use crate::vdom::node::{Children, Key, NodeType, PropValue, VNode};

/// A virtual tree with every component expanded.
///
/// The type has no way to express a component reference.
#[derive(Clone, Debug, PartialEq)]
pub enum ENode {
    Text(String),
    Element(EElement),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EElement {
    pub tag: String,
    pub attrs: BTreeMap<String, PropValue>,
    pub children: Vec<ENode>,
    pub key: Option<Key>,
}

impl ENode {
    /// Element tag, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            ENode::Text(_) => None,
            ENode::Element(element) => Some(&element.tag),
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            ENode::Text(_) => None,
            ENode::Element(element) => element.key.as_ref(),
        }
    }
}

/// Expands `node` into an evaluated tree.
///
/// Components are called with their props and the result is evaluated in
/// turn; recursion depth equals component nesting depth. A component that
/// (directly or indirectly) returns itself never terminates.
///
/// A key on a component invocation carries over to the element it renders
/// when that element has no key of its own.
pub fn evaluate(node: &VNode) -> ENode {
    match node {
        VNode::Text(text) => ENode::Text(text.clone()),
        VNode::Element(element) => match &element.kind {
            NodeType::Component(component) => {
                tracing::trace!(component = component.name(), "expanding component");
                let mut evaluated = evaluate(&component.render(&element.props));
                if let (ENode::Element(rendered), Some(key)) = (&mut evaluated, &element.key) {
                    if rendered.key.is_none() {
                        rendered.key = Some(key.clone());
                    }
                }
                evaluated
            }
            NodeType::Tag(tag) => ENode::Element(EElement {
                tag: tag.clone(),
                attrs: element.props.attrs().clone(),
                children: match element.props.children() {
                    Children::One(child) => vec![evaluate(child)],
                    Children::Many(children) => children.iter().map(evaluate).collect(),
                },
                key: element.key.clone(),
            }),
        },
    }
}
