//! Arena-backed in-memory document.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]. A node moved with
//! `insert_child` or `append_child` keeps its handle. A node taken out with
//! `remove_child` or `replace_child` is released together with its subtree:
//! its slot goes back on a free list and every handle to it goes stale.
//! Nodes created but never attached stay allocated until the document is
//! dropped. Every mutation is appended to a journal so callers can inspect
//! exactly what a render pass changed.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;

use crate::dom::error::HostError;
use crate::dom::host::Host;
use crate::vdom::PropValue;

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Arena index plus the generation of the slot when the node was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.generation)
    }
}

/// One journal entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create { node: NodeId },
    SetText { node: NodeId },
    SetAttribute { node: NodeId, name: String },
    RemoveAttribute { node: NodeId, name: String },
    Append { parent: NodeId, child: NodeId },
    Insert { parent: NodeId, index: usize, child: NodeId },
    Remove { parent: NodeId, child: NodeId },
    Replace { parent: NodeId, old: NodeId, new: NodeId },
}

impl Mutation {
    /// True for edits that change the shape of the tree.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::Append { .. }
                | Mutation::Insert { .. }
                | Mutation::Remove { .. }
                | Mutation::Replace { .. }
        )
    }
}

#[derive(Debug)]
enum Payload {
    Element {
        tag: String,
        attrs: BTreeMap<String, PropValue>,
    },
    Text(String),
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    payload: Payload,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
    journal: Vec<Mutation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only a `body` element.
    pub fn new() -> Self {
        let body = Slot {
            generation: 0,
            payload: Payload::Element {
                tag: "body".to_string(),
                attrs: BTreeMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![body],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
            journal: Vec::new(),
        }
    }

    /// A document whose body contains a single `<div id="{root_id}">`.
    pub fn with_root(root_id: &str) -> Self {
        let mut document = Self::new();
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), PropValue::from(root_id));
        let root = document.alloc(Payload::Element {
            tag: "div".to_string(),
            attrs,
        });
        document.slots[root.index].parent = Some(document.body);
        document.slots[document.body.index].children.push(root);
        document
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).and_then(|slot| slot.parent)
    }

    /// Nodes currently allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|node| self.attribute(node, "id").and_then(PropValue::as_str) == Some(id))
    }

    /// Descendants of `from` (inclusive) whose `class` contains `class`.
    pub fn query_class(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|node| {
                self.attribute(node, "class")
                    .and_then(PropValue::as_str)
                    .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
            })
            .collect()
    }

    /// Descendants of `from` (inclusive) with the given tag.
    pub fn query_tag(&self, from: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|node| Host::tag(self, node) == Some(tag))
            .collect()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|node| Host::text(self, &node))
            .collect()
    }

    /// Fires the `on_{event}` handler of `node`. Returns whether one ran.
    pub fn dispatch_event(&self, node: NodeId, event: &str) -> bool {
        let name = format!("on_{}", event);
        let Some(handler) = self.attribute(&node, &name).and_then(PropValue::as_handler) else {
            return false;
        };
        handler.call();
        true
    }

    pub fn take_journal(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    /// Outer HTML of `node`. Handler and data attributes are omitted.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(slot) = self.live(node) else {
            return;
        };
        match &slot.payload {
            Payload::Text(text) => out.push_str(&escape(text)),
            Payload::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    match value {
                        PropValue::Str(value) => {
                            let _ = write!(out, " {}=\"{}\"", name, escape(value));
                        }
                        PropValue::Int(value) => {
                            let _ = write!(out, " {}=\"{}\"", name, value);
                        }
                        PropValue::Bool(true) => {
                            let _ = write!(out, " {}", name);
                        }
                        PropValue::Bool(false) | PropValue::Handler(_) | PropValue::Data(_) => {}
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &slot.children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }

    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            let Some(slot) = self.live(node) else {
                continue;
            };
            found.push(node);
            stack.extend(slot.children.iter().rev().copied());
        }
        found
    }

    fn alloc(&mut self, payload: Payload) -> NodeId {
        let node = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.payload = payload;
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    payload,
                    parent: None,
                    children: Vec::new(),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.journal.push(Mutation::Create { node });
        node
    }

    /// Frees `node` and its subtree. `node` must already be detached.
    fn release(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            let Some(slot) = self.slots.get_mut(node.index) else {
                continue;
            };
            if slot.generation != node.generation {
                continue;
            }
            stack.append(&mut slot.children);
            slot.generation = slot.generation.wrapping_add(1);
            slot.payload = Payload::Text(String::new());
            slot.parent = None;
            self.free.push(node.index);
        }
    }

    fn live(&self, node: NodeId) -> Option<&Slot> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
    }

    fn slot(&self, node: NodeId) -> Result<&Slot, HostError> {
        self.live(node).ok_or(HostError::UnknownNode { node })
    }

    fn slot_mut(&mut self, node: NodeId) -> Result<&mut Slot, HostError> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .ok_or(HostError::UnknownNode { node })
    }

    fn attrs_mut(&mut self, node: NodeId) -> Result<&mut BTreeMap<String, PropValue>, HostError> {
        match &mut self.slot_mut(node)?.payload {
            Payload::Element { attrs, .. } => Ok(attrs),
            Payload::Text(_) => Err(HostError::NotAnElement { node }),
        }
    }

    /// Checks that `child` may be placed under `parent`.
    fn check_adopt(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        if let Payload::Text(_) = self.slot(parent)?.payload {
            return Err(HostError::NotAnElement { node: parent });
        }
        self.slot(child)?;
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(HostError::Cycle { parent, child });
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.slots[child.index].parent.take() {
            self.slots[parent.index].children.retain(|c| *c != child);
        }
    }

    fn position(&self, parent: NodeId, child: NodeId) -> Result<usize, HostError> {
        self.slot(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(HostError::NotAChild { parent, child })
    }
}

impl Host for Document {
    type Node = NodeId;
    type Error = HostError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        if !is_valid_tag(tag) {
            return Err(HostError::InvalidTag {
                tag: tag.to_string(),
            });
        }
        Ok(self.alloc(Payload::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        }))
    }

    fn create_text(&mut self, text: &str) -> Result<NodeId, HostError> {
        Ok(self.alloc(Payload::Text(text.to_string())))
    }

    fn tag(&self, node: &NodeId) -> Option<&str> {
        match &self.live(*node)?.payload {
            Payload::Element { tag, .. } => Some(tag),
            Payload::Text(_) => None,
        }
    }

    fn text(&self, node: &NodeId) -> Option<&str> {
        match &self.live(*node)?.payload {
            Payload::Text(text) => Some(text),
            Payload::Element { .. } => None,
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), HostError> {
        match &mut self.slot_mut(*node)?.payload {
            Payload::Text(current) => {
                *current = text.to_string();
            }
            Payload::Element { .. } => return Err(HostError::NotText { node: *node }),
        }
        self.journal.push(Mutation::SetText { node: *node });
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<&PropValue> {
        match &self.live(*node)?.payload {
            Payload::Element { attrs, .. } => attrs.get(name),
            Payload::Text(_) => None,
        }
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<String> {
        match self.live(*node).map(|slot| &slot.payload) {
            Some(Payload::Element { attrs, .. }) => attrs.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: PropValue) -> Result<(), HostError> {
        self.attrs_mut(*node)?.insert(name.to_string(), value);
        self.journal.push(Mutation::SetAttribute {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), HostError> {
        if self.attrs_mut(*node)?.remove(name).is_some() {
            self.journal.push(Mutation::RemoveAttribute {
                node: *node,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.live(*node)
            .map(|slot| slot.children.clone())
            .unwrap_or_default()
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.check_adopt(*parent, *child)?;
        self.detach(*child);
        self.slots[parent.index].children.push(*child);
        self.slots[child.index].parent = Some(*parent);
        self.journal.push(Mutation::Append {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn insert_child(&mut self, parent: &NodeId, index: usize, child: &NodeId) -> Result<(), HostError> {
        self.check_adopt(*parent, *child)?;
        self.detach(*child);
        let children = &mut self.slots[parent.index].children;
        let index = index.min(children.len());
        children.insert(index, *child);
        self.slots[child.index].parent = Some(*parent);
        self.journal.push(Mutation::Insert {
            parent: *parent,
            index,
            child: *child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        let index = self.position(*parent, *child)?;
        self.slots[parent.index].children.remove(index);
        self.slots[child.index].parent = None;
        self.release(*child);
        self.journal.push(Mutation::Remove {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new_child: &NodeId,
        old_child: &NodeId,
    ) -> Result<(), HostError> {
        self.position(*parent, *old_child)?;
        if new_child == old_child {
            return Ok(());
        }
        self.check_adopt(*parent, *new_child)?;
        self.detach(*new_child);
        let index = self.position(*parent, *old_child)?;
        self.slots[parent.index].children[index] = *new_child;
        self.slots[old_child.index].parent = None;
        self.slots[new_child.index].parent = Some(*parent);
        self.release(*old_child);
        self.journal.push(Mutation::Replace {
            parent: *parent,
            old: *old_child,
            new: *new_child,
        });
        Ok(())
    }
}

fn is_valid_tag(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(first) if first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::vdom::Handler;

    #[test]
    fn with_root_exposes_root_by_id() {
        let document = Document::with_root("root");
        let root = document.get_element_by_id("root").expect("root");
        assert_eq!(document.parent(root), Some(document.body()));
        assert_eq!(document.to_html(root), "<div id=\"root\"></div>");
    }

    #[test]
    fn invalid_tags_are_rejected() {
        let mut document = Document::new();
        assert_eq!(
            document.create_element("not a tag"),
            Err(HostError::InvalidTag {
                tag: "not a tag".to_string()
            })
        );
        assert!(document.create_element("").is_err());
        assert!(document.create_element("my-widget").is_ok());
    }

    #[test]
    fn insert_moves_an_attached_child() {
        let mut document = Document::new();
        let body = document.body();
        let a = document.create_element("a").unwrap();
        let b = document.create_element("b").unwrap();
        document.append_child(&body, &a).unwrap();
        document.append_child(&body, &b).unwrap();

        document.insert_child(&body, 0, &b).unwrap();
        assert_eq!(document.children(&body), vec![b, a]);
    }

    #[test]
    fn replace_swaps_in_place() {
        let mut document = Document::new();
        let body = document.body();
        let a = document.create_element("a").unwrap();
        let b = document.create_element("b").unwrap();
        let c = document.create_element("i").unwrap();
        document.append_child(&body, &a).unwrap();
        document.append_child(&body, &b).unwrap();

        document.replace_child(&body, &c, &a).unwrap();
        assert_eq!(document.children(&body), vec![c, b]);
        assert_eq!(document.parent(a), None);
    }

    #[test]
    fn removed_subtrees_are_released_and_reused() {
        let mut document = Document::new();
        let body = document.body();
        let list = document.create_element("ul").unwrap();
        let item = document.create_element("li").unwrap();
        document.append_child(&list, &item).unwrap();
        document.append_child(&body, &list).unwrap();
        assert_eq!(document.node_count(), 3);

        document.remove_child(&body, &list).unwrap();
        assert_eq!(document.node_count(), 1);
        assert_eq!(Host::tag(&document, &item), None);
        assert_eq!(
            document.set_text(&item, "x"),
            Err(HostError::UnknownNode { node: item })
        );

        let fresh = document.create_element("p").unwrap();
        let other = document.create_element("p").unwrap();
        assert_ne!(fresh, list);
        assert_ne!(other, item);
        assert_eq!(document.node_count(), 3);
        assert_eq!(Host::tag(&document, &list), None);
        assert_eq!(Host::tag(&document, &fresh), Some("p"));
    }

    #[test]
    fn replace_keeps_a_child_moved_out_of_the_old_subtree() {
        let mut document = Document::new();
        let body = document.body();
        let old = document.create_element("div").unwrap();
        let kept = document.create_text("kept").unwrap();
        document.append_child(&old, &kept).unwrap();
        document.append_child(&body, &old).unwrap();

        let new = document.create_element("section").unwrap();
        document.append_child(&new, &kept).unwrap();
        document.replace_child(&body, &new, &old).unwrap();

        assert_eq!(document.to_html(body), "<body><section>kept</section></body>");
        assert_eq!(document.parent(kept), Some(new));
        assert_eq!(document.node_count(), 3);
    }

    #[test]
    fn cannot_adopt_an_ancestor() {
        let mut document = Document::new();
        let body = document.body();
        let outer = document.create_element("div").unwrap();
        let inner = document.create_element("div").unwrap();
        document.append_child(&body, &outer).unwrap();
        document.append_child(&outer, &inner).unwrap();

        assert_eq!(
            document.append_child(&inner, &outer),
            Err(HostError::Cycle {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn text_nodes_have_no_children() {
        let mut document = Document::new();
        let text = document.create_text("hi").unwrap();
        let span = document.create_element("span").unwrap();
        assert_eq!(
            document.append_child(&text, &span),
            Err(HostError::NotAnElement { node: text })
        );
    }

    #[test]
    fn html_escapes_and_skips_handlers() {
        let mut document = Document::new();
        let body = document.body();
        let button = document.create_element("button").unwrap();
        let label = document.create_text("a < b").unwrap();
        document
            .set_attribute(&button, "title", PropValue::from("\"x\""))
            .unwrap();
        document
            .set_attribute(&button, "on_click", PropValue::Handler(Handler::new(|| {})))
            .unwrap();
        document.append_child(&button, &label).unwrap();
        document.append_child(&body, &button).unwrap();

        assert_eq!(
            document.to_html(button),
            "<button title=\"&quot;x&quot;\">a &lt; b</button>"
        );
    }

    #[test]
    fn dispatch_event_runs_handler() {
        let mut document = Document::new();
        let button = document.create_element("button").unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&clicks);
        document
            .set_attribute(
                &button,
                "on_click",
                PropValue::Handler(Handler::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })),
            )
            .unwrap();

        assert!(document.dispatch_event(button, "click"));
        assert!(!document.dispatch_event(button, "hover"));
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }
}
