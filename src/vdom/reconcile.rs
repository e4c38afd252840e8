//! Diff/patch of a live subtree against an evaluated tree.
//!
//! Per node pair the reconciler syncs attributes, then text, then children.
//! Children are matched either purely by position and tag
//! ([`MatchStrategy::Positional`]) or by key first
//! ([`MatchStrategy::Keyed`]). Either way each live child ends up updated in
//! place, replaced, appended or removed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::Host;
use crate::vdom::evaluate::{EElement, ENode};
use crate::vdom::PropValue;

/// Attribute stamped on live nodes whose evaluated node carries a key.
pub const KEY_ATTRIBUTE: &str = "data-key";

/// How evaluated children are paired with live children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Index `i` pairs with index `i`; keys are ignored.
    #[default]
    Positional,
    /// Keyed children pair with the live child carrying the same key,
    /// unkeyed children fall back to position.
    Keyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    strategy: MatchStrategy,
    clear_stale_attributes: bool,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Positional,
            clear_stale_attributes: true,
        }
    }
}

impl Reconciler {
    pub fn new(strategy: MatchStrategy, clear_stale_attributes: bool) -> Self {
        Self {
            strategy,
            clear_stale_attributes,
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Makes `tree` the single child of `root`. The root itself is never
    /// replaced.
    pub fn render<H: Host>(&self, host: &mut H, root: &H::Node, tree: &ENode) -> Result<(), H::Error> {
        self.sync_children(host, root, std::slice::from_ref(tree))
    }

    /// Mutates `live` in place to match `node`.
    ///
    /// The caller guarantees the pair has the same tag (or both are text).
    pub fn sync<H: Host>(&self, host: &mut H, node: &ENode, live: &H::Node) -> Result<(), H::Error> {
        match node {
            ENode::Text(text) => {
                if host.text(live) != Some(text.as_str()) {
                    host.set_text(live, text)?;
                }
                Ok(())
            }
            ENode::Element(element) => {
                self.sync_attributes(host, element, live)?;
                self.sync_children(host, live, &element.children)
            }
        }
    }

    /// Reconciles the children of `parent` against `wanted`.
    pub fn sync_children<H: Host>(
        &self,
        host: &mut H,
        parent: &H::Node,
        wanted: &[ENode],
    ) -> Result<(), H::Error> {
        match self.strategy {
            MatchStrategy::Positional => self.sync_positional(host, parent, wanted),
            MatchStrategy::Keyed => self.sync_keyed(host, parent, wanted),
        }
    }

    fn sync_attributes<H: Host>(
        &self,
        host: &mut H,
        element: &EElement,
        live: &H::Node,
    ) -> Result<(), H::Error> {
        for (name, value) in &element.attrs {
            if host.attribute(live, name) != Some(value) {
                host.set_attribute(live, name, value.clone())?;
            }
        }

        if let Some(key) = &element.key {
            let marker = PropValue::from(key.as_str());
            if host.attribute(live, KEY_ATTRIBUTE) != Some(&marker) {
                host.set_attribute(live, KEY_ATTRIBUTE, marker)?;
            }
        }

        if self.clear_stale_attributes {
            for name in host.attribute_names(live) {
                let stamped = name == KEY_ATTRIBUTE && element.key.is_some();
                if !stamped && !element.attrs.contains_key(&name) {
                    host.remove_attribute(live, &name)?;
                }
            }
        }
        Ok(())
    }

    fn sync_positional<H: Host>(
        &self,
        host: &mut H,
        parent: &H::Node,
        wanted: &[ENode],
    ) -> Result<(), H::Error> {
        let live = host.children(parent);

        for (index, node) in wanted.iter().enumerate() {
            match live.get(index) {
                Some(current) if same_kind(host, node, current) => self.sync(host, node, current)?,
                Some(current) => {
                    let fresh = self.build(host, node)?;
                    host.replace_child(parent, &fresh, current)?;
                }
                None => {
                    let fresh = self.build(host, node)?;
                    host.append_child(parent, &fresh)?;
                }
            }
        }

        for stale in live.iter().skip(wanted.len()).rev() {
            host.remove_child(parent, stale)?;
        }
        Ok(())
    }

    fn sync_keyed<H: Host>(&self, host: &mut H, parent: &H::Node, wanted: &[ENode]) -> Result<(), H::Error> {
        let live = host.children(parent);
        let live_keys: Vec<Option<String>> = live
            .iter()
            .map(|child| {
                host.attribute(child, KEY_ATTRIBUTE)
                    .and_then(PropValue::as_str)
                    .map(str::to_owned)
            })
            .collect();

        let mut by_key: HashMap<&str, usize> = HashMap::new();
        for (index, key) in live_keys.iter().enumerate() {
            if let Some(key) = key {
                by_key.entry(key.as_str()).or_insert(index);
            }
        }

        let mut claimed = vec![false; live.len()];
        let mut placed = Vec::with_capacity(wanted.len());
        for (index, node) in wanted.iter().enumerate() {
            let matched = match node.key() {
                Some(key) => by_key
                    .get(key.as_str())
                    .copied()
                    .filter(|&i| !claimed[i] && same_kind(host, node, &live[i])),
                None => Some(index).filter(|&i| {
                    i < live.len()
                        && !claimed[i]
                        && live_keys[i].is_none()
                        && same_kind(host, node, &live[i])
                }),
            };

            let child = match matched {
                Some(i) => {
                    claimed[i] = true;
                    self.sync(host, node, &live[i])?;
                    live[i].clone()
                }
                None => self.build(host, node)?,
            };
            placed.push(child);
        }

        let mut current = Vec::with_capacity(live.len());
        for (child, claimed) in live.iter().zip(&claimed) {
            if *claimed {
                current.push(child.clone());
            } else {
                host.remove_child(parent, child)?;
            }
        }

        for (index, child) in placed.iter().enumerate() {
            if current.get(index) == Some(child) {
                continue;
            }
            current.retain(|c| c != child);
            current.insert(index, child.clone());
            host.insert_child(parent, index, child)?;
        }
        Ok(())
    }

    /// Creates a detached live node shaped like `node` and syncs into it.
    fn build<H: Host>(&self, host: &mut H, node: &ENode) -> Result<H::Node, H::Error> {
        let fresh = match node {
            ENode::Text(text) => host.create_text(text)?,
            ENode::Element(element) => host.create_element(&element.tag)?,
        };
        self.sync(host, node, &fresh)?;
        Ok(fresh)
    }
}

/// Tags match, or both sides are text.
fn same_kind<H: Host>(host: &H, node: &ENode, live: &H::Node) -> bool {
    node.tag() == host.tag(live)
}
