// SPDX-License-Identifier: MPL-2.0
//! In-memory retained document.
//!
//! `Document` is the default [`Surface`]: a small arena-backed node tree with
//! a body root. It keeps exactly the state a browser DOM would keep for the
//! popup structure (classes, inline styles, attributes, text, click
//! bindings) so renderers and tests can inspect what the manager produced.

use super::options::PopupId;
use super::surface::Surface;
use std::collections::BTreeMap;

/// Handle to a node in a [`Document`].
///
/// Slots are reused after release; the generation keeps a stale handle from
/// reaching the node that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    click: Option<PopupId>,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// Arena-backed node tree.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    /// Released slot indices, reused before the arena grows.
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                data: Some(body),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The body node every popup is mounted under.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.data.as_ref())
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.data.as_mut())
    }

    fn insert(&mut self, data: NodeData) -> NodeId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.data = Some(data);
                return NodeId {
                    index,
                    generation: slot.generation,
                };
            }
        }
        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Returns whether the node has not been released.
    #[must_use]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.data(node).is_some()
    }

    /// Returns whether the node is reachable from the body.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.data(id).and_then(|data| data.parent);
        }
        false
    }

    /// Number of live nodes, the body included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots the arena holds, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |data| data.children.as_slice())
    }

    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.data(node).map(|data| data.tag.as_str())
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.data(node).map(|data| data.text.as_str())
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.data(node).map_or(&[], |data| data.classes.as_slice())
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.data(node)
            .and_then(|data| data.styles.get(property))
            .map(String::as_str)
    }

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node)
            .and_then(|data| data.attributes.get(name))
            .map(String::as_str)
    }

    /// Popup a click on `node` is routed to, if any.
    #[must_use]
    pub fn click_target(&self, node: NodeId) -> Option<&PopupId> {
        self.data(node).and_then(|data| data.click.as_ref())
    }

    /// Emulates a user click: returns the popup the click should close.
    #[must_use]
    pub fn click(&self, node: NodeId) -> Option<PopupId> {
        if !self.is_attached(node) {
            return None;
        }
        self.click_target(node).cloned()
    }

    fn unlink(&mut self, node: NodeId) {
        let parent = self.data(node).and_then(|data| data.parent);
        if let Some(parent) = parent {
            if let Some(parent_data) = self.data_mut(parent) {
                parent_data.children.retain(|child| *child != node);
            }
        }
        if let Some(data) = self.data_mut(node) {
            data.parent = None;
        }
    }

    fn release(&mut self, node: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
        else {
            return;
        };
        let Some(data) = slot.data.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.index);
        for child in data.children {
            self.release(child);
        }
    }

    fn copy_subtree(&mut self, node: NodeId) -> Option<NodeId> {
        let data = self.data(node)?.clone();
        let copy = self.insert(NodeData {
            children: Vec::new(),
            parent: None,
            click: None,
            ..data.clone()
        });
        for child in data.children {
            if let Some(child_copy) = self.copy_subtree(child) {
                if let Some(child_data) = self.data_mut(child_copy) {
                    child_data.parent = Some(copy);
                }
                if let Some(copy_data) = self.data_mut(copy) {
                    copy_data.children.push(child_copy);
                }
            }
        }
        Some(copy)
    }
}

impl Surface for Document {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        })
    }

    fn clone_node(&mut self, node: &NodeId) -> NodeId {
        self.copy_subtree(*node)
            .unwrap_or_else(|| self.create_element("div"))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        if parent == child || !self.is_alive(*parent) || !self.is_alive(*child) {
            return;
        }
        self.unlink(*child);
        if let Some(child_data) = self.data_mut(*child) {
            child_data.parent = Some(*parent);
        }
        if let Some(parent_data) = self.data_mut(*parent) {
            parent_data.children.push(*child);
        }
    }

    fn append_to_body(&mut self, node: &NodeId) {
        let body = self.body;
        self.append_child(&body, node);
    }

    fn detach(&mut self, node: &NodeId) -> bool {
        if *node == self.body || !self.is_alive(*node) {
            return false;
        }
        self.unlink(*node);
        self.release(*node);
        true
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(data) = self.data_mut(*node) {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.data_mut(*node) {
            if !data.classes.iter().any(|existing| existing == class) {
                data.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.data_mut(*node) {
            data.classes.retain(|existing| existing != class);
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.data(*node)
            .is_some_and(|data| data.classes.iter().any(|existing| existing == class))
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        if let Some(data) = self.data_mut(*node) {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(data) = self.data_mut(*node) {
            data.text = text.to_string();
        }
    }

    fn find_by_class(&self, root: &NodeId, class: &str) -> Option<NodeId> {
        for child in self.children(*root) {
            if self.has_class(child, class) {
                return Some(*child);
            }
            if let Some(found) = self.find_by_class(child, class) {
                return Some(found);
            }
        }
        None
    }

    fn bind_click(&mut self, node: &NodeId, target: PopupId) {
        if let Some(data) = self.data_mut(*node) {
            data.click = Some(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(doc: &mut Document) -> (NodeId, NodeId) {
        let root = doc.create_element("div");
        doc.add_class(&root, "card");
        let label = doc.create_element("p");
        doc.add_class(&label, "card__label");
        doc.set_text(&label, "hello");
        doc.append_child(&root, &label);
        (root, label)
    }

    #[test]
    fn new_document_only_has_body() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert!(doc.children(doc.body()).is_empty());
    }

    #[test]
    fn append_to_body_attaches_node() {
        let mut doc = Document::new();
        let (root, label) = card(&mut doc);
        assert!(!doc.is_attached(root));

        doc.append_to_body(&root);
        assert!(doc.is_attached(root));
        assert!(doc.is_attached(label));
        assert_eq!(doc.children(doc.body()), &[root]);
    }

    #[test]
    fn classes_are_not_duplicated() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.add_class(&node, "a");
        doc.add_class(&node, "a");
        assert_eq!(doc.classes(node), &["a".to_string()]);

        doc.remove_class(&node, "a");
        assert!(!doc.has_class(&node, "a"));
    }

    #[test]
    fn clone_copies_subtree_without_click_bindings() {
        let mut doc = Document::new();
        let (root, label) = card(&mut doc);
        doc.set_style(&root, "width", "200px");
        doc.bind_click(&label, PopupId::from_raw("popup_1_1"));

        let copy = doc.clone_node(&root);
        assert_ne!(copy, root);
        assert_eq!(doc.style(copy, "width"), Some("200px"));

        let copied_label = doc
            .find_by_class(&copy, "card__label")
            .expect("label should be cloned");
        assert_ne!(copied_label, label);
        assert_eq!(doc.text(copied_label), Some("hello"));
        assert!(doc.click_target(copied_label).is_none());
        assert!(doc.click_target(label).is_some());
    }

    #[test]
    fn detach_releases_subtree() {
        let mut doc = Document::new();
        let (root, label) = card(&mut doc);
        doc.append_to_body(&root);
        assert_eq!(doc.node_count(), 3);

        assert!(doc.detach(&root));
        assert!(!doc.is_alive(root));
        assert!(!doc.is_alive(label));
        assert_eq!(doc.node_count(), 1);
        assert!(doc.children(doc.body()).is_empty());

        // Released exactly once.
        assert!(!doc.detach(&root));
    }

    #[test]
    fn released_slots_are_reused() {
        let mut doc = Document::new();
        for _ in 0..1000 {
            let (root, _label) = card(&mut doc);
            doc.append_to_body(&root);
            assert!(doc.detach(&root));
        }

        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.capacity(), 3);
    }

    #[test]
    fn stale_handle_does_not_reach_reused_slot() {
        let mut doc = Document::new();
        let (old, _label) = card(&mut doc);
        doc.append_to_body(&old);
        doc.detach(&old);

        let (new, _label) = card(&mut doc);
        doc.append_to_body(&new);

        assert!(!doc.is_alive(old));
        assert!(!doc.has_class(&old, "card"));
        assert!(!doc.detach(&old));
        assert!(doc.is_attached(new));
    }

    #[test]
    fn body_cannot_be_detached() {
        let mut doc = Document::new();
        let body = doc.body();
        assert!(!doc.detach(&body));
        assert!(doc.is_alive(body));
    }

    #[test]
    fn click_requires_attached_node() {
        let mut doc = Document::new();
        let (root, label) = card(&mut doc);
        let id = PopupId::from_raw("popup_1_2");
        doc.bind_click(&label, id.clone());

        assert_eq!(doc.click(label), None);
        doc.append_to_body(&root);
        assert_eq!(doc.click(label), Some(id));
    }

    #[test]
    fn find_by_class_searches_depth_first() {
        let mut doc = Document::new();
        let (root, label) = card(&mut doc);
        assert_eq!(doc.find_by_class(&root, "card__label"), Some(label));
        assert_eq!(doc.find_by_class(&root, "missing"), None);
    }
}
