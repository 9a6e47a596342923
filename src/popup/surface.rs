// SPDX-License-Identifier: MPL-2.0
//! Rendering surface abstraction.
//!
//! The manager never draws anything itself. It builds and mutates nodes on a
//! `Surface`, the same primitives a DOM offers: element creation, classes,
//! inline styles, text, tree insertion/removal and click bindings. The crate
//! ships [`Document`](super::Document), an in-memory implementation that the
//! Iced renderer reads from.

use super::options::PopupId;
use std::fmt;

/// DOM-like surface the popup manager renders onto.
pub trait Surface {
    /// Handle to a node owned by the surface.
    type Node: Clone + fmt::Debug;

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Node;

    /// Deep-copies a node and its subtree. Click bindings are not copied.
    fn clone_node(&mut self, node: &Self::Node) -> Self::Node;

    /// Appends `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    /// Appends `node` to the document body.
    fn append_to_body(&mut self, node: &Self::Node);

    /// Detaches `node` from its parent and releases it.
    ///
    /// Returns `false` if the node was already released.
    fn detach(&mut self, node: &Self::Node) -> bool;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn set_text(&mut self, node: &Self::Node, text: &str);

    /// Finds the first descendant of `root` (depth-first) carrying `class`.
    fn find_by_class(&self, root: &Self::Node, class: &str) -> Option<Self::Node>;

    /// Routes clicks on `node` to the popup `target`.
    fn bind_click(&mut self, node: &Self::Node, target: PopupId);
}
