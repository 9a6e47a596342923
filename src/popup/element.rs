// SPDX-License-Identifier: MPL-2.0
//! Visual node of a popup.
//!
//! Every popup is a clone of one pristine template:
//!
//! ```text
//! div.toast
//! ├── p.toast__content
//! └── button.toast__close   "×"
//! ```
//!
//! The template is built on the first mount and kept detached, so later
//! clones never inherit the state of a live popup.

use super::options::{Kind, PopupConfig, PopupId, Position, Width};
use super::surface::Surface;

pub const ROOT_CLASS: &str = "toast";
pub const CONTENT_CLASS: &str = "toast__content";
pub const CLOSE_CLASS: &str = "toast__close";
pub const ACTIVE_CLASS: &str = "toast--active";

/// Offset applied on the anchored edge before the enter transition.
const EDGE_OFFSET: &str = "-10%";

/// Class marking a popup's kind, e.g. `toast--error`.
#[must_use]
pub fn kind_class(kind: Kind) -> String {
    format!("{ROOT_CLASS}--{}", kind.as_str())
}

/// Reads the kind back from a node's class list.
#[must_use]
pub fn kind_from_classes<'a>(classes: impl IntoIterator<Item = &'a String>) -> Kind {
    classes
        .into_iter()
        .find_map(|class| {
            Kind::ALL
                .into_iter()
                .find(|kind| *class == kind_class(*kind))
        })
        .unwrap_or_default()
}

fn build_template<S: Surface>(surface: &mut S) -> S::Node {
    let root = surface.create_element("div");
    surface.add_class(&root, ROOT_CLASS);

    let content = surface.create_element("p");
    surface.add_class(&content, CONTENT_CLASS);
    surface.append_child(&root, &content);

    let close = surface.create_element("button");
    surface.add_class(&close, CLOSE_CLASS);
    surface.set_text(&close, "\u{00d7}");
    surface.append_child(&root, &close);

    root
}

/// Builds the node for popup `id`, appends it to the body and returns it.
///
/// `template` is filled on first use and reused afterwards.
pub fn mount<S: Surface>(
    surface: &mut S,
    template: &mut Option<S::Node>,
    id: &PopupId,
    config: &PopupConfig,
) -> S::Node {
    let template = template.get_or_insert_with(|| build_template(surface));
    let node = surface.clone_node(template);
    surface.append_to_body(&node);
    surface.set_attribute(&node, "id", id.as_str());

    if let Width::Length(width) = config.width() {
        surface.set_style(&node, "width", width);
    }

    if let Some(content) = surface.find_by_class(&node, CONTENT_CLASS) {
        surface.set_text(&content, config.content());
    }

    match config.position() {
        Position::Top => {
            surface.set_style(&node, "top", EDGE_OFFSET);
        }
        Position::Bottom => {
            surface.set_style(&node, "top", "auto");
            surface.set_style(&node, "bottom", EDGE_OFFSET);
        }
    }

    for kind in Kind::ALL {
        surface.remove_class(&node, &kind_class(kind));
    }
    surface.add_class(&node, &kind_class(config.kind()));

    if let Some(close) = surface.find_by_class(&node, CLOSE_CLASS) {
        if config.show_close() {
            surface.set_style(&close, "display", "block");
            surface.bind_click(&close, id.clone());
        } else {
            surface.set_style(&close, "display", "none");
        }
    }

    node
}
