// SPDX-License-Identifier: MPL-2.0
//! Toast widget rendering the popups of a [`Manager`].
//!
//! The manager only mutates its [`Document`]; this module reads the
//! resulting nodes back (content text, kind class, width and anchoring
//! styles, close binding) and turns them into Iced widgets. Shown popups are
//! drawn opaque, hiding ones faded for the length of their exit transition.
//! Created and queued popups stay off screen.

use crate::popup::element::{self, CLOSE_CLASS, CONTENT_CLASS, ROOT_CLASS};
use crate::popup::{Document, Kind, Manager, Message, NodeId, Phase, PopupId, Position, Surface};
use crate::ui::design_tokens::{
    border, opacity, palette, radius, shadow, sizing, spacing, typography,
};
use crate::ui::theming::ColorScheme;
use iced::widget::{button, container, text, Column, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// What the overlay needs to know about one mounted popup.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub id: PopupId,
    pub content: String,
    pub kind: Kind,
    pub position: Position,
    pub width: f32,
    /// Set while the popup is running its exit transition.
    pub hiding: bool,
    /// Target of the close control when it is displayed.
    pub close: Option<PopupId>,
}

impl ToastView {
    /// Reads the popup node `node` of `document`.
    ///
    /// Returns `None` for nodes that are not popup roots.
    #[must_use]
    pub fn from_node(document: &Document, node: NodeId, phase: Phase) -> Option<Self> {
        if !document.has_class(&node, ROOT_CLASS) {
            return None;
        }
        let id = PopupId::from_raw(document.attribute(node, "id")?);

        let content = document
            .find_by_class(&node, CONTENT_CLASS)
            .and_then(|content| document.text(content))
            .unwrap_or_default()
            .to_string();

        let position = if document.style(node, "bottom").is_some() {
            Position::Bottom
        } else {
            Position::Top
        };

        let close = document
            .find_by_class(&node, CLOSE_CLASS)
            .filter(|close| document.style(*close, "display") == Some("block"))
            .and_then(|close| document.click_target(close).cloned());

        Some(Self {
            id,
            content,
            kind: element::kind_from_classes(document.classes(node)),
            position,
            width: parse_width(document.style(node, "width")),
            hiding: phase == Phase::Hiding,
            close,
        })
    }
}

/// Converts a CSS width to pixels. `auto`, relative units and garbage fall
/// back to the default toast width.
#[must_use]
pub fn parse_width(width: Option<&str>) -> f32 {
    width
        .map(str::trim)
        .and_then(|raw| raw.strip_suffix("px").unwrap_or(raw).trim().parse::<f32>().ok())
        .filter(|px| px.is_finite())
        .map_or(sizing::TOAST_WIDTH, |px| {
            px.clamp(sizing::TOAST_MIN_WIDTH, sizing::TOAST_MAX_WIDTH)
        })
}

/// Collects the popups currently on screen, in mount order.
#[must_use]
pub fn visible(manager: &Manager) -> Vec<ToastView> {
    let document = manager.surface();
    document
        .children(document.body())
        .iter()
        .filter_map(|node| {
            let id = PopupId::from_raw(document.attribute(*node, "id")?);
            match manager.phase(&id)? {
                phase @ (Phase::Shown | Phase::Hiding) => {
                    ToastView::from_node(document, *node, phase)
                }
                Phase::Created | Phase::Queued => None,
            }
        })
        .collect()
}

/// Toast widget configuration.
pub struct Toast;

impl Toast {
    /// Renders a single popup.
    pub fn view<'a>(toast: &ToastView, colors: &ColorScheme) -> Element<'a, Message> {
        let accent_color = colors.kind_color(toast.kind);
        let alpha = if toast.hiding {
            opacity::HIDING
        } else {
            opacity::OPAQUE
        };

        let message_widget = Text::new(toast.content.clone())
            .size(typography::BODY)
            .style(move |theme: &Theme| text::Style {
                color: Some(Color {
                    a: alpha,
                    ..theme.palette().text
                }),
            });

        let mut content = Row::new()
            .spacing(spacing::SM)
            .align_y(alignment::Vertical::Center)
            .push(
                Container::new(message_widget)
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Left),
            );

        if let Some(target) = &toast.close {
            let close_button = button(text("\u{00d7}").size(typography::BODY))
                .on_press(Message::Close(target.clone()))
                .padding(spacing::XXS)
                .style(close_button_style);
            content = content.push(close_button);
        }

        Container::new(content)
            .width(Length::Fixed(toast.width))
            .padding(spacing::SM)
            .style(move |theme: &Theme| toast_container_style(theme, accent_color, alpha))
            .into()
    }

    /// Renders every visible popup, top-anchored ones at the top centre and
    /// bottom-anchored ones at the bottom centre.
    pub fn view_overlay<'a>(manager: &Manager, colors: &ColorScheme) -> Element<'a, Message> {
        let (top, bottom): (Vec<ToastView>, Vec<ToastView>) = visible(manager)
            .into_iter()
            .partition(|toast| toast.position == Position::Top);

        if top.is_empty() && bottom.is_empty() {
            return Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        let anchored = |toasts: Vec<ToastView>, vertical: alignment::Vertical| {
            let widgets: Vec<Element<'a, Message>> = toasts
                .iter()
                .map(|toast| Self::view(toast, colors))
                .collect();
            Container::new(
                Column::with_children(widgets)
                    .spacing(spacing::XS)
                    .align_x(alignment::Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(vertical)
        };

        Column::new()
            .push(anchored(top, alignment::Vertical::Top))
            .push(anchored(bottom, alignment::Vertical::Bottom))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(spacing::MD)
            .into()
    }
}

/// Style function for the toast container.
fn toast_container_style(theme: &Theme, accent_color: Color, alpha: f32) -> container::Style {
    let bg_color = theme.extended_palette().background.base.color;

    container::Style {
        background: Some(iced::Background::Color(Color { a: alpha, ..bg_color })),
        border: iced::Border {
            color: Color {
                a: alpha,
                ..accent_color
            },
            width: border::WIDTH_MD,
            radius: radius::MD.into(),
        },
        shadow: if alpha < opacity::OPAQUE {
            shadow::NONE
        } else {
            shadow::MD
        },
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

/// Style function for the close button.
fn close_button_style(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().background.base;
    let hover_background = |alpha: f32| {
        Some(iced::Background::Color(Color {
            a: alpha,
            ..palette::GRAY_400
        }))
    };

    let (background, text_color) = match status {
        button::Status::Active => (None, base.text),
        button::Status::Hovered => (hover_background(opacity::OVERLAY_SUBTLE), base.text),
        button::Status::Pressed => (hover_background(opacity::OVERLAY_MEDIUM), base.text),
        button::Status::Disabled => (
            None,
            Color {
                a: opacity::OVERLAY_MEDIUM,
                ..base.text
            },
        ),
    };

    button::Style {
        background,
        text_color,
        border: iced::Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}
