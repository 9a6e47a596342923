// SPDX-License-Identifier: MPL-2.0
//! Demo window layout: controls and event log, with the popup overlay
//! stacked on top.

use super::Message;
use crate::popup::{Kind, Manager, Position};
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::theming::ThemeMode;
use crate::ui::Toast;
use iced::widget::{button, text, Column, Container, Row, Stack};
use iced::{Element, Length};
use std::collections::VecDeque;

/// Borrowed state needed to render the window.
pub struct ViewContext<'a> {
    pub manager: &'a Manager,
    pub theme_mode: ThemeMode,
    pub position: Position,
    pub show_close: bool,
    pub event_log: &'a VecDeque<String>,
    pub config_warning: Option<&'a str>,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let colors = ctx.theme_mode.colors();

    let spawn_row = Kind::ALL.into_iter().fold(
        Row::new().spacing(spacing::XS),
        |row, kind| row.push(control(kind.as_str(), Message::Spawn(kind))),
    );

    let options_row = Row::new()
        .spacing(spacing::XS)
        .push(control("sticky", Message::SpawnSticky))
        .push(control(
            &format!("position: {}", ctx.position.as_str()),
            Message::TogglePosition,
        ))
        .push(control(
            if ctx.show_close {
                "close button: on"
            } else {
                "close button: off"
            },
            Message::ToggleCloseButton,
        ))
        .push(control("close all", Message::CloseAll))
        .push(control(&format!("theme: {:?}", ctx.theme_mode), Message::CycleTheme));

    let status = text(format!(
        "active: {}  queued: {}  limit: {}",
        ctx.manager.active_count(),
        ctx.manager.queued_count(),
        ctx.manager.settings().max_visible,
    ))
    .size(typography::BODY);

    let log = ctx.event_log.iter().fold(
        Column::new().spacing(spacing::XXS),
        |column, line| column.push(text(line.clone()).size(typography::CAPTION)),
    );

    let mut controls = Column::new()
        .spacing(spacing::MD)
        .padding(spacing::LG)
        .push(text("Toastbox").size(typography::TITLE_MD))
        .push(spawn_row)
        .push(options_row)
        .push(status)
        .push(log);

    if let Some(warning) = ctx.config_warning {
        controls = controls.push(text(warning.to_string()).size(typography::CAPTION));
    }

    let base = Container::new(controls)
        .width(Length::Fill)
        .height(Length::Fill);

    Stack::new()
        .push(base)
        .push(Toast::view_overlay(ctx.manager, &colors).map(Message::Popup))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn control<'a>(label: &str, message: Message) -> Element<'a, Message> {
    button(text(label.to_string()).size(typography::BODY))
        .height(Length::Fixed(sizing::BUTTON_HEIGHT))
        .on_press(message)
        .into()
}
