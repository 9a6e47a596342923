// SPDX-License-Identifier: MPL-2.0
//! Demo application driving a popup [`Manager`] from an Iced window.
//!
//! The `App` struct owns the manager, translates button presses into popup
//! requests, feeds ticks to the manager's timers and keeps a short log of
//! the lifecycle events it reports. Theme changes are persisted to
//! `settings.toml`.

mod message;
mod subscription;
mod view;

pub use message::{Flags, Message};

use crate::config::{self, Config};
use crate::popup::{Event, Kind, Manager, PopupOptions, Position};
use crate::ui::theming::ThemeMode;
use iced::{window, Element, Subscription, Task, Theme};
use std::collections::VecDeque;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const WINDOW_DEFAULT_WIDTH: f32 = 800.0;
pub const WINDOW_DEFAULT_HEIGHT: f32 = 600.0;
pub const MIN_WINDOW_WIDTH: f32 = 480.0;
pub const MIN_WINDOW_HEIGHT: f32 = 360.0;

/// Number of lifecycle events kept for display.
const EVENT_LOG_CAPACITY: usize = 8;

/// Root Iced application state.
pub struct App {
    manager: Manager,
    config: Config,
    config_dir: Option<PathBuf>,
    theme_mode: ThemeMode,
    /// Anchor used for the next popups.
    position: Position,
    /// Whether the next popups get a close button.
    show_close: bool,
    /// Number of popups requested so far, used to label them.
    spawned: u64,
    /// Most recent lifecycle events, newest first.
    event_log: VecDeque<String>,
    /// Problem met while loading or saving preferences.
    config_warning: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("manager", &self.manager)
            .field("theme_mode", &self.theme_mode)
            .field("position", &self.position)
            .field("show_close", &self.show_close)
            .field("spawned", &self.spawned)
            .finish_non_exhaustive()
    }
}

impl Default for App {
    fn default() -> Self {
        let config = Config::default();
        Self {
            manager: Manager::with_settings(config.manager_settings()),
            position: config.popup.position.unwrap_or_default(),
            show_close: config.popup.show_close.unwrap_or_default(),
            theme_mode: config.general.theme_mode,
            config,
            config_dir: None,
            spawned: 0,
            event_log: VecDeque::new(),
            config_warning: None,
        }
    }
}

pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH, WINDOW_DEFAULT_HEIGHT),
        min_size: Some(iced::Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT)),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires a `Fn` boot; flags are consumed on the first call
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state.borrow_mut().take().unwrap_or_default();
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Initializes application state from flags and persisted preferences.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config_dir = flags.config_dir.map(PathBuf::from);
        let (config, config_warning) = config::load_with_override(config_dir.clone());

        let mut defaults = config.popup_defaults();
        if let Some(ms) = flags.duration_ms {
            defaults.duration = Duration::from_millis(ms.min(config::MAX_DURATION_MS));
        }

        let mut manager = Manager::with_settings(config.manager_settings());
        manager.set_defaults(defaults);

        let mut app = App {
            manager,
            position: config.popup.position.unwrap_or_default(),
            show_close: config.popup.show_close.unwrap_or_default(),
            theme_mode: config.general.theme_mode,
            config,
            config_dir,
            config_warning,
            ..Self::default()
        };

        if let Some(warning) = app.config_warning.clone() {
            // Surface the problem the same way as any other message
            app.spawn(
                PopupOptions::new(warning)
                    .kind(Kind::Warning)
                    .duration(Duration::ZERO)
                    .show_close(true),
            );
        }

        (app, Task::none())
    }

    fn title(&self) -> String {
        match self.manager.active_count() {
            0 => "Toastbox".to_string(),
            n => format!("Toastbox ({n})"),
        }
    }

    fn theme(&self) -> Theme {
        self.theme_mode.iced_theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        subscription::create_tick_subscription(!self.manager.is_idle())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Popup(message) => {
                let events = self.manager.handle_message(&message);
                self.record(events);
            }
            Message::Tick(now) => {
                let events = self.manager.tick(now);
                self.record(events);
            }
            Message::Spawn(kind) => {
                self.spawned += 1;
                let options = PopupOptions::new(format!("{} #{}", kind_label(kind), self.spawned))
                    .kind(kind)
                    .position(self.position)
                    .show_close(self.show_close);
                self.spawn(options);
            }
            Message::SpawnSticky => {
                self.spawned += 1;
                let options = PopupOptions::new(format!("Sticky #{}", self.spawned))
                    .duration(Duration::ZERO)
                    .position(self.position)
                    .show_close(true);
                self.spawn(options);
            }
            Message::TogglePosition => {
                self.position = match self.position {
                    Position::Top => Position::Bottom,
                    Position::Bottom => Position::Top,
                };
            }
            Message::ToggleCloseButton => {
                self.show_close = !self.show_close;
            }
            Message::CloseAll => {
                self.manager.close_all();
                let events = self.manager.drain_events();
                self.record(events);
            }
            Message::CycleTheme => {
                self.theme_mode = self.theme_mode.next();
                self.persist_preferences();
            }
        }
        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            manager: &self.manager,
            theme_mode: self.theme_mode,
            position: self.position,
            show_close: self.show_close,
            event_log: &self.event_log,
            config_warning: self.config_warning.as_deref(),
        })
    }

    fn spawn(&mut self, options: PopupOptions) {
        match self.manager.msg(options) {
            Ok(id) => info!(popup = %id, "popup requested"),
            Err(err) => warn!(%err, "popup request rejected"),
        }
    }

    fn record(&mut self, events: Vec<Event>) {
        for event in events {
            let line = match &event {
                Event::Shown(id) => format!("shown {id}"),
                Event::Closed(id) => format!("closed {id}"),
                Event::Discarded(id) => format!("discarded {id}"),
            };
            self.event_log.push_front(line);
        }
        self.event_log.truncate(EVENT_LOG_CAPACITY);
    }

    fn persist_preferences(&mut self) {
        self.config.general.theme_mode = self.theme_mode;
        self.config.popup.position = Some(self.position);
        self.config.popup.show_close = Some(self.show_close);

        match config::save_with_override(&self.config, self.config_dir.clone()) {
            Ok(()) => self.config_warning = None,
            Err(err) => {
                warn!(%err, "failed to save preferences");
                self.config_warning = Some(err.to_string());
            }
        }
    }
}

fn kind_label(kind: Kind) -> &'static str {
    match kind {
        Kind::Success => "Success",
        Kind::Error => "Error",
        Kind::Warning => "Warning",
        Kind::Info => "Info",
    }
}
