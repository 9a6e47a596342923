// SPDX-License-Identifier: MPL-2.0
//! Popup (toast) notifications.
//!
//! Popups are short messages mounted on a [`Surface`], shown with an enter
//! transition, optionally dismissed automatically after a duration, and
//! detached after an exit transition. At most
//! [`Settings::max_visible`] popups are active at once; the rest wait in a
//! FIFO queue and are admitted one by one as active popups go away.
//!
//! # Components
//!
//! - [`options`] - Request shapes, defaults and resolved `PopupConfig`
//! - [`manager`] - `Manager` owning records, the queue and the timers
//! - [`element`] - Popup node structure and its classes
//! - [`surface`] - DOM-like `Surface` trait
//! - [`document`] - In-memory `Document` surface
//! - [`timer`] - Deterministic `TimerQueue`
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use toastbox::popup::{Event, Manager, PopupOptions};
//!
//! let mut manager = Manager::new();
//! let id = manager
//!     .success(PopupOptions::new("Saved").duration(Duration::from_secs(2)))
//!     .expect("valid popup");
//!
//! // Drive the timers from your event loop.
//! let events = manager.advance(Duration::from_secs(3));
//! assert!(events.contains(&Event::Shown(id.clone())));
//! assert!(events.contains(&Event::Closed(id)));
//! ```

pub mod document;
pub mod element;
pub mod manager;
pub mod options;
pub mod surface;
pub mod timer;

pub use document::{Document, NodeId};
pub use manager::{Event, Manager, Message, Phase, Settings};
pub use options::{
    Callback, Kind, PopupConfig, PopupDefaults, PopupId, PopupOptions, Position, Request, Width,
};
pub use surface::Surface;
pub use timer::{TimerId, TimerQueue};
