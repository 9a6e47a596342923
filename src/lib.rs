// SPDX-License-Identifier: MPL-2.0
//! `toastbox` is a popup (toast) notification manager with an Iced front-end.
//!
//! The [`popup`] module holds the rendering-agnostic core: a capacity-limited
//! manager with a FIFO queue, deterministic timers and a DOM-like surface.
//! [`ui`] draws that surface with Iced, and [`app`] is a small demo window
//! driving both from user preferences stored by [`config`].

#![doc(html_root_url = "https://docs.rs/toastbox/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod paths;
pub mod popup;
pub mod ui;
pub mod util;
