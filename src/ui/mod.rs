// SPDX-License-Identifier: MPL-2.0
//! Iced rendering of popups and the demo window's look.
//!
//! - [`toast`] - Toast overlay reading the manager's document
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode and popup accents

pub mod design_tokens;
pub mod theming;
pub mod toast;

pub use toast::Toast;
