// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Popup**: Values a popup request falls back to
//! - **Manager**: Capacity and lifecycle timings of the popup manager

// ==========================================================================
// Popup Defaults
// ==========================================================================

/// Content used when a request does not provide any.
pub const DEFAULT_CONTENT: &str = "Message";

/// Default auto-dismiss delay (in milliseconds). Zero disables auto-dismiss.
pub const DEFAULT_DURATION_MS: u64 = 3000;

/// Longest accepted auto-dismiss delay (in milliseconds).
pub const MAX_DURATION_MS: u64 = 600_000;

// ==========================================================================
// Manager Defaults
// ==========================================================================

/// Number of active popups before new ones are queued.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// Minimum accepted visible limit.
pub const MIN_MAX_VISIBLE: usize = 1;

/// Maximum accepted visible limit.
pub const MAX_MAX_VISIBLE: usize = 20;

/// Delay between showing a popup and running its show callback (in milliseconds).
pub const SHOW_CALLBACK_DELAY_MS: u64 = 10;

/// Exit transition length: delay between hiding a popup and detaching it
/// (in milliseconds).
pub const TEARDOWN_DELAY_MS: u64 = 400;

/// Longest accepted show callback delay (in milliseconds).
pub const MAX_SHOW_CALLBACK_DELAY_MS: u64 = 1000;

/// Longest accepted teardown delay (in milliseconds).
pub const MAX_TEARDOWN_DELAY_MS: u64 = 5000;
