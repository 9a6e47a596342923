// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the demo application.

use crate::popup::{self, Kind};
use std::time::Instant;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    /// Messages coming from the popup overlay (close buttons).
    Popup(popup::Message),
    /// Create a popup of the given kind.
    Spawn(Kind),
    /// Create a popup that stays until closed.
    SpawnSticky,
    TogglePosition,
    ToggleCloseButton,
    CloseAll,
    CycleTheme,
    Tick(Instant), // Drives popup timers while any popup is alive
}

/// Runtime flags passed from the command line.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `TOASTBOX_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
    /// Optional auto-dismiss delay overriding the configured one.
    pub duration_ms: Option<u64>,
}
