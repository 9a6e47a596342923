// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the demo application.

use super::Message;
use iced::{time, Subscription};
use std::time::Duration;

/// Tick interval while the manager has work, roughly one frame.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Creates the periodic tick subscription that drives popup timers.
///
/// No tick is requested while the manager is idle.
pub fn create_tick_subscription(active: bool) -> Subscription<Message> {
    if active {
        time::every(TICK_INTERVAL).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
