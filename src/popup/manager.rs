// SPDX-License-Identifier: MPL-2.0
//! Popup lifecycle management.
//!
//! The `Manager` owns every popup record and its visual node. A popup goes
//! through `Created → Shown → Hiding → removed`, or
//! `Created → Queued → Shown → Hiding → removed` when the visible limit is
//! reached. Queued popups can also be dropped straight away by
//! [`Manager::close_all`].
//!
//! All deferred work (show callbacks, auto-dismiss, teardown after the exit
//! transition) goes through a [`TimerQueue`] that only moves when the owner
//! calls [`Manager::advance`] or [`Manager::tick`].

use super::document::Document;
use super::element;
use super::options::{Callback, Kind, PopupConfig, PopupDefaults, PopupId, Request};
use super::surface::Surface;
use super::timer::{TimerId, TimerQueue};
use crate::config::defaults::{
    DEFAULT_MAX_VISIBLE, MIN_MAX_VISIBLE, SHOW_CALLBACK_DELAY_MS, TEARDOWN_DELAY_MS,
};
use crate::error::Result;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Messages for popup state changes coming from the UI.
#[derive(Debug, Clone)]
pub enum Message {
    /// The close control of a popup was clicked.
    Close(PopupId),
    /// Periodic tick driving the timers.
    Tick(Instant),
}

/// Lifecycle notifications produced by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The popup's show callback point was reached.
    Shown(PopupId),
    /// The popup finished its exit transition and was removed.
    Closed(PopupId),
    /// A queued popup was dropped without ever being shown.
    Discarded(PopupId),
}

/// Lifecycle phase of a live popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Created,
    Queued,
    Shown,
    Hiding,
}

/// Runtime tuning of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of active popups before new ones are queued.
    /// Values below 1 are raised to 1 by the manager.
    pub max_visible: usize,
    /// Delay between `show` and the `on_show` callback.
    pub show_callback_delay: Duration,
    /// Grace period between `hide` and detaching the node.
    pub teardown_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_visible: DEFAULT_MAX_VISIBLE,
            show_callback_delay: Duration::from_millis(SHOW_CALLBACK_DELAY_MS),
            teardown_delay: Duration::from_millis(TEARDOWN_DELAY_MS),
        }
    }
}

struct PopupRecord<N> {
    id: PopupId,
    config: PopupConfig,
    node: N,
    /// Pending auto-dismiss timer, only set while shown.
    timer: Option<TimerId>,
    phase: Phase,
}

enum Deferred {
    NotifyShown {
        id: PopupId,
        callback: Option<Callback>,
    },
    AutoDismiss(PopupId),
    Teardown(PopupId),
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deferred::NotifyShown { id, callback } => f
                .debug_struct("NotifyShown")
                .field("id", id)
                .field("callback", &callback.is_some())
                .finish(),
            Deferred::AutoDismiss(id) => f.debug_tuple("AutoDismiss").field(id).finish(),
            Deferred::Teardown(id) => f.debug_tuple("Teardown").field(id).finish(),
        }
    }
}

/// Owns popup records, their nodes on the surface, and their timers.
pub struct Manager<S: Surface = Document> {
    surface: S,
    settings: Settings,
    defaults: PopupDefaults,
    /// Created, shown and hiding popups.
    active: HashMap<PopupId, PopupRecord<S::Node>>,
    /// Popups waiting for a vacancy, oldest first.
    queue: VecDeque<PopupRecord<S::Node>>,
    timers: TimerQueue<Deferred>,
    template: Option<S::Node>,
    events: Vec<Event>,
    last_tick: Option<Instant>,
}

impl<S: Surface> fmt::Debug for Manager<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("settings", &self.settings)
            .field("active", &self.active.len())
            .field("queued", &self.queue.len())
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

impl Default for Manager<Document> {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager<Document> {
    /// Creates a manager rendering onto a fresh in-memory document.
    #[must_use]
    pub fn new() -> Self {
        Self::with_surface(Document::new(), Settings::default())
    }

    /// Same as [`Manager::new`] with custom settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_surface(Document::new(), settings)
    }
}

impl<S: Surface> Manager<S> {
    #[must_use]
    pub fn with_surface(surface: S, settings: Settings) -> Self {
        Self {
            surface,
            settings: Settings {
                max_visible: settings.max_visible.max(MIN_MAX_VISIBLE),
                ..settings
            },
            defaults: PopupDefaults::default(),
            active: HashMap::new(),
            queue: VecDeque::new(),
            timers: TimerQueue::new(),
            template: None,
            events: Vec::new(),
            last_tick: None,
        }
    }

    /// Replaces the values requests fall back to.
    pub fn set_defaults(&mut self, defaults: PopupDefaults) {
        self.defaults = defaults;
    }

    #[must_use]
    pub fn defaults(&self) -> &PopupDefaults {
        &self.defaults
    }

    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Creates a popup and mounts its node without showing it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::error::Error::InvalidArgument)
    /// when the request does not resolve to a valid configuration.
    pub fn create(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        let config = PopupConfig::resolve(&self.defaults, request.into())
            .inspect_err(|err| warn!(%err, "rejected popup request"))?;

        let id = PopupId::generate();
        let node = element::mount(&mut self.surface, &mut self.template, &id, &config);
        debug!(popup = %id, kind = %config.kind(), "popup created");

        self.active.insert(
            id.clone(),
            PopupRecord {
                id: id.clone(),
                config,
                node,
                timer: None,
                phase: Phase::Created,
            },
        );
        Ok(id)
    }

    /// Shows an active popup.
    ///
    /// Returns `false` for unknown, queued or hiding popups. Showing an
    /// already shown popup is a no-op that returns `true`.
    pub fn show(&mut self, id: &PopupId) -> bool {
        let Some(record) = self.active.get_mut(id) else {
            return false;
        };
        match record.phase {
            Phase::Shown => return true,
            Phase::Hiding => return false,
            Phase::Created | Phase::Queued => {}
        }

        self.surface.add_class(&record.node, element::ACTIVE_CLASS);
        record.phase = Phase::Shown;

        self.timers.schedule(
            self.settings.show_callback_delay,
            Deferred::NotifyShown {
                id: id.clone(),
                callback: record.config.on_show().cloned(),
            },
        );

        if record.config.auto_dismisses() {
            let timer = self
                .timers
                .schedule(record.config.duration(), Deferred::AutoDismiss(id.clone()));
            record.timer = Some(timer);
        }

        debug!(popup = %id, "popup shown");
        true
    }

    /// Starts closing a popup.
    ///
    /// Active popups lose their active class right away and are detached
    /// after the teardown delay. Queued popups are dropped immediately
    /// without callbacks. Returns `false` for unknown or already hiding
    /// popups.
    pub fn hide(&mut self, id: &PopupId) -> bool {
        if let Some(position) = self.queue.iter().position(|record| &record.id == id) {
            if let Some(record) = self.queue.remove(position) {
                self.discard(record);
            }
            return true;
        }

        let Some(record) = self.active.get_mut(id) else {
            return false;
        };
        if record.phase == Phase::Hiding {
            return false;
        }

        if let Some(timer) = record.timer.take() {
            self.timers.cancel(timer);
        }
        self.surface.remove_class(&record.node, element::ACTIVE_CLASS);
        record.phase = Phase::Hiding;
        self.timers
            .schedule(self.settings.teardown_delay, Deferred::Teardown(id.clone()));

        debug!(popup = %id, "popup hiding");
        true
    }

    /// Alias of [`Manager::hide`].
    pub fn close(&mut self, id: &PopupId) -> bool {
        self.hide(id)
    }

    /// Hides every active popup and drops the whole queue.
    pub fn close_all(&mut self) {
        let ids: Vec<PopupId> = self.active.keys().cloned().collect();
        for id in &ids {
            self.hide(id);
        }
        while let Some(record) = self.queue.pop_front() {
            self.discard(record);
        }
    }

    /// Creates a popup and shows it, or queues it when over capacity.
    ///
    /// # Errors
    ///
    /// Same as [`Manager::create`].
    pub fn msg(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        let id = self.create(request)?;

        // Admission counts the new record itself.
        if self.active.len() > self.settings.max_visible {
            if let Some(mut record) = self.active.remove(&id) {
                record.phase = Phase::Queued;
                self.queue.push_back(record);
                debug!(popup = %id, queued = self.queue.len(), "popup queued");
            }
        } else {
            self.show(&id);
        }
        Ok(id)
    }

    /// [`Manager::msg`] with the kind forced to [`Kind::Success`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::create`].
    pub fn success(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        self.msg(request.into().with_kind(Kind::Success))
    }

    /// [`Manager::msg`] with the kind forced to [`Kind::Error`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::create`].
    pub fn error(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        self.msg(request.into().with_kind(Kind::Error))
    }

    /// [`Manager::msg`] with the kind forced to [`Kind::Warning`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::create`].
    pub fn warning(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        self.msg(request.into().with_kind(Kind::Warning))
    }

    /// [`Manager::msg`] with the kind forced to [`Kind::Info`].
    ///
    /// # Errors
    ///
    /// Same as [`Manager::create`].
    pub fn info(&mut self, request: impl Into<Request>) -> Result<PopupId> {
        self.msg(request.into().with_kind(Kind::Info))
    }

    /// Runs every timer due within `elapsed` and returns the produced events.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Event> {
        let deadline = self.timers.now() + elapsed;
        while let Some(task) = self.timers.pop_due(deadline) {
            self.run(task);
        }
        self.timers.set_now(deadline);
        if self.is_idle() {
            // Ticks stop while idle; the next one starts a fresh reference.
            self.last_tick = None;
        }
        self.drain_events()
    }

    /// Advances the timers by the wall-clock time since the previous tick.
    ///
    /// The first tick, and the first one after the manager went idle, only
    /// records the reference instant.
    pub fn tick(&mut self, now: Instant) -> Vec<Event> {
        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_tick = Some(now);
        self.advance(elapsed)
    }

    /// Handles a popup message.
    pub fn handle_message(&mut self, message: &Message) -> Vec<Event> {
        match message {
            Message::Close(id) => {
                self.close(id);
                self.drain_events()
            }
            Message::Tick(now) => self.tick(*now),
        }
    }

    /// Takes the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn run(&mut self, task: Deferred) {
        match task {
            Deferred::NotifyShown { id, callback } => {
                if let Some(callback) = callback {
                    callback(&id);
                }
                self.events.push(Event::Shown(id));
            }
            Deferred::AutoDismiss(id) => {
                if let Some(record) = self.active.get_mut(&id) {
                    record.timer = None;
                }
                self.hide(&id);
            }
            Deferred::Teardown(id) => self.teardown(&id),
        }
    }

    fn teardown(&mut self, id: &PopupId) {
        let Some(record) = self.active.remove(id) else {
            return;
        };
        self.surface.detach(&record.node);
        if let Some(callback) = record.config.on_close() {
            callback(&record.id);
        }
        debug!(popup = %id, "popup removed");
        self.events.push(Event::Closed(record.id));
        self.show_next();
    }

    /// Admits at most one queued popup into a vacancy.
    fn show_next(&mut self) {
        if self.active.len() >= self.settings.max_visible {
            return;
        }
        let Some(record) = self.queue.pop_front() else {
            return;
        };
        let id = record.id.clone();
        self.active.insert(id.clone(), record);
        self.show(&id);
    }

    fn discard(&mut self, record: PopupRecord<S::Node>) {
        self.surface.detach(&record.node);
        debug!(popup = %record.id, "queued popup discarded");
        self.events.push(Event::Discarded(record.id));
    }

    /// Number of created, shown and hiding popups.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether any popup is active or queued.
    #[must_use]
    pub fn has_popups(&self) -> bool {
        !self.active.is_empty() || !self.queue.is_empty()
    }

    /// Returns whether there is neither a popup nor a pending timer, so
    /// nothing needs to be ticked.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.has_popups() && self.timers.is_empty()
    }

    /// Number of deferred tasks still waiting.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn phase(&self, id: &PopupId) -> Option<Phase> {
        self.active
            .get(id)
            .map(|record| record.phase)
            .or_else(|| self.queued(id).map(|record| record.phase))
    }

    #[must_use]
    pub fn config(&self, id: &PopupId) -> Option<&PopupConfig> {
        self.active
            .get(id)
            .or_else(|| self.queued(id))
            .map(|record| &record.config)
    }

    /// Node of a live popup on the surface.
    #[must_use]
    pub fn node(&self, id: &PopupId) -> Option<&S::Node> {
        self.active
            .get(id)
            .or_else(|| self.queued(id))
            .map(|record| &record.node)
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &PopupId> {
        self.active.keys()
    }

    /// Queued ids, next to be admitted first.
    pub fn queued_ids(&self) -> impl Iterator<Item = &PopupId> {
        self.queue.iter().map(|record| &record.id)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn queued(&self, id: &PopupId) -> Option<&PopupRecord<S::Node>> {
        self.queue.iter().find(|record| &record.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::popup::options::PopupOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const TEARDOWN: Duration = Duration::from_millis(TEARDOWN_DELAY_MS);

    fn sticky(content: &str) -> PopupOptions {
        PopupOptions::new(content).duration(Duration::ZERO)
    }

    #[test]
    fn new_manager_is_empty() {
        let manager = Manager::new();
        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.queued_count(), 0);
        assert!(!manager.has_popups());
    }

    #[test]
    fn create_stores_record_without_showing() {
        let mut manager = Manager::new();
        let id = manager.create("hello").expect("create should succeed");

        assert_eq!(manager.active_count(), 1);
        assert_eq!(manager.phase(&id), Some(Phase::Created));
        assert_eq!(manager.pending_timers(), 0);

        let node = *manager.node(&id).expect("node is mounted");
        assert!(!manager.surface().has_class(&node, element::ACTIVE_CLASS));
    }

    #[test]
    fn create_rejects_non_string_content() {
        let mut manager = Manager::new();
        let request: toml::Table = toml::from_str("content = 123").expect("valid toml");

        let result = manager.create(request);
        assert!(matches!(
            result,
            Err(crate::error::Error::InvalidArgument(_))
        ));
        assert_eq!(manager.active_count(), 0);
    }

    #[test]
    fn show_marks_node_active_and_schedules_timers() {
        let mut manager = Manager::new();
        let id = manager.create("hello").expect("create should succeed");

        assert!(manager.show(&id));
        assert_eq!(manager.phase(&id), Some(Phase::Shown));
        let node = *manager.node(&id).expect("node is mounted");
        assert!(manager.surface().has_class(&node, element::ACTIVE_CLASS));
        // Show notification and auto-dismiss.
        assert_eq!(manager.pending_timers(), 2);
    }

    #[test]
    fn show_twice_does_not_reschedule() {
        let mut manager = Manager::new();
        let id = manager.create("hello").expect("create should succeed");
        manager.show(&id);
        let pending = manager.pending_timers();

        assert!(manager.show(&id));
        assert_eq!(manager.pending_timers(), pending);
    }

    #[test]
    fn unknown_ids_are_soft_failures() {
        let mut manager = Manager::new();
        let unknown = PopupId::from_raw("popup_0_missing");

        assert!(!manager.show(&unknown));
        assert!(!manager.hide(&unknown));
        assert!(!manager.close(&unknown));
    }

    #[test]
    fn on_show_fires_after_delay() {
        let shown = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&shown);
        let mut manager = Manager::new();
        let id = manager
            .msg(PopupOptions::new("hi").on_show(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .expect("msg should succeed");

        assert_eq!(shown.load(Ordering::SeqCst), 0);
        assert!(manager.advance(Duration::from_millis(9)).is_empty());
        assert_eq!(shown.load(Ordering::SeqCst), 0);

        let events = manager.advance(Duration::from_millis(1));
        assert_eq!(events, vec![Event::Shown(id)]);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn auto_dismiss_tears_down_after_duration_and_delay() {
        let closed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&closed);
        let mut manager = Manager::new();
        let id = manager
            .msg(
                PopupOptions::new("bye")
                    .duration(Duration::from_millis(1000))
                    .on_close(move |id| sink.lock().unwrap().push(id.clone())),
            )
            .expect("msg should succeed");

        manager.advance(Duration::from_millis(1000));
        assert_eq!(manager.phase(&id), Some(Phase::Hiding));
        assert!(closed.lock().unwrap().is_empty());

        let events = manager.advance(TEARDOWN);
        assert_eq!(events, vec![Event::Closed(id.clone())]);
        assert_eq!(manager.active_count(), 0);
        assert_eq!(closed.lock().unwrap().as_slice(), &[id]);
        // Body plus the detached three-node template.
        assert_eq!(manager.surface().node_count(), 4);
    }

    #[test]
    fn single_advance_runs_follow_up_timers() {
        let mut manager = Manager::new();
        let id = manager
            .msg(PopupOptions::new("quick").duration(Duration::from_millis(100)))
            .expect("msg should succeed");

        let events = manager.advance(Duration::from_secs(10));
        assert_eq!(events, vec![Event::Shown(id.clone()), Event::Closed(id)]);
        assert!(!manager.has_popups());
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn zero_duration_never_auto_dismisses() {
        let mut manager = Manager::new();
        let id = manager.msg(sticky("stay")).expect("msg should succeed");

        manager.advance(Duration::from_secs(3600));
        assert_eq!(manager.phase(&id), Some(Phase::Shown));
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn hide_cancels_auto_dismiss_timer() {
        let mut manager = Manager::new();
        let id = manager
            .msg(PopupOptions::new("x").duration(Duration::from_millis(5000)))
            .expect("msg should succeed");
        manager.advance(Duration::from_millis(10));

        assert!(manager.hide(&id));
        // Only the teardown is left.
        assert_eq!(manager.pending_timers(), 1);
        let node = *manager.node(&id).expect("node stays during teardown");
        assert!(!manager.surface().has_class(&node, element::ACTIVE_CLASS));

        manager.advance(TEARDOWN);
        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.pending_timers(), 0);
    }

    #[test]
    fn hide_twice_returns_false_the_second_time() {
        let mut manager = Manager::new();
        let id = manager.msg(sticky("x")).expect("msg should succeed");

        assert!(manager.hide(&id));
        assert!(!manager.hide(&id));
        manager.advance(TEARDOWN);
        assert!(!manager.hide(&id));
    }

    #[test]
    fn show_refuses_hiding_popup() {
        let mut manager = Manager::new();
        let id = manager.msg(sticky("x")).expect("msg should succeed");
        manager.hide(&id);

        assert!(!manager.show(&id));
        assert_eq!(manager.phase(&id), Some(Phase::Hiding));
    }

    #[test]
    fn msg_queues_past_capacity_and_promotes_on_teardown() {
        let mut manager = Manager::new();
        let visible: Vec<_> = (0..DEFAULT_MAX_VISIBLE)
            .map(|i| manager.msg(sticky(&format!("visible-{i}"))).unwrap())
            .collect();
        assert_eq!(manager.active_count(), DEFAULT_MAX_VISIBLE);
        assert_eq!(manager.queued_count(), 0);

        let queued = manager.msg(sticky("queued")).expect("msg should succeed");
        assert_eq!(manager.queued_count(), 1);
        assert_eq!(manager.phase(&queued), Some(Phase::Queued));
        assert!(!manager.show(&queued));

        manager.hide(&visible[0]);
        manager.advance(TEARDOWN);

        assert_eq!(manager.queued_count(), 0);
        assert_eq!(manager.active_count(), DEFAULT_MAX_VISIBLE);
        assert_eq!(manager.phase(&queued), Some(Phase::Shown));
    }

    #[test]
    fn queue_is_fifo_one_admission_per_vacancy() {
        let mut manager = Manager::with_settings(Settings {
            max_visible: 1,
            ..Settings::default()
        });
        let first = manager.msg(sticky("first")).unwrap();
        let second = manager.msg(sticky("second")).unwrap();
        let third = manager.msg(sticky("third")).unwrap();
        assert_eq!(
            manager.queued_ids().cloned().collect::<Vec<_>>(),
            vec![second.clone(), third.clone()]
        );

        manager.hide(&first);
        manager.advance(TEARDOWN);
        assert_eq!(manager.phase(&second), Some(Phase::Shown));
        assert_eq!(manager.phase(&third), Some(Phase::Queued));
    }

    #[test]
    fn hide_on_queued_popup_discards_it() {
        let mut manager = Manager::with_settings(Settings {
            max_visible: 1,
            ..Settings::default()
        });
        manager.msg(sticky("visible")).unwrap();
        let queued = manager.msg(sticky("queued")).unwrap();
        let node = *manager.node(&queued).expect("queued popups are mounted");

        assert!(manager.hide(&queued));
        assert_eq!(manager.queued_count(), 0);
        assert!(!manager.surface().is_alive(node));
        assert_eq!(manager.drain_events(), vec![Event::Discarded(queued)]);
    }

    #[test]
    fn close_all_hides_active_and_drops_queue() {
        let shown_from_queue = Arc::new(AtomicUsize::new(0));
        let mut manager = Manager::with_settings(Settings {
            max_visible: 2,
            ..Settings::default()
        });
        manager.msg(sticky("a")).unwrap();
        manager.msg(sticky("b")).unwrap();
        for i in 0..3 {
            let counter = Arc::clone(&shown_from_queue);
            manager
                .msg(sticky(&format!("queued-{i}")).on_show(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }
        assert_eq!(manager.active_count(), 2);
        assert_eq!(manager.queued_count(), 3);

        manager.close_all();
        assert_eq!(manager.queued_count(), 0);

        let events = manager.advance(TEARDOWN);
        assert_eq!(manager.active_count(), 0);
        assert!(!manager.has_popups());
        assert_eq!(shown_from_queue.load(Ordering::SeqCst), 0);

        let discarded = events
            .iter()
            .filter(|event| matches!(event, Event::Discarded(_)))
            .count();
        let closed = events
            .iter()
            .filter(|event| matches!(event, Event::Closed(_)))
            .count();
        assert_eq!(discarded, 3);
        assert_eq!(closed, 2);
        assert_eq!(manager.surface().children(manager.surface().body()).len(), 0);
    }

    #[test]
    fn kind_helpers_force_kind() {
        let mut manager = Manager::new();
        let success = manager.success("ok").unwrap();
        let error = manager.error(PopupOptions::new("bad").kind(Kind::Info)).unwrap();
        let warning = manager.warning("hmm").unwrap();
        let info = manager.info("fyi").unwrap();

        assert_eq!(manager.config(&success).unwrap().kind(), Kind::Success);
        assert_eq!(manager.config(&error).unwrap().kind(), Kind::Error);
        assert_eq!(manager.config(&warning).unwrap().kind(), Kind::Warning);
        assert_eq!(manager.config(&info).unwrap().kind(), Kind::Info);
    }

    #[test]
    fn close_message_routes_to_hide() {
        let mut manager = Manager::new();
        let id = manager.msg(sticky("x")).unwrap();

        manager.handle_message(&Message::Close(id.clone()));
        assert_eq!(manager.phase(&id), Some(Phase::Hiding));
    }

    #[test]
    fn tick_uses_elapsed_wall_clock() {
        let mut manager = Manager::new();
        let id = manager
            .msg(PopupOptions::new("x").duration(Duration::from_millis(50)))
            .unwrap();

        let start = Instant::now();
        assert!(manager.tick(start).is_empty());
        manager.handle_message(&Message::Tick(start + Duration::from_millis(60)));
        assert_eq!(manager.phase(&id), Some(Phase::Hiding));

        let events = manager.tick(start + Duration::from_millis(60) + TEARDOWN);
        assert_eq!(events, vec![Event::Closed(id)]);
    }

    #[test]
    fn tick_after_idle_period_starts_fresh() {
        let mut manager = Manager::new();
        let first = manager
            .msg(PopupOptions::new("first").duration(Duration::from_millis(100)))
            .unwrap();

        let start = Instant::now();
        manager.tick(start);
        manager.tick(start + Duration::from_millis(600));
        assert_eq!(manager.phase(&first), None);
        assert!(manager.is_idle());

        // No ticks arrive while idle.
        let second = manager
            .msg(PopupOptions::new("second").duration(Duration::from_millis(3000)))
            .unwrap();
        let resumed = start + Duration::from_secs(60);
        assert!(manager.tick(resumed).is_empty());
        assert_eq!(manager.phase(&second), Some(Phase::Shown));

        let events = manager.tick(resumed + Duration::from_millis(20));
        assert_eq!(events, vec![Event::Shown(second.clone())]);
        assert_eq!(manager.phase(&second), Some(Phase::Shown));
    }

    #[test]
    fn zero_visible_limit_is_raised_to_one() {
        let mut manager = Manager::with_settings(Settings {
            max_visible: 0,
            ..Settings::default()
        });
        assert_eq!(manager.settings().max_visible, 1);

        let shown = manager.msg(sticky("shown")).unwrap();
        let queued = manager.msg(sticky("queued")).unwrap();
        assert_eq!(manager.phase(&shown), Some(Phase::Shown));
        assert_eq!(manager.phase(&queued), Some(Phase::Queued));
    }

    #[test]
    fn defaults_apply_to_new_requests() {
        let mut manager = Manager::new();
        manager.set_defaults(PopupDefaults {
            kind: Kind::Warning,
            duration: Duration::ZERO,
            ..PopupDefaults::default()
        });

        let id = manager.msg("x").unwrap();
        let config = manager.config(&id).unwrap();
        assert_eq!(config.kind(), Kind::Warning);
        assert!(!config.auto_dismisses());
    }
}
