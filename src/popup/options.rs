// SPDX-License-Identifier: MPL-2.0
//! Popup identifiers and configuration.
//!
//! A popup request comes in one of three shapes (plain text, typed
//! [`PopupOptions`], or a loose `toml::Table`) and is resolved against the
//! manager's [`PopupDefaults`] into an immutable [`PopupConfig`].

use crate::config::defaults::{DEFAULT_CONTENT, DEFAULT_DURATION_MS, MAX_DURATION_MS};
use crate::error::{Error, Result};
use crate::util;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use toml::{Table, Value};

/// Opaque, process-unique popup identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(String);

impl PopupId {
    /// Generates a fresh id of the form `popup_<unix-millis>_<seq>`.
    pub(crate) fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = chrono::Utc::now().timestamp_millis();
        Self(format!("popup_{millis}_{seq}"))
    }

    /// Wraps an id string received from elsewhere (UI events, logs).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PopupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Popup kind, drives the styling class and the accent colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::Success, Kind::Error, Kind::Warning, Kind::Info];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Success => "success",
            Kind::Error => "error",
            Kind::Warning => "warning",
            Kind::Info => "info",
        }
    }

    /// Parses a kind name, falling back to [`Kind::Info`] for anything unknown.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Kind::Success,
            "error" => Kind::Error,
            "warning" => Kind::Warning,
            _ => Kind::Info,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical anchor of a popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

impl Position {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Bottom => "bottom",
        }
    }

    /// Parses a position name, falling back to [`Position::Top`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("bottom") {
            Position::Bottom
        } else {
            Position::Top
        }
    }
}

/// Popup width: either sized by content or an explicit CSS length.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Width {
    #[default]
    Auto,
    Length(String),
}

impl From<String> for Width {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Width::Auto
        } else {
            Width::Length(trimmed.to_string())
        }
    }
}

impl From<&str> for Width {
    fn from(raw: &str) -> Self {
        Width::from(raw.to_string())
    }
}

impl From<Width> for String {
    fn from(width: Width) -> Self {
        match width {
            Width::Auto => "auto".to_string(),
            Width::Length(length) => length,
        }
    }
}

/// Callback invoked with the id of the popup it belongs to.
pub type Callback = Arc<dyn Fn(&PopupId) + Send + Sync>;

/// Values a request falls back to for every field it leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupDefaults {
    pub content: String,
    pub kind: Kind,
    pub duration: Duration,
    pub show_close: bool,
    pub width: Width,
    pub position: Position,
}

impl Default for PopupDefaults {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.to_string(),
            kind: Kind::Info,
            duration: Duration::from_millis(DEFAULT_DURATION_MS),
            show_close: false,
            width: Width::Auto,
            position: Position::Top,
        }
    }
}

impl PopupDefaults {
    /// Loose representation used as the merge base for table requests.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.insert("content".into(), Value::String(self.content.clone()));
        table.insert("kind".into(), Value::String(self.kind.as_str().into()));
        table.insert(
            "duration_ms".into(),
            Value::Integer(i64::try_from(self.duration.as_millis()).unwrap_or(i64::MAX)),
        );
        table.insert("show_close".into(), Value::Boolean(self.show_close));
        table.insert("width".into(), Value::String(self.width.clone().into()));
        table.insert(
            "position".into(),
            Value::String(self.position.as_str().into()),
        );
        table
    }
}

/// Typed, partial popup request. Unset fields come from [`PopupDefaults`].
#[derive(Clone, Default)]
pub struct PopupOptions {
    pub content: Option<String>,
    pub kind: Option<Kind>,
    pub duration: Option<Duration>,
    pub show_close: Option<bool>,
    pub width: Option<Width>,
    pub position: Option<Position>,
    pub on_show: Option<Callback>,
    pub on_close: Option<Callback>,
}

impl fmt::Debug for PopupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupOptions")
            .field("content", &self.content)
            .field("kind", &self.kind)
            .field("duration", &self.duration)
            .field("show_close", &self.show_close)
            .field("width", &self.width)
            .field("position", &self.position)
            .field("on_show", &self.on_show.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl PopupOptions {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Auto-dismiss delay. `Duration::ZERO` keeps the popup until closed.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn show_close(mut self, show_close: bool) -> Self {
        self.show_close = Some(show_close);
        self
    }

    #[must_use]
    pub fn width(mut self, width: impl Into<Width>) -> Self {
        self.width = Some(width.into());
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn on_show(mut self, callback: impl Fn(&PopupId) + Send + Sync + 'static) -> Self {
        self.on_show = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn on_close(mut self, callback: impl Fn(&PopupId) + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(callback));
        self
    }
}

/// Anything the manager accepts as a popup request.
#[derive(Debug, Clone)]
pub enum Request {
    /// Shorthand for a request that only sets the content.
    Text(String),
    Options(PopupOptions),
    /// Loosely typed request, validated field by field.
    Table(Table),
}

impl Request {
    /// Returns the same request with its kind forced to `kind`.
    #[must_use]
    pub fn with_kind(self, kind: Kind) -> Self {
        match self {
            Request::Text(content) => Request::Options(PopupOptions::new(content).kind(kind)),
            Request::Options(options) => Request::Options(options.kind(kind)),
            Request::Table(mut table) => {
                table.insert("kind".into(), Value::String(kind.as_str().into()));
                Request::Table(table)
            }
        }
    }
}

impl From<&str> for Request {
    fn from(content: &str) -> Self {
        Request::Text(content.to_string())
    }
}

impl From<String> for Request {
    fn from(content: String) -> Self {
        Request::Text(content)
    }
}

impl From<PopupOptions> for Request {
    fn from(options: PopupOptions) -> Self {
        Request::Options(options)
    }
}

impl From<Table> for Request {
    fn from(table: Table) -> Self {
        Request::Table(table)
    }
}

/// Fully resolved, immutable popup configuration.
#[derive(Clone)]
pub struct PopupConfig {
    content: String,
    kind: Kind,
    duration: Duration,
    show_close: bool,
    width: Width,
    position: Position,
    on_show: Option<Callback>,
    on_close: Option<Callback>,
}

impl fmt::Debug for PopupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopupConfig")
            .field("content", &self.content)
            .field("kind", &self.kind)
            .field("duration", &self.duration)
            .field("show_close", &self.show_close)
            .field("width", &self.width)
            .field("position", &self.position)
            .field("on_show", &self.on_show.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl PopupConfig {
    /// Resolves `request` over `defaults`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the content is not a non-empty
    /// string, or when a table request carries a field of the wrong type.
    pub fn resolve(defaults: &PopupDefaults, request: Request) -> Result<Self> {
        match request {
            Request::Text(content) => Self::from_options(defaults, PopupOptions::new(content)),
            Request::Options(options) => Self::from_options(defaults, options),
            Request::Table(table) => {
                let settings = util::merged(&defaults.to_table(), &[&table]);
                Self::from_table(defaults, &settings)
            }
        }
    }

    fn from_options(defaults: &PopupDefaults, options: PopupOptions) -> Result<Self> {
        let content = options
            .content
            .unwrap_or_else(|| defaults.content.clone());
        Ok(Self {
            content: validate_content(content)?,
            kind: options.kind.unwrap_or(defaults.kind),
            duration: options
                .duration
                .unwrap_or(defaults.duration)
                .min(max_duration()),
            show_close: options.show_close.unwrap_or(defaults.show_close),
            width: options.width.unwrap_or_else(|| defaults.width.clone()),
            position: options.position.unwrap_or(defaults.position),
            on_show: options.on_show,
            on_close: options.on_close,
        })
    }

    fn from_table(defaults: &PopupDefaults, table: &Table) -> Result<Self> {
        let content = match table.get("content") {
            Some(Value::String(content)) => content.clone(),
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "popup content must be a string, got {}",
                    other.type_str()
                )));
            }
            None => defaults.content.clone(),
        };

        let kind = match table.get("kind") {
            Some(Value::String(raw)) => Kind::parse(raw),
            Some(_) => Kind::Info,
            None => defaults.kind,
        };

        let duration = match table.get("duration_ms") {
            Some(Value::Integer(ms)) => {
                Duration::from_millis(u64::try_from(*ms).unwrap_or(0).min(MAX_DURATION_MS))
            }
            Some(Value::Float(ms)) if ms.is_finite() && *ms > 0.0 => {
                Duration::try_from_secs_f64(ms / 1000.0).map_or(max_duration(), |duration| {
                    duration.min(max_duration())
                })
            }
            Some(Value::Float(_)) => Duration::ZERO,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "popup duration_ms must be a number, got {}",
                    other.type_str()
                )));
            }
            None => defaults.duration,
        };

        let show_close = match table.get("show_close") {
            Some(Value::Boolean(flag)) => *flag,
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "popup show_close must be a boolean, got {}",
                    other.type_str()
                )));
            }
            None => defaults.show_close,
        };

        let width = match table.get("width") {
            Some(Value::String(raw)) => Width::from(raw.as_str()),
            Some(other) => {
                return Err(Error::invalid_argument(format!(
                    "popup width must be a string, got {}",
                    other.type_str()
                )));
            }
            None => defaults.width.clone(),
        };

        let position = match table.get("position") {
            Some(Value::String(raw)) => Position::parse(raw),
            Some(_) => Position::Top,
            None => defaults.position,
        };

        Ok(Self {
            content: validate_content(content)?,
            kind,
            duration,
            show_close,
            width,
            position,
            on_show: None,
            on_close: None,
        })
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Auto-dismiss delay; zero means the popup stays until closed.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn auto_dismisses(&self) -> bool {
        !self.duration.is_zero()
    }

    #[must_use]
    pub fn show_close(&self) -> bool {
        self.show_close
    }

    #[must_use]
    pub fn width(&self) -> &Width {
        &self.width
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn on_show(&self) -> Option<&Callback> {
        self.on_show.as_ref()
    }

    #[must_use]
    pub fn on_close(&self) -> Option<&Callback> {
        self.on_close.as_ref()
    }
}

/// Longest auto-dismiss delay a popup can ask for.
fn max_duration() -> Duration {
    Duration::from_millis(MAX_DURATION_MS)
}

fn validate_content(content: String) -> Result<String> {
    if content.is_empty() {
        return Err(Error::invalid_argument("popup content must not be empty"));
    }
    Ok(content)
}
