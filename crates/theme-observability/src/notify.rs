//! Shopper-facing notifications and live-region announcements.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use theme_commerce::error::{Severity, ThemeError};

use crate::logging::StructuredLogger;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl From<Severity> for NotificationKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => Self::Warning,
            Severity::Error => Self::Error,
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// How urgently assistive technology should read an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    /// Read when the user is idle.
    Polite,
    /// Interrupts whatever is being read.
    Assertive,
}

impl NotificationKind {
    pub fn politeness(&self) -> Politeness {
        match self {
            Self::Error => Politeness::Assertive,
            _ => Politeness::Polite,
        }
    }
}

/// A transient on-screen message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Machine code of the error behind it, if any.
    pub code: Option<&'static str>,
    /// Whether a "try again" action is offered.
    pub offer_retry: bool,
    /// How long the message stays up.
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            offer_retry: false,
            duration: Duration::from_millis(5000),
        }
    }

    /// Notification for a classified error. Only recoverable errors offer a
    /// retry.
    pub fn from_error(error: &ThemeError) -> Self {
        Self {
            kind: error.severity().into(),
            message: error.to_string(),
            code: Some(error.code()),
            offer_retry: error.is_recoverable(),
            duration: Duration::from_millis(5000),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Where notifications end up: a toast container and a live region.
pub trait NotificationSink {
    fn show(&self, notification: &Notification);

    fn announce(&self, message: &str, politeness: Politeness);
}

/// Records everything shown and announced.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    shown: RefCell<Vec<Notification>>,
    announced: RefCell<Vec<(String, Politeness)>>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Notification> {
        self.shown.borrow().clone()
    }

    pub fn announced(&self) -> Vec<(String, Politeness)> {
        self.announced.borrow().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.shown.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.shown.borrow_mut().clear();
        self.announced.borrow_mut().clear();
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn show(&self, notification: &Notification) {
        self.shown.borrow_mut().push(notification.clone());
    }

    fn announce(&self, message: &str, politeness: Politeness) {
        self.announced
            .borrow_mut()
            .push((message.to_string(), politeness));
    }
}

/// Settings the notifier honors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifierOptions {
    /// Show on-screen notifications. Announcements are unaffected.
    pub enabled: bool,
    /// Mirror notifications to the live region.
    pub announce: bool,
    pub duration: Duration,
}

impl Default for NotifierOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            announce: true,
            duration: Duration::from_millis(5000),
        }
    }
}

/// Front door for surfacing outcomes to the shopper.
///
/// Clones share the sink and the options.
#[derive(Clone)]
pub struct Notifier {
    sink: Rc<dyn NotificationSink>,
    options: Rc<Cell<NotifierOptions>>,
    logger: StructuredLogger,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("options", &self.options.get())
            .finish_non_exhaustive()
    }
}

impl Notifier {
    pub fn new(sink: Rc<dyn NotificationSink>, logger: StructuredLogger) -> Self {
        Self {
            sink,
            options: Rc::new(Cell::new(NotifierOptions::default())),
            logger: logger.for_component("notify"),
        }
    }

    pub fn with_options(self, options: NotifierOptions) -> Self {
        self.options.set(options);
        self
    }

    pub fn options(&self) -> NotifierOptions {
        self.options.get()
    }

    /// Turn on-screen notifications on or off.
    pub fn set_enabled(&self, enabled: bool) {
        let mut options = self.options.get();
        options.enabled = enabled;
        self.options.set(options);
    }

    /// Surface a classified error: log it, show it, announce it.
    pub fn error(&self, error: &ThemeError) {
        self.logger
            .warn_builder(error.to_string())
            .field("code", error.code())
            .field_bool("recoverable", error.is_recoverable())
            .emit();
        self.deliver(Notification::from_error(error));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.deliver(Notification::new(NotificationKind::Success, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.deliver(Notification::new(NotificationKind::Info, message));
    }

    /// Deliver a prepared notification.
    pub fn notify(&self, notification: Notification) {
        self.deliver(notification);
    }

    /// Announce without an on-screen notification.
    pub fn announce(&self, message: &str, politeness: Politeness) {
        self.sink.announce(message, politeness);
    }

    fn deliver(&self, notification: Notification) {
        let options = self.options.get();
        let notification = notification.with_duration(options.duration);
        if options.enabled {
            self.sink.show(&notification);
        }
        if options.announce {
            self.sink
                .announce(&notification.message, notification.kind.politeness());
        }
    }
}
