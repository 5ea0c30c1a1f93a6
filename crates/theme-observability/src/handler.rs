//! Last-resort handling for errors that escaped the typed paths.

use std::cell::Cell;

use theme_commerce::error::ThemeError;

use crate::logging::StructuredLogger;
use crate::notify::{Notification, NotificationKind, Notifier};

/// Message shown for anything unexpected. Details go to the log only.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please refresh the page and try again.";

/// Catches stray errors, logs them and tells the shopper something generic.
/// The page keeps running.
#[derive(Debug)]
pub struct GlobalErrorHandler {
    logger: StructuredLogger,
    notifier: Notifier,
    captured: Cell<usize>,
}

impl GlobalErrorHandler {
    pub fn new(logger: StructuredLogger, notifier: Notifier) -> Self {
        Self {
            logger: logger.for_component("global"),
            notifier,
            captured: Cell::new(0),
        }
    }

    /// Classify an error. Typed storefront errors pass through; anything else
    /// becomes `ThemeError::Unexpected`.
    pub fn classify(error: &anyhow::Error) -> ThemeError {
        match error.downcast_ref::<ThemeError>() {
            Some(theme) => theme.clone(),
            None => ThemeError::Unexpected(format!("{:#}", error)),
        }
    }

    /// Capture an error, returning its classification.
    pub fn capture(&self, error: anyhow::Error) -> ThemeError {
        let classified = Self::classify(&error);
        self.captured.set(self.captured.get() + 1);

        self.logger
            .error_builder(format!("{:#}", error))
            .field("code", classified.code())
            .emit();
        tracing::error!(code = classified.code(), error = %error, "uncaught storefront error");

        match &classified {
            ThemeError::Unexpected(_) => self.notifier.notify(Notification::new(
                NotificationKind::Error,
                GENERIC_ERROR_MESSAGE,
            )),
            typed => self.notifier.error(typed),
        }
        classified
    }

    /// Run a fallible step; a failure is captured instead of propagated.
    pub fn guard<T>(&self, step: impl FnOnce() -> anyhow::Result<T>) -> Option<T> {
        match step() {
            Ok(value) => Some(value),
            Err(error) => {
                self.capture(error);
                None
            }
        }
    }

    /// How many errors were captured.
    pub fn captured(&self) -> usize {
        self.captured.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use anyhow::anyhow;
    use theme_commerce::error::CartError;

    use crate::logging::{LogLevel, LogSink, PageViewId};
    use crate::notify::MemoryNotificationSink;

    fn handler() -> (GlobalErrorHandler, Rc<MemoryNotificationSink>, LogSink) {
        let sink = Rc::new(MemoryNotificationSink::new());
        let logs = LogSink::memory();
        let logger = StructuredLogger::new(PageViewId::from_string("pv")).with_sink(logs.clone());
        let notifier = Notifier::new(sink.clone(), logger.clone());
        (GlobalErrorHandler::new(logger, notifier), sink, logs)
    }

    #[test]
    fn test_unexpected_errors_are_wrapped() {
        let (handler, sink, logs) = handler();
        let classified = handler.capture(anyhow!("undefined is not a function"));
        assert_eq!(classified.code(), "UNEXPECTED");

        let shown = sink.last().unwrap();
        assert_eq!(shown.message, GENERIC_ERROR_MESSAGE);
        assert!(!shown.offer_retry);

        let logged = logs.entries();
        assert!(logged
            .iter()
            .any(|e| e.level == LogLevel::Error && e.message.contains("undefined")));
    }

    #[test]
    fn test_typed_errors_pass_through() {
        let (handler, sink, _) = handler();
        let err = anyhow::Error::new(ThemeError::from(CartError::Network("reset".into())));
        let classified = handler.capture(err);
        assert_eq!(classified.code(), "NETWORK_ERROR");
        assert!(sink.last().unwrap().offer_retry);
    }

    #[test]
    fn test_guard_keeps_running() {
        let (handler, _, _) = handler();
        let failed: Option<()> = handler.guard(|| Err(anyhow!("boom")));
        let ok = handler.guard(|| Ok(7));
        assert_eq!(failed, None);
        assert_eq!(ok, Some(7));
        assert_eq!(handler.captured(), 1);
    }
}
