//! Explicit readiness of the cart service.
//!
//! The host signals once its cart library has loaded; the composition root
//! awaits the paired future before wiring anything that needs the cart.

use std::fmt;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};

use crate::client::ClientError;

/// Held by whoever knows when the service is up.
pub struct ReadyNotifier {
    tx: oneshot::Sender<()>,
}

impl ReadyNotifier {
    pub fn notify(self) {
        let _ = self.tx.send(());
    }
}

/// Resolves once notified. Cloneable; every clone sees the same outcome.
#[derive(Clone)]
pub struct Ready {
    rx: Shared<oneshot::Receiver<()>>,
}

impl fmt::Debug for ReadyNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyNotifier").finish_non_exhaustive()
    }
}

impl fmt::Debug for Ready {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ready")
            .field("resolved", &self.rx.peek().is_some())
            .finish()
    }
}

impl Ready {
    /// A signal that is already satisfied.
    pub fn now() -> Self {
        let (notifier, ready) = ready_signal();
        notifier.notify();
        ready
    }

    /// Wait for readiness. Fails if the notifier was dropped unused.
    pub async fn wait(self) -> Result<(), ClientError> {
        self.rx.await.map_err(|_| ClientError::NotReady)
    }
}

/// Create a notifier / future pair.
pub fn ready_signal() -> (ReadyNotifier, Ready) {
    let (tx, rx) = oneshot::channel();
    (ReadyNotifier { tx }, Ready { rx: rx.shared() })
}
