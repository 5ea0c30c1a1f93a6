//! Cart events published by clients.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use theme_commerce::cart::CartSnapshot;

/// Something the cart service reported.
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// The service finished initializing.
    Ready(CartSnapshot),
    /// A request finished; carries the resulting cart.
    RequestComplete(CartSnapshot),
}

impl CartEvent {
    pub fn snapshot(&self) -> &CartSnapshot {
        match self {
            Self::Ready(snapshot) | Self::RequestComplete(snapshot) => snapshot,
        }
    }

    pub fn into_snapshot(self) -> CartSnapshot {
        match self {
            Self::Ready(snapshot) | Self::RequestComplete(snapshot) => snapshot,
        }
    }
}

/// Fan-out of cart events to any number of subscribers.
#[derive(Debug, Clone, Default)]
pub struct CartEventBus {
    subscribers: Rc<RefCell<Vec<UnboundedSender<CartEvent>>>>,
}

impl CartEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> CartEvents {
        let (tx, rx) = unbounded();
        self.subscribers.borrow_mut().push(tx);
        CartEvents { rx }
    }

    /// Deliver to every live subscriber; dropped subscribers are pruned.
    pub fn publish(&self, event: CartEvent) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// One subscriber's queue of cart events.
#[derive(Debug)]
pub struct CartEvents {
    rx: UnboundedReceiver<CartEvent>,
}

impl CartEvents {
    /// Wait for the next event. `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<CartEvent> {
        self.rx.next().await
    }

    /// Take every queued event without waiting and keep only the newest.
    ///
    /// Older snapshots are stale by definition; nothing merges them.
    pub fn drain_latest(&mut self) -> Option<CartEvent> {
        let mut latest = None;
        while let Ok(Some(event)) = self.rx.try_next() {
            latest = Some(event);
        }
        latest
    }
}
