//! Ledger of optimistic quantity edits awaiting confirmation.
//!
//! Each item key holds at most one live edit. Starting a new edit on a key
//! supersedes the old one: the old edit's token stops matching, so when its
//! network call finally resolves the outcome is ignored.

use std::collections::HashMap;
use std::fmt;

use crate::ids::ItemKey;

/// Identity of one edit. Monotonic per ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditToken(u64);

impl EditToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EditToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edit-{}", self.0)
    }
}

/// A local quantity change not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub token: EditToken,
    pub key: ItemKey,
    /// Last confirmed quantity when the edit began.
    pub previous_quantity: i64,
    /// Quantity the edit asked for; 0 means removal.
    pub target_quantity: i64,
    /// Whether the network request has been sent.
    pub dispatched: bool,
}

/// Where an item key stands in the edit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    /// Applied to the display, request not yet sent.
    PendingEdit { previous_quantity: i64 },
    /// Request in flight.
    AwaitingNetwork {
        previous_quantity: i64,
        target_quantity: i64,
    },
}

#[derive(Debug, Default)]
pub struct PendingEdits {
    edits: HashMap<ItemKey, PendingEdit>,
    next_token: u64,
}

impl PendingEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new edit for `key`, superseding any live one.
    ///
    /// Returns the new token and the superseded edit, if there was one.
    pub fn begin(
        &mut self,
        key: ItemKey,
        previous_quantity: i64,
        target_quantity: i64,
    ) -> (EditToken, Option<PendingEdit>) {
        self.next_token += 1;
        let token = EditToken(self.next_token);
        let superseded = self.edits.insert(
            key.clone(),
            PendingEdit {
                token,
                key,
                previous_quantity,
                target_quantity,
                dispatched: false,
            },
        );
        (token, superseded)
    }

    /// Mark the edit as sent. False if the token is stale.
    pub fn mark_dispatched(&mut self, key: &ItemKey, token: EditToken) -> bool {
        match self.edits.get_mut(key) {
            Some(edit) if edit.token == token => {
                edit.dispatched = true;
                true
            }
            _ => false,
        }
    }

    /// Whether `token` is still the live edit for `key`.
    pub fn is_current(&self, key: &ItemKey, token: EditToken) -> bool {
        self.edits
            .get(key)
            .map(|edit| edit.token == token)
            .unwrap_or(false)
    }

    /// Remove and return the edit if `token` is still live. Stale tokens
    /// leave the ledger untouched and return `None`.
    pub fn settle(&mut self, key: &ItemKey, token: EditToken) -> Option<PendingEdit> {
        if self.is_current(key, token) {
            self.edits.remove(key)
        } else {
            None
        }
    }

    pub fn get(&self, key: &ItemKey) -> Option<&PendingEdit> {
        self.edits.get(key)
    }

    pub fn state(&self, key: &ItemKey) -> EditState {
        match self.edits.get(key) {
            None => EditState::Idle,
            Some(edit) if !edit.dispatched => EditState::PendingEdit {
                previous_quantity: edit.previous_quantity,
            },
            Some(edit) => EditState::AwaitingNetwork {
                previous_quantity: edit.previous_quantity,
                target_quantity: edit.target_quantity,
            },
        }
    }

    /// Drop edits whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemKey) -> bool) {
        self.edits.retain(|key, _| keep(key));
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingEdit> {
        self.edits.values()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut ledger = PendingEdits::new();
        let key = ItemKey::new("a");

        let (token, superseded) = ledger.begin(key.clone(), 1, 2);
        assert!(superseded.is_none());
        assert_eq!(
            ledger.state(&key),
            EditState::PendingEdit {
                previous_quantity: 1
            }
        );

        assert!(ledger.mark_dispatched(&key, token));
        assert_eq!(
            ledger.state(&key),
            EditState::AwaitingNetwork {
                previous_quantity: 1,
                target_quantity: 2
            }
        );

        let settled = ledger.settle(&key, token).unwrap();
        assert_eq!(settled.target_quantity, 2);
        assert_eq!(ledger.state(&key), EditState::Idle);
    }

    #[test]
    fn test_superseded_token_is_ignored() {
        let mut ledger = PendingEdits::new();
        let key = ItemKey::new("a");

        let (first, _) = ledger.begin(key.clone(), 1, 2);
        let (second, superseded) = ledger.begin(key.clone(), 2, 3);
        assert_eq!(superseded.unwrap().token, first);

        assert!(!ledger.is_current(&key, first));
        assert!(ledger.settle(&key, first).is_none());
        assert!(!ledger.mark_dispatched(&key, first));

        assert_eq!(ledger.settle(&key, second).unwrap().previous_quantity, 2);
    }

    #[test]
    fn test_tokens_are_monotonic() {
        let mut ledger = PendingEdits::new();
        let (a, _) = ledger.begin(ItemKey::new("a"), 1, 2);
        let (b, _) = ledger.begin(ItemKey::new("b"), 1, 2);
        assert!(b > a);
    }

    #[test]
    fn test_retain() {
        let mut ledger = PendingEdits::new();
        ledger.begin(ItemKey::new("a"), 1, 2);
        ledger.begin(ItemKey::new("b"), 1, 2);
        ledger.retain(|key| key.as_str() == "a");
        assert_eq!(ledger.len(), 1);
        assert!(ledger.get(&ItemKey::new("a")).is_some());
    }
}
