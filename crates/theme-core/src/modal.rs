//! Modal dialogs.

use std::collections::HashSet;

use theme_commerce::error::ModalError;
use theme_commerce::ids::{ElementId, ModalId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenModal {
    id: ModalId,
    trigger: Option<ElementId>,
}

/// Registered modals and the stack of open ones.
///
/// The last opened modal is on top. Closing returns the element that
/// opened it so focus can go back there.
#[derive(Debug, Clone, Default)]
pub struct ModalStack {
    registered: HashSet<ModalId>,
    open: Vec<OpenModal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<ModalId>) {
        self.registered.insert(id.into());
    }

    /// Open `id` on top of the stack. Opening a modal that is already open
    /// moves it to the top and keeps its original trigger.
    pub fn open(&mut self, id: &ModalId, trigger: Option<ElementId>) -> Result<(), ModalError> {
        if !self.registered.contains(id) {
            return Err(ModalError::NotFound(id.clone()));
        }
        let entry = match self.open.iter().position(|m| &m.id == id) {
            Some(index) => self.open.remove(index),
            None => OpenModal {
                id: id.clone(),
                trigger,
            },
        };
        self.open.push(entry);
        Ok(())
    }

    /// Close `id`. Returns the element to return focus to.
    pub fn close(&mut self, id: &ModalId) -> Result<Option<ElementId>, ModalError> {
        if !self.registered.contains(id) {
            return Err(ModalError::NotFound(id.clone()));
        }
        let index = self
            .open
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| ModalError::NotOpen(id.clone()))?;
        Ok(self.open.remove(index).trigger)
    }

    /// Close the top-most modal, if any. Returns it and its focus target.
    pub fn close_top(&mut self) -> Option<(ModalId, Option<ElementId>)> {
        self.open.pop().map(|m| (m.id, m.trigger))
    }

    pub fn top(&self) -> Option<&ModalId> {
        self.open.last().map(|m| &m.id)
    }

    pub fn is_open(&self, id: &ModalId) -> bool {
        self.open.iter().any(|m| &m.id == id)
    }

    /// Whether page scrolling should be locked.
    pub fn any_open(&self) -> bool {
        !self.open.is_empty()
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }
}
