//! Typed DOM event routing.
//!
//! Elements are registered once, at setup, with an explicit role. An event
//! is then routed by looking up its target's role; nothing inspects class
//! names at event time.

use std::collections::HashMap;

use theme_commerce::ids::{ElementId, ItemKey, ModalId, ProductId};

/// What a registered element is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRole {
    /// A product's add-to-cart form.
    AddToCartForm { product: ProductId },
    /// A variant pill carrying one option value.
    OptionPill {
        product: ProductId,
        index: usize,
        value: String,
    },
    /// A `<select>` for one option position.
    OptionSelect { product: ProductId, index: usize },
    /// A product form's quantity +/- button.
    QuantityStep { product: ProductId, delta: i64 },
    /// A product form's quantity field.
    QuantityInput { product: ProductId },
    /// A product form field submitted as a line property.
    PropertyInput { product: ProductId, name: String },
    /// A cart line's +/- button.
    LineStep { key: ItemKey, delta: i64 },
    /// A cart line's quantity field.
    LineQuantityInput { key: ItemKey },
    /// A cart line's remove button.
    LineRemove { key: ItemKey },
    /// A gallery thumbnail.
    GalleryThumbnail { product: ProductId, index: usize },
    /// Opens a modal.
    ModalTrigger { modal: ModalId },
    /// Closes a modal.
    ModalClose { modal: ModalId },
}

/// The browser event, reduced to what routing needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
    /// A committed value change.
    Change(String),
    /// A value being typed.
    Input(String),
    KeyDown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    /// The element the listener matched, if any.
    pub target: Option<ElementId>,
    pub kind: EventKind,
}

impl DomEvent {
    pub fn new(target: impl Into<ElementId>, kind: EventKind) -> Self {
        Self {
            target: Some(target.into()),
            kind,
        }
    }

    pub fn click(target: impl Into<ElementId>) -> Self {
        Self::new(target, EventKind::Click)
    }

    pub fn submit(target: impl Into<ElementId>) -> Self {
        Self::new(target, EventKind::Submit)
    }

    pub fn change(target: impl Into<ElementId>, value: impl Into<String>) -> Self {
        Self::new(target, EventKind::Change(value.into()))
    }

    pub fn input(target: impl Into<ElementId>, value: impl Into<String>) -> Self {
        Self::new(target, EventKind::Input(value.into()))
    }

    /// A key press on the document.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            target: None,
            kind: EventKind::KeyDown(key.into()),
        }
    }
}

/// What the storefront should do about an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectOption {
        product: ProductId,
        index: usize,
        value: String,
    },
    StepQuantity { product: ProductId, delta: i64 },
    SetQuantity { product: ProductId, raw: String },
    SetProperty {
        product: ProductId,
        name: String,
        value: String,
    },
    SubmitProduct { product: ProductId },
    StepLine { key: ItemKey, delta: i64 },
    SetLineQuantity { key: ItemKey, raw: String },
    RemoveLine { key: ItemKey },
    SelectImage { product: ProductId, index: usize },
    OpenModal { modal: ModalId, trigger: ElementId },
    CloseModal { modal: ModalId },
    CloseTopModal,
}

/// Element id to role lookup.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    roles: HashMap<ElementId, ElementRole>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element. Returns the role it replaced, if any.
    pub fn register(&mut self, id: impl Into<ElementId>, role: ElementRole) -> Option<ElementRole> {
        self.roles.insert(id.into(), role)
    }

    pub fn unregister(&mut self, id: &ElementId) -> Option<ElementRole> {
        self.roles.remove(id)
    }

    pub fn role(&self, id: &ElementId) -> Option<&ElementRole> {
        self.roles.get(id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Route an event. `None` for unregistered targets and for event kinds
    /// the target's role does not react to.
    pub fn route(&self, event: &DomEvent) -> Option<Action> {
        if let EventKind::KeyDown(key) = &event.kind {
            if key == "Escape" {
                return Some(Action::CloseTopModal);
            }
        }

        let target = event.target.as_ref()?;
        let role = self.roles.get(target)?;

        match (role, &event.kind) {
            (ElementRole::AddToCartForm { product }, EventKind::Submit) => {
                Some(Action::SubmitProduct {
                    product: product.clone(),
                })
            }
            (
                ElementRole::OptionPill {
                    product,
                    index,
                    value,
                },
                EventKind::Click,
            ) => Some(Action::SelectOption {
                product: product.clone(),
                index: *index,
                value: value.clone(),
            }),
            (ElementRole::OptionSelect { product, index }, EventKind::Change(value)) => {
                Some(Action::SelectOption {
                    product: product.clone(),
                    index: *index,
                    value: value.clone(),
                })
            }
            (ElementRole::QuantityStep { product, delta }, EventKind::Click) => {
                Some(Action::StepQuantity {
                    product: product.clone(),
                    delta: *delta,
                })
            }
            (
                ElementRole::QuantityInput { product },
                EventKind::Change(raw) | EventKind::Input(raw),
            ) => Some(Action::SetQuantity {
                product: product.clone(),
                raw: raw.clone(),
            }),
            (
                ElementRole::PropertyInput { product, name },
                EventKind::Change(value) | EventKind::Input(value),
            ) => Some(Action::SetProperty {
                product: product.clone(),
                name: name.clone(),
                value: value.clone(),
            }),
            (ElementRole::LineStep { key, delta }, EventKind::Click) => Some(Action::StepLine {
                key: key.clone(),
                delta: *delta,
            }),
            (ElementRole::LineQuantityInput { key }, EventKind::Change(raw)) => {
                Some(Action::SetLineQuantity {
                    key: key.clone(),
                    raw: raw.clone(),
                })
            }
            (ElementRole::LineRemove { key }, EventKind::Click) => {
                Some(Action::RemoveLine { key: key.clone() })
            }
            (ElementRole::GalleryThumbnail { product, index }, EventKind::Click) => {
                Some(Action::SelectImage {
                    product: product.clone(),
                    index: *index,
                })
            }
            (ElementRole::ModalTrigger { modal }, EventKind::Click) => Some(Action::OpenModal {
                modal: modal.clone(),
                trigger: target.clone(),
            }),
            (ElementRole::ModalClose { modal }, EventKind::Click) => Some(Action::CloseModal {
                modal: modal.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> EventRouter {
        let mut router = EventRouter::new();
        let product = ProductId::new("1");
        router.register(
            "pill-large",
            ElementRole::OptionPill {
                product: product.clone(),
                index: 1,
                value: "Large".into(),
            },
        );
        router.register(
            "color-select",
            ElementRole::OptionSelect {
                product: product.clone(),
                index: 2,
            },
        );
        router.register(
            "engraving",
            ElementRole::PropertyInput {
                product: product.clone(),
                name: "Engraving".into(),
            },
        );
        router.register("form", ElementRole::AddToCartForm { product });
        router.register(
            "line-a-remove",
            ElementRole::LineRemove {
                key: ItemKey::new("a"),
            },
        );
        router.register(
            "size-guide",
            ElementRole::ModalTrigger {
                modal: ModalId::new("size-guide"),
            },
        );
        router
    }

    #[test]
    fn test_routes_by_role() {
        let router = router();
        assert_eq!(
            router.route(&DomEvent::click("pill-large")),
            Some(Action::SelectOption {
                product: ProductId::new("1"),
                index: 1,
                value: "Large".into()
            })
        );
        assert_eq!(
            router.route(&DomEvent::change("color-select", "Blue")),
            Some(Action::SelectOption {
                product: ProductId::new("1"),
                index: 2,
                value: "Blue".into()
            })
        );
        assert_eq!(
            router.route(&DomEvent::input("engraving", "JS")),
            Some(Action::SetProperty {
                product: ProductId::new("1"),
                name: "Engraving".into(),
                value: "JS".into()
            })
        );
        assert_eq!(
            router.route(&DomEvent::click("line-a-remove")),
            Some(Action::RemoveLine {
                key: ItemKey::new("a")
            })
        );
    }

    #[test]
    fn test_trigger_is_remembered() {
        let router = router();
        assert_eq!(
            router.route(&DomEvent::click("size-guide")),
            Some(Action::OpenModal {
                modal: ModalId::new("size-guide"),
                trigger: ElementId::new("size-guide")
            })
        );
    }

    #[test]
    fn test_escape_ignores_target() {
        let router = router();
        assert_eq!(router.route(&DomEvent::key("Escape")), Some(Action::CloseTopModal));
        assert_eq!(router.route(&DomEvent::key("Enter")), None);
    }

    #[test]
    fn test_unregistered_and_mismatched_events_are_ignored() {
        let router = router();
        assert_eq!(router.route(&DomEvent::click("nope")), None);
        assert_eq!(router.route(&DomEvent::click("form")), None);
        assert_eq!(router.route(&DomEvent::change("pill-large", "x")), None);
    }

    #[test]
    fn test_reregister_replaces_role() {
        let mut router = router();
        let previous = router.register(
            "form",
            ElementRole::ModalClose {
                modal: ModalId::new("m"),
            },
        );
        assert!(matches!(previous, Some(ElementRole::AddToCartForm { .. })));
        assert!(router.unregister(&ElementId::new("form")).is_some());
        assert_eq!(router.route(&DomEvent::submit("form")), None);
    }
}
