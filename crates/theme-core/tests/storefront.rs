//! End-to-end behavior of the storefront over the in-memory cart service,
//! cart surface and notification sink.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::FutureExt;

use theme_client::{
    ready_signal, AddItemRequest, CartClient, CartEvents, CatalogEntry, ClientCall, ClientError,
    LineProperties, MemoryCartClient, UpdateItemRequest,
};
use theme_commerce::cart::{CartSnapshot, LineItem};
use theme_commerce::catalog::EmbeddedVariants;
use theme_commerce::error::{ApiError, CartError, ModalError, ThemeError};
use theme_commerce::ids::{ElementId, ItemKey, ModalId, ProductId, VariantId};
use theme_core::cart::EditOutcome;
use theme_core::{DomEvent, ElementRole, Outcome, Storefront, ThemeConfig};
use theme_observability::{MemoryNotificationSink, NotificationKind};
use theme_prefs::{PreferenceStore, ThemePreferences};
use theme_view::MemoryCartSurface;

const PRODUCT: &str = r#"{
    "id": 1, "title": "Tee", "options": ["Size"],
    "images": ["small.jpg", "large.jpg"],
    "variants": [
        {"id": 11, "options": ["Small"], "price": 2000, "available": true,
         "featured_image": "small.jpg"},
        {"id": 12, "options": ["Large"], "price": 3000, "available": true,
         "featured_image": {"src": "large.jpg"}}
    ]
}"#;

const LARGE_KEY: &str = "12:default";

fn client() -> MemoryCartClient {
    MemoryCartClient::new()
        .with_variant(CatalogEntry::new("11", "Tee - Small", 2000))
        .with_variant(CatalogEntry::new("12", "Tee - Large", 3000).with_image("large.jpg"))
}

struct Page<C: CartClient> {
    storefront: Storefront<C, MemoryCartSurface>,
    sink: Rc<MemoryNotificationSink>,
}

fn page_with<C: CartClient>(client: C, prefs: PreferenceStore) -> Page<C> {
    let sink = Rc::new(MemoryNotificationSink::new());
    let mut storefront = Storefront::builder(ThemeConfig::default(), client, MemoryCartSurface::new())
        .notifications(sink.clone())
        .preferences(prefs)
        .build();

    storefront.register_product("1", EmbeddedVariants::new(PRODUCT));
    storefront.register_element(
        "form-1",
        ElementRole::AddToCartForm {
            product: "1".into(),
        },
    );
    storefront.register_element(
        "pill-large",
        ElementRole::OptionPill {
            product: "1".into(),
            index: 1,
            value: "Large".into(),
        },
    );
    storefront.register_element(
        "qty-plus",
        ElementRole::QuantityStep {
            product: "1".into(),
            delta: 1,
        },
    );
    storefront.register_element(
        "engraving",
        ElementRole::PropertyInput {
            product: "1".into(),
            name: "Engraving".into(),
        },
    );
    storefront.register_element(
        "thumb-0",
        ElementRole::GalleryThumbnail {
            product: "1".into(),
            index: 0,
        },
    );
    storefront.register_element(
        "line-plus",
        ElementRole::LineStep {
            key: LARGE_KEY.into(),
            delta: 1,
        },
    );
    storefront.register_element(
        "line-remove",
        ElementRole::LineRemove {
            key: LARGE_KEY.into(),
        },
    );
    storefront.register_element(
        "open-cart",
        ElementRole::ModalTrigger {
            modal: "cart-drawer".into(),
        },
    );
    storefront.register_element(
        "close-cart",
        ElementRole::ModalClose {
            modal: "cart-drawer".into(),
        },
    );
    storefront.register_modal("cart-drawer");

    Page { storefront, sink }
}

fn page() -> Page<MemoryCartClient> {
    page_with(client(), PreferenceStore::in_memory())
}

fn large_line(quantity: i64) -> CartSnapshot {
    CartSnapshot::new(vec![LineItem::new(LARGE_KEY, "12", quantity, 3000, "Tee - Large")])
}

fn product_display(outcome: Outcome) -> theme_core::ProductDisplay {
    match outcome {
        Outcome::Product(display) => display,
        other => panic!("expected a product display, got {:?}", other),
    }
}

#[test]
fn test_select_step_and_add() {
    let Page { storefront, sink } = page();
    block_on(storefront.start(CartSnapshot::default())).unwrap();

    let display = product_display(block_on(storefront.handle(DomEvent::click("pill-large"))));
    assert_eq!(display.unit_price.as_deref(), Some("$30.00"));
    let product = ProductId::from("1");
    assert_eq!(
        storefront.gallery(&product).unwrap().current(),
        Some("large.jpg")
    );

    let display = product_display(block_on(storefront.handle(DomEvent::click("qty-plus"))));
    assert_eq!(display.quantity, 2);
    assert_eq!(display.line_total.as_deref(), Some("$60.00"));

    let outcome = block_on(storefront.handle(DomEvent::submit("form-1")));
    match outcome {
        Outcome::Added(aggregate) => {
            assert_eq!(aggregate.item_count, 2);
            assert_eq!(aggregate.total_cents, 6000);
        }
        other => panic!("expected an add, got {:?}", other),
    }
    assert_eq!(
        storefront.client().calls().last(),
        Some(&ClientCall::Add {
            variant_id: VariantId::from("12"),
            quantity: 2,
        })
    );

    let cart = storefront.cart();
    let surface = cart.surface();
    assert_eq!(surface.quantity_of(&ItemKey::from(LARGE_KEY)), Some(2));
    assert_eq!(surface.item_count(), 2);
    assert_eq!(surface.subtotal(), "$60.00");
    assert!(surface.is_open());
    assert!(sink
        .announced()
        .iter()
        .any(|(message, _)| message == "Item added to your cart"));
}

#[test]
fn test_property_input_is_submitted() {
    let Page { storefront, .. } = page();
    block_on(storefront.start(CartSnapshot::default())).unwrap();
    block_on(storefront.handle(DomEvent::click("pill-large")));
    let display = product_display(block_on(
        storefront.handle(DomEvent::input("engraving", "JS")),
    ));
    assert_eq!(display.unit_price.as_deref(), Some("$30.00"));

    let outcome = block_on(storefront.handle(DomEvent::submit("form-1")));
    assert!(matches!(outcome, Outcome::Added(_)));
    let server = storefront.client().snapshot();
    assert_eq!(server.items.len(), 1);
    assert_eq!(server.items[0].properties["Engraving"], "JS");
    assert_ne!(server.items[0].key, ItemKey::from(LARGE_KEY));
}

#[test]
fn test_thumbnail_click_shows_image() {
    let Page { storefront, .. } = page();
    block_on(storefront.handle(DomEvent::click("pill-large")));
    assert_eq!(
        block_on(storefront.handle(DomEvent::click("thumb-0"))),
        Outcome::ImageShown("small.jpg".into())
    );
}

#[test]
fn test_cart_ceiling_is_checked_before_sending() {
    let Page { storefront, sink } = page();
    let rendered = CartSnapshot::new(
        (0..5)
            .map(|n| LineItem::new(format!("line-{}", n), format!("{}", 20 + n), 9, 100, "Sock"))
            .chain(std::iter::once(LineItem::new("line-5", "25", 4, 100, "Sock")))
            .collect(),
    );
    let aggregate = block_on(storefront.start(rendered)).unwrap();
    assert_eq!(aggregate.item_count, 49);

    let rejected = block_on(storefront.add_to_cart(VariantId::from("12"), 2, LineProperties::new()));
    assert_eq!(
        rejected,
        Err(ThemeError::Cart(CartError::QuantityLimit {
            requested: 51,
            limit: 50,
        }))
    );
    assert_eq!(storefront.client().mutation_count(), 0);
    assert_eq!(sink.last().map(|n| n.kind), Some(NotificationKind::Warning));

    let accepted = block_on(storefront.add_to_cart(VariantId::from("12"), 1, LineProperties::new()));
    assert_eq!(accepted.map(|a| a.item_count), Ok(50));
    assert_eq!(storefront.client().mutation_count(), 1);
}

#[test]
fn test_failed_edit_rolls_back() {
    let Page { storefront, sink } = page();
    block_on(storefront.start(large_line(2))).unwrap();

    storefront
        .client()
        .fail_next(ClientError::http(503, "/cart/change.js"));
    let key = ItemKey::from(LARGE_KEY);
    let result = block_on(storefront.update_quantity(&key, 1));
    assert!(matches!(result, Err(ThemeError::Cart(CartError::Network(_)))));

    let cart = storefront.cart();
    assert_eq!(cart.displayed_quantity(&key), Some(2));
    assert_eq!(cart.surface().quantity_of(&key), Some(2));
    assert_eq!(cart.surface().item_count(), 2);
    assert_eq!(cart.pending_count(), 0);

    let shown = sink.last().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert!(shown.offer_retry);
}

#[test]
fn test_line_controls() {
    let Page { storefront, .. } = page();
    block_on(storefront.start(large_line(2))).unwrap();
    let key = ItemKey::from(LARGE_KEY);

    assert_eq!(
        block_on(storefront.handle(DomEvent::click("line-plus"))),
        Outcome::Edited(EditOutcome::Applied)
    );
    assert_eq!(storefront.cart().surface().quantity_of(&key), Some(3));
    assert_eq!(storefront.cart().surface().subtotal(), "$90.00");

    assert_eq!(
        block_on(storefront.set_quantity(&key, 5)),
        Ok(EditOutcome::Applied)
    );
    assert_eq!(storefront.client().snapshot().aggregate().item_count, 5);

    assert_eq!(
        block_on(storefront.handle(DomEvent::click("line-remove"))),
        Outcome::Edited(EditOutcome::Applied)
    );
    assert_eq!(
        storefront.client().calls().last(),
        Some(&ClientCall::Remove { line: 1 })
    );
    assert!(storefront.cart().surface().keys_in_order().is_empty());
    assert_eq!(storefront.cart().surface().item_count(), 0);
}

#[test]
fn test_editing_unknown_line_fails() {
    let Page { storefront, sink } = page();
    block_on(storefront.start(CartSnapshot::default())).unwrap();

    let outcome = block_on(storefront.handle(DomEvent::click("line-plus")));
    assert_eq!(
        outcome,
        Outcome::Failed(ThemeError::Cart(CartError::ItemNotFound(LARGE_KEY.into())))
    );
    assert_eq!(storefront.client().mutation_count(), 0);
    assert_eq!(sink.shown().len(), 1);
}

#[test]
fn test_reconcile_is_idempotent() {
    let Page { storefront, .. } = page();
    let rendered = CartSnapshot::new(vec![
        LineItem::new("a", "11", 1, 2000, "Tee - Small").with_image("small.jpg"),
        LineItem::new("b", "12", 2, 3000, "Tee - Large").with_image("large.jpg"),
    ]);
    block_on(storefront.start(rendered.clone())).unwrap();

    let (images, order) = {
        let cart = storefront.cart();
        (cart.surface().images_created(), cart.surface().keys_in_order())
    };
    storefront.reconcile(rendered.clone());
    storefront.reconcile(rendered);

    let cart = storefront.cart();
    assert_eq!(cart.surface().images_created(), images);
    assert_eq!(cart.surface().keys_in_order(), order);
    assert_eq!(cart.surface().item_count(), 3);
}

#[test]
fn test_service_events_are_reconciled() {
    let Page { storefront, .. } = page();
    block_on(storefront.start(CartSnapshot::default())).unwrap();
    // The ready event published during start.
    assert!(storefront.pump_events());
    assert!(!storefront.pump_events());

    // A change made elsewhere on the page.
    block_on(
        storefront
            .client()
            .add_item(&AddItemRequest::new(VariantId::from("11"), 3)),
    )
    .unwrap();
    assert!(storefront.pump_events());
    assert_eq!(storefront.cart().surface().item_count(), 3);
}

#[test]
fn test_escape_closes_top_modal() {
    let Page { storefront, .. } = page();
    let modal = ModalId::from("cart-drawer");

    assert_eq!(
        block_on(storefront.handle(DomEvent::click("open-cart"))),
        Outcome::ModalOpened(modal.clone())
    );
    assert!(storefront.modals().is_open(&modal));

    assert_eq!(
        block_on(storefront.handle(DomEvent::key("Escape"))),
        Outcome::ModalClosed {
            modal: modal.clone(),
            focus: Some(ElementId::from("open-cart")),
        }
    );
    assert!(!storefront.modals().any_open());
    assert_eq!(
        block_on(storefront.handle(DomEvent::key("Escape"))),
        Outcome::Ignored
    );
    assert_eq!(
        block_on(storefront.handle(DomEvent::click("close-cart"))),
        Outcome::Failed(ThemeError::Modal(ModalError::NotOpen(modal)))
    );
}

#[test]
fn test_unregistered_target_is_ignored() {
    let Page { storefront, .. } = page();
    assert_eq!(
        block_on(storefront.handle(DomEvent::click("nowhere"))),
        Outcome::Ignored
    );
}

#[test]
fn test_stored_preferences_apply() {
    let prefs = PreferenceStore::in_memory();
    ThemePreferences {
        notifications_enabled: true,
        reduced_motion: true,
        currency: Some("EUR".into()),
    }
    .save(&prefs);

    let Page { storefront, .. } = page_with(client(), prefs.clone());
    block_on(storefront.start(large_line(2))).unwrap();

    assert!(storefront.cart().options().reduced_motion);
    assert_eq!(storefront.cart().surface().subtotal(), "\u{20ac}60.00");
    let display = product_display(block_on(storefront.handle(DomEvent::click("pill-large"))));
    assert_eq!(display.unit_price.as_deref(), Some("\u{20ac}30.00"));

    storefront.set_preferences(ThemePreferences::default());
    assert_eq!(storefront.cart().surface().subtotal(), "$60.00");
    assert!(!storefront.cart().options().reduced_motion);
    assert_eq!(ThemePreferences::load(&prefs), ThemePreferences::default());
}

#[test]
fn test_disabled_notifications_still_announce() {
    let Page { storefront, sink } = page();
    storefront.set_preferences(ThemePreferences {
        notifications_enabled: false,
        ..ThemePreferences::default()
    });

    let result = block_on(storefront.update_quantity(&ItemKey::from("missing"), 1));
    assert!(result.is_err());
    assert!(sink.shown().is_empty());
    assert_eq!(sink.announced().len(), 1);
}

#[test]
fn test_start_waits_for_readiness() {
    let (notifier, ready) = ready_signal();
    let sink = Rc::new(MemoryNotificationSink::new());
    let storefront = Storefront::builder(ThemeConfig::default(), client(), MemoryCartSurface::new())
        .notifications(sink)
        .ready(ready)
        .build();

    let mut start = Box::pin(storefront.start(large_line(1)));
    assert!((&mut start).now_or_never().is_none());
    assert!(storefront.client().calls().is_empty());

    notifier.notify();
    assert_eq!(block_on(start).map(|a| a.item_count), Ok(1));
    assert_eq!(storefront.client().calls(), vec![ClientCall::Init]);
}

#[test]
fn test_start_fails_when_service_never_ready() {
    let (notifier, ready) = ready_signal();
    let sink = Rc::new(MemoryNotificationSink::new());
    let storefront = Storefront::builder(ThemeConfig::default(), client(), MemoryCartSurface::new())
        .notifications(sink.clone())
        .ready(ready)
        .build();
    drop(notifier);

    assert_eq!(
        block_on(storefront.start(CartSnapshot::default())),
        Err(ThemeError::Api(ApiError::Unavailable("cart".into())))
    );
    assert_eq!(sink.last().and_then(|n| n.code), Some("API_UNAVAILABLE"));
}

#[test]
fn test_captured_error_is_generic() {
    let Page { storefront, sink } = page();
    let error = storefront.capture(anyhow::anyhow!("listener blew up"));
    assert_eq!(error.code(), "UNEXPECTED");
    assert_eq!(storefront.errors().captured(), 1);
    assert_eq!(sink.shown().len(), 1);
}

/// Holds each line update until its gate is released.
/// Answers `init` with a fixed cart, as a service might send it.
struct VerbatimClient {
    inner: MemoryCartClient,
    served: CartSnapshot,
}

#[async_trait(?Send)]
impl CartClient for VerbatimClient {
    async fn init(&self, rendered: CartSnapshot) -> Result<CartSnapshot, ClientError> {
        self.inner.init(rendered).await?;
        Ok(self.served.clone())
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<CartSnapshot, ClientError> {
        self.inner.add_item(request).await
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> Result<CartSnapshot, ClientError> {
        self.inner.update_item(request).await
    }

    async fn remove_item(&self, line: usize) -> Result<CartSnapshot, ClientError> {
        self.inner.remove_item(line).await
    }

    fn subscribe(&self) -> CartEvents {
        self.inner.subscribe()
    }
}

#[test]
fn test_start_counts_only_real_lines() {
    let served = CartSnapshot::new(vec![
        LineItem::new("a", "21", 2, 1000, "A"),
        LineItem::new("b", "22", 0, 1000, "B"),
        LineItem::new("c", "23", -3, 1000, "C"),
    ]);
    let client = VerbatimClient {
        inner: MemoryCartClient::new(),
        served,
    };
    let Page { storefront, .. } = page_with(client, PreferenceStore::in_memory());

    let aggregate = block_on(storefront.start(CartSnapshot::default())).unwrap();
    assert_eq!(aggregate.item_count, 2);
    assert_eq!(aggregate.total_cents, 2000);
    assert_eq!(storefront.cart().surface().item_count(), 2);
}

/// Holds each line change until its gate opens, in the order the changes
/// are sent.
struct HeldClient {
    inner: MemoryCartClient,
    gates: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl HeldClient {
    fn new(inner: MemoryCartClient, gates: Vec<oneshot::Receiver<()>>) -> Self {
        Self {
            inner,
            gates: RefCell::new(gates.into()),
        }
    }

    fn waiting_gates(&self) -> usize {
        self.gates.borrow().len()
    }

    async fn hold(&self) -> Result<(), ClientError> {
        let gate = self.gates.borrow_mut().pop_front();
        match gate {
            Some(gate) => gate
                .await
                .map_err(|_| ClientError::Connection("gate dropped".into())),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl CartClient for HeldClient {
    async fn init(&self, rendered: CartSnapshot) -> Result<CartSnapshot, ClientError> {
        self.inner.init(rendered).await
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<CartSnapshot, ClientError> {
        self.inner.add_item(request).await
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> Result<CartSnapshot, ClientError> {
        self.hold().await?;
        self.inner.update_item(request).await
    }

    async fn remove_item(&self, line: usize) -> Result<CartSnapshot, ClientError> {
        self.hold().await?;
        self.inner.remove_item(line).await
    }

    fn subscribe(&self) -> CartEvents {
        self.inner.subscribe()
    }
}

/// The page shows exactly the service's cart.
fn assert_in_step(storefront: &Storefront<HeldClient, MemoryCartSurface>) {
    let server = storefront.client().inner.snapshot();
    let cart = storefront.cart();
    let surface = cart.surface();
    let keys: Vec<ItemKey> = server.items.iter().map(|item| item.key.clone()).collect();
    assert_eq!(surface.keys_in_order(), keys);
    for item in &server.items {
        assert_eq!(surface.quantity_of(&item.key), Some(item.quantity));
    }
    assert_eq!(surface.item_count(), server.aggregate().item_count);
    assert_eq!(cart.pending_count(), 0);
}

fn four_lines() -> CartSnapshot {
    CartSnapshot::new(
        ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .map(|(n, key)| LineItem::new(*key, format!("{}", 30 + n), 1, 500, key.to_uppercase()))
            .collect(),
    )
}

#[test]
fn test_stale_answer_is_ignored() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let held = HeldClient::new(client(), vec![first_rx, second_rx]);
    let Page { storefront, .. } = page_with(held, PreferenceStore::in_memory());
    block_on(storefront.start(large_line(2))).unwrap();
    let key = ItemKey::from(LARGE_KEY);

    let (first, second, ()) = block_on(async {
        futures::join!(
            storefront.update_quantity(&key, 1),
            storefront.update_quantity(&key, 1),
            async {
                assert_eq!(storefront.cart().displayed_quantity(&key), Some(4));
                let _ = first_tx.send(());
                let _ = second_tx.send(());
            }
        )
    });

    assert_eq!(first, Ok(EditOutcome::Superseded));
    assert_eq!(second, Ok(EditOutcome::Applied));
    let cart = storefront.cart();
    assert_eq!(cart.surface().quantity_of(&key), Some(4));
    assert_eq!(cart.pending_count(), 0);
}

#[test]
fn test_same_line_changes_go_out_one_at_a_time() {
    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let held = HeldClient::new(client(), vec![first_rx, second_rx]);
    let Page { storefront, .. } = page_with(held, PreferenceStore::in_memory());
    block_on(storefront.start(large_line(1))).unwrap();
    let key = ItemKey::from(LARGE_KEY);

    let (first, second, ()) = block_on(async {
        futures::join!(
            storefront.update_quantity(&key, 1),
            storefront.update_quantity(&key, 1),
            async {
                assert_eq!(storefront.cart().displayed_quantity(&key), Some(3));
                assert_eq!(storefront.client().waiting_gates(), 1);
                // Answer readiness in reverse order.
                let _ = second_tx.send(());
                let _ = first_tx.send(());
            }
        )
    });

    assert_eq!(first, Ok(EditOutcome::Superseded));
    assert_eq!(second, Ok(EditOutcome::Applied));
    assert_eq!(storefront.client().inner.mutation_count(), 2);
    assert_eq!(
        storefront.client().inner.snapshot().get(&key).map(|item| item.quantity),
        Some(3)
    );
    assert_in_step(&storefront);
}

#[test]
fn test_failed_superseded_change_still_sends_newest() {
    let (first_tx, first_rx) = oneshot::channel::<()>();
    let (second_tx, second_rx) = oneshot::channel();
    let held = HeldClient::new(client(), vec![first_rx, second_rx]);
    let Page { storefront, .. } = page_with(held, PreferenceStore::in_memory());
    block_on(storefront.start(large_line(1))).unwrap();
    let key = ItemKey::from(LARGE_KEY);

    let (first, second, ()) = block_on(async {
        futures::join!(
            storefront.update_quantity(&key, 1),
            storefront.update_quantity(&key, 1),
            async {
                drop(first_tx);
                let _ = second_tx.send(());
            }
        )
    });

    assert_eq!(first, Ok(EditOutcome::Superseded));
    assert_eq!(second, Ok(EditOutcome::Applied));
    assert_eq!(
        storefront.client().inner.snapshot().get(&key).map(|item| item.quantity),
        Some(3)
    );
    assert_in_step(&storefront);
}

#[test]
fn test_removal_and_update_on_other_lines() {
    let (remove_tx, remove_rx) = oneshot::channel();
    let (update_tx, update_rx) = oneshot::channel();
    let held = HeldClient::new(MemoryCartClient::new(), vec![remove_rx, update_rx]);
    let Page { storefront, .. } = page_with(held, PreferenceStore::in_memory());
    block_on(storefront.start(four_lines())).unwrap();
    let a = ItemKey::from("a");
    let c = ItemKey::from("c");

    let (removed, updated, ()) = block_on(async {
        futures::join!(
            storefront.remove_item(&a),
            storefront.update_quantity(&c, 1),
            async {
                {
                    let cart = storefront.cart();
                    assert!(cart.surface().line(&a).is_some_and(|line| line.removing));
                    assert_eq!(cart.displayed_quantity(&c), Some(2));
                }
                let _ = update_tx.send(());
                let _ = remove_tx.send(());
            }
        )
    });

    assert_eq!(removed, Ok(EditOutcome::Applied));
    assert_eq!(updated, Ok(EditOutcome::Applied));
    assert_eq!(
        storefront.client().inner.calls()[1..].to_vec(),
        vec![
            ClientCall::Remove { line: 1 },
            ClientCall::Update {
                line: 2,
                quantity: 2
            },
        ]
    );
    let server: Vec<(String, i64)> = storefront
        .client()
        .inner
        .snapshot()
        .items
        .iter()
        .map(|item| (item.key.to_string(), item.quantity))
        .collect();
    assert_eq!(
        server,
        vec![("b".to_string(), 1), ("c".to_string(), 2), ("d".to_string(), 1)]
    );
    assert_in_step(&storefront);
}
