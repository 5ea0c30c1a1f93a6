//! In-memory cart service.
//!
//! Behaves like the storefront's cart endpoints: lines are keyed by variant
//! plus properties, lines are addressed by 1-based line number, unknown
//! variants answer 404 and unavailable ones 422. Failures can be queued to
//! exercise rollback paths.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use theme_commerce::cart::{CartSnapshot, LineItem};
use theme_commerce::ids::{ItemKey, VariantId};

use crate::client::{AddItemRequest, CartClient, ClientError, LineProperties, UpdateItemRequest};
use crate::events::{CartEvent, CartEventBus, CartEvents};
use crate::readiness::Ready;

/// A variant the in-memory service knows how to sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub variant_id: VariantId,
    pub title: String,
    pub price_cents: i64,
    pub available: bool,
    /// Units in stock; `None` means untracked.
    pub inventory: Option<i64>,
    pub image: Option<String>,
}

impl CatalogEntry {
    pub fn new(variant_id: impl Into<VariantId>, title: impl Into<String>, price_cents: i64) -> Self {
        Self {
            variant_id: variant_id.into(),
            title: title.into(),
            price_cents,
            available: true,
            inventory: None,
            image: None,
        }
    }

    pub fn with_inventory(mut self, inventory: i64) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// A call the service received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Init,
    Add { variant_id: VariantId, quantity: i64 },
    Update { line: usize, quantity: i64 },
    Remove { line: usize },
}

#[derive(Debug, Default)]
struct MemoryState {
    catalog: HashMap<VariantId, CatalogEntry>,
    items: Vec<LineItem>,
    token: String,
    currency: Option<String>,
    failures: VecDeque<ClientError>,
    calls: Vec<ClientCall>,
}

impl MemoryState {
    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            token: Some(self.token.clone()),
            items: self.items.clone(),
            currency: self.currency.clone(),
        }
    }

    fn quantity_in_cart(&self, variant_id: &VariantId) -> i64 {
        self.items
            .iter()
            .filter(|item| &item.variant_id == variant_id)
            .map(|item| item.quantity)
            .sum()
    }

    fn add(&mut self, request: &AddItemRequest) -> Result<(), ClientError> {
        let entry = self
            .catalog
            .get(&request.variant_id)
            .cloned()
            .ok_or_else(|| ClientError::http(404, "/cart/add.js"))?;

        if request.quantity <= 0 {
            return Err(ClientError::http(400, "/cart/add.js"));
        }
        if !entry.available {
            return Err(unavailable(&entry, "is sold out"));
        }
        if let Some(inventory) = entry.inventory {
            if self.quantity_in_cart(&entry.variant_id) + request.quantity > inventory {
                return Err(unavailable(
                    &entry,
                    &format!("only has {} in stock", inventory),
                ));
            }
        }

        let key = line_key(&entry.variant_id, &request.properties);
        if let Some(existing) = self.items.iter_mut().find(|item| item.key == key) {
            existing.quantity += request.quantity;
            existing.line_price_cents = Some(existing.line_price_for(existing.quantity));
            return Ok(());
        }

        let mut item = LineItem::new(
            key,
            entry.variant_id.clone(),
            request.quantity,
            entry.price_cents,
            entry.title.clone(),
        );
        item.image = entry.image.clone();
        item.properties = request.properties.clone();
        item.line_price_cents = Some(item.line_price());
        self.items.push(item);
        Ok(())
    }

    fn change(&mut self, line: usize, quantity: i64) -> Result<(), ClientError> {
        let index = line
            .checked_sub(1)
            .filter(|index| *index < self.items.len())
            .ok_or_else(|| ClientError::http(400, "/cart/change.js"))?;

        if quantity < 0 {
            return Err(ClientError::http(400, "/cart/change.js"));
        }
        if quantity == 0 {
            self.items.remove(index);
            return Ok(());
        }

        let variant_id = self.items[index].variant_id.clone();
        if let Some(entry) = self.catalog.get(&variant_id) {
            if let Some(inventory) = entry.inventory {
                let elsewhere = self.quantity_in_cart(&variant_id) - self.items[index].quantity;
                if elsewhere + quantity > inventory {
                    return Err(unavailable(entry, &format!("only has {} in stock", inventory)));
                }
            }
        }

        let item = &mut self.items[index];
        item.quantity = quantity;
        item.line_price_cents = Some(item.line_price_for(quantity));
        Ok(())
    }
}

fn unavailable(entry: &CatalogEntry, reason: &str) -> ClientError {
    ClientError::Http {
        status: 422,
        endpoint: "/cart".to_string(),
        description: Some(format!("{} {}", entry.title, reason)),
    }
}

/// Line key: the variant, plus a digest of the properties when present.
fn line_key(variant_id: &VariantId, properties: &LineProperties) -> ItemKey {
    if properties.is_empty() {
        return ItemKey::new(format!("{}:default", variant_id));
    }
    let encoded = serde_json::to_string(properties).unwrap_or_default();
    let digest = encoded
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    ItemKey::new(format!("{}:{:08x}", variant_id, digest))
}

/// An in-memory cart service for tests, demos and the CLI simulator.
#[derive(Debug)]
pub struct MemoryCartClient {
    state: RefCell<MemoryState>,
    bus: CartEventBus,
    ready: RefCell<Option<Ready>>,
}

impl Default for MemoryCartClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCartClient {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MemoryState {
                token: "memory-cart".to_string(),
                ..MemoryState::default()
            }),
            bus: CartEventBus::new(),
            ready: RefCell::new(None),
        }
    }

    /// Register a sellable variant.
    pub fn with_variant(self, entry: CatalogEntry) -> Self {
        self.state
            .borrow_mut()
            .catalog
            .insert(entry.variant_id.clone(), entry);
        self
    }

    /// Report this currency in snapshots.
    pub fn with_currency(self, currency: impl Into<String>) -> Self {
        self.state.borrow_mut().currency = Some(currency.into());
        self
    }

    /// Hold `init` until `ready` resolves.
    pub fn gated(self, ready: Ready) -> Self {
        *self.ready.borrow_mut() = Some(ready);
        self
    }

    /// Make the next call fail with `error`. Queued failures are consumed
    /// in order, one per call.
    pub fn fail_next(&self, error: ClientError) {
        self.state.borrow_mut().failures.push_back(error);
    }

    /// Every call received so far, `init` included.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.state.borrow().calls.clone()
    }

    /// Number of mutating calls (add / update / remove) received.
    pub fn mutation_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| !matches!(call, ClientCall::Init))
            .count()
    }

    /// The current authoritative cart, without going through a call.
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().snapshot()
    }

    fn record(&self, call: ClientCall) -> Result<(), ClientError> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn complete(&self) -> CartSnapshot {
        let snapshot = self.snapshot();
        self.bus.publish(CartEvent::RequestComplete(snapshot.clone()));
        snapshot
    }
}

#[async_trait(?Send)]
impl CartClient for MemoryCartClient {
    async fn init(&self, rendered: CartSnapshot) -> Result<CartSnapshot, ClientError> {
        let ready = self.ready.borrow_mut().take();
        if let Some(ready) = ready {
            ready.wait().await?;
        }

        self.record(ClientCall::Init)?;
        {
            let mut state = self.state.borrow_mut();
            if state.items.is_empty() {
                state.items = rendered.normalized().items;
            }
        }
        let snapshot = self.snapshot();
        self.bus.publish(CartEvent::Ready(snapshot.clone()));
        Ok(snapshot)
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<CartSnapshot, ClientError> {
        self.record(ClientCall::Add {
            variant_id: request.variant_id.clone(),
            quantity: request.quantity,
        })?;
        self.state.borrow_mut().add(request)?;
        Ok(self.complete())
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> Result<CartSnapshot, ClientError> {
        self.record(ClientCall::Update {
            line: request.line,
            quantity: request.quantity,
        })?;
        self.state.borrow_mut().change(request.line, request.quantity)?;
        Ok(self.complete())
    }

    async fn remove_item(&self, line: usize) -> Result<CartSnapshot, ClientError> {
        self.record(ClientCall::Remove { line })?;
        self.state.borrow_mut().change(line, 0)?;
        Ok(self.complete())
    }

    fn subscribe(&self) -> CartEvents {
        self.bus.subscribe()
    }
}
