//! Keeps the rendered cart in step with the cart service and local edits.
//!
//! The view always shows the last authoritative cart, with the optimistic
//! quantity of every live edit laid over it. Work is split so that no
//! borrow is held across a network call:
//!
//! 1. `begin_*` validates, applies the edit to the display and returns a
//!    plan.
//! 2. `dispatch` turns a quantity plan into a line request. The service
//!    addresses lines by position, so only one line request is on the wire
//!    at a time and each is numbered against the latest answer.
//! 3. The caller sends the request.
//! 4. `finish_*` takes the answer: success reconciles, failure rolls the
//!    display back to the last confirmed quantity. A superseded edit's
//!    success is still reconciled; its failure is dropped.

use std::collections::HashMap;

use theme_client::{AddItemRequest, ClientError, LineProperties};
use theme_commerce::cart::{
    CartAggregate, CartSnapshot, EditState, EditToken, LineItem, PendingEdits, QuantityLimits,
};
use theme_commerce::error::{CartError, ThemeError};
use theme_commerce::ids::{ItemKey, VariantId};
use theme_commerce::money::MoneyFormat;
use theme_observability::StructuredLogger;
use theme_view::{apply_snapshot, ApplyReport, CartSurface};

use crate::cart::plan::{AddPlan, Dispatch, EditOutcome, EditPlan, LineRequest};

/// Reconciler settings.
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    pub limits: QuantityLimits,
    pub format: MoneyFormat,
    /// Reveal the cart after a successful add.
    pub open_cart_on_add: bool,
    /// Hide removed lines instantly instead of animating.
    pub reduced_motion: bool,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            limits: QuantityLimits::default(),
            format: MoneyFormat::default(),
            open_cart_on_add: true,
            reduced_motion: false,
        }
    }
}

/// The cart state reconciler.
#[derive(Debug)]
pub struct CartReconciler<S: CartSurface> {
    surface: S,
    snapshot: CartSnapshot,
    pending: PendingEdits,
    /// Quantities shown instead of the authoritative ones.
    shown: HashMap<ItemKey, i64>,
    /// The line request currently on the wire.
    on_wire: Option<(ItemKey, EditToken)>,
    options: ReconcilerOptions,
    logger: StructuredLogger,
}

impl<S: CartSurface> CartReconciler<S> {
    pub fn new(surface: S, options: ReconcilerOptions, logger: StructuredLogger) -> Self {
        Self {
            surface,
            snapshot: CartSnapshot::default(),
            pending: PendingEdits::new(),
            shown: HashMap::new(),
            on_wire: None,
            options,
            logger: logger.for_component("cart"),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The last authoritative cart.
    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    pub fn options(&self) -> &ReconcilerOptions {
        &self.options
    }

    pub fn edit_state(&self, key: &ItemKey) -> EditState {
        self.pending.state(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a line request is awaiting its answer.
    pub fn is_busy(&self) -> bool {
        self.on_wire.is_some()
    }

    /// Quantity currently shown for `key`: the live edit's target, or else
    /// the authoritative quantity.
    pub fn displayed_quantity(&self, key: &ItemKey) -> Option<i64> {
        let item = self.snapshot.get(key)?;
        Some(self.displayed_for(item))
    }

    fn displayed_for(&self, item: &LineItem) -> i64 {
        self.shown.get(&item.key).copied().unwrap_or(item.quantity)
    }

    fn displayed_line_price(&self, item: &LineItem) -> i64 {
        match self.shown.get(&item.key) {
            Some(quantity) => item.line_price_for(*quantity),
            None => item.line_price(),
        }
    }

    /// Count and total as displayed, optimistic edits included.
    pub fn displayed_aggregate(&self) -> CartAggregate {
        self.snapshot
            .items
            .iter()
            .fold(CartAggregate::default(), |acc, item| CartAggregate {
                item_count: acc.item_count.saturating_add(self.displayed_for(item)),
                total_cents: acc
                    .total_cents
                    .saturating_add(self.displayed_line_price(item)),
            })
    }

    /// Switch money formatting (currency override) and re-render.
    pub fn set_format(&mut self, format: MoneyFormat) {
        self.options.format = format;
        let snapshot = self.snapshot.clone();
        self.reconcile(snapshot);
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.options.reduced_motion = reduced_motion;
    }

    // --- reconcile ------------------------------------------------------

    /// Make the view show `snapshot`. Always applied: the newest snapshot
    /// replaces whatever came before. Lines with a live edit keep showing
    /// the edit's quantity until it settles.
    pub fn reconcile(&mut self, snapshot: CartSnapshot) -> ApplyReport {
        self.snapshot = snapshot.normalized();
        let snapshot = &self.snapshot;
        self.pending.retain(|key| snapshot.get(key).is_some());

        let report = apply_snapshot(&mut self.surface, &self.snapshot.items, &self.options.format);

        self.shown = self
            .pending
            .iter()
            .map(|edit| (edit.key.clone(), edit.target_quantity))
            .collect();
        let overlays: Vec<(ItemKey, i64)> = self
            .shown
            .iter()
            .map(|(key, quantity)| (key.clone(), *quantity))
            .collect();
        for (key, target) in overlays {
            self.show_quantity(&key, target);
        }
        self.refresh_totals();

        tracing::debug!(
            items = self.snapshot.items.len(),
            pending = self.pending.len(),
            created = report.created,
            removed = report.removed,
            "cart reconciled"
        );
        report
    }

    fn refresh_totals(&mut self) {
        let aggregate = self.displayed_aggregate();
        let subtotal = self.options.format.format(aggregate.total_cents);
        self.surface.set_totals(aggregate.item_count, &subtotal);
    }

    /// Show `quantity` on the line for `key`; 0 shows the removing state.
    fn show_quantity(&mut self, key: &ItemKey, quantity: i64) {
        let Some(node) = self.surface.node_for(key) else {
            return;
        };
        if quantity <= 0 {
            let animate = !self.options.reduced_motion;
            self.surface.set_line_removing(&node, true, animate);
            return;
        }
        let price = self
            .snapshot
            .get(key)
            .map(|item| item.line_price_for(quantity))
            .unwrap_or(0);
        let price = self.options.format.format(price);
        self.surface.set_line_removing(&node, false, false);
        self.surface.set_line_quantity(&node, quantity, &price);
    }

    // --- add ------------------------------------------------------------

    /// Validate an add. The quantity is clamped to the per-item ceiling;
    /// the cart-wide ceiling is checked against the displayed total.
    pub fn begin_add(
        &mut self,
        variant_id: VariantId,
        quantity: i64,
        properties: LineProperties,
    ) -> Result<AddPlan, ThemeError> {
        let quantity = self.options.limits.clamp_add(quantity)?;
        let current = self.displayed_aggregate().item_count;
        if let Err(e) = self.options.limits.check_cart_total(current, quantity) {
            self.logger
                .warn_builder("add rejected")
                .field("code", e.code())
                .field_i64("current", current)
                .field_i64("requested", quantity)
                .emit();
            return Err(e.into());
        }

        let mut request = AddItemRequest::new(variant_id, quantity);
        request.properties = properties;
        Ok(AddPlan { request })
    }

    /// Take the add's answer. Failures change nothing on screen.
    pub fn finish_add(
        &mut self,
        plan: &AddPlan,
        result: Result<CartSnapshot, ClientError>,
    ) -> Result<CartAggregate, ThemeError> {
        match result {
            Ok(snapshot) => {
                self.reconcile(snapshot);
                if self.options.open_cart_on_add {
                    self.surface.open_cart();
                }
                self.logger
                    .info_builder("item added")
                    .field("variant", plan.variant_id().as_str())
                    .field_i64("quantity", plan.request.quantity)
                    .emit();
                Ok(self.snapshot.aggregate())
            }
            Err(e) => Err(e.classify(Some(plan.variant_id()))),
        }
    }

    // --- quantity edits -------------------------------------------------

    /// Change a line's quantity by `delta`. A result of zero or less
    /// removes the line. Only increases are checked against the ceilings.
    pub fn begin_update(&mut self, key: &ItemKey, delta: i64) -> Result<EditPlan, ThemeError> {
        let current = self
            .displayed_quantity(key)
            .ok_or_else(|| CartError::ItemNotFound(key.clone()))?;
        self.begin_set_quantity(key, current.saturating_add(delta))
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub fn begin_set_quantity(&mut self, key: &ItemKey, quantity: i64) -> Result<EditPlan, ThemeError> {
        let current = self
            .displayed_quantity(key)
            .ok_or_else(|| CartError::ItemNotFound(key.clone()))?;
        let target = quantity.max(0);
        let delta = target - current;

        if delta > 0 {
            self.options.limits.check_item(key, target)?;
            let total = self.displayed_aggregate().item_count;
            self.options.limits.check_cart_total(total, delta)?;
        }

        self.begin_edit(key, target)
    }

    /// Remove a line. The line is hidden right away.
    pub fn begin_remove(&mut self, key: &ItemKey) -> Result<EditPlan, ThemeError> {
        self.begin_edit(key, 0)
    }

    fn begin_edit(&mut self, key: &ItemKey, target: i64) -> Result<EditPlan, ThemeError> {
        let (previous, variant_id) = self
            .snapshot
            .get(key)
            .map(|item| (item.quantity, item.variant_id.clone()))
            .ok_or_else(|| CartError::ItemNotFound(key.clone()))?;

        let (token, superseded) = self.pending.begin(key.clone(), previous, target);
        if let Some(old) = superseded {
            tracing::debug!(key = %key, old = %old.token, new = %token, "edit superseded");
        }
        tracing::debug!(key = %key, token = %token, previous, target, "edit pending");

        self.shown.insert(key.clone(), target);
        self.show_quantity(key, target);
        self.refresh_totals();

        Ok(EditPlan {
            token,
            key: key.clone(),
            variant_id,
            previous_quantity: previous,
            target_quantity: target,
        })
    }

    /// Number the plan's request against the latest cart and mark it sent.
    ///
    /// Returns `Busy` while another line request is unanswered and
    /// `Superseded` when a newer edit on the key took over or the line is
    /// gone.
    pub fn dispatch(&mut self, plan: &EditPlan) -> Dispatch {
        if self.on_wire.is_some() {
            return Dispatch::Busy;
        }
        if !self.pending.is_current(&plan.key, plan.token) {
            tracing::debug!(key = %plan.key, token = %plan.token, "edit not sent, superseded");
            return Dispatch::Superseded;
        }
        let Some(line) = self.snapshot.line_number(&plan.key) else {
            self.pending.settle(&plan.key, plan.token);
            self.shown.remove(&plan.key);
            return Dispatch::Superseded;
        };

        self.pending.mark_dispatched(&plan.key, plan.token);
        self.on_wire = Some((plan.key.clone(), plan.token));
        tracing::debug!(key = %plan.key, token = %plan.token, line, "edit awaiting network");
        Dispatch::Send(LineRequest {
            token: plan.token,
            key: plan.key.clone(),
            line,
            quantity: plan.target_quantity,
        })
    }

    /// Forget a line request whose answer will never be taken, showing its
    /// key's confirmed quantity again.
    pub fn abandon_in_flight(&mut self) {
        let Some((key, token)) = self.on_wire.take() else {
            return;
        };
        self.logger
            .warn_builder("line request abandoned")
            .field("key", key.as_str())
            .emit();
        if self.pending.settle(&key, token).is_some() {
            self.shown.remove(&key);
            if let Some(quantity) = self.snapshot.get(&key).map(|item| item.quantity) {
                self.show_quantity(&key, quantity);
            }
            self.refresh_totals();
        }
    }

    /// Take an edit's answer.
    ///
    /// Success reconciles, whether or not the edit was superseded: the
    /// answer is the service's latest cart. A live edit's failure shows the
    /// last confirmed quantity again; a superseded edit's failure is
    /// dropped, since the newer edit is still to be sent.
    pub fn finish_edit(
        &mut self,
        plan: &EditPlan,
        result: Result<CartSnapshot, ClientError>,
    ) -> Result<EditOutcome, ThemeError> {
        if self
            .on_wire
            .as_ref()
            .is_some_and(|(key, token)| key == &plan.key && *token == plan.token)
        {
            self.on_wire = None;
        }

        if self.pending.settle(&plan.key, plan.token).is_none() {
            tracing::debug!(key = %plan.key, token = %plan.token, "superseded edit answered");
            if let Ok(snapshot) = result {
                self.reconcile(snapshot);
            }
            return Ok(EditOutcome::Superseded);
        }

        match result {
            Ok(snapshot) => {
                tracing::debug!(key = %plan.key, token = %plan.token, "edit confirmed");
                self.reconcile(snapshot);
                Ok(EditOutcome::Applied)
            }
            Err(e) => {
                self.shown.remove(&plan.key);
                let confirmed = self.snapshot.get(&plan.key).map(|item| item.quantity);
                tracing::debug!(
                    key = %plan.key,
                    token = %plan.token,
                    restored = ?confirmed,
                    "edit rolled back"
                );
                if let Some(quantity) = confirmed {
                    self.show_quantity(&plan.key, quantity);
                }
                self.refresh_totals();
                Err(e.classify(Some(&plan.variant_id)))
            }
        }
    }

    /// Every key's displayed quantity, for diagnostics.
    pub fn displayed_quantities(&self) -> HashMap<ItemKey, i64> {
        self.snapshot
            .items
            .iter()
            .map(|item| (item.key.clone(), self.displayed_for(item)))
            .collect()
    }
}
