//! The composition root.
//!
//! `Storefront` owns every collaborator and is the only place they meet.
//! Handlers take `&self` and keep their interior borrows short, so a second
//! click can be handled while the first one's request is still out. Line
//! changes queue behind `wire` and go out one at a time.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::lock::Mutex;
use theme_client::{CartClient, CartEvents, LineProperties, Ready};
use theme_commerce::cart::{CartAggregate, CartSnapshot};
use theme_commerce::catalog::EmbeddedVariants;
use theme_commerce::error::{ModalError, ThemeError};
use theme_commerce::ids::{ElementId, ItemKey, ModalId, ProductId, VariantId};
use theme_commerce::money::MoneyFormat;
use theme_observability::{
    GlobalErrorHandler, MemoryNotificationSink, NotificationSink, Notifier, Politeness,
    StructuredLogger,
};
use theme_prefs::{PreferenceStore, ThemePreferences};
use theme_view::CartSurface;

use crate::cart::{CartReconciler, Dispatch, EditOutcome, EditPlan, ReconcilerOptions};
use crate::config::ThemeConfig;
use crate::events::{Action, DomEvent, ElementRole, EventRouter};
use crate::gallery::Gallery;
use crate::modal::ModalStack;
use crate::product::{ProductDisplay, ProductForm};

/// What handling an event led to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing is registered for the target, or nothing to do.
    Ignored,
    Product(ProductDisplay),
    /// An add went through; carries the new authoritative totals.
    Added(CartAggregate),
    /// A line edit was confirmed or superseded.
    Edited(EditOutcome),
    ImageShown(String),
    ModalOpened(ModalId),
    /// Focus goes back to `focus`, when known.
    ModalClosed {
        modal: ModalId,
        focus: Option<ElementId>,
    },
    /// Surfaced to the shopper already.
    Failed(ThemeError),
}

/// Assembles a `Storefront`.
pub struct StorefrontBuilder<C, S> {
    config: ThemeConfig,
    client: C,
    surface: S,
    sink: Option<Rc<dyn NotificationSink>>,
    prefs: Option<PreferenceStore>,
    ready: Option<Ready>,
    logger: Option<StructuredLogger>,
}

impl<C: CartClient, S: CartSurface> StorefrontBuilder<C, S> {
    pub fn notifications(mut self, sink: Rc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn preferences(mut self, store: PreferenceStore) -> Self {
        self.prefs = Some(store);
        self
    }

    /// Readiness of the cart service. Defaults to already ready.
    pub fn ready(mut self, ready: Ready) -> Self {
        self.ready = Some(ready);
        self
    }

    pub fn logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn build(self) -> Storefront<C, S> {
        let config = self.config;
        let logger = self.logger.unwrap_or_else(|| {
            StructuredLogger::default()
                .with_min_level(config.log_level())
                .with_format(config.log_format())
        });
        let sink = self
            .sink
            .unwrap_or_else(|| Rc::new(MemoryNotificationSink::new()));
        let prefs = self.prefs.unwrap_or_default();
        let preferences = ThemePreferences::load(&prefs);

        let notifier =
            Notifier::new(sink, logger.clone()).with_options(config.notifier_options());
        if !preferences.notifications_enabled {
            notifier.set_enabled(false);
        }
        let errors = GlobalErrorHandler::new(logger.clone(), notifier.clone());

        let format = display_format(&config, &preferences);
        let cart = CartReconciler::new(
            self.surface,
            ReconcilerOptions {
                limits: config.limits(),
                format,
                open_cart_on_add: config.cart.open_cart_on_add,
                reduced_motion: preferences.reduced_motion,
            },
            logger.clone(),
        );

        Storefront {
            client: self.client,
            cart: RefCell::new(cart),
            wire: Mutex::new(()),
            events: RefCell::new(None),
            router: EventRouter::new(),
            forms: RefCell::new(HashMap::new()),
            galleries: RefCell::new(HashMap::new()),
            modals: RefCell::new(ModalStack::new()),
            notifier,
            errors,
            prefs,
            preferences: RefCell::new(preferences),
            ready: self.ready.unwrap_or_else(Ready::now),
            logger: logger.for_component("storefront"),
            config,
        }
    }
}

fn display_format(config: &ThemeConfig, preferences: &ThemePreferences) -> MoneyFormat {
    MoneyFormat::new(
        preferences.display_currency(&config.money.currency),
        &config.money.locale,
    )
}

/// One page view's worth of theme behavior.
pub struct Storefront<C, S: CartSurface> {
    config: ThemeConfig,
    client: C,
    cart: RefCell<CartReconciler<S>>,
    /// Held while a line change is on the wire.
    wire: Mutex<()>,
    events: RefCell<Option<CartEvents>>,
    router: EventRouter,
    forms: RefCell<HashMap<ProductId, ProductForm>>,
    galleries: RefCell<HashMap<ProductId, Gallery>>,
    modals: RefCell<ModalStack>,
    notifier: Notifier,
    errors: GlobalErrorHandler,
    prefs: PreferenceStore,
    preferences: RefCell<ThemePreferences>,
    ready: Ready,
    logger: StructuredLogger,
}

impl<C: CartClient, S: CartSurface> Storefront<C, S> {
    pub fn builder(config: ThemeConfig, client: C, surface: S) -> StorefrontBuilder<C, S> {
        StorefrontBuilder {
            config,
            client,
            surface,
            sink: None,
            prefs: None,
            ready: None,
            logger: None,
        }
    }

    // --- setup ----------------------------------------------------------

    /// Register a product form (and its gallery) from the embedded blob.
    pub fn register_product(&mut self, product_id: impl Into<ProductId>, variants: EmbeddedVariants) {
        let product_id = product_id.into();
        let form = ProductForm::new(
            product_id.clone(),
            variants,
            self.config.limits(),
            display_format(&self.config, &self.preferences.borrow()),
        );
        let mut gallery = Gallery::new(form.images());
        if let Some(variant) = form.resolved() {
            gallery.show_variant(variant);
        }
        self.galleries.get_mut().insert(product_id.clone(), gallery);
        self.forms.get_mut().insert(product_id, form);
    }

    pub fn register_element(&mut self, id: impl Into<ElementId>, role: ElementRole) {
        self.router.register(id, role);
    }

    pub fn register_modal(&mut self, id: impl Into<ModalId>) {
        self.modals.get_mut().register(id);
    }

    /// Wait for the cart service, seed it with the cart rendered into the
    /// page and show what it answers.
    pub async fn start(&self, rendered: CartSnapshot) -> Result<CartAggregate, ThemeError> {
        if let Err(e) = self.ready.clone().wait().await {
            let err = e.classify(None);
            self.notifier.error(&err);
            return Err(err);
        }

        *self.events.borrow_mut() = Some(self.client.subscribe());
        let snapshot = match self.client.init(rendered).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let err = e.classify(None);
                self.notifier.error(&err);
                return Err(err);
            }
        };

        let aggregate = {
            let mut cart = self.cart.borrow_mut();
            cart.reconcile(snapshot);
            cart.snapshot().aggregate()
        };
        self.logger
            .info_builder("storefront ready")
            .field_i64("items", aggregate.item_count)
            .emit();
        Ok(aggregate)
    }

    // --- accessors ------------------------------------------------------

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn cart(&self) -> Ref<'_, CartReconciler<S>> {
        self.cart.borrow()
    }

    pub fn form(&self, product: &ProductId) -> Option<Ref<'_, ProductForm>> {
        Ref::filter_map(self.forms.borrow(), |forms| forms.get(product)).ok()
    }

    pub fn gallery(&self, product: &ProductId) -> Option<Ref<'_, Gallery>> {
        Ref::filter_map(self.galleries.borrow(), |galleries| galleries.get(product)).ok()
    }

    pub fn modals(&self) -> Ref<'_, ModalStack> {
        self.modals.borrow()
    }

    pub fn preferences(&self) -> ThemePreferences {
        self.preferences.borrow().clone()
    }

    pub fn errors(&self) -> &GlobalErrorHandler {
        &self.errors
    }

    // --- events ---------------------------------------------------------

    /// Route a DOM event and carry out its action. Failures are surfaced
    /// to the shopper and returned as `Outcome::Failed`.
    pub async fn handle(&self, event: DomEvent) -> Outcome {
        let Some(action) = self.router.route(&event) else {
            return Outcome::Ignored;
        };
        match self.perform(action).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.notifier.error(&err);
                Outcome::Failed(err)
            }
        }
    }

    async fn perform(&self, action: Action) -> Result<Outcome, ThemeError> {
        match action {
            Action::SelectOption {
                product,
                index,
                value,
            } => self.select_option(&product, index, value),
            Action::StepQuantity { product, delta } => {
                self.with_form(&product, |form| Ok(form.step_quantity(delta)))
            }
            Action::SetQuantity { product, raw } => self.with_form(&product, |form| {
                form.set_quantity_input(&raw).map_err(ThemeError::from)
            }),
            Action::SetProperty {
                product,
                name,
                value,
            } => self.with_form(&product, |form| Ok(form.set_property(name, &value))),
            Action::SubmitProduct { product } => {
                let request = match self.form(&product) {
                    Some(form) => form.submission()?,
                    None => return Ok(Outcome::Ignored),
                };
                self.send_add(request.variant_id, request.quantity, request.properties)
                    .await
                    .map(Outcome::Added)
            }
            Action::StepLine { key, delta } => {
                let plan = self.cart.borrow_mut().begin_update(&key, delta)?;
                self.send_edit(plan).await.map(Outcome::Edited)
            }
            Action::SetLineQuantity { key, raw } => {
                let quantity = self.config.limits().parse_input(&raw)?;
                let plan = self.cart.borrow_mut().begin_set_quantity(&key, quantity)?;
                self.send_edit(plan).await.map(Outcome::Edited)
            }
            Action::RemoveLine { key } => {
                let plan = self.cart.borrow_mut().begin_remove(&key)?;
                self.send_edit(plan).await.map(Outcome::Edited)
            }
            Action::SelectImage { product, index } => {
                let mut galleries = self.galleries.borrow_mut();
                Ok(galleries
                    .get_mut(&product)
                    .and_then(|gallery| gallery.select(index))
                    .map(|src| Outcome::ImageShown(src.to_string()))
                    .unwrap_or(Outcome::Ignored))
            }
            Action::OpenModal { modal, trigger } => {
                self.modals.borrow_mut().open(&modal, Some(trigger))?;
                Ok(Outcome::ModalOpened(modal))
            }
            Action::CloseModal { modal } => {
                let focus = self.modals.borrow_mut().close(&modal)?;
                Ok(Outcome::ModalClosed { modal, focus })
            }
            Action::CloseTopModal => Ok(match self.modals.borrow_mut().close_top() {
                Some((modal, focus)) => Outcome::ModalClosed { modal, focus },
                None => Outcome::Ignored,
            }),
        }
    }

    fn with_form(
        &self,
        product: &ProductId,
        f: impl FnOnce(&mut ProductForm) -> Result<ProductDisplay, ThemeError>,
    ) -> Result<Outcome, ThemeError> {
        let mut forms = self.forms.borrow_mut();
        match forms.get_mut(product) {
            Some(form) => f(form).map(Outcome::Product),
            None => Ok(Outcome::Ignored),
        }
    }

    fn select_option(&self, product: &ProductId, index: usize, value: String) -> Result<Outcome, ThemeError> {
        let outcome = self.with_form(product, |form| {
            form.select_option(index, value).map_err(ThemeError::from)
        })?;

        let forms = self.forms.borrow();
        let resolved = forms.get(product).and_then(|form| form.resolved());
        if let (Some(variant), Some(gallery)) =
            (resolved, self.galleries.borrow_mut().get_mut(product))
        {
            gallery.show_variant(variant);
        }
        Ok(outcome)
    }

    // --- cart operations ------------------------------------------------

    /// Add a variant to the cart. Rejected before any request when it
    /// would pass a quantity ceiling.
    pub async fn add_to_cart(
        &self,
        variant_id: VariantId,
        quantity: i64,
        properties: LineProperties,
    ) -> Result<CartAggregate, ThemeError> {
        self.send_add(variant_id, quantity, properties)
            .await
            .inspect_err(|err| self.notifier.error(err))
    }

    /// Change a line's quantity by `delta`.
    pub async fn update_quantity(&self, key: &ItemKey, delta: i64) -> Result<EditOutcome, ThemeError> {
        let begun = self.cart.borrow_mut().begin_update(key, delta);
        self.run_edit(begun).await
    }

    /// Set a line to an absolute quantity; zero or less removes it.
    pub async fn set_quantity(&self, key: &ItemKey, quantity: i64) -> Result<EditOutcome, ThemeError> {
        let begun = self.cart.borrow_mut().begin_set_quantity(key, quantity);
        self.run_edit(begun).await
    }

    /// Remove a line.
    pub async fn remove_item(&self, key: &ItemKey) -> Result<EditOutcome, ThemeError> {
        let begun = self.cart.borrow_mut().begin_remove(key);
        self.run_edit(begun).await
    }

    async fn run_edit(&self, begun: Result<EditPlan, ThemeError>) -> Result<EditOutcome, ThemeError> {
        let result = match begun {
            Ok(plan) => self.send_edit(plan).await,
            Err(err) => Err(err),
        };
        result.inspect_err(|err| self.notifier.error(err))
    }

    async fn send_add(
        &self,
        variant_id: VariantId,
        quantity: i64,
        properties: LineProperties,
    ) -> Result<CartAggregate, ThemeError> {
        let plan = self
            .cart
            .borrow_mut()
            .begin_add(variant_id, quantity, properties)?;
        let result = plan.send(&self.client).await;
        let aggregate = self.cart.borrow_mut().finish_add(&plan, result)?;
        self.notifier
            .announce("Item added to your cart", Politeness::Polite);
        Ok(aggregate)
    }

    async fn send_edit(&self, plan: EditPlan) -> Result<EditOutcome, ThemeError> {
        let _turn = self.wire.lock().await;
        let request = match self.dispatch(&plan) {
            Dispatch::Send(request) => request,
            Dispatch::Busy | Dispatch::Superseded => return Ok(EditOutcome::Superseded),
        };
        let result = request.send(&self.client).await;
        self.cart.borrow_mut().finish_edit(&plan, result)
    }

    fn dispatch(&self, plan: &EditPlan) -> Dispatch {
        let mut cart = self.cart.borrow_mut();
        match cart.dispatch(plan) {
            // The last holder of the wire was dropped before its answer.
            Dispatch::Busy => {
                cart.abandon_in_flight();
                cart.dispatch(plan)
            }
            other => other,
        }
    }

    /// Reconcile the newest cart the service published, if any arrived
    /// since the last call. Older queued snapshots are skipped.
    pub fn pump_events(&self) -> bool {
        let latest = match self.events.borrow_mut().as_mut() {
            Some(events) => events.drain_latest(),
            None => None,
        };
        match latest {
            Some(event) => {
                self.cart.borrow_mut().reconcile(event.into_snapshot());
                true
            }
            None => false,
        }
    }

    /// Apply an authoritative cart delivered by other means.
    pub fn reconcile(&self, snapshot: CartSnapshot) {
        self.cart.borrow_mut().reconcile(snapshot);
    }

    // --- preferences ----------------------------------------------------

    /// Store and apply new preferences.
    pub fn set_preferences(&self, preferences: ThemePreferences) {
        if !preferences.save(&self.prefs) {
            self.logger.warn("preferences could not be stored");
        }
        self.notifier.set_enabled(preferences.notifications_enabled);

        let format = display_format(&self.config, &preferences);
        {
            let mut cart = self.cart.borrow_mut();
            cart.set_reduced_motion(preferences.reduced_motion);
            if cart.options().format != format {
                cart.set_format(format.clone());
            }
        }
        for form in self.forms.borrow_mut().values_mut() {
            form.set_format(format.clone());
        }
        *self.preferences.borrow_mut() = preferences;
    }

    /// Hand an error that escaped the typed paths to the global handler.
    pub fn capture(&self, error: anyhow::Error) -> ThemeError {
        self.errors.capture(error)
    }

    /// Open a modal programmatically (no trigger to return focus to).
    pub fn open_modal(&self, modal: &ModalId) -> Result<(), ModalError> {
        self.modals.borrow_mut().open(modal, None)
    }
}
