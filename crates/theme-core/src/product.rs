//! Product form: option selection, quantity stepper and submission.

use theme_client::{AddItemRequest, LineProperties};
use theme_commerce::cart::QuantityLimits;
use theme_commerce::catalog::{EmbeddedVariants, SelectionState, Variant};
use theme_commerce::error::{CartError, FormError, ThemeError};
use theme_commerce::ids::{ProductId, VariantId};
use theme_commerce::money::MoneyFormat;

/// Label of the add-to-cart button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    AddToCart,
    SoldOut,
    /// The selected combination does not exist.
    Unavailable,
}

impl ButtonState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddToCart => "Add to cart",
            Self::SoldOut => "Sold out",
            Self::Unavailable => "Unavailable",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::AddToCart)
    }
}

/// What the product form shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDisplay {
    pub variant_id: Option<VariantId>,
    /// Formatted unit price of the resolved variant.
    pub unit_price: Option<String>,
    /// Formatted compare-at price, when the variant is on sale.
    pub compare_at_price: Option<String>,
    /// Unit price times the chosen quantity.
    pub line_total: Option<String>,
    pub quantity: i64,
    pub button: ButtonState,
}

/// One product's add-to-cart form.
#[derive(Debug)]
pub struct ProductForm {
    product_id: ProductId,
    variants: EmbeddedVariants,
    selection: SelectionState,
    quantity: i64,
    limits: QuantityLimits,
    format: MoneyFormat,
    properties: LineProperties,
}

impl ProductForm {
    /// Build the form. The selection starts at the product's initial
    /// variant; malformed product data leaves it empty, so nothing resolves.
    pub fn new(
        product_id: impl Into<ProductId>,
        variants: EmbeddedVariants,
        limits: QuantityLimits,
        format: MoneyFormat,
    ) -> Self {
        let selection = variants
            .product()
            .and_then(|product| product.initial_variant())
            .map(SelectionState::from_variant)
            .unwrap_or_else(|| SelectionState::new(Vec::new()));
        Self {
            product_id: product_id.into(),
            variants,
            selection,
            quantity: 1,
            limits,
            format,
            properties: LineProperties::new(),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Gallery images of the product; empty for malformed data.
    pub fn images(&self) -> Vec<String> {
        self.variants
            .product()
            .map(|product| product.images.clone())
            .unwrap_or_default()
    }

    /// The variant the current selection names.
    pub fn resolved(&self) -> Option<&Variant> {
        self.variants.resolve(&self.selection)
    }

    /// Choose an option value (1-based option index).
    pub fn select_option(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<ProductDisplay, FormError> {
        self.selection.select(index, value)?;
        Ok(self.display())
    }

    /// Change the quantity by `delta`, clamped to 1..=per-item ceiling.
    pub fn step_quantity(&mut self, delta: i64) -> ProductDisplay {
        self.quantity = self.clamp(self.quantity.saturating_add(delta));
        self.display()
    }

    /// Set the quantity from the input field. Zero is raised to one and
    /// values above the per-item ceiling are lowered to it.
    pub fn set_quantity_input(&mut self, raw: &str) -> Result<ProductDisplay, CartError> {
        let parsed = self.limits.parse_input(raw)?;
        self.quantity = self.clamp(parsed);
        Ok(self.display())
    }

    fn clamp(&self, quantity: i64) -> i64 {
        quantity.clamp(1, self.limits.max_item_quantity.max(1))
    }

    /// Attach a line property (engraving, gift note, ...). A blank value
    /// drops the property.
    pub fn set_property(&mut self, name: impl Into<String>, value: &str) -> ProductDisplay {
        let name = name.into();
        let value = value.trim();
        if value.is_empty() {
            self.properties.remove(&name);
        } else {
            self.properties.insert(name, value.into());
        }
        self.display()
    }

    pub fn set_format(&mut self, format: MoneyFormat) {
        self.format = format;
    }

    pub fn display(&self) -> ProductDisplay {
        match self.resolved() {
            Some(variant) => ProductDisplay {
                variant_id: Some(variant.id.clone()),
                unit_price: Some(self.format.format(variant.price_cents)),
                compare_at_price: variant
                    .compare_at_price_cents
                    .filter(|_| variant.is_on_sale())
                    .map(|cents| self.format.format(cents)),
                line_total: Some(
                    self.format
                        .format(variant.price_cents.saturating_mul(self.quantity)),
                ),
                quantity: self.quantity,
                button: if variant.available {
                    ButtonState::AddToCart
                } else {
                    ButtonState::SoldOut
                },
            },
            None => ProductDisplay {
                variant_id: None,
                unit_price: None,
                compare_at_price: None,
                line_total: None,
                quantity: self.quantity,
                button: ButtonState::Unavailable,
            },
        }
    }

    /// The add request for the current state. Fails before anything is
    /// sent when no variant resolves or the variant cannot be sold.
    pub fn submission(&self) -> Result<AddItemRequest, ThemeError> {
        let variant = self.resolved().ok_or(CartError::VariantNotFound)?;
        if !variant.available {
            return Err(CartError::ItemUnavailable(Some(variant.id.clone())).into());
        }
        let mut request = AddItemRequest::new(variant.id.clone(), self.quantity);
        request.properties = self.properties.clone();
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT: &str = r#"{
        "id": 1, "title": "Tee", "options": ["Size", "Color"],
        "images": ["small.jpg", "large.jpg"],
        "variants": [
            {"id": 11, "options": ["Small", "Red"], "price": 2000, "available": true},
            {"id": 12, "options": ["Large", "Red"], "price": 3000, "compare_at_price": 3500,
             "available": true, "featured_image": {"src": "large.jpg"}},
            {"id": 13, "options": ["Large", "Blue"], "price": 3000, "available": false}
        ]
    }"#;

    fn form() -> ProductForm {
        ProductForm::new(
            "1",
            EmbeddedVariants::new(PRODUCT),
            QuantityLimits::default(),
            MoneyFormat::default(),
        )
    }

    #[test]
    fn test_initial_display() {
        let display = form().display();
        assert_eq!(display.variant_id, Some(VariantId::new("11")));
        assert_eq!(display.unit_price.as_deref(), Some("$20.00"));
        assert_eq!(display.button, ButtonState::AddToCart);
    }

    #[test]
    fn test_select_large_then_increment() {
        let mut form = form();
        let display = form.select_option(1, "Large").unwrap();
        assert_eq!(display.unit_price.as_deref(), Some("$30.00"));
        assert_eq!(display.compare_at_price.as_deref(), Some("$35.00"));

        let display = form.step_quantity(1);
        assert_eq!(display.quantity, 2);
        assert_eq!(display.line_total.as_deref(), Some("$60.00"));

        let request = form.submission().unwrap();
        assert_eq!(request.variant_id, VariantId::new("12"));
        assert_eq!(request.quantity, 2);
    }

    #[test]
    fn test_sold_out_variant() {
        let mut form = form();
        form.select_option(1, "Large").unwrap();
        let display = form.select_option(2, "Blue").unwrap();
        assert_eq!(display.button, ButtonState::SoldOut);
        assert_eq!(
            form.submission(),
            Err(ThemeError::Cart(CartError::ItemUnavailable(Some(
                VariantId::new("13")
            ))))
        );
    }

    #[test]
    fn test_missing_combination() {
        let mut form = form();
        let display = form.select_option(2, "Blue").unwrap();
        assert_eq!(display.button, ButtonState::Unavailable);
        assert!(!display.button.is_enabled());
        assert_eq!(display.unit_price, None);
        assert_eq!(
            form.submission(),
            Err(ThemeError::Cart(CartError::VariantNotFound))
        );
    }

    #[test]
    fn test_quantity_is_clamped() {
        let mut form = form();
        assert_eq!(form.step_quantity(-5).quantity, 1);
        assert_eq!(form.set_quantity_input("40").unwrap().quantity, 10);
        assert_eq!(form.set_quantity_input("0").unwrap().quantity, 1);
        assert!(form.set_quantity_input("abc").is_err());
        assert_eq!(form.quantity(), 1);
    }

    #[test]
    fn test_bad_option_index() {
        let mut form = form();
        assert!(form.select_option(3, "Cotton").is_err());
    }

    #[test]
    fn test_malformed_product_fails_closed() {
        let form = ProductForm::new(
            "1",
            EmbeddedVariants::new("{oops"),
            QuantityLimits::default(),
            MoneyFormat::default(),
        );
        assert!(form.resolved().is_none());
        assert!(form.images().is_empty());
        assert_eq!(
            form.submission(),
            Err(ThemeError::Cart(CartError::VariantNotFound))
        );
    }

    #[test]
    fn test_properties_are_submitted() {
        let mut form = form();
        form.set_property("Engraving", " JS ");
        form.set_property("Gift note", "Happy birthday");
        form.set_property("Gift note", "");
        let request = form.submission().unwrap();
        assert_eq!(request.properties["Engraving"], "JS");
        assert!(!request.properties.contains_key("Gift note"));
    }
}
