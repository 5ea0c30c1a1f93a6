//! Storefront error taxonomy.
//!
//! Every error carries a machine code, a human message (its `Display`) and
//! declares whether retrying the same action could succeed.

use thiserror::Error;

use crate::ids::{ItemKey, ModalId, VariantId};

/// How loudly an error should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Input the shopper can correct.
    Warning,
    /// Something failed outside the shopper's control.
    Error,
}

/// Cart operation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Adding would push the cart past its cart-wide ceiling.
    #[error("You can only have {limit} items in your cart (requested {requested})")]
    QuantityLimit { requested: i64, limit: i64 },

    /// The variant cannot be sold.
    #[error("This item is no longer available")]
    ItemUnavailable(Option<VariantId>),

    /// No variant matches the selected options, or the id is unknown.
    #[error("That combination is unavailable")]
    VariantNotFound,

    /// The cart service did not answer in time.
    #[error("The cart took too long to respond ({dependency} after {after_ms}ms)")]
    DependencyTimeout { dependency: String, after_ms: u64 },

    /// Transport or server failure.
    #[error("Could not reach the cart: {0}")]
    Network(String),

    /// Quantity is zero, negative or unparsable.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A single line would exceed its per-item ceiling.
    #[error("You can only add {limit} of this item")]
    ItemLimitExceeded { key: ItemKey, limit: i64 },

    /// The item key is not in the cart view.
    #[error("Item is not in the cart: {0}")]
    ItemNotFound(ItemKey),
}

impl CartError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuantityLimit { .. } => "QUANTITY_LIMIT",
            Self::ItemUnavailable(_) => "ITEM_UNAVAILABLE",
            Self::VariantNotFound => "VARIANT_NOT_FOUND",
            Self::DependencyTimeout { .. } => "DEPENDENCY_TIMEOUT",
            Self::Network(_) => "NETWORK_ERROR",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::ItemLimitExceeded { .. } => "ITEM_LIMIT_EXCEEDED",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
        }
    }

    /// Whether retrying the identical action could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DependencyTimeout { .. } | Self::Network(_))
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::QuantityLimit { .. }
            | Self::InvalidQuantity(_)
            | Self::ItemLimitExceeded { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Form input failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FormError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "FORM_MISSING_FIELD",
            Self::InvalidValue { .. } => "FORM_INVALID_VALUE",
        }
    }
}

/// Modal dialog failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModalError {
    #[error("Modal not found: {0}")]
    NotFound(ModalId),

    #[error("Modal is not open: {0}")]
    NotOpen(ModalId),
}

impl ModalError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "MODAL_NOT_FOUND",
            Self::NotOpen(_) => "MODAL_NOT_OPEN",
        }
    }
}

/// Failures talking to storefront endpoints.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed with status {status}: {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Could not read response: {0}")]
    Decode(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Status { .. } => "API_STATUS",
            Self::Decode(_) => "API_DECODE",
            Self::Unavailable(_) => "API_UNAVAILABLE",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
            Self::Unavailable(_) => true,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Any error the storefront surfaces to the shopper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Modal(#[from] ModalError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Anything that escaped the typed paths.
    #[error("Something went wrong: {0}")]
    Unexpected(String),
}

impl ThemeError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cart(e) => e.code(),
            Self::Form(e) => e.code(),
            Self::Modal(e) => e.code(),
            Self::Api(e) => e.code(),
            Self::Unexpected(_) => "UNEXPECTED",
        }
    }

    /// Whether the shopper should be offered "try again".
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Cart(e) => e.is_recoverable(),
            Self::Api(e) => e.is_recoverable(),
            Self::Form(_) | Self::Modal(_) | Self::Unexpected(_) => false,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Cart(e) => e.severity(),
            Self::Form(_) => Severity::Warning,
            Self::Modal(_) | Self::Api(_) | Self::Unexpected(_) => Severity::Error,
        }
    }
}
