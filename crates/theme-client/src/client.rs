//! The cart service contract.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use theme_commerce::cart::CartSnapshot;
use theme_commerce::error::{ApiError, CartError, ThemeError};
use theme_commerce::ids::VariantId;

use crate::dependency::DependencyTag;
use crate::events::CartEvents;

/// Error type for cart service calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {status} for {endpoint}")]
    Http {
        status: u16,
        endpoint: String,
        description: Option<String>,
    },

    #[error("Timeout: {dependency} after {after:?}")]
    Timeout {
        dependency: DependencyTag,
        after: Duration,
    },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cart service never became ready")]
    NotReady,
}

impl ClientError {
    /// Shorthand for an HTTP failure.
    pub fn http(status: u16, endpoint: impl Into<String>) -> Self {
        Self::Http {
            status,
            endpoint: endpoint.into(),
            description: None,
        }
    }

    /// Classify into the storefront taxonomy.
    ///
    /// `variant` is the variant the failed call was about, when known.
    pub fn classify(&self, variant: Option<&VariantId>) -> ThemeError {
        match self {
            Self::Http { status: 404, .. } => CartError::VariantNotFound.into(),
            Self::Http { status: 422, .. } => CartError::ItemUnavailable(variant.cloned()).into(),
            Self::Http {
                status,
                endpoint,
                description,
            } => CartError::Network(match description {
                Some(description) => format!("{} ({} {})", description, status, endpoint),
                None => format!("{} {}", status, endpoint),
            })
            .into(),
            Self::Timeout { dependency, after } => CartError::DependencyTimeout {
                dependency: dependency.name().to_string(),
                after_ms: after.as_millis() as u64,
            }
            .into(),
            Self::Connection(message) => CartError::Network(message.clone()).into(),
            Self::Deserialization(message) => ApiError::Decode(message.clone()).into(),
            Self::NotReady => ApiError::Unavailable("cart".to_string()).into(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Deserialization(e.to_string())
    }
}

/// Custom line properties sent with an add.
pub type LineProperties = BTreeMap<String, serde_json::Value>;

/// Add a variant to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "id")]
    pub variant_id: VariantId,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: LineProperties,
}

impl AddItemRequest {
    pub fn new(variant_id: VariantId, quantity: i64) -> Self {
        Self {
            variant_id,
            quantity,
            properties: LineProperties::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Change the quantity of a cart line, addressed by 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    pub line: usize,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<LineProperties>,
}

impl UpdateItemRequest {
    pub fn new(line: usize, quantity: i64) -> Self {
        Self {
            line,
            quantity,
            properties: None,
        }
    }
}

/// The cart service.
///
/// Every mutation answers with the full authoritative cart. Implementations
/// also publish each answer on their event bus as `RequestComplete`.
/// Calls run on the page's single event loop, so futures are not `Send`.
#[async_trait(?Send)]
pub trait CartClient {
    /// Wait for the service to be usable, seeded with the cart rendered
    /// into the page. Answers with the current authoritative cart.
    async fn init(&self, rendered: CartSnapshot) -> Result<CartSnapshot, ClientError>;

    async fn add_item(&self, request: &AddItemRequest) -> Result<CartSnapshot, ClientError>;

    async fn update_item(&self, request: &UpdateItemRequest) -> Result<CartSnapshot, ClientError>;

    async fn remove_item(&self, line: usize) -> Result<CartSnapshot, ClientError>;

    /// Subscribe to `Ready` / `RequestComplete` events.
    fn subscribe(&self) -> CartEvents;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        let variant = VariantId::new("7");
        assert_eq!(
            ClientError::http(404, "/cart/add.js").classify(Some(&variant)),
            ThemeError::Cart(CartError::VariantNotFound)
        );
        assert_eq!(
            ClientError::http(422, "/cart/add.js").classify(Some(&variant)),
            ThemeError::Cart(CartError::ItemUnavailable(Some(variant.clone())))
        );
        let server = ClientError::http(502, "/cart/change.js").classify(None);
        assert_eq!(server.code(), "NETWORK_ERROR");
        assert!(server.is_recoverable());
    }

    #[test]
    fn test_classify_timeout_is_recoverable() {
        let err = ClientError::Timeout {
            dependency: DependencyTag::Cart,
            after: Duration::from_millis(8000),
        }
        .classify(None);
        assert_eq!(
            err,
            ThemeError::Cart(CartError::DependencyTimeout {
                dependency: "cart".into(),
                after_ms: 8000
            })
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_classify_decode_failure() {
        let err = ClientError::Deserialization("eof".into()).classify(None);
        assert_eq!(err.code(), "API_DECODE");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_add_request_wire_shape() {
        let request = AddItemRequest::new(VariantId::new("42"), 2).with_property("Engraving", "AB");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["properties"]["Engraving"], "AB");
    }
}
