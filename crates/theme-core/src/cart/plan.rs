//! Requests the reconciler has validated and is waiting to send.

use theme_client::{AddItemRequest, CartClient, ClientError, UpdateItemRequest};
use theme_commerce::cart::{CartSnapshot, EditToken};
use theme_commerce::ids::{ItemKey, VariantId};

/// An add that passed validation. Nothing is shown until it succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct AddPlan {
    pub request: AddItemRequest,
}

impl AddPlan {
    pub fn variant_id(&self) -> &VariantId {
        &self.request.variant_id
    }

    pub async fn send<C: CartClient + ?Sized>(&self, client: &C) -> Result<CartSnapshot, ClientError> {
        client.add_item(&self.request).await
    }
}

/// A quantity edit already applied to the display.
///
/// The plan carries no line number: lines shift as other edits land, so
/// the line is looked up when the request is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    pub token: EditToken,
    pub key: ItemKey,
    pub variant_id: VariantId,
    /// Last confirmed quantity when the edit began.
    pub previous_quantity: i64,
    /// Requested quantity; 0 removes the line.
    pub target_quantity: i64,
}

impl EditPlan {
    pub fn is_removal(&self) -> bool {
        self.target_quantity == 0
    }
}

/// A line change ready for the wire, addressed against the latest cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRequest {
    pub token: EditToken,
    pub key: ItemKey,
    /// 1-based line number at dispatch time.
    pub line: usize,
    /// 0 removes the line.
    pub quantity: i64,
}

impl LineRequest {
    pub async fn send<C: CartClient + ?Sized>(&self, client: &C) -> Result<CartSnapshot, ClientError> {
        if self.quantity == 0 {
            client.remove_item(self.line).await
        } else {
            client
                .update_item(&UpdateItemRequest::new(self.line, self.quantity))
                .await
        }
    }
}

/// What to do with an edit when its turn to send comes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Send(LineRequest),
    /// Another line change is on the wire; line numbers are not settled.
    Busy,
    /// A newer edit on the key, or the line's disappearance, made this one
    /// moot. Nothing needs sending.
    Superseded,
}

/// How a finished edit was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The answer was reconciled into the view.
    Applied,
    /// A later edit on the same line superseded this one. A successful
    /// answer still updates the authoritative cart; the newer edit's
    /// quantity stays displayed and is sent next.
    Superseded,
}
