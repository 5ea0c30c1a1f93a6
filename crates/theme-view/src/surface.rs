//! The rendered cart, as seen by the differ and the reconciler.

use std::fmt::Debug;
use std::hash::Hash;

use theme_commerce::cart::LineItem;
use theme_commerce::ids::ItemKey;
use theme_commerce::money::MoneyFormat;

/// Display values for one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub key: ItemKey,
    pub title: String,
    pub quantity: i64,
    /// Formatted line price.
    pub line_price: String,
    pub image: Option<String>,
}

impl RenderedLine {
    pub fn from_item(item: &LineItem, format: &MoneyFormat) -> Self {
        Self {
            key: item.key.clone(),
            title: item.title.clone(),
            quantity: item.quantity,
            line_price: format.format(item.line_price()),
            image: item.image.clone(),
        }
    }
}

/// A rendered cart drawer or page.
///
/// `Node` is the surface's handle for one line element. Handles must stay
/// valid across `detach_line` / `append_line`.
pub trait CartSurface {
    type Node: Clone + Eq + Hash + Debug;

    /// Attached line nodes in on-screen order.
    fn line_nodes(&self) -> Vec<(ItemKey, Self::Node)>;

    /// Build a new line element, image included, and attach it at the end.
    fn create_line(&mut self, line: &RenderedLine) -> Self::Node;

    /// Refresh title, quantity and line price. Must not touch the image.
    fn refresh_line(&mut self, node: &Self::Node, line: &RenderedLine);

    /// Destroy a line element.
    fn remove_line(&mut self, node: &Self::Node);

    /// Take a line element out of the list without destroying it.
    fn detach_line(&mut self, node: &Self::Node);

    /// Put a detached line element back at the end of the list.
    fn append_line(&mut self, node: &Self::Node);

    /// Optimistic quantity display for one line.
    fn set_line_quantity(&mut self, node: &Self::Node, quantity: i64, line_price: &str);

    /// Show or clear the "being removed" state. `animate` selects the
    /// transition rather than an instant hide.
    fn set_line_removing(&mut self, node: &Self::Node, removing: bool, animate: bool);

    /// Badge count and subtotal.
    fn set_totals(&mut self, item_count: i64, subtotal: &str);

    /// Reveal the cart.
    fn open_cart(&mut self);

    /// Find the node for a key, if rendered.
    fn node_for(&self, key: &ItemKey) -> Option<Self::Node> {
        self.line_nodes()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, node)| node)
    }
}
