//! In-memory cart surface.

use std::collections::HashMap;
use std::fmt;

use theme_commerce::ids::ItemKey;

use crate::surface::{CartSurface, RenderedLine};

/// Handle of an element in a `MemoryCartSurface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// An image element. Its id changes only if the element is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageElement {
    pub id: NodeId,
    pub src: Option<String>,
}

/// A rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNode {
    pub key: ItemKey,
    pub title: String,
    pub quantity: i64,
    pub line_price: String,
    pub image: ImageElement,
    pub removing: bool,
    pub animated_removal: bool,
}

/// Cart drawer held in memory: an arena of line nodes plus the attached
/// child order, the badge and the subtotal.
#[derive(Debug, Default)]
pub struct MemoryCartSurface {
    nodes: HashMap<NodeId, LineNode>,
    children: Vec<NodeId>,
    next_id: u64,
    images_created: usize,
    item_count: i64,
    subtotal: String,
    open: bool,
    open_count: usize,
}

impl MemoryCartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    /// Attached keys in on-screen order.
    pub fn keys_in_order(&self) -> Vec<ItemKey> {
        self.children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|node| node.key.clone())
            .collect()
    }

    /// The attached line for a key.
    pub fn line(&self, key: &ItemKey) -> Option<&LineNode> {
        self.children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .find(|node| &node.key == key)
    }

    /// Displayed quantity for a key.
    pub fn quantity_of(&self, key: &ItemKey) -> Option<i64> {
        self.line(key).map(|line| line.quantity)
    }

    /// Number of image elements ever built.
    pub fn images_created(&self) -> usize {
        self.images_created
    }

    /// Badge count.
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    /// Subtotal text.
    pub fn subtotal(&self) -> &str {
        &self.subtotal
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// How many times the cart was revealed.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// Close the drawer (the shopper dismissed it).
    pub fn close(&mut self) {
        self.open = false;
    }
}

impl CartSurface for MemoryCartSurface {
    type Node = NodeId;

    fn line_nodes(&self) -> Vec<(ItemKey, NodeId)> {
        self.children
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|node| (node.key.clone(), *id)))
            .collect()
    }

    fn create_line(&mut self, line: &RenderedLine) -> NodeId {
        let id = self.allocate();
        let image_id = self.allocate();
        self.images_created += 1;
        self.nodes.insert(
            id,
            LineNode {
                key: line.key.clone(),
                title: line.title.clone(),
                quantity: line.quantity,
                line_price: line.line_price.clone(),
                image: ImageElement {
                    id: image_id,
                    src: line.image.clone(),
                },
                removing: false,
                animated_removal: false,
            },
        );
        self.children.push(id);
        id
    }

    fn refresh_line(&mut self, node: &NodeId, line: &RenderedLine) {
        if let Some(existing) = self.nodes.get_mut(node) {
            existing.title = line.title.clone();
            existing.quantity = line.quantity;
            existing.line_price = line.line_price.clone();
        }
    }

    fn remove_line(&mut self, node: &NodeId) {
        self.children.retain(|id| id != node);
        self.nodes.remove(node);
    }

    fn detach_line(&mut self, node: &NodeId) {
        self.children.retain(|id| id != node);
    }

    fn append_line(&mut self, node: &NodeId) {
        if self.nodes.contains_key(node) && !self.children.contains(node) {
            self.children.push(*node);
        }
    }

    fn set_line_quantity(&mut self, node: &NodeId, quantity: i64, line_price: &str) {
        if let Some(existing) = self.nodes.get_mut(node) {
            existing.quantity = quantity;
            existing.line_price = line_price.to_string();
        }
    }

    fn set_line_removing(&mut self, node: &NodeId, removing: bool, animate: bool) {
        if let Some(existing) = self.nodes.get_mut(node) {
            existing.removing = removing;
            existing.animated_removal = removing && animate;
        }
    }

    fn set_totals(&mut self, item_count: i64, subtotal: &str) {
        self.item_count = item_count;
        self.subtotal = subtotal.to_string();
    }

    fn open_cart(&mut self) {
        self.open = true;
        self.open_count += 1;
    }
}
