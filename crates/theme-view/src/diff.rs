//! Line-level diff between rendered nodes and incoming line items.

use std::collections::{HashMap, HashSet};

use theme_commerce::cart::LineItem;
use theme_commerce::ids::ItemKey;

/// What must change for the view to show `incoming`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartDiff<N> {
    /// Rendered nodes whose key is gone (or duplicated) in the view.
    pub to_remove: Vec<(ItemKey, N)>,
    /// Rendered nodes to refresh in place, paired with their new line.
    pub to_update: Vec<(N, LineItem)>,
    /// Lines with no rendered node.
    pub to_create: Vec<LineItem>,
}

impl<N> CartDiff<N> {
    /// Whether applying the diff changes membership.
    pub fn changes_membership(&self) -> bool {
        !self.to_remove.is_empty() || !self.to_create.is_empty()
    }

    /// Keys scheduled for removal.
    pub fn removed_keys(&self) -> HashSet<&ItemKey> {
        self.to_remove.iter().map(|(key, _)| key).collect()
    }
}

/// Compute the diff.
///
/// `existing` is the rendered list in on-screen order. Only the first node
/// per key is kept; later duplicates are scheduled for removal. Only the
/// first occurrence of a key in `incoming` counts.
pub fn diff<N: Clone>(existing: &[(ItemKey, N)], incoming: &[LineItem]) -> CartDiff<N> {
    let mut rendered: HashMap<&ItemKey, N> = HashMap::new();
    let mut to_remove = Vec::new();
    for (key, node) in existing {
        if rendered.contains_key(key) {
            to_remove.push((key.clone(), node.clone()));
        } else {
            rendered.insert(key, node.clone());
        }
    }

    let mut seen = HashSet::new();
    let mut to_update = Vec::new();
    let mut to_create = Vec::new();
    for item in incoming {
        if !seen.insert(&item.key) {
            continue;
        }
        match rendered.remove(&item.key) {
            Some(node) => to_update.push((node, item.clone())),
            None => to_create.push(item.clone()),
        }
    }

    // Whatever is still in `rendered` has no incoming line. Walk `existing`
    // so removal order is deterministic.
    for (key, node) in existing {
        if rendered.remove(key).is_some() {
            to_remove.push((key.clone(), node.clone()));
        }
    }

    CartDiff {
        to_remove,
        to_update,
        to_create,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, quantity: i64) -> LineItem {
        LineItem::new(key, "v", quantity, 1000, key.to_uppercase())
    }

    fn rendered(keys: &[&str]) -> Vec<(ItemKey, usize)> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (ItemKey::new(*k), i))
            .collect()
    }

    #[test]
    fn test_partition() {
        let existing = rendered(&["a", "b", "c"]);
        let incoming = vec![item("c", 1), item("d", 2), item("a", 5)];
        let result = diff(&existing, &incoming);

        assert_eq!(result.to_remove, vec![(ItemKey::new("b"), 1)]);
        assert_eq!(
            result
                .to_update
                .iter()
                .map(|(n, i)| (*n, i.key.as_str()))
                .collect::<Vec<_>>(),
            vec![(2, "c"), (0, "a")]
        );
        assert_eq!(result.to_create.len(), 1);
        assert_eq!(result.to_create[0].key.as_str(), "d");
    }

    #[test]
    fn test_empty_incoming_removes_everything() {
        let existing = rendered(&["a", "b"]);
        let result = diff(&existing, &[]);
        assert_eq!(result.to_remove.len(), 2);
        assert!(result.to_update.is_empty());
        assert!(result.to_create.is_empty());
    }

    #[test]
    fn test_same_list_is_pure_update() {
        let existing = rendered(&["a", "b"]);
        let result = diff(&existing, &[item("a", 1), item("b", 1)]);
        assert!(!result.changes_membership());
        assert_eq!(result.to_update.len(), 2);
    }

    #[test]
    fn test_duplicate_rendered_nodes_are_removed() {
        let existing = vec![(ItemKey::new("a"), 0), (ItemKey::new("a"), 1)];
        let result = diff(&existing, &[item("a", 1)]);
        assert_eq!(result.to_remove, vec![(ItemKey::new("a"), 1)]);
        assert_eq!(result.to_update.len(), 1);
        assert_eq!(result.to_update[0].0, 0);
    }
}
