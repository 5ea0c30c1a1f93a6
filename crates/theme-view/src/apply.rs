//! Applying a diff to a surface.

use std::collections::HashMap;

use theme_commerce::cart::LineItem;
use theme_commerce::money::MoneyFormat;

use crate::diff::diff;
use crate::surface::{CartSurface, RenderedLine};

/// Counts of what a reconcile pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub removed: usize,
    pub updated: usize,
    pub created: usize,
    /// Whether nodes had to be re-ordered.
    pub reordered: bool,
}

/// Make `surface` show `incoming`, in `incoming` order.
///
/// Existing nodes are refreshed in place (title, quantity, line price) and
/// keep their images. New nodes are created. When the resulting on-screen
/// order differs from `incoming`, every line node is detached and
/// re-appended in order.
pub fn apply_snapshot<S: CartSurface>(
    surface: &mut S,
    incoming: &[LineItem],
    format: &MoneyFormat,
) -> ApplyReport {
    let plan = diff(&surface.line_nodes(), incoming);
    let mut report = ApplyReport {
        removed: plan.to_remove.len(),
        updated: plan.to_update.len(),
        created: plan.to_create.len(),
        reordered: false,
    };

    for (_, node) in &plan.to_remove {
        surface.remove_line(node);
    }

    let mut placed = HashMap::new();
    for (node, item) in &plan.to_update {
        surface.refresh_line(node, &RenderedLine::from_item(item, format));
        surface.set_line_removing(node, false, false);
        placed.insert(item.key.clone(), node.clone());
    }

    for item in &plan.to_create {
        let node = surface.create_line(&RenderedLine::from_item(item, format));
        placed.insert(item.key.clone(), node);
    }

    let current: Vec<_> = surface.line_nodes().into_iter().map(|(key, _)| key).collect();
    let mut wanted = Vec::with_capacity(placed.len());
    for item in incoming {
        if !wanted.contains(&item.key) {
            wanted.push(item.key.clone());
        }
    }

    if current != wanted {
        let ordered: Vec<_> = wanted.iter().filter_map(|key| placed.get(key)).collect();
        for node in &ordered {
            surface.detach_line(node);
        }
        for node in &ordered {
            surface.append_line(node);
        }
        report.reordered = true;
    }

    tracing::trace!(
        removed = report.removed,
        updated = report.updated,
        created = report.created,
        reordered = report.reordered,
        "cart view reconciled"
    );

    report
}
