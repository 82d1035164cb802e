//! # Aggregate Propagator
//!
//! Recomputes a category's cached best product and walks the change up to
//! the root.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recompute(category)                                                   │
//! │                                                                         │
//! │  1. previous = cached best, dropped if the product no longer exists,   │
//! │     otherwise refreshed to the product's current discount              │
//! │  2. candidate = top(child products) vs top(child categories)           │
//! │  3. merged = previous vs candidate  (larger discount, tie → smaller id)│
//! │  4. store merged if it differs                                         │
//! │                                                                         │
//! │  propagate_from(c)                                                     │
//! │                                                                         │
//! │     c ──recompute──► rebuild parent's category view ──► parent ──► …   │
//! │                                                          until root    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation path ends in [`propagate_from`]. The upward walk is a
//! loop over parent ids, not recursion.

use std::collections::BTreeSet;

use tracing::trace;

use crate::ordering::rebuild_category_view;
use crate::store::EntityStore;
use crate::types::{BestProduct, NodeId};

/// Recomputes the cached best product of one category.
///
/// Reads the category's views as they are; callers rebuild views of the
/// level below first. Returns true if the cached value changed.
pub(crate) fn recompute(store: &mut EntityStore, category_id: NodeId) -> bool {
    let Some(category) = store.category(category_id) else {
        return false;
    };
    let cached = category.best;

    // Step 1: the cached product may have been deleted or re-discounted.
    let previous = cached.and_then(|best| store.product(best.product_id).map(|p| p.as_best()));

    // Step 2
    let candidate = match (
        category.child_products.candidate(),
        category.child_categories.candidate(),
    ) {
        (Some(product), Some(nested)) => Some(if nested.beats(&product) {
            nested
        } else {
            product
        }),
        (product, nested) => product.or(nested),
    };

    // Step 3
    let merged = match (previous, candidate) {
        (None, candidate) => candidate,
        (Some(previous), None) => Some(previous),
        (Some(previous), Some(candidate)) => Some(if candidate.beats(&previous) {
            candidate
        } else {
            previous
        }),
    };

    // Step 4
    if same_best(cached, merged) {
        return false;
    }

    trace!(
        category_id = %category_id,
        before = ?cached.map(|b| b.product_id),
        after = ?merged.map(|b| b.product_id),
        "Best product changed"
    );
    if let Some(category) = store.category_mut(category_id) {
        category.best = merged;
    }
    true
}

/// Recomputes `start` and every ancestor up to the root.
///
/// Before moving up a level the parent's child-category view is rebuilt so
/// the parent sees this category's fresh aggregate.
pub(crate) fn propagate_from(store: &mut EntityStore, start: NodeId) {
    let mut current = Some(start);
    let mut levels = 0usize;

    while let Some(category_id) = current {
        recompute(store, category_id);
        let parent = store.category(category_id).and_then(|c| c.parent);
        if let Some(parent_id) = parent {
            rebuild_category_view(store, parent_id);
        }
        levels += 1;
        current = parent;
    }

    trace!(start = %start, levels, "Propagation finished");
}

/// Clears the cached best product of `from` and its ancestors wherever it
/// points into `removed`.
///
/// Used before a product or subtree leaves a branch, so the following
/// propagation re-derives those aggregates from the remaining children.
pub(crate) fn clear_ancestor_references(
    store: &mut EntityStore,
    from: NodeId,
    removed: &BTreeSet<NodeId>,
) {
    if removed.is_empty() {
        return;
    }

    let mut current = Some(from);
    while let Some(category_id) = current {
        let Some(category) = store.category_mut(category_id) else {
            break;
        };
        if category
            .best
            .is_some_and(|best| removed.contains(&best.product_id))
        {
            trace!(category_id = %category_id, "Clearing stale best product");
            category.best = None;
        }
        current = category.parent;
    }
}

fn same_best(a: Option<BestProduct>, b: Option<BestProduct>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.product_id == b.product_id && a.discount.to_bits() == b.discount.to_bits()
        }
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
