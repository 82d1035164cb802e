//! # Ordering Index
//!
//! Per-category ranked views over direct child products and direct child
//! categories.
//!
//! ## Ranking Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Views are sorted ASCENDING, the maximum sits at the end (top).        │
//! │                                                                         │
//! │  Products:    (discount ↑, then product id ↓)                          │
//! │               [p12:0.0] [p11:5.0] [p14:20.0] [p10:20.0]  ← top = p10   │
//! │                                                                         │
//! │  Categories:  (best discount ↑, then best product id ↓)                │
//! │               an entry with no best product sorts below one that has   │
//! │               one; two entries without products fall back to their    │
//! │               own category ids                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rebuild, Never Patch
//! A view is always rebuilt from its category's id set and the current
//! values in the store. Entries are snapshots and are never updated in place.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::trace;

use crate::store::EntityStore;
use crate::types::{BestProduct, NodeId};

// =============================================================================
// Ranked Trait
// =============================================================================

/// An entry that knows its position relative to its siblings.
pub trait Ranked {
    /// Ascending comparison: `Greater` means `self` is closer to the top.
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

// =============================================================================
// Entries
// =============================================================================

/// Snapshot of a direct child product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChildProductEntry {
    pub product_id: NodeId,
    pub discount: f64,
}

impl ChildProductEntry {
    pub fn as_best(&self) -> BestProduct {
        BestProduct::new(self.product_id, self.discount)
    }
}

impl Ranked for ChildProductEntry {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        if self.product_id == other.product_id {
            return Ordering::Equal;
        }
        self.discount
            .total_cmp(&other.discount)
            .then_with(|| other.product_id.cmp(&self.product_id))
    }
}

/// Snapshot of a direct child category and its subtree's best product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChildCategoryEntry {
    pub category_id: NodeId,
    pub best: Option<BestProduct>,
}

impl ChildCategoryEntry {
    fn discount(&self) -> f64 {
        self.best.map(|b| b.discount).unwrap_or(0.0)
    }
}

impl Ranked for ChildCategoryEntry {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        if self.category_id == other.category_id {
            return Ordering::Equal;
        }
        match self.discount().total_cmp(&other.discount()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match (self.best, other.best) {
            (Some(a), Some(b)) => b.product_id.cmp(&a.product_id),
            // Neither subtree holds a product; ordering only keeps output stable.
            (None, None) => self.category_id.cmp(&other.category_id),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
        }
    }
}

// =============================================================================
// Ranked View
// =============================================================================

/// A sorted, rebuild-only collection of sibling entries.
#[derive(Debug, Clone)]
pub struct RankedView<T> {
    entries: Vec<T>,
}

impl<T> Default for RankedView<T> {
    fn default() -> Self {
        RankedView {
            entries: Vec::new(),
        }
    }
}

impl<T: Ranked> RankedView<T> {
    /// Builds a view from unsorted entries.
    pub fn from_entries(mut entries: Vec<T>) -> Self {
        entries.sort_by(|a, b| a.rank_cmp(b));
        RankedView { entries }
    }

    /// The maximum entry.
    pub fn top(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from the top down.
    pub fn iter_best_first(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }
}

/// View over a category's direct child products.
pub type ProductView = RankedView<ChildProductEntry>;

/// View over a category's direct child categories.
pub type CategoryView = RankedView<ChildCategoryEntry>;

impl ProductView {
    /// Best direct product, if the category has any.
    pub fn candidate(&self) -> Option<BestProduct> {
        self.top().map(ChildProductEntry::as_best)
    }
}

impl CategoryView {
    /// Best product reachable through a child category.
    ///
    /// Child categories without any product never qualify, even if one of
    /// them sits at the top because all siblings are empty.
    pub fn candidate(&self) -> Option<BestProduct> {
        self.top().and_then(|entry| entry.best)
    }
}

// =============================================================================
// Rebuild
// =============================================================================

/// Rebuilds `category_id`'s product view from its id set.
///
/// Does nothing if the category does not exist.
pub(crate) fn rebuild_product_view(store: &mut EntityStore, category_id: NodeId) {
    let Some(category) = store.category(category_id) else {
        return;
    };
    let entries: Vec<ChildProductEntry> = category
        .child_product_ids
        .iter()
        .filter_map(|id| store.product(*id))
        .map(|p| p.as_child_entry())
        .collect();

    trace!(category_id = %category_id, count = entries.len(), "Rebuilding product view");
    if let Some(category) = store.category_mut(category_id) {
        category.child_products = ProductView::from_entries(entries);
    }
}

/// Rebuilds `category_id`'s child-category view from its id set.
pub(crate) fn rebuild_category_view(store: &mut EntityStore, category_id: NodeId) {
    let Some(category) = store.category(category_id) else {
        return;
    };
    let entries: Vec<ChildCategoryEntry> = category
        .child_category_ids
        .iter()
        .filter_map(|id| store.category(*id))
        .map(|c| c.as_child_entry())
        .collect();

    trace!(category_id = %category_id, count = entries.len(), "Rebuilding category view");
    if let Some(category) = store.category_mut(category_id) {
        category.child_categories = CategoryView::from_entries(entries);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
