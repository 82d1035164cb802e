//! # Domain Types
//!
//! Core domain types of the catalog hierarchy.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐          ┌─────────────────────┐              │
//! │  │      Category       │          │       Product       │              │
//! │  │  ─────────────────  │          │  ─────────────────  │              │
//! │  │  id (NodeId)        │  owns    │  id (NodeId)        │              │
//! │  │  parent             │  ids of  │  category           │              │
//! │  │  child ids + views  │ ───────► │  original_price     │              │
//! │  │  best (cached)      │          │  selling_price      │              │
//! │  └─────────────────────┘          │  discount           │              │
//! │                                   └─────────────────────┘              │
//! │                                                                         │
//! │  One shared NodeId space: an id is a category OR a product, never both │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Arena Pattern
//! Categories and products never hold references to each other. Parents,
//! children, and the cached best product are all `NodeId`s resolved through
//! the [`EntityStore`](crate::store::EntityStore).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ordering::{CategoryView, ChildCategoryEntry, ChildProductEntry, ProductView};
use crate::pricing::Discount;

// =============================================================================
// Node Id
// =============================================================================

/// Identifier shared by categories and products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the raw identifier.
    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Node Kind
// =============================================================================

/// The two mutually exclusive kinds of node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Category,
    Product,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Category => write!(f, "category"),
            NodeKind::Product => write!(f, "product"),
        }
    }
}

// =============================================================================
// Best Product
// =============================================================================

/// A category's cached pointer to the most discounted product in its subtree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestProduct {
    pub product_id: NodeId,
    pub discount: f64,
}

impl BestProduct {
    pub fn new(product_id: NodeId, discount: f64) -> Self {
        BestProduct {
            product_id,
            discount,
        }
    }

    /// Returns true if `self` ranks above `other`.
    ///
    /// A strictly larger discount wins; on an exact tie the smaller product
    /// id wins.
    pub fn beats(&self, other: &BestProduct) -> bool {
        if self.discount > other.discount {
            return true;
        }
        if self.discount < other.discount {
            return false;
        }
        self.product_id < other.product_id
    }
}

// =============================================================================
// Category
// =============================================================================

/// A category node.
///
/// ## Invariants
/// - `child_category_ids` / `child_product_ids` are the source of truth for
///   membership; the ranked views are rebuilt from them, never patched
/// - `best` is `None` or a live product somewhere below this category
#[derive(Debug, Clone)]
pub struct Category {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child_category_ids: BTreeSet<NodeId>,
    pub(crate) child_product_ids: BTreeSet<NodeId>,
    pub(crate) child_categories: CategoryView,
    pub(crate) child_products: ProductView,
    pub(crate) best: Option<BestProduct>,
}

impl Category {
    /// Creates a detached, empty category.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Category {
            id,
            name: name.into(),
            parent: None,
            child_category_ids: BTreeSet::new(),
            child_product_ids: BTreeSet::new(),
            child_categories: CategoryView::default(),
            child_products: ProductView::default(),
            best: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent category, `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn child_category_ids(&self) -> &BTreeSet<NodeId> {
        &self.child_category_ids
    }

    pub fn child_product_ids(&self) -> &BTreeSet<NodeId> {
        &self.child_product_ids
    }

    /// Cached most discounted product of the subtree.
    pub fn best(&self) -> Option<BestProduct> {
        self.best
    }

    /// Direct child categories, most discounted first.
    pub fn ranked_child_categories(&self) -> impl Iterator<Item = &ChildCategoryEntry> {
        self.child_categories.iter_best_first()
    }

    /// Direct child products, most discounted first.
    pub fn ranked_child_products(&self) -> impl Iterator<Item = &ChildProductEntry> {
        self.child_products.iter_best_first()
    }

    /// Snapshot entry used in the parent's child-category view.
    pub(crate) fn as_child_entry(&self) -> ChildCategoryEntry {
        ChildCategoryEntry {
            category_id: self.id,
            best: self.best,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) original_price: f64,
    pub(crate) selling_price: f64,
    pub(crate) discount: f64,
    pub(crate) category: Option<NodeId>,
}

impl Product {
    /// Creates a detached product selling at its original price.
    pub fn new(id: NodeId, name: impl Into<String>, price: f64) -> Self {
        Product {
            id,
            name: name.into(),
            original_price: price,
            selling_price: price,
            discount: 0.0,
            category: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    pub fn selling_price(&self) -> f64 {
        self.selling_price
    }

    /// Absolute discount: original price minus selling price.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Owning category, `None` while detached.
    pub fn category(&self) -> Option<NodeId> {
        self.category
    }

    /// Applies an already validated discount to the selling price.
    pub(crate) fn apply(&mut self, discount: &Discount) {
        self.selling_price = discount.apply_to(self.selling_price);
        self.discount = self.original_price - self.selling_price;
    }

    pub(crate) fn as_child_entry(&self) -> ChildProductEntry {
        ChildProductEntry {
            product_id: self.id,
            discount: self.discount,
        }
    }

    pub(crate) fn as_best(&self) -> BestProduct {
        BestProduct::new(self.id, self.discount)
    }
}

// =============================================================================
// Node
// =============================================================================

/// Borrowed view of whichever kind of node an id resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Category(&'a Category),
    Product(&'a Product),
}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Category(c) => c.id,
            Node::Product(p) => p.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Category(_) => NodeKind::Category,
            Node::Product(_) => NodeKind::Product,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Node::Category(c) => &c.name,
            Node::Product(p) => &p.name,
        }
    }

    /// Parent category of either kind of node.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Category(c) => c.parent,
            Node::Product(p) => p.category,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::DiscountKind;

    #[test]
    fn test_best_product_ranking() {
        let a = BestProduct::new(NodeId(10), 20.0);
        let b = BestProduct::new(NodeId(11), 30.0);
        assert!(b.beats(&a));
        assert!(!a.beats(&b));

        // Equal discount: smaller id ranks higher
        let c = BestProduct::new(NodeId(5), 20.0);
        assert!(c.beats(&a));
        assert!(!a.beats(&c));
        assert!(!a.beats(&a));
    }

    #[test]
    fn test_product_apply_tracks_discount() {
        let mut product = Product::new(NodeId(10), "Kettle", 100.0);
        product.apply(&Discount::new(DiscountKind::Percentage, 20.0));
        assert!((product.selling_price() - 80.0).abs() < 1e-9);
        assert!((product.discount() - 20.0).abs() < 1e-9);

        product.apply(&Discount::new(DiscountKind::Flat, 30.0));
        assert!((product.selling_price() - 50.0).abs() < 1e-9);
        assert!((product.discount() - 50.0).abs() < 1e-9);
        assert_eq!(product.original_price(), 100.0);
    }

    #[test]
    fn test_node_kind_display() {
        assert_eq!(NodeKind::Category.to_string(), "category");
        assert_eq!(NodeKind::Product.to_string(), "product");
        assert_eq!(NodeId(42).to_string(), "42");
    }
}
