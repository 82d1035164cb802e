//! # Entity Store
//!
//! Owns every category and product record, keyed by one shared id space.
//!
//! ## Store Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         EntityStore                                     │
//! │                                                                         │
//! │   categories: HashMap<NodeId, Category>                                │
//! │   products:   HashMap<NodeId, Product>                                 │
//! │                                                                         │
//! │   create_category(7, ..)  ──► 7 free in BOTH maps? ──► insert          │
//! │   create_product(7, ..)   ──► 7 is a category      ──► DuplicateId     │
//! │                                                                         │
//! │   The store knows nothing about parents or aggregates; it only         │
//! │   guarantees that one id names at most one node.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::types::{Category, Node, NodeId, NodeKind, Product};
use crate::validation::is_valid_price;

/// Arena holding all nodes of one catalog.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    categories: HashMap<NodeId, Category>,
    products: HashMap<NodeId, Product>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates a detached category.
    ///
    /// ## Errors
    /// `DuplicateId` if `id` already names a category or a product.
    pub fn create_category(&mut self, id: NodeId, name: &str) -> CatalogResult<&Category> {
        self.ensure_free(id)?;
        debug!(id = %id, name = %name, "Category created");
        Ok(self
            .categories
            .entry(id)
            .or_insert_with(|| Category::new(id, name)))
    }

    /// Creates a detached product selling at `price`.
    ///
    /// ## Errors
    /// - `DuplicateId` if `id` already names a category or a product
    /// - `InvalidPrice` if `price` is negative or not finite
    pub fn create_product(&mut self, id: NodeId, name: &str, price: f64) -> CatalogResult<&Product> {
        self.ensure_free(id)?;
        if !is_valid_price(price) {
            return Err(CatalogError::InvalidPrice { id, price });
        }
        debug!(id = %id, name = %name, price, "Product created");
        Ok(self
            .products
            .entry(id)
            .or_insert_with(|| Product::new(id, name, price)))
    }

    /// Fails with `DuplicateId` if `id` is taken by either kind.
    pub fn ensure_free(&self, id: NodeId) -> CatalogResult<()> {
        match self.kind_of(id) {
            Some(existing) => Err(CatalogError::DuplicateId { id, existing }),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Resolves `id` to whichever node it names.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        if let Some(category) = self.categories.get(&id) {
            return Some(Node::Category(category));
        }
        self.products.get(&id).map(Node::Product)
    }

    pub fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        if self.categories.contains_key(&id) {
            Some(NodeKind::Category)
        } else if self.products.contains_key(&id) {
            Some(NodeKind::Product)
        } else {
            None
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.kind_of(id).is_some()
    }

    pub fn category(&self, id: NodeId) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn product(&self, id: NodeId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub(crate) fn category_mut(&mut self, id: NodeId) -> Option<&mut Category> {
        self.categories.get_mut(&id)
    }

    pub(crate) fn product_mut(&mut self, id: NodeId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    pub(crate) fn remove_category(&mut self, id: NodeId) -> Option<Category> {
        self.categories.remove(&id)
    }

    pub(crate) fn remove_product(&mut self, id: NodeId) -> Option<Product> {
        self.products.remove(&id)
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty()
    }

    /// Categories in ascending id order.
    pub fn categories(&self) -> Vec<&Category> {
        let mut all: Vec<&Category> = self.categories.values().collect();
        all.sort_by_key(|c| c.id());
        all
    }

    /// Products in ascending id order.
    pub fn products(&self) -> Vec<&Product> {
        let mut all: Vec<&Product> = self.products.values().collect();
        all.sort_by_key(|p| p.id());
        all
    }

    /// Categories without a parent, ascending by id.
    pub fn roots(&self) -> Vec<&Category> {
        self.categories()
            .into_iter()
            .filter(|c| c.parent().is_none())
            .collect()
    }

    /// Collects every category and product below `root`, `root` included.
    ///
    /// Categories come out in pre-order: a category always precedes its
    /// descendants. Returns an empty subtree if `root` is not a category.
    pub fn subtree(&self, root: NodeId) -> Subtree {
        let mut subtree = Subtree::default();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(category) = self.categories.get(&id) else {
                continue;
            };
            subtree.categories.push(id);
            subtree
                .products
                .extend(category.child_product_ids.iter().copied());
            // Reverse so children pop in ascending id order
            stack.extend(category.child_category_ids.iter().rev().copied());
        }

        subtree
    }
}

/// Result of [`EntityStore::subtree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subtree {
    /// Category ids in pre-order.
    pub categories: Vec<NodeId>,
    pub products: BTreeSet<NodeId>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut store = EntityStore::new();
        store.create_category(NodeId(1), "Electronics").unwrap();
        store.create_product(NodeId(10), "Phone", 100.0).unwrap();

        assert_eq!(store.kind_of(NodeId(1)), Some(NodeKind::Category));
        assert_eq!(store.kind_of(NodeId(10)), Some(NodeKind::Product));
        assert!(store.get(NodeId(99)).is_none());

        let node = store.get(NodeId(10)).unwrap();
        assert_eq!(node.kind(), NodeKind::Product);
        assert_eq!(node.name(), "Phone");
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn test_cross_kind_duplicates_rejected() {
        let mut store = EntityStore::new();
        store.create_category(NodeId(1), "Electronics").unwrap();
        store.create_product(NodeId(10), "Phone", 100.0).unwrap();

        let err = store.create_product(NodeId(1), "Clash", 5.0).unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateId {
                id: NodeId(1),
                existing: NodeKind::Category
            }
        );
        let err = store.create_category(NodeId(10), "Clash").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { existing: NodeKind::Product, .. }));
        assert!(store.create_category(NodeId(1), "Again").is_err());

        // Store unchanged
        assert_eq!(store.category_count(), 1);
        assert_eq!(store.product_count(), 1);
        assert_eq!(store.category(NodeId(1)).unwrap().name(), "Electronics");
        assert_eq!(store.product(NodeId(10)).unwrap().original_price(), 100.0);
    }

    #[test]
    fn test_invalid_price_rejected() {
        let mut store = EntityStore::new();
        let err = store.create_product(NodeId(5), "Broken", -3.0).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPrice { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_enumeration_is_sorted() {
        let mut store = EntityStore::new();
        for id in [5, 1, 3] {
            store.create_category(NodeId(id), "c").unwrap();
        }
        let ids: Vec<u32> = store.categories().iter().map(|c| c.id().0).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(store.roots().len(), 3);
    }

    #[test]
    fn test_subtree_is_preorder() {
        let mut store = EntityStore::new();
        for id in [1, 2, 3, 4] {
            store.create_category(NodeId(id), "c").unwrap();
        }
        store.create_product(NodeId(10), "p", 1.0).unwrap();
        // 1 -> {2 -> {4}, 3}, product 10 under 4
        for (parent, child) in [(1, 2), (1, 3), (2, 4)] {
            store.category_mut(NodeId(child)).unwrap().parent = Some(NodeId(parent));
            store
                .category_mut(NodeId(parent))
                .unwrap()
                .child_category_ids
                .insert(NodeId(child));
        }
        store
            .category_mut(NodeId(4))
            .unwrap()
            .child_product_ids
            .insert(NodeId(10));

        let subtree = store.subtree(NodeId(1));
        assert_eq!(subtree.categories, vec![NodeId(1), NodeId(2), NodeId(4), NodeId(3)]);
        assert!(subtree.products.contains(&NodeId(10)));
        assert!(store.subtree(NodeId(10)).categories.is_empty());
    }
}
