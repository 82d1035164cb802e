//! # Catalog
//!
//! The public face of the crate: tree mutations, discounts, and the
//! max-discounted-product query, all on one owned [`EntityStore`].
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Operations                               │
//! │                                                                         │
//! │  insert_node ─────► EntityStore (detached node)                        │
//! │                                                                         │
//! │  attach_nodes ────┐                                                    │
//! │  add_new_node ────┼──► attach_existing ──► detach from old parent?     │
//! │                   │          │                    │                     │
//! │                   │          ▼                    ▼                     │
//! │                   │    rebuild parent view   clear + propagate old     │
//! │                   │          │                                          │
//! │                   │          ▼                                          │
//! │                   │    propagate_from(parent) ──► … ──► root           │
//! │                                                                         │
//! │  apply_discount ──► discount engine (dry run, apply, propagate)        │
//! │  remove_node ─────► cascade delete ──► clear refs ──► propagate        │
//! │  max_discounted_product ──► cached pointer lookup, O(1)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method validates completely before touching the store. An `Err`
//! means the catalog is exactly as it was.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::discount;
use crate::error::{CatalogError, CatalogResult};
use crate::ordering::{rebuild_category_view, rebuild_product_view};
use crate::pricing::Discount;
use crate::propagate::{clear_ancestor_references, propagate_from};
use crate::store::EntityStore;
use crate::types::{BestProduct, Node, NodeId, NodeKind, Product};
use crate::validation::is_valid_price;
use crate::CATEGORY_PRICE_SENTINEL;

// =============================================================================
// Outcome
// =============================================================================

/// What a successful operation did.
///
/// `Display` renders the status line of the batch format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    CategoryCreated { id: NodeId },
    ProductCreated { id: NodeId },
    CategoryAdded { parent: NodeId, category: NodeId },
    ProductAdded { parent: NodeId, product: NodeId },
    DiscountApplied { node: NodeId, products_updated: usize },
    ProductDeleted { id: NodeId },
    CategoryDeleted {
        id: NodeId,
        categories_removed: usize,
        products_removed: usize,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Outcome::CategoryCreated { .. } => "New Category information created",
            Outcome::ProductCreated { .. } => "New Product information created",
            Outcome::CategoryAdded { .. } => "Category added.",
            Outcome::ProductAdded { .. } => "Product added.",
            Outcome::DiscountApplied { .. } => "Discount applied.",
            Outcome::ProductDeleted { .. } => "Product deleted.",
            Outcome::CategoryDeleted { .. } => "Category deleted.",
        };
        f.write_str(status)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Serializable copy of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySnapshot {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub child_categories: Vec<NodeId>,
    pub child_products: Vec<NodeId>,
    pub best: Option<BestProduct>,
}

/// Serializable copy of the whole catalog, ascending by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub categories: Vec<CategorySnapshot>,
    pub products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A category/product hierarchy with a cached best product per category.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) store: EntityStore,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying records.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Resolves an id to its node.
    pub fn get(&self, id: NodeId) -> CatalogResult<Node<'_>> {
        self.store.get(id).ok_or(CatalogError::UnknownId(id))
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Creates a detached node. A price equal to [`CATEGORY_PRICE_SENTINEL`]
    /// makes a category, anything else a product.
    ///
    /// ## Errors
    /// - `DuplicateId` if `id` names any node
    /// - `InvalidPrice` for a product price that is negative or not finite
    pub fn insert_node(&mut self, id: NodeId, name: &str, price: f64) -> CatalogResult<Outcome> {
        if price == CATEGORY_PRICE_SENTINEL {
            self.store.create_category(id, name)?;
            Ok(Outcome::CategoryCreated { id })
        } else {
            self.store.create_product(id, name, price)?;
            Ok(Outcome::ProductCreated { id })
        }
    }

    /// Creates a node and attaches it under `parent` in one step.
    ///
    /// ## Errors
    /// - `InvalidParent` if `parent` is not an existing category
    /// - `DuplicateId` / `InvalidPrice` as for [`insert_node`](Self::insert_node)
    pub fn add_new_node(
        &mut self,
        parent: NodeId,
        id: NodeId,
        price: f64,
        name: &str,
    ) -> CatalogResult<Outcome> {
        if self.store.category(parent).is_none() {
            return Err(CatalogError::InvalidParent(parent));
        }
        self.store.ensure_free(id)?;
        if price != CATEGORY_PRICE_SENTINEL && !is_valid_price(price) {
            return Err(CatalogError::InvalidPrice { id, price });
        }

        self.insert_node(id, name, price)?;
        self.attach_existing(parent, id)
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Attaches two existing nodes, working out which one is the parent.
    ///
    /// Two categories: `a` becomes the parent of `b`. A category and a
    /// product: the category is the parent, in either order.
    ///
    /// ## Errors
    /// - `UnknownId` for an id that names nothing
    /// - `BothProducts` if neither id is a category
    pub fn attach_nodes(&mut self, a: NodeId, b: NodeId) -> CatalogResult<Outcome> {
        let kind_a = self.store.kind_of(a).ok_or(CatalogError::UnknownId(a))?;
        let kind_b = self.store.kind_of(b).ok_or(CatalogError::UnknownId(b))?;

        match (kind_a, kind_b) {
            (NodeKind::Product, NodeKind::Product) => Err(CatalogError::BothProducts(a, b)),
            (NodeKind::Product, NodeKind::Category) => self.attach_existing(b, a),
            (NodeKind::Category, _) => self.attach_existing(a, b),
        }
    }

    /// Attaches `child` (either kind) under the category `parent`.
    ///
    /// A child attached elsewhere is moved. Moving a node under its current
    /// parent changes nothing.
    ///
    /// ## Errors
    /// - `NotACategory` if `parent` does not name a category, including an
    ///   id that names nothing
    /// - `UnknownId` if `child` names nothing
    /// - `WouldCreateCycle` if `child` is `parent` or one of its ancestors
    pub fn attach_existing(&mut self, parent: NodeId, child: NodeId) -> CatalogResult<Outcome> {
        self.store
            .category(parent)
            .ok_or(CatalogError::NotACategory(parent))?;
        let node = self.store.get(child).ok_or(CatalogError::UnknownId(child))?;
        let kind = node.kind();
        let current = node.parent();

        if kind == NodeKind::Category
            && (child == parent || self.ancestors(parent).contains(&child))
        {
            return Err(CatalogError::WouldCreateCycle { parent, child });
        }

        let outcome = match kind {
            NodeKind::Category => Outcome::CategoryAdded {
                parent,
                category: child,
            },
            NodeKind::Product => Outcome::ProductAdded {
                parent,
                product: child,
            },
        };

        if current == Some(parent) {
            debug!(parent = %parent, child = %child, "Already attached, nothing to do");
            return Ok(outcome);
        }
        if let Some(old_parent) = current {
            self.detach(old_parent, child, kind);
        }

        match kind {
            NodeKind::Category => {
                if let Some(category) = self.store.category_mut(child) {
                    category.parent = Some(parent);
                }
                if let Some(parent_category) = self.store.category_mut(parent) {
                    parent_category.child_category_ids.insert(child);
                }
                rebuild_category_view(&mut self.store, parent);
            }
            NodeKind::Product => {
                if let Some(product) = self.store.product_mut(child) {
                    product.category = Some(parent);
                }
                if let Some(parent_category) = self.store.category_mut(parent) {
                    parent_category.child_product_ids.insert(child);
                }
                rebuild_product_view(&mut self.store, parent);
            }
        }
        propagate_from(&mut self.store, parent);

        debug!(parent = %parent, child = %child, kind = %kind, "Node attached");
        Ok(outcome)
    }

    /// Unlinks `child` from `old_parent` and repairs the old branch.
    fn detach(&mut self, old_parent: NodeId, child: NodeId, kind: NodeKind) {
        let leaving: BTreeSet<NodeId> = match kind {
            NodeKind::Category => self.store.subtree(child).products,
            NodeKind::Product => [child].into_iter().collect(),
        };

        if let Some(parent_category) = self.store.category_mut(old_parent) {
            match kind {
                NodeKind::Category => parent_category.child_category_ids.remove(&child),
                NodeKind::Product => parent_category.child_product_ids.remove(&child),
            };
        }
        match kind {
            NodeKind::Category => {
                if let Some(category) = self.store.category_mut(child) {
                    category.parent = None;
                }
                rebuild_category_view(&mut self.store, old_parent);
            }
            NodeKind::Product => {
                if let Some(product) = self.store.product_mut(child) {
                    product.category = None;
                }
                rebuild_product_view(&mut self.store, old_parent);
            }
        }

        clear_ancestor_references(&mut self.store, old_parent, &leaving);
        propagate_from(&mut self.store, old_parent);
        debug!(old_parent = %old_parent, child = %child, "Node detached");
    }

    // =========================================================================
    // Discounts
    // =========================================================================

    /// Applies a discount to a product, or to every product below a category.
    ///
    /// ## Errors
    /// - `UnknownId` if `id` names nothing
    /// - `DiscountCannotBeApplied` if any affected product rejects it; no
    ///   product is changed in that case
    pub fn apply_discount(&mut self, id: NodeId, discount: Discount) -> CatalogResult<Outcome> {
        let products_updated = discount::apply(&mut self.store, id, &discount)?;
        info!(node = %id, %discount, products_updated, "Discount applied");
        Ok(Outcome::DiscountApplied {
            node: id,
            products_updated,
        })
    }

    /// Runs the applicability dry run without changing anything.
    pub fn check_discount(&self, id: NodeId, discount: &Discount) -> CatalogResult<()> {
        discount::check_applicable(&self.store, id, discount)
    }

    /// Returns true if [`apply_discount`](Self::apply_discount) would succeed.
    pub fn is_discount_applicable(&self, id: NodeId, discount: &Discount) -> bool {
        self.check_discount(id, discount).is_ok()
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// The most discounted product at or below `id`.
    ///
    /// A product answers with itself. A category answers from its cached
    /// pointer, `None` if its subtree holds no product.
    pub fn max_discounted_product(&self, id: NodeId) -> CatalogResult<Option<&Product>> {
        match self.store.get(id) {
            Some(Node::Product(product)) => Ok(Some(product)),
            Some(Node::Category(category)) => Ok(category
                .best()
                .and_then(|best| self.store.product(best.product_id))),
            None => Err(CatalogError::UnknownId(id)),
        }
    }

    /// Ids from `id`'s parent up to its root, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.store.get(id).and_then(|n| n.parent());
        while let Some(parent) = current {
            chain.push(parent);
            current = self.store.category(parent).and_then(|c| c.parent());
        }
        chain
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes a product, or a category together with its whole subtree.
    ///
    /// ## Errors
    /// `UnknownId` if `id` names nothing.
    pub fn remove_node(&mut self, id: NodeId) -> CatalogResult<Outcome> {
        match self.store.kind_of(id) {
            None => Err(CatalogError::UnknownId(id)),
            Some(NodeKind::Product) => Ok(self.remove_product(id)),
            Some(NodeKind::Category) => Ok(self.remove_category(id)),
        }
    }

    fn remove_product(&mut self, id: NodeId) -> Outcome {
        let owner = self.store.remove_product(id).and_then(|p| p.category);

        if let Some(owner) = owner {
            if let Some(category) = self.store.category_mut(owner) {
                category.child_product_ids.remove(&id);
            }
            rebuild_product_view(&mut self.store, owner);
            let removed: BTreeSet<NodeId> = [id].into_iter().collect();
            clear_ancestor_references(&mut self.store, owner, &removed);
            propagate_from(&mut self.store, owner);
        }

        info!(product_id = %id, "Product deleted");
        Outcome::ProductDeleted { id }
    }

    fn remove_category(&mut self, id: NodeId) -> Outcome {
        let subtree = self.store.subtree(id);
        let parent = self.store.category(id).and_then(|c| c.parent);

        for category_id in &subtree.categories {
            self.store.remove_category(*category_id);
        }
        for product_id in &subtree.products {
            self.store.remove_product(*product_id);
        }

        if let Some(parent) = parent {
            if let Some(category) = self.store.category_mut(parent) {
                category.child_category_ids.remove(&id);
            }
            rebuild_category_view(&mut self.store, parent);
            clear_ancestor_references(&mut self.store, parent, &subtree.products);
            propagate_from(&mut self.store, parent);
        }

        info!(
            category_id = %id,
            categories = subtree.categories.len(),
            products = subtree.products.len(),
            "Category deleted"
        );
        Outcome::CategoryDeleted {
            id,
            categories_removed: subtree.categories.len(),
            products_removed: subtree.products.len(),
        }
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Copies the catalog into a serializable form.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let categories = self
            .store
            .categories()
            .into_iter()
            .map(|c| CategorySnapshot {
                id: c.id(),
                name: c.name().to_string(),
                parent: c.parent(),
                child_categories: c.child_category_ids().iter().copied().collect(),
                child_products: c.child_product_ids().iter().copied().collect(),
                best: c.best(),
            })
            .collect();
        let products = self.store.products().into_iter().cloned().collect();

        CatalogSnapshot {
            categories,
            products,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId(raw)
    }

    /// 1 ─┬─ 2 ── product 10 (100)
    ///    └─ 3 ── product 11 (50)
    fn worked_example() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_node(id(1), "Store", -1.0).unwrap();
        catalog.insert_node(id(2), "Kitchen", -1.0).unwrap();
        catalog.insert_node(id(3), "Garden", -1.0).unwrap();
        catalog.insert_node(id(10), "Kettle", 100.0).unwrap();
        catalog.insert_node(id(11), "Hose", 50.0).unwrap();
        catalog.attach_nodes(id(1), id(2)).unwrap();
        catalog.attach_nodes(id(1), id(3)).unwrap();
        catalog.attach_nodes(id(10), id(2)).unwrap();
        catalog.attach_nodes(id(3), id(11)).unwrap();
        catalog
    }

    fn best_id(catalog: &Catalog, raw: u32) -> Option<u32> {
        catalog
            .max_discounted_product(id(raw))
            .unwrap()
            .map(|p| p.id().get())
    }

    #[test]
    fn test_worked_example() {
        let mut catalog = worked_example();
        assert_eq!(best_id(&catalog, 1), Some(10));

        let outcome = catalog.apply_discount(id(10), Discount::percentage(20.0)).unwrap();
        assert_eq!(outcome.to_string(), "Discount applied.");
        assert_eq!(best_id(&catalog, 1), Some(10));
        let kettle = catalog.max_discounted_product(id(1)).unwrap().unwrap();
        assert!((kettle.selling_price() - 80.0).abs() < 1e-9);

        catalog.apply_discount(id(11), Discount::flat(30.0)).unwrap();
        assert_eq!(best_id(&catalog, 1), Some(11));
        assert_eq!(best_id(&catalog, 3), Some(11));

        let outcome = catalog.remove_node(id(11)).unwrap();
        assert_eq!(outcome.to_string(), "Product deleted.");
        assert_eq!(best_id(&catalog, 1), Some(10));
        assert_eq!(best_id(&catalog, 3), None);

        let outcome = catalog.remove_node(id(3)).unwrap();
        assert_eq!(outcome.to_string(), "Category deleted.");
        assert_eq!(catalog.get(id(3)).unwrap_err(), CatalogError::UnknownId(id(3)));
        assert!(catalog.get(id(1)).is_ok());
        assert!(catalog.get(id(2)).is_ok());
        assert_eq!(best_id(&catalog, 1), Some(10));
    }

    #[test]
    fn test_insert_outcomes_and_duplicates() {
        let mut catalog = Catalog::new();
        let outcome = catalog.insert_node(id(1), "Root", -1.0).unwrap();
        assert_eq!(outcome.to_string(), "New Category information created");
        let outcome = catalog.insert_node(id(2), "Thing", 9.5).unwrap();
        assert_eq!(outcome.to_string(), "New Product information created");

        assert!(matches!(
            catalog.insert_node(id(1), "Clash", 3.0),
            Err(CatalogError::DuplicateId { .. })
        ));
        assert!(matches!(
            catalog.insert_node(id(4), "Negative", -2.0),
            Err(CatalogError::InvalidPrice { .. })
        ));
        assert_eq!(catalog.store().product(id(2)).unwrap().original_price(), 9.5);
        assert_eq!(catalog.store().product_count(), 1);
    }

    #[test]
    fn test_attach_nodes_kind_detection() {
        let mut catalog = Catalog::new();
        catalog.insert_node(id(1), "Root", -1.0).unwrap();
        catalog.insert_node(id(5), "A", 1.0).unwrap();
        catalog.insert_node(id(6), "B", 2.0).unwrap();

        assert_eq!(
            catalog.attach_nodes(id(5), id(6)),
            Err(CatalogError::BothProducts(id(5), id(6)))
        );
        assert_eq!(
            catalog.attach_nodes(id(5), id(1)).unwrap(),
            Outcome::ProductAdded {
                parent: id(1),
                product: id(5)
            }
        );
        assert_eq!(
            catalog.attach_nodes(id(1), id(9)),
            Err(CatalogError::UnknownId(id(9)))
        );
        assert_eq!(catalog.store().product(id(5)).unwrap().category(), Some(id(1)));
    }

    #[test]
    fn test_add_new_node() {
        let mut catalog = worked_example();
        let outcome = catalog.add_new_node(id(2), id(20), 40.0, "Toaster").unwrap();
        assert_eq!(outcome.to_string(), "Product added.");
        let outcome = catalog.add_new_node(id(3), id(30), -1.0, "Seeds").unwrap();
        assert_eq!(outcome.to_string(), "Category added.");
        assert_eq!(catalog.ancestors(id(30)), vec![id(3), id(1)]);

        assert_eq!(
            catalog.add_new_node(id(10), id(21), 1.0, "Bad"),
            Err(CatalogError::InvalidParent(id(10)))
        );
        assert_eq!(
            catalog.add_new_node(id(99), id(21), 1.0, "Bad"),
            Err(CatalogError::InvalidParent(id(99)))
        );
        assert!(matches!(
            catalog.add_new_node(id(2), id(11), 1.0, "Dup"),
            Err(CatalogError::DuplicateId { .. })
        ));
        assert!(matches!(
            catalog.add_new_node(id(2), id(22), -5.0, "Bad price"),
            Err(CatalogError::InvalidPrice { .. })
        ));
        assert!(catalog.get(id(22)).is_err());
    }

    #[test]
    fn test_category_discount_is_all_or_nothing() {
        let mut catalog = worked_example();
        let before = catalog.snapshot();

        // Hose sells at 50, so 60 off fails for the whole subtree
        let err = catalog.apply_discount(id(1), Discount::flat(60.0)).unwrap_err();
        assert_eq!(err.to_string(), "Discount cannot be applied.");
        assert_eq!(catalog.snapshot(), before);
        assert!(!catalog.is_discount_applicable(id(1), &Discount::flat(60.0)));
        assert!(catalog.is_discount_applicable(id(2), &Discount::flat(60.0)));

        let outcome = catalog.apply_discount(id(1), Discount::flat(50.0)).unwrap();
        assert_eq!(
            outcome,
            Outcome::DiscountApplied {
                node: id(1),
                products_updated: 2
            }
        );
        // Both gained 50; tie goes to the smaller id
        assert_eq!(best_id(&catalog, 1), Some(10));
    }

    #[test]
    fn test_deletion_cascade() {
        let mut catalog = worked_example();
        catalog.add_new_node(id(3), id(30), -1.0, "Seeds").unwrap();
        catalog.add_new_node(id(30), id(31), 20.0, "Tulips").unwrap();
        catalog.apply_discount(id(31), Discount::flat(15.0)).unwrap();
        assert_eq!(best_id(&catalog, 1), Some(31));

        let outcome = catalog.remove_node(id(3)).unwrap();
        assert_eq!(
            outcome,
            Outcome::CategoryDeleted {
                id: id(3),
                categories_removed: 2,
                products_removed: 2
            }
        );
        for gone in [3, 30, 31, 11] {
            assert_eq!(catalog.get(id(gone)).unwrap_err(), CatalogError::UnknownId(id(gone)));
        }
        assert_eq!(best_id(&catalog, 1), Some(10));
        assert_eq!(catalog.remove_node(id(3)), Err(CatalogError::UnknownId(id(3))));
    }

    #[test]
    fn test_reparent_moves_aggregate() {
        let mut catalog = worked_example();
        catalog.apply_discount(id(11), Discount::flat(30.0)).unwrap();
        catalog.insert_node(id(5), "Outlet", -1.0).unwrap();

        catalog.attach_existing(id(5), id(3)).unwrap();
        assert_eq!(best_id(&catalog, 5), Some(11));
        assert_eq!(best_id(&catalog, 1), Some(10));
        assert!(!catalog.store().category(id(1)).unwrap().child_category_ids().contains(&id(3)));

        // Same parent again is a no-op
        let before = catalog.snapshot();
        catalog.attach_existing(id(5), id(3)).unwrap();
        assert_eq!(catalog.snapshot(), before);

        // Move the product itself back under the old tree
        catalog.attach_existing(id(2), id(11)).unwrap();
        assert_eq!(best_id(&catalog, 1), Some(11));
        assert_eq!(best_id(&catalog, 3), None);
        assert_eq!(best_id(&catalog, 5), None);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut catalog = worked_example();
        catalog.add_new_node(id(3), id(30), -1.0, "Seeds").unwrap();
        let before = catalog.snapshot();

        assert_eq!(
            catalog.attach_existing(id(30), id(1)),
            Err(CatalogError::WouldCreateCycle {
                parent: id(30),
                child: id(1)
            })
        );
        assert!(catalog.attach_existing(id(3), id(3)).is_err());
        assert_eq!(
            catalog.attach_existing(id(10), id(3)),
            Err(CatalogError::NotACategory(id(10)))
        );
        assert_eq!(catalog.snapshot(), before);
    }

    #[test]
    fn test_attach_under_missing_parent_is_not_a_category() {
        let mut catalog = Catalog::new();
        catalog.insert_node(id(5), "Pen", 2.0).unwrap();
        let before = catalog.snapshot();

        assert_eq!(
            catalog.attach_existing(id(99), id(5)),
            Err(CatalogError::NotACategory(id(99)))
        );
        catalog.insert_node(id(1), "Root", -1.0).unwrap();
        assert_eq!(
            catalog.attach_existing(id(1), id(42)),
            Err(CatalogError::UnknownId(id(42)))
        );
        assert_eq!(catalog.get(id(5)).unwrap().parent(), None);
        assert_eq!(catalog.snapshot().products, before.products);
    }

    #[test]
    fn test_query_product_and_empty_category() {
        let mut catalog = worked_example();
        catalog.insert_node(id(7), "Empty", -1.0).unwrap();
        assert_eq!(best_id(&catalog, 11), Some(11));
        assert_eq!(best_id(&catalog, 7), None);
        assert_eq!(
            catalog.max_discounted_product(id(70)),
            Err(CatalogError::UnknownId(id(70)))
        );
        // Queries do not change anything
        let before = catalog.snapshot();
        let _ = catalog.max_discounted_product(id(1));
        assert_eq!(catalog.snapshot(), before);
    }

    #[test]
    fn test_snapshot_json() {
        let catalog = worked_example();
        let json = catalog.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["categories"][0]["id"], 1);
        assert_eq!(value["categories"][0]["best"]["product_id"], 10);
        assert_eq!(value["products"].as_array().unwrap().len(), 2);

        let outcome = serde_json::to_value(Outcome::ProductDeleted { id: id(4) }).unwrap();
        assert_eq!(outcome["outcome"], "product_deleted");
    }
}
