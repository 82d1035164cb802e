//! # Discount Engine
//!
//! Validates and applies discounts to a product or a whole category subtree.
//!
//! ## All-or-Nothing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_discount(category 1, flat 40)                                   │
//! │                                                                         │
//! │  Phase 1: DRY RUN (no mutation)                                        │
//! │     walk subtree ── product 10 sells 80 ✓                              │
//! │                 ── product 11 sells 30 ✗ ──► DiscountCannotBeApplied   │
//! │                                                                         │
//! │  Phase 2: APPLY (only reached if phase 1 passed everywhere)            │
//! │     pre-order:   apply to each category's direct products,            │
//! │                  rebuild its product view once                         │
//! │     post-order:  recompute each category's best product               │
//! │     then:        propagate once from the top category to the root      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::ordering::{rebuild_category_view, rebuild_product_view};
use crate::pricing::Discount;
use crate::propagate::{propagate_from, recompute};
use crate::store::EntityStore;
use crate::types::{Node, NodeId};
use crate::validation::{validate_discount, validate_discount_value};

/// Checks that `discount` can be applied to `node_id` without mutating
/// anything.
///
/// For a category every product in the subtree must accept the discount.
/// A category with no products accepts any discount whose value is in range.
pub(crate) fn check_applicable(
    store: &EntityStore,
    node_id: NodeId,
    discount: &Discount,
) -> CatalogResult<()> {
    let reject = |reason| CatalogError::discount_rejected(node_id, reason);

    match store.get(node_id) {
        None => Err(CatalogError::UnknownId(node_id)),
        Some(Node::Product(product)) => validate_discount(discount, product).map_err(reject),
        Some(Node::Category(_)) => {
            validate_discount_value(discount).map_err(reject)?;
            let subtree = store.subtree(node_id);
            for product_id in &subtree.products {
                if let Some(product) = store.product(*product_id) {
                    validate_discount(discount, product).map_err(reject)?;
                }
            }
            debug!(
                category_id = %node_id,
                products = subtree.products.len(),
                %discount,
                "Discount applicable on subtree"
            );
            Ok(())
        }
    }
}

/// Applies `discount` to a product or every product below a category.
///
/// Returns the number of products whose price changed.
pub(crate) fn apply(
    store: &mut EntityStore,
    node_id: NodeId,
    discount: &Discount,
) -> CatalogResult<usize> {
    check_applicable(store, node_id, discount)?;

    if store.product(node_id).is_some() {
        apply_to_product(store, node_id, discount);
        return Ok(1);
    }
    Ok(apply_to_category(store, node_id, discount))
}

fn apply_to_product(store: &mut EntityStore, product_id: NodeId, discount: &Discount) {
    let Some(product) = store.product_mut(product_id) else {
        return;
    };
    product.apply(discount);
    let owner = product.category;
    debug!(
        product_id = %product_id,
        %discount,
        original = product.original_price,
        selling = product.selling_price,
        "Discount applied on product"
    );

    if let Some(category_id) = owner {
        rebuild_product_view(store, category_id);
        propagate_from(store, category_id);
    }
}

fn apply_to_category(store: &mut EntityStore, category_id: NodeId, discount: &Discount) -> usize {
    let subtree = store.subtree(category_id);
    let mut updated = 0;

    for id in &subtree.categories {
        let product_ids: Vec<NodeId> = store
            .category(*id)
            .map(|c| c.child_product_ids.iter().copied().collect())
            .unwrap_or_default();
        for product_id in &product_ids {
            if let Some(product) = store.product_mut(*product_id) {
                product.apply(discount);
                updated += 1;
            }
        }
        rebuild_product_view(store, *id);
    }

    // Children before parents, so each level reads fresh aggregates.
    for id in subtree.categories.iter().rev() {
        rebuild_category_view(store, *id);
        recompute(store, *id);
    }
    propagate_from(store, category_id);

    debug!(
        category_id = %category_id,
        categories = subtree.categories.len(),
        products = updated,
        %discount,
        "Discount applied on category"
    );
    updated
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::Catalog;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert_node(NodeId(1), "Root", -1.0).unwrap();
        catalog.insert_node(NodeId(2), "Kitchen", -1.0).unwrap();
        catalog.insert_node(NodeId(10), "Kettle", 100.0).unwrap();
        catalog.insert_node(NodeId(11), "Mug", 50.0).unwrap();
        catalog.attach_nodes(NodeId(1), NodeId(2)).unwrap();
        catalog.attach_nodes(NodeId(2), NodeId(10)).unwrap();
        catalog.attach_nodes(NodeId(1), NodeId(11)).unwrap();
        catalog
    }

    #[test]
    fn test_check_does_not_mutate() {
        let catalog = catalog();
        let before = catalog.store().products().into_iter().cloned().collect::<Vec<_>>();

        let err = check_applicable(catalog.store(), NodeId(1), &Discount::flat(60.0)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DiscountCannotBeApplied {
                node: NodeId(1),
                reason: ValidationError::FlatExceedsPrice { product: NodeId(11), .. }
            }
        ));

        let after = catalog.store().products().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn test_category_discount_touches_whole_subtree() {
        let mut catalog = catalog();
        let updated = apply(&mut catalog.store, NodeId(1), &Discount::percentage(10.0)).unwrap();
        assert_eq!(updated, 2);

        let kettle = catalog.store().product(NodeId(10)).unwrap();
        assert!((kettle.discount() - 10.0).abs() < 1e-9);
        let mug = catalog.store().product(NodeId(11)).unwrap();
        assert!((mug.discount() - 5.0).abs() < 1e-9);

        // Nested category saw the change too
        let kitchen = catalog.store().category(NodeId(2)).unwrap();
        assert_eq!(kitchen.best().map(|b| b.product_id), Some(NodeId(10)));
        assert_eq!(kitchen.best().map(|b| b.discount), Some(kettle.discount()));
    }

    #[test]
    fn test_empty_category_accepts_in_range_values_only() {
        let mut catalog = Catalog::new();
        catalog.insert_node(NodeId(1), "Empty", -1.0).unwrap();

        assert_eq!(apply(&mut catalog.store, NodeId(1), &Discount::flat(1000.0)), Ok(0));
        assert!(apply(&mut catalog.store, NodeId(1), &Discount::percentage(101.0)).is_err());
        assert_eq!(
            apply(&mut catalog.store, NodeId(9), &Discount::flat(1.0)),
            Err(CatalogError::UnknownId(NodeId(9)))
        );
    }
}
