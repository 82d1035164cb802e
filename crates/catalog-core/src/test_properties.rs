//! Property-based tests for the cached best-product aggregate.
//!
//! Random operation sequences run against a [`Catalog`]. After every step
//! each category's cached answer is compared with a brute-force scan of its
//! subtree, and failed operations must leave the catalog untouched.

use proptest::prelude::*;

use crate::catalog::Catalog;
use crate::pricing::Discount;
use crate::types::{NodeId, Product};

// ──────────────────── strategies ────────────────────

#[derive(Debug, Clone)]
enum Op {
    Insert { id: u32, price: Option<f64> },
    Attach { a: u32, b: u32 },
    Move { parent: u32, child: u32 },
    AddNew { parent: u32, id: u32, price: Option<f64> },
    Percentage { id: u32, value: f64 },
    Flat { id: u32, value: f64 },
    Remove { id: u32 },
}

fn arb_id() -> impl Strategy<Value = u32> {
    1u32..16
}

fn arb_price() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        2 => (0u32..200).prop_map(|p| Some(f64::from(p))),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (arb_id(), arb_price()).prop_map(|(id, price)| Op::Insert { id, price }),
        4 => (arb_id(), arb_id()).prop_map(|(a, b)| Op::Attach { a, b }),
        1 => (arb_id(), arb_id()).prop_map(|(parent, child)| Op::Move { parent, child }),
        2 => (arb_id(), arb_id(), arb_price())
            .prop_map(|(parent, id, price)| Op::AddNew { parent, id, price }),
        2 => (arb_id(), 0u32..=110).prop_map(|(id, v)| Op::Percentage { id, value: f64::from(v) }),
        2 => (arb_id(), 0u32..120).prop_map(|(id, v)| Op::Flat { id, value: f64::from(v) }),
        1 => arb_id().prop_map(|id| Op::Remove { id }),
    ]
}

// ──────────────────── helpers ────────────────────

fn run(catalog: &mut Catalog, op: &Op) -> bool {
    let price = |p: &Option<f64>| p.unwrap_or(crate::CATEGORY_PRICE_SENTINEL);
    let result = match op {
        Op::Insert { id, price: p } => catalog.insert_node(NodeId(*id), "n", price(p)),
        Op::Attach { a, b } => catalog.attach_nodes(NodeId(*a), NodeId(*b)),
        Op::Move { parent, child } => catalog.attach_existing(NodeId(*parent), NodeId(*child)),
        Op::AddNew { parent, id, price: p } => {
            catalog.add_new_node(NodeId(*parent), NodeId(*id), price(p), "n")
        }
        Op::Percentage { id, value } => {
            catalog.apply_discount(NodeId(*id), Discount::percentage(*value))
        }
        Op::Flat { id, value } => catalog.apply_discount(NodeId(*id), Discount::flat(*value)),
        Op::Remove { id } => catalog.remove_node(NodeId(*id)),
    };
    result.is_ok()
}

/// Largest discount in the subtree, smallest id on ties.
fn brute_force_best(catalog: &Catalog, category: NodeId) -> Option<NodeId> {
    let store = catalog.store();
    let mut best: Option<&Product> = None;
    for id in store.subtree(category).products {
        let Some(product) = store.product(id) else {
            continue;
        };
        best = match best {
            Some(current)
                if current.discount() > product.discount()
                    || (current.discount() == product.discount() && current.id() < product.id()) =>
            {
                Some(current)
            }
            _ => Some(product),
        };
    }
    best.map(Product::id)
}

// ──────────────────── properties ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn cached_best_matches_subtree_scan(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            run(&mut catalog, op);

            for category in catalog.store().categories() {
                let cached = catalog
                    .max_discounted_product(category.id())
                    .unwrap()
                    .map(Product::id);
                let expected = brute_force_best(&catalog, category.id());
                prop_assert_eq!(cached, expected, "category {} after {:?}", category.id(), op);
            }
        }
    }

    #[test]
    fn failed_operations_change_nothing(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            let before = catalog.snapshot();
            if !run(&mut catalog, op) {
                prop_assert_eq!(catalog.snapshot(), before, "after {:?}", op);
            }
        }
    }

    #[test]
    fn selling_price_never_negative(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut catalog = Catalog::new();
        for op in &ops {
            run(&mut catalog, op);
        }
        for product in catalog.store().products() {
            prop_assert!(product.selling_price() >= 0.0);
            prop_assert!(product.selling_price() <= product.original_price());
        }
    }
}
