//! # catalog-core: Category Hierarchy with Cached Best Discounts
//!
//! This crate holds a tree of categories and products and keeps, for every
//! category, a pointer to the most discounted product anywhere below it.
//! It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Discount Catalog Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/catalog-cli                             │   │
//! │  │    script parser ──► runner ──► text / JSON report             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Catalog methods                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │ discount  │  │ propagate │  │ ordering  │  │   │
//! │  │   │  mutate   │─►│ dry run + │─►│ walk to   │─►│ ranked    │  │   │
//! │  │   │  + query  │  │ apply     │  │ the root  │  │ views     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          │                                                      │   │
//! │  │          ▼                                                      │   │
//! │  │   ┌─────────────────────────────────────────────────────────┐  │   │
//! │  │   │  store: EntityStore (categories + products by NodeId)   │  │   │
//! │  │   └─────────────────────────────────────────────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • SINGLE THREADED                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Category, Product, NodeId, BestProduct)
//! - [`pricing`] - Discount kinds and price arithmetic
//! - [`validation`] - Discount applicability rules
//! - [`store`] - Arena of every node in one id space
//! - [`ordering`] - Ranked sibling views
//! - [`catalog`] - Mutations and the max-discounted-product query
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{Catalog, Discount, NodeId};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_node(NodeId(1), "Store", -1.0).unwrap();
//! catalog.insert_node(NodeId(10), "Kettle", 100.0).unwrap();
//! catalog.insert_node(NodeId(11), "Mug", 50.0).unwrap();
//! catalog.attach_nodes(NodeId(1), NodeId(10)).unwrap();
//! catalog.attach_nodes(NodeId(1), NodeId(11)).unwrap();
//!
//! catalog.apply_discount(NodeId(11), Discount::flat(30.0)).unwrap();
//!
//! let best = catalog.max_discounted_product(NodeId(1)).unwrap().unwrap();
//! assert_eq!(best.id(), NodeId(11));
//! assert_eq!(best.selling_price(), 20.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
mod discount;
pub mod error;
pub mod ordering;
pub mod pricing;
mod propagate;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_properties;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{Catalog, CatalogSnapshot, CategorySnapshot, Outcome};
pub use error::{CatalogError, CatalogResult, ValidationError};
pub use pricing::{Discount, DiscountKind};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Price that marks a node as a category in [`Catalog::insert_node`] and
/// [`Catalog::add_new_node`].
///
/// Only this exact value means "category"; any other negative price is
/// rejected as invalid for a product.
pub const CATEGORY_PRICE_SENTINEL: f64 = -1.0;
