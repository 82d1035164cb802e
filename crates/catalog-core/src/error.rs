//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  ├── CatalogError     - Tree / lookup / discount failures               │
//! │  └── ValidationError  - Why a discount is not applicable                │
//! │                                                                         │
//! │  catalog-cli errors (separate crate)                                   │
//! │  └── CliError         - Script parsing, config, I/O                     │
//! │                                                                         │
//! │  Flow: ValidationError → CatalogError → report line                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending node id in every variant
//! 3. Every variant is raised BEFORE any mutation happens
//! 4. Display strings of the variants the batch format knows match its
//!    historical status lines ("Invalid ID.", "Discount cannot be applied.")

use thiserror::Error;

use crate::types::{NodeId, NodeKind};

// =============================================================================
// Catalog Error
// =============================================================================

/// Errors returned by [`Catalog`](crate::Catalog) operations.
///
/// None of these are fatal: the catalog is left exactly as it was before the
/// failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// The id resolves to neither a category nor a product.
    #[error("Invalid ID.")]
    UnknownId(NodeId),

    /// The id is already used by a category or a product.
    ///
    /// ## When This Occurs
    /// - Inserting a category whose id is already a category
    /// - Inserting a product whose id is already a category (cross-kind)
    #[error("Node {id} already exists as a {existing}.")]
    DuplicateId { id: NodeId, existing: NodeKind },

    /// The operation requires a category.
    #[error("Node {0} is not a category.")]
    NotACategory(NodeId),

    /// The operation requires a product.
    #[error("Node {0} is not a product.")]
    NotAProduct(NodeId),

    /// The parent given to `add_new_node` is not an existing category.
    #[error("Invalid parent category id.")]
    InvalidParent(NodeId),

    /// Both ids of an attach request are products.
    #[error("Invalid nodes. Both are products")]
    BothProducts(NodeId, NodeId),

    /// Attaching `child` under `parent` would make a category its own ancestor.
    #[error("Category {child} cannot be attached under its own descendant {parent}.")]
    WouldCreateCycle { parent: NodeId, child: NodeId },

    /// A product price must be finite and non-negative.
    #[error("Invalid price {price} for product {id}.")]
    InvalidPrice { id: NodeId, price: f64 },

    /// The discount fails the applicability predicate somewhere in the target.
    ///
    /// ## User Workflow
    /// ```text
    /// apply_discount(category 1, flat 40)
    ///      │
    ///      ▼
    /// dry run over subtree: product 11 sells at 30
    ///      │
    ///      ▼
    /// DiscountCannotBeApplied { node: 1, reason: FlatExceedsPrice { .. } }
    ///      │
    ///      ▼
    /// nothing in the subtree changed
    /// ```
    #[error("Discount cannot be applied.")]
    DiscountCannotBeApplied { node: NodeId, reason: ValidationError },
}

impl CatalogError {
    /// Creates a DiscountCannotBeApplied error for the node the caller targeted.
    pub fn discount_rejected(node: NodeId, reason: ValidationError) -> Self {
        CatalogError::DiscountCannotBeApplied { node, reason }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Reasons a discount is not applicable to a product.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Percentage below zero.
    #[error("percentage discount {0} is negative")]
    NegativePercentage(f64),

    /// Percentage above one hundred.
    #[error("percentage discount {0} exceeds 100")]
    PercentageOverHundred(f64),

    /// Flat amount below zero.
    #[error("flat discount {0} is negative")]
    NegativeFlat(f64),

    /// Flat amount larger than what the product currently sells for.
    #[error("flat discount {amount} exceeds selling price {selling_price} of product {product}")]
    FlatExceedsPrice {
        product: NodeId,
        amount: f64,
        selling_price: f64,
    },

    /// NaN or infinite discount value.
    #[error("discount value {0} is not a finite number")]
    NotFinite(f64),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

// =============================================================================
// Unit Tests
// =============================================================================
