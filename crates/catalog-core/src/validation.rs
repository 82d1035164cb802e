//! # Validation Module
//!
//! The discount applicability predicate.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Applicability Layers                               │
//! │                                                                         │
//! │  Layer 1: validate_discount_value                                      │
//! │  ├── finite number                                                     │
//! │  ├── percentage in [0, 100]                                            │
//! │  └── flat >= 0                                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: validate_discount (per product)                              │
//! │  └── flat <= current selling price (price never goes negative)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: DiscountEngine dry run (per category)                        │
//! │  └── Layer 2 holds for EVERY product in the subtree                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use catalog_core::pricing::Discount;
//! use catalog_core::validation::validate_discount_value;
//!
//! assert!(validate_discount_value(&Discount::percentage(20.0)).is_ok());
//! assert!(validate_discount_value(&Discount::percentage(120.0)).is_err());
//! assert!(validate_discount_value(&Discount::flat(-1.0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::pricing::{Discount, DiscountKind};
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks the parts of a discount that do not depend on any product.
///
/// An empty category accepts exactly the discounts that pass this check.
pub fn validate_discount_value(discount: &Discount) -> ValidationResult<()> {
    let value = discount.value;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(value));
    }

    match discount.kind {
        DiscountKind::Percentage => {
            if value < 0.0 {
                return Err(ValidationError::NegativePercentage(value));
            }
            if value > 100.0 {
                return Err(ValidationError::PercentageOverHundred(value));
            }
        }
        DiscountKind::Flat => {
            if value < 0.0 {
                return Err(ValidationError::NegativeFlat(value));
            }
        }
    }

    Ok(())
}

/// Checks whether `discount` can be applied to `product`.
///
/// ## Rules
/// - Everything [`validate_discount_value`] checks
/// - A flat amount may not exceed the product's current selling price
///
/// ## Example
/// ```rust
/// use catalog_core::pricing::Discount;
/// use catalog_core::types::{NodeId, Product};
/// use catalog_core::validation::validate_discount;
///
/// let product = Product::new(NodeId(11), "Mug", 50.0);
/// assert!(validate_discount(&Discount::flat(50.0), &product).is_ok());
/// assert!(validate_discount(&Discount::flat(50.5), &product).is_err());
/// ```
pub fn validate_discount(discount: &Discount, product: &Product) -> ValidationResult<()> {
    validate_discount_value(discount)?;

    if discount.kind == DiscountKind::Flat && discount.value > product.selling_price() {
        return Err(ValidationError::FlatExceedsPrice {
            product: product.id(),
            amount: discount.value,
            selling_price: product.selling_price(),
        });
    }

    Ok(())
}

/// Returns true if `price` can be used as a product's original price.
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative (zero is allowed: free items)
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

// =============================================================================
// Unit Tests
// =============================================================================
