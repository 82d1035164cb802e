//! # Pricing Module
//!
//! Discount types and the price arithmetic behind them.
//!
//! ## Discount Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PERCENTAGE (batch code 1)          FLAT (batch code 2)                 │
//! │                                                                         │
//! │  selling *= (100 - value) / 100     selling -= value                    │
//! │  valid for 0 <= value <= 100        valid for 0 <= value <= selling     │
//! │                                                                         │
//! │  Discounts compound on the CURRENT selling price:                      │
//! │    100 → 20% → 80 → 20% → 64   (absolute discount 36)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are plain `f64`. There is no rounding policy beyond what floating
//! point arithmetic does on its own.
//!
//! ## Usage
//! ```rust
//! use catalog_core::pricing::{Discount, DiscountKind};
//!
//! let twenty_off = Discount::new(DiscountKind::Percentage, 20.0);
//! assert!((twenty_off.apply_to(100.0) - 80.0).abs() < 1e-9);
//!
//! let five_flat: Discount = Discount::new(DiscountKind::Flat, 5.0);
//! assert!((five_flat.apply_to(80.0) - 75.0).abs() < 1e-9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Discount Kind
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Value is a percentage of the current selling price.
    Percentage,
    /// Value is an absolute amount taken off the current selling price.
    Flat,
}

impl DiscountKind {
    /// Resolves a batch command code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(DiscountKind::Percentage),
            2 => Some(DiscountKind::Flat),
            _ => None,
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::Percentage => write!(f, "percentage"),
            DiscountKind::Flat => write!(f, "flat"),
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount request: a kind plus a value.
///
/// Constructing a `Discount` never fails; applicability is decided by
/// [`validation::validate_discount`](crate::validation::validate_discount)
/// against a concrete product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub kind: DiscountKind,
    pub value: f64,
}

impl Discount {
    pub const fn new(kind: DiscountKind, value: f64) -> Self {
        Discount { kind, value }
    }

    pub const fn percentage(value: f64) -> Self {
        Discount::new(DiscountKind::Percentage, value)
    }

    pub const fn flat(value: f64) -> Self {
        Discount::new(DiscountKind::Flat, value)
    }

    /// Returns the selling price after this discount.
    ///
    /// Does not validate: a flat amount larger than `selling_price` yields a
    /// negative price. Callers validate first.
    pub fn apply_to(&self, selling_price: f64) -> f64 {
        match self.kind {
            DiscountKind::Percentage => selling_price * ((100.0 - self.value) / 100.0),
            DiscountKind::Flat => selling_price - self.value,
        }
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiscountKind::Percentage => write!(f, "{}%", self.value),
            DiscountKind::Flat => write!(f, "{} flat", self.value),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
