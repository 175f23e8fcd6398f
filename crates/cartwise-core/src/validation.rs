//! # Validation Module
//!
//! Input validation utilities for Cartwise.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (cart building, product loading)                      │
//! │  ├── Owns product catalog and quantities                               │
//! │  └── Expected to hand over positive quantities                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (opt-in)                                         │
//! │  ├── PricingEngine::try_calculate_total_price runs validate_cart        │
//! │  └── DiscountConfig::validate runs validate_discount_rate               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine::calculate_total_price                         │
//! │  └── No checks: non-positive quantities and odd rates pass through     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cartwise_core::validation::validate_quantity;
//!
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Cart, DiscountRate, LineItem};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use cartwise_core::money::Money;
/// use cartwise_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: "0".to_string(),
            max: "unbounded".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount rate.
///
/// ## Rules
/// - Must be between 0 and 1 inclusive
pub fn validate_discount_rate(field: &str, rate: DiscountRate) -> ValidationResult<()> {
    if rate.value() < Decimal::ZERO || rate.value() > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a single line item (quantity and unit price).
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_quantity(item.quantity)?;
    validate_price(item.product.price_per_unit)?;
    Ok(())
}

/// Validates every line item, stopping at the first failure.
///
/// An empty cart is valid.
pub fn validate_cart(cart: &Cart) -> ValidationResult<()> {
    cart.iter().try_for_each(validate_line_item)
}

// =============================================================================
// Unit Tests
// =============================================================================
