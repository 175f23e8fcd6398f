//! # Error Types
//!
//! Domain-specific error types for cartwise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cartwise-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing-level failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  config module                                                         │
//! │  └── ConfigError      - Discount configuration cannot be built         │
//! │                                                                         │
//! │  Flow: ValidationError ──┐                                             │
//! │                          ├──► CoreError ──► caller                     │
//! │        ConfigError ──────┘                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, limits)
//! 3. Errors are enum variants, never String
//! 4. The plain pricing path returns no errors; it panics only when a
//!    decimal leaves the 96-bit range. The strict `try_*` entry points
//!    report that as `Overflow` instead

use thiserror::Error;

use crate::config::ConfigError;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A cart failed validation before pricing.
    ///
    /// ## When This Occurs
    /// Only from `PricingEngine::try_calculate_total_price`, when a line
    /// item carries a non-positive quantity or a negative unit price.
    /// The plain `calculate_total_price` never raises it.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The discount configuration could not be built.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A money operation left the range of a 96-bit decimal
    /// (about ±7.9 × 10^28).
    #[error("Arithmetic overflow during {operation}")]
    Overflow { operation: &'static str },

    /// A money operation needed more than 28 significant digits and
    /// `rust_decimal` would have rounded the result.
    #[error("Precision lost during {operation}")]
    PrecisionLoss { operation: &'static str },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before pricing runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is out of range. Bounds are pre-formatted so both integer
    /// and decimal limits can be reported.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
