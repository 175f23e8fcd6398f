//! # cartwise-core: Pure Pricing Logic for Cartwise
//!
//! This crate prices shopping carts with volume discounts. It contains
//! pure functions only, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cartwise Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Caller (checkout service, POS, web shop)             │   │
//! │  │    loads products ──► builds Cart ──► asks for a total          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cartwise-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Engine   │  │   rules   │  │   │
//! │  │   │   Cart    │  │  Decimal  │  │ Breakdown │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                        ┌───────────┐                            │   │
//! │  │                        │  config   │                            │   │
//! │  │                        │ Discounts │                            │   │
//! │  │                        └───────────┘                            │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, Cart, Category, DiscountRate)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`config`] - Discount configuration (builder, env, JSON)
//! - [`pricing`] - The pricing engine and receipt breakdowns
//! - [`error`] - Domain error types
//! - [`validation`] - Opt-in input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same cart + same config = same total
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: `rust_decimal` everywhere; rounding only for display,
//!    exact while amounts fit in 28 significant digits
//! 4. **Explicit Errors**: All errors are typed, never strings. The plain
//!    `calculate_total_price` panics if an amount leaves the `Decimal`
//!    range; `try_calculate_total_price` and `try_price_breakdown` report
//!    overflow and lost precision as `CoreError` instead
//!
//! ## Example Usage
//!
//! ```rust
//! use cartwise_core::{Cart, Category, DiscountConfig, Money, PricingEngine, Product};
//! use cartwise_core::types::DiscountRate;
//!
//! let config = DiscountConfig::builder()
//!     .discount_amount(10)
//!     .product_discount(DiscountRate::from_bps(1000))
//!     .category_discount(DiscountRate::from_bps(500))
//!     .build()
//!     .unwrap();
//! let engine = PricingEngine::new(config);
//!
//! let mut cart = Cart::new();
//! cart.add(Product::new("Headphones", "100.00".parse().unwrap(), Category::Electronics), 11);
//! cart.add(Product::new("Charger", "50.00".parse().unwrap(), Category::Electronics), 5);
//!
//! let total = engine.calculate_total_price(&cart);
//! assert_eq!(total.to_string(), "$1227.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cartwise_core::Money` instead of
// `use cartwise_core::money::Money`

pub use config::{ConfigError, DiscountConfig, DiscountConfigBuilder};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{AppliedDiscount, DiscountKind, LinePrice, PriceBreakdown, PricingEngine};
pub use types::*;
