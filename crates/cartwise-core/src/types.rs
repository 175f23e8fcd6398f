//! # Domain Types
//!
//! Core domain types consumed by the pricing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    LineItem     │   │      Cart       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product        │◄──│  items (Vec)    │       │
//! │  │  name           │   │  quantity       │   │                 │       │
//! │  │  price_per_unit │   └─────────────────┘   └─────────────────┘       │
//! │  │  category       │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  DiscountRate   │   │    Category     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Decimal        │   │  Electronics    │                             │
//! │  │  0.10 = 10%     │   │  Clothing, ...  │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and carts are built by the caller. Nothing here merges
//! duplicate products: two line items for the same product stay two
//! independent entries.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// A discount expressed as a decimal fraction (`0.10` = 10% off).
///
/// Construction does not range-check: a rate above 1 yields a negative
/// line price and callers own that choice. See
/// [`validate_discount_rate`](crate::validation::validate_discount_rate)
/// for the opt-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(#[ts(type = "string")] Decimal);

impl DiscountRate {
    /// Creates a rate from a decimal fraction.
    #[inline]
    pub const fn from_decimal(rate: Decimal) -> Self {
        DiscountRate(rate)
    }

    /// Creates a rate from basis points (1000 bps = 10%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        DiscountRate(Decimal::new(i64::from(bps), 4))
    }

    /// Returns the rate as a decimal fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `1 − rate`, the share of the price the customer pays.
    #[inline]
    pub fn complement(&self) -> Decimal {
        Decimal::ONE - self.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the rate is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

impl From<Decimal> for DiscountRate {
    fn from(rate: Decimal) -> Self {
        DiscountRate(rate)
    }
}

impl FromStr for DiscountRate {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(DiscountRate)
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Category
// =============================================================================

/// Closed set of product categories used for aggregate discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Electronics,
    Clothing,
    Food,
    Drinks,
    Books,
    Home,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Drinks,
        Category::Books,
        Category::Home,
    ];

    /// Stable lowercase name, matching the serde representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Food => "food",
            Category::Drinks => "drinks",
            Category::Books => "books",
            Category::Home => "home",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive lookup by name.
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product that can be placed in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on receipts.
    pub name: String,

    /// Exact unit price. Expected to be non-negative.
    pub price_per_unit: Money,

    /// Category used for aggregate discounts.
    pub category: Category,
}

impl Product {
    /// Creates a product with a freshly generated id.
    pub fn new(name: impl Into<String>, price_per_unit: Money, category: Category) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price_per_unit,
            category,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One (product, quantity) pairing within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product: Product,
    /// Expected to be positive. Not enforced here; see
    /// [`validate_quantity`](crate::validation::validate_quantity).
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product: Product, quantity: i64) -> Self {
        LineItem { product, quantity }
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.product.category
    }

    /// Exact undiscounted total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product.price_per_unit.multiply_quantity(self.quantity)
    }

    /// `line_total` that reports overflow instead of panicking.
    pub fn checked_line_total(&self) -> CoreResult<Money> {
        self.product.price_per_unit.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered collection of line items.
///
/// ## Invariants
/// - Order never changes the total
/// - Duplicate products are NOT merged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// Appends a line item. An existing entry for the same product is
    /// left untouched.
    pub fn add(&mut self, product: Product, quantity: i64) {
        self.items.push(LineItem::new(product, quantity));
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Returns the number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total quantity of all items, widened so it cannot
    /// overflow.
    pub fn total_quantity(&self) -> i128 {
        self.items.iter().map(|i| i128::from(i.quantity)).sum()
    }

    /// Undiscounted sum of all line totals.
    ///
    /// Panics if the sum leaves the `Decimal` range.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sums quantities per category.
    ///
    /// Sums are kept in `i128` so even `i64::MAX`-sized lines add up
    /// exactly. Categories with no line items are absent; look them up
    /// with `.get(..).copied().unwrap_or(0)`.
    pub fn quantity_per_category(&self) -> HashMap<Category, i128> {
        let mut quantities = HashMap::new();
        for item in &self.items {
            *quantities.entry(item.category()).or_insert(0) += i128::from(item.quantity);
        }
        quantities
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Cart {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
