//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Integer cents fix addition, but not volume discounts:                  │
//! │    $1.99 × 3 × (1 - 0.05) = $5.6715  → does not fit in cents           │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal (rust_decimal)                           │
//! │    199 × 10^-2 × 3 × 95 × 10^-2 = 56715 × 10^-4   (exact)              │
//! │    Rounding happens ONCE, at presentation, never mid-calculation       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! `round_to_cents` and `Display` use Bankers Rounding (round half to
//! even) to 2 decimal places; that is the only rounding the crate asks for.
//!
//! `Decimal` holds at most 28 significant digits in a 96-bit mantissa.
//! Within that, every calculation is exact. Past it, `rust_decimal`
//! rounds a product or sum on its own, and past ±7.9 × 10^28 the plain
//! operators (`+`, `*`, `multiply_quantity`, `apply_discount`) panic.
//! The `checked_*` methods report both cases as `CoreError::Overflow` and
//! `CoreError::PrecisionLoss` instead.
//!
//! ## Usage
//! ```rust
//! use cartwise_core::money::Money;
//!
//! // Create from cents or parse a decimal string
//! let price = Money::from_cents(1099); // $10.99
//! let same: Money = "10.99".parse().unwrap();
//! assert_eq!(price, same);
//!
//! // Arithmetic operations
//! let doubled = price * 2;                      // $21.98
//! let total = price + Money::from_cents(500);   // $15.99
//! assert_eq!(total.to_string(), "$15.99");
//! # let _ = doubled;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::DiscountRate;

/// Decimal places kept by `round_to_cents`.
const CENT_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents an exact monetary value.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative values, which only appear when
///   callers pass non-positive quantities or out-of-range rates
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Serde**: Serialized as a decimal string (`"1227.50"`)
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price_per_unit ──► LineItem.line_total ──► discounted line     │
/// │                                                                         │
/// │  Σ discounted lines ──► PricingEngine::calculate_total_price            │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CENT_SCALE))
    }

    /// Creates a Money value from an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// Panics on overflow; see [`checked_multiply_quantity`](Self::checked_multiply_quantity).
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total, Money::from_cents(897)); // $8.97
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Applies a discount rate and returns the discounted amount,
    /// `self × (1 − rate)`, without rounding.
    ///
    /// Panics on overflow; see [`checked_apply_discount`](Self::checked_apply_discount).
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    /// use cartwise_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// let discounted = subtotal.apply_discount(DiscountRate::from_bps(1000)); // 10% off
    /// assert_eq!(discounted, Money::from_cents(9000)); // $90.00
    /// ```
    #[inline]
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        Money(self.0 * rate.complement())
    }

    // =========================================================================
    // Checked Arithmetic
    // =========================================================================

    /// `multiply_quantity` that fails instead of panicking or rounding.
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_multiply_quantity(3).unwrap(), Money::from_cents(897));
    ///
    /// let huge: Money = "1000000000000000.00".parse().unwrap();
    /// assert!(huge.checked_multiply_quantity(100_000_000_000_000).is_err());
    /// ```
    pub fn checked_multiply_quantity(&self, qty: i64) -> CoreResult<Money> {
        let qty = Decimal::from(qty);
        exact(
            self.0.checked_mul(qty),
            product_scale(self.0, qty),
            "multiply_quantity",
        )
    }

    /// `apply_discount` that fails instead of panicking or rounding.
    pub fn checked_apply_discount(&self, rate: DiscountRate) -> CoreResult<Money> {
        let rate = rate.value();
        let complement = exact(
            Decimal::ONE.checked_sub(rate),
            significant_scale(rate),
            "apply_discount",
        )?
        .0;
        exact(
            self.0.checked_mul(complement),
            product_scale(self.0, complement),
            "apply_discount",
        )
    }

    /// Addition that fails instead of panicking or rounding.
    pub fn checked_add(&self, other: Money) -> CoreResult<Money> {
        exact(
            self.0.checked_add(other.0),
            significant_scale(self.0).max(significant_scale(other.0)),
            "add",
        )
    }

    /// Subtraction that fails instead of panicking or rounding.
    pub fn checked_sub(&self, other: Money) -> CoreResult<Money> {
        exact(
            self.0.checked_sub(other.0),
            significant_scale(self.0).max(significant_scale(other.0)),
            "sub",
        )
    }

    /// Rounds to whole cents using Bankers Rounding (round half to even).
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
    /// │    0.005 → 0.01, 0.015 → 0.02, 0.025 → 0.03                        │
    /// │                                                                     │
    /// │  Bankers Rounding rounds 0.5 to nearest EVEN digit:                │
    /// │    0.005 → 0.00, 0.015 → 0.02, 0.025 → 0.02                        │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use cartwise_core::money::Money;
    ///
    /// let exact: Money = "5.6715".parse().unwrap();
    /// assert_eq!(exact.round_to_cents(), Money::from_cents(567));
    /// ```
    pub fn round_to_cents(&self) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(CENT_SCALE);
        Money(rounded)
    }
}

/// Turns a `checked_*` result into `Money`, rejecting overflow and any
/// result whose scale came back below `exact_scale`, the most decimal
/// places the exact result can have. `rust_decimal` only drops scale
/// below that when it had to round to fit 28 digits.
///
/// Conservative: a rounded result whose dropped digits happen to be zero
/// is still reported as `PrecisionLoss`.
fn exact(result: Option<Decimal>, exact_scale: u32, operation: &'static str) -> CoreResult<Money> {
    let value = result.ok_or(CoreError::Overflow { operation })?;
    if value.scale() < exact_scale {
        return Err(CoreError::PrecisionLoss { operation });
    }
    Ok(Money(value))
}

/// Decimal places without trailing zeros. Zero operands short-circuit in
/// `rust_decimal` and come back at scale 0, so the raw scale is no bound.
fn significant_scale(value: Decimal) -> u32 {
    value.normalize().scale()
}

/// Most decimal places an exact product of `a` and `b` can have.
fn product_scale(a: Decimal, b: Decimal) -> u32 {
    if a.is_zero() || b.is_zero() {
        0
    } else {
        significant_scale(a) + significant_scale(b)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money rounded to cents, e.g. `$1227.50` or `-$5.50`.
///
/// ## Note
/// This is for logs and receipts. Frontends should format the serialized
/// decimal string themselves to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_to_cents().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${}", sign, rounded.abs())
    }
}

/// Parses a plain decimal amount such as `"100.00"` or `"-5.5"`.
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Sums start from an exact zero.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
