//! # Pricing Engine
//!
//! Computes cart totals with volume discounts.
//!
//! ## Discount Decision (per line item)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart ──► quantity_per_category (one pre-pass, HashMap)                 │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │  for each line item:                                                    │
//! │                                                                         │
//! │    quantity > threshold? ──yes──► product_discount                      │
//! │         │ no                                                            │
//! │         ▼                                                               │
//! │    category total > threshold? ──yes──► category_discount               │
//! │         │ no                                                            │
//! │         ▼                                                               │
//! │    no discount                                                          │
//! │                                                                         │
//! │    line = price × quantity × (1 − rate)    (only when rate > 0)         │
//! │                                                                         │
//! │  total = Σ line   (starting from exact zero)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At most one rate applies per line: discounts never stack. The threshold
//! is exclusive, so `quantity == threshold` does not qualify.
//!
//! ## Example
//! ```rust
//! use cartwise_core::{Cart, Category, Money, PricingEngine, Product};
//! use cartwise_core::types::DiscountRate;
//!
//! let engine = PricingEngine::from_parts(
//!     10,
//!     DiscountRate::from_bps(1000), // 10% product discount
//!     DiscountRate::from_bps(500),  // 5% category discount
//! );
//!
//! let mut cart = Cart::new();
//! cart.add(Product::new("Monitor", Money::from_cents(10000), Category::Electronics), 11);
//! cart.add(Product::new("Cable", Money::from_cents(5000), Category::Electronics), 5);
//!
//! // 100.00 × 11 × 0.90 + 50.00 × 5 × 0.95
//! assert_eq!(engine.calculate_total_price(&cart), Money::from_cents(122750));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use ts_rs::TS;

use crate::config::DiscountConfig;
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Cart, Category, DiscountRate, LineItem};
use crate::validation::validate_cart;

// =============================================================================
// Applied Discount
// =============================================================================

/// Which rule produced a line's discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    None,
    /// The line's own quantity beat the threshold.
    Product,
    /// The line's category total beat the threshold.
    Category,
}

/// The single discount chosen for a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    pub rate: DiscountRate,
}

impl AppliedDiscount {
    pub const fn none() -> Self {
        AppliedDiscount {
            kind: DiscountKind::None,
            rate: DiscountRate::zero(),
        }
    }

    /// Applies the rate to `amount`.
    ///
    /// Only a strictly positive rate changes the amount; zero and
    /// negative rates leave it as-is.
    pub fn apply(&self, amount: Money) -> Money {
        if self.rate.is_positive() {
            amount.apply_discount(self.rate)
        } else {
            amount
        }
    }

    /// `apply` that reports overflow and rounding instead of panicking.
    pub fn checked_apply(&self, amount: Money) -> CoreResult<Money> {
        if self.rate.is_positive() {
            amount.checked_apply_discount(self.rate)
        } else {
            Ok(amount)
        }
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// Receipt view of one priced line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LinePrice {
    pub product_id: String,
    pub name: String,
    pub category: Category,
    pub quantity: i64,
    /// Undiscounted `price_per_unit × quantity`.
    pub line_total: Money,
    pub discount: AppliedDiscount,
    pub discounted_total: Money,
}

/// Receipt view of a whole cart.
///
/// `subtotal − discount == total`, and `total` always equals
/// [`PricingEngine::calculate_total_price`] for the same cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub lines: Vec<LinePrice>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Stateless pricing engine.
///
/// Holds only an immutable [`DiscountConfig`], so one instance can be
/// shared across threads and called concurrently without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    config: DiscountConfig,
}

impl PricingEngine {
    pub const fn new(config: DiscountConfig) -> Self {
        PricingEngine { config }
    }

    /// Builds an engine straight from the threshold and the two rates.
    pub const fn from_parts(
        discount_amount: i64,
        product_discount: DiscountRate,
        category_discount: DiscountRate,
    ) -> Self {
        PricingEngine::new(DiscountConfig::new(
            discount_amount,
            product_discount,
            category_discount,
        ))
    }

    /// Builds an engine from `CARTWISE_*` environment variables.
    pub fn from_env() -> CoreResult<Self> {
        Ok(PricingEngine::new(DiscountConfig::from_env()?))
    }

    /// Builds an engine from a JSON discount configuration.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(PricingEngine::new(DiscountConfig::from_json(json)?))
    }

    pub const fn config(&self) -> &DiscountConfig {
        &self.config
    }

    /// Calculates the discounted total of a cart.
    ///
    /// Non-positive quantities and out-of-range rates are not checked.
    /// Panics if an amount leaves the `Decimal` range, and is exact only
    /// while every intermediate fits in 28 significant digits; use
    /// [`try_calculate_total_price`](Self::try_calculate_total_price) to
    /// get errors for all of these instead.
    pub fn calculate_total_price(&self, cart: &Cart) -> Money {
        let quantities = cart.quantity_per_category();

        let total: Money = cart
            .iter()
            .map(|item| self.line_price(item, &quantities))
            .sum();

        debug!(
            items = cart.len(),
            categories = quantities.len(),
            total = %total,
            "Calculated cart total"
        );
        total
    }

    /// Validates every line item, then calculates the total with checked
    /// arithmetic.
    ///
    /// ## Errors
    /// - `CoreError::InvalidInput` when a quantity is not positive or a
    ///   unit price is negative. Nothing is priced in that case.
    /// - `CoreError::Overflow` when an amount leaves the `Decimal` range.
    /// - `CoreError::PrecisionLoss` when an amount needs more than 28
    ///   significant digits.
    pub fn try_calculate_total_price(&self, cart: &Cart) -> CoreResult<Money> {
        validate_cart(cart)?;
        let quantities = cart.quantity_per_category();

        let total = cart.iter().try_fold(Money::zero(), |total, item| {
            total.checked_add(self.checked_line_price(item, &quantities)?)
        })?;

        debug!(
            items = cart.len(),
            categories = quantities.len(),
            total = %total,
            "Calculated cart total (checked)"
        );
        Ok(total)
    }

    /// Prices a cart line by line.
    pub fn price_breakdown(&self, cart: &Cart) -> PriceBreakdown {
        let quantities = cart.quantity_per_category();

        let lines: Vec<LinePrice> = cart
            .iter()
            .map(|item| {
                let line_total = item.line_total();
                let discount = self.calculate_discount(item, &quantities);
                LinePrice {
                    product_id: item.product.id.clone(),
                    name: item.product.name.clone(),
                    category: item.category(),
                    quantity: item.quantity,
                    line_total,
                    discount,
                    discounted_total: discount.apply(line_total),
                }
            })
            .collect();

        let subtotal: Money = lines.iter().map(|l| l.line_total).sum();
        let total: Money = lines.iter().map(|l| l.discounted_total).sum();

        PriceBreakdown {
            lines,
            subtotal,
            discount: subtotal - total,
            total,
        }
    }

    /// Checked twin of [`price_breakdown`](Self::price_breakdown); fails the
    /// same way as [`try_calculate_total_price`](Self::try_calculate_total_price).
    pub fn try_price_breakdown(&self, cart: &Cart) -> CoreResult<PriceBreakdown> {
        validate_cart(cart)?;
        let quantities = cart.quantity_per_category();

        let mut lines = Vec::with_capacity(cart.len());
        let mut subtotal = Money::zero();
        let mut total = Money::zero();
        for item in cart {
            let line_total = item.checked_line_total()?;
            let discount = self.calculate_discount(item, &quantities);
            let discounted_total = discount.checked_apply(line_total)?;

            subtotal = subtotal.checked_add(line_total)?;
            total = total.checked_add(discounted_total)?;
            lines.push(LinePrice {
                product_id: item.product.id.clone(),
                name: item.product.name.clone(),
                category: item.category(),
                quantity: item.quantity,
                line_total,
                discount,
                discounted_total,
            });
        }

        Ok(PriceBreakdown {
            lines,
            subtotal,
            discount: subtotal.checked_sub(total)?,
            total,
        })
    }

    /// Picks the discount for one line item.
    ///
    /// `quantities` is the per-category sum for the whole cart (see
    /// [`Cart::quantity_per_category`]); a missing category counts as 0.
    /// The category rule is only consulted when the line itself does not
    /// beat the threshold.
    pub fn calculate_discount(
        &self,
        item: &LineItem,
        quantities: &HashMap<Category, i128>,
    ) -> AppliedDiscount {
        let threshold = self.config.discount_amount();

        if item.quantity > threshold {
            return AppliedDiscount {
                kind: DiscountKind::Product,
                rate: self.config.product_discount(),
            };
        }

        let category_quantity = quantities.get(&item.category()).copied().unwrap_or(0);
        if category_quantity > i128::from(threshold) {
            return AppliedDiscount {
                kind: DiscountKind::Category,
                rate: self.config.category_discount(),
            };
        }

        AppliedDiscount::none()
    }

    /// Discounted price of one line item.
    pub fn line_price(&self, item: &LineItem, quantities: &HashMap<Category, i128>) -> Money {
        let discount = self.calculate_discount(item, quantities);
        let price = discount.apply(item.line_total());

        trace!(
            product_id = %item.product.id,
            quantity = item.quantity,
            kind = ?discount.kind,
            rate = %discount.rate,
            price = %price,
            "Priced line item"
        );
        price
    }

    fn checked_line_price(
        &self,
        item: &LineItem,
        quantities: &HashMap<Category, i128>,
    ) -> CoreResult<Money> {
        let discount = self.calculate_discount(item, quantities);
        discount.checked_apply(item.checked_line_total()?)
    }
}

impl From<DiscountConfig> for PricingEngine {
    fn from(config: DiscountConfig) -> Self {
        PricingEngine::new(config)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::config::ConfigError;
    use crate::error::{CoreError, ValidationError};
    use crate::types::Product;

    /// threshold 10, product 10%, category 5%
    fn engine() -> PricingEngine {
        PricingEngine::from_parts(10, DiscountRate::from_bps(1000), DiscountRate::from_bps(500))
    }

    fn product(price: &str, category: Category) -> Product {
        Product::new("Test product", price.parse().unwrap(), category)
    }

    fn money(amount: &str) -> Money {
        amount.parse().unwrap()
    }

    #[test]
    fn test_empty_cart_is_exact_zero() {
        let configs = [
            engine(),
            PricingEngine::from_parts(0, DiscountRate::zero(), DiscountRate::zero()),
            PricingEngine::from_parts(-5, DiscountRate::from_decimal(dec!(2)), DiscountRate::from_bps(1)),
        ];
        for engine in configs {
            let total = engine.calculate_total_price(&Cart::new());
            assert!(total.is_zero());
            assert_eq!(total, Money::zero());
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Books), 10);

        assert_eq!(engine().calculate_total_price(&cart), money("100.00"));
    }

    #[test]
    fn test_category_sum_equal_to_threshold_gets_no_discount() {
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Books), 4);
        cart.add(product("20.00", Category::Books), 6);

        // 40.00 + 120.00, undiscounted
        assert_eq!(engine().calculate_total_price(&cart), cart.subtotal());
        assert_eq!(engine().calculate_total_price(&cart), money("160.00"));
    }

    #[test]
    fn test_product_level_trigger() {
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Food), 11);

        // 10.00 × 11 × (1 − 0.10)
        assert_eq!(engine().calculate_total_price(&cart), money("99.00"));
    }

    #[test]
    fn test_category_level_trigger_without_single_item_over_threshold() {
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Clothing), 6);
        cart.add(product("4.00", Category::Clothing), 5);
        cart.add(product("3.00", Category::Drinks), 3);

        let engine = engine();
        let quantities = cart.quantity_per_category();
        for item in cart.iter().take(2) {
            let discount = engine.calculate_discount(item, &quantities);
            assert_eq!(discount.kind, DiscountKind::Category);
            assert_eq!(discount.rate, DiscountRate::from_bps(500));
        }
        assert_eq!(
            engine.calculate_discount(&cart.items()[2], &quantities),
            AppliedDiscount::none()
        );

        // 60.00 × 0.95 + 20.00 × 0.95 + 9.00
        assert_eq!(engine.calculate_total_price(&cart), money("85.00"));
    }

    #[test]
    fn test_product_discount_never_stacks_with_category() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 1);

        let engine = engine();
        let breakdown = engine.price_breakdown(&cart);

        assert_eq!(breakdown.lines[0].discount.kind, DiscountKind::Product);
        assert_eq!(breakdown.lines[0].discounted_total, money("990.00"));
        assert_eq!(breakdown.lines[1].discount.kind, DiscountKind::Category);
        assert_eq!(breakdown.lines[1].discounted_total, money("47.50"));
    }

    #[test]
    fn test_reference_scenario() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 5);

        let total = engine().calculate_total_price(&cart);
        assert_eq!(total, money("1227.50"));
        assert_eq!(total.to_string(), "$1227.50");
    }

    #[test]
    fn test_order_does_not_change_total() {
        let items = vec![
            LineItem::new(product("100.00", Category::Electronics), 11),
            LineItem::new(product("50.00", Category::Electronics), 5),
            LineItem::new(product("1.99", Category::Food), 7),
            LineItem::new(product("2.49", Category::Food), 4),
            LineItem::new(product("12.00", Category::Home), 2),
        ];
        let engine = engine();
        let expected = engine.calculate_total_price(&Cart::from_items(items.clone()));

        for shift in 0..items.len() {
            let mut rotated = items.clone();
            rotated.rotate_left(shift);
            assert_eq!(engine.calculate_total_price(&Cart::from_items(rotated.clone())), expected);

            rotated.reverse();
            assert_eq!(engine.calculate_total_price(&Cart::from_items(rotated)), expected);
        }
    }

    #[test]
    fn test_line_contribution_is_monotonic_in_quantity() {
        let p = product("3.33", Category::Books);
        let discount = AppliedDiscount {
            kind: DiscountKind::Category,
            rate: DiscountRate::from_bps(500),
        };

        let mut previous = Money::zero();
        for qty in 1..=25 {
            let line = LineItem::new(p.clone(), qty).line_total();
            let discounted = discount.apply(line);
            assert!(line >= previous);
            assert!(discounted >= discount.apply(previous));
            previous = line;
        }
    }

    #[test]
    fn test_sub_cent_results_are_not_rounded() {
        let mut cart = Cart::new();
        cart.add(product("1.99", Category::Drinks), 3);
        cart.add(product("0.01", Category::Drinks), 8);

        // category total 11: 5.97 × 0.95 + 0.08 × 0.95
        let total = engine().calculate_total_price(&cart);
        assert_eq!(total.amount(), dec!(5.7475));
        assert_eq!(total.round_to_cents(), money("5.75"));
    }

    #[test]
    fn test_duplicate_products_are_independent_lines() {
        let p = product("10.00", Category::Home);
        let mut cart = Cart::new();
        cart.add(p.clone(), 6);
        cart.add(p, 6);

        // neither line beats 10 alone; category total 12 does
        let breakdown = engine().price_breakdown(&cart);
        assert!(breakdown
            .lines
            .iter()
            .all(|l| l.discount.kind == DiscountKind::Category));
        assert_eq!(breakdown.total, money("114.00"));
    }

    #[test]
    fn test_zero_rate_leaves_price_unchanged() {
        let engine = PricingEngine::from_parts(1, DiscountRate::zero(), DiscountRate::zero());
        let mut cart = Cart::new();
        cart.add(product("9.99", Category::Food), 5);

        assert_eq!(engine.calculate_total_price(&cart), money("49.95"));
    }

    #[test]
    fn test_negative_threshold_always_qualifies() {
        let engine =
            PricingEngine::from_parts(-1, DiscountRate::from_bps(1000), DiscountRate::from_bps(500));
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Food), 1);

        assert_eq!(engine.calculate_total_price(&cart), money("9.00"));
    }

    #[test]
    fn test_rate_above_one_passes_through() {
        let engine = PricingEngine::from_parts(
            10,
            DiscountRate::from_decimal(dec!(1.5)),
            DiscountRate::from_bps(500),
        );
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);

        // 1100.00 × (1 − 1.5)
        assert_eq!(engine.calculate_total_price(&cart), money("-550.00"));
    }

    #[test]
    fn test_negative_rate_is_ignored() {
        let engine = PricingEngine::from_parts(
            10,
            DiscountRate::from_decimal(dec!(-0.10)),
            DiscountRate::from_bps(500),
        );
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);

        assert_eq!(engine.calculate_total_price(&cart), money("1100.00"));
    }

    /// Non-positive quantities flow through `calculate_total_price` and are
    /// rejected by `try_calculate_total_price`.
    #[test]
    fn test_non_positive_quantity_handling() {
        let mut cart = Cart::new();
        cart.add(product("10.00", Category::Food), 3);
        cart.add(product("10.00", Category::Food), -2);

        let engine = engine();
        assert_eq!(engine.calculate_total_price(&cart), money("10.00"));

        let err = engine.try_calculate_total_price(&cart).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::MustBePositive { .. })
        ));

        let mut zero = Cart::new();
        zero.add(product("10.00", Category::Food), 0);
        assert!(engine.calculate_total_price(&zero).is_zero());
        assert!(engine.try_calculate_total_price(&zero).is_err());
    }

    #[test]
    fn test_try_calculate_matches_plain_path_on_valid_cart() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 5);

        let engine = engine();
        assert_eq!(
            engine.try_calculate_total_price(&cart).unwrap(),
            engine.calculate_total_price(&cart)
        );
        assert_eq!(engine.try_calculate_total_price(&Cart::new()).unwrap(), Money::zero());
    }

    #[test]
    fn test_breakdown_is_consistent_with_total() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 5);
        cart.add(product("2.50", Category::Drinks), 2);

        let engine = engine();
        let breakdown = engine.price_breakdown(&cart);

        assert_eq!(breakdown.lines.len(), 3);
        assert_eq!(breakdown.total, engine.calculate_total_price(&cart));
        assert_eq!(breakdown.subtotal, cart.subtotal());
        assert_eq!(breakdown.subtotal - breakdown.discount, breakdown.total);
        assert_eq!(breakdown.discount, money("122.50"));
        assert_eq!(breakdown.lines[2].discount, AppliedDiscount::none());
        assert_eq!(breakdown.lines[0].product_id, cart.items()[0].product.id);
    }

    #[test]
    fn test_breakdown_serializes_money_as_strings() {
        let mut cart = Cart::new();
        cart.add(product("50.00", Category::Electronics), 11);

        let json = serde_json::to_value(engine().price_breakdown(&cart)).unwrap();
        let total: Money = json["total"].as_str().unwrap().parse().unwrap();
        assert_eq!(total, money("495.00"));
        assert_eq!(json["lines"][0]["discount"]["kind"], "product");
        assert_eq!(json["lines"][0]["category"], "electronics");
    }

    #[test]
    fn test_engine_does_not_mutate_cart() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        let before = cart.clone();

        let engine = engine();
        let first = engine.calculate_total_price(&cart);
        let second = engine.calculate_total_price(&cart);

        assert_eq!(first, second);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricingEngine>();

        let engine = engine();
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 5);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| engine.calculate_total_price(&cart)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), money("1227.50"));
            }
        });
    }

    #[test]
    fn test_engine_from_config() {
        let config = DiscountConfig::from_json(
            r#"{"discount_amount": 10, "product_discount": "0.10", "category_discount": "0.05"}"#,
        )
        .unwrap();
        let engine = PricingEngine::from(config);
        assert_eq!(engine, self::engine());
        assert_eq!(engine.config().discount_amount(), 10);
    }

    #[test]
    fn test_engine_from_json_reports_config_error() {
        let engine = PricingEngine::from_json(
            r#"{"discount_amount": 10, "product_discount": "0.10", "category_discount": "0.05"}"#,
        )
        .unwrap();
        assert_eq!(engine, self::engine());

        let err = PricingEngine::from_json(r#"{"discount_amount": 10, "product_discount": "0.10"}"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::Json(_))));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    fn overflowing_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(product("1000000000000000.00", Category::Electronics), 100_000_000_000_000);
        cart
    }

    #[test]
    fn test_try_calculate_reports_overflow() {
        let err = engine().try_calculate_total_price(&overflowing_cart()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Overflow {
                operation: "multiply_quantity"
            }
        ));
    }

    #[test]
    fn test_try_calculate_reports_overflow_in_sum() {
        // each line fits; their sum does not
        let mut cart = Cart::new();
        cart.add(product("70000000000000000000000000000", Category::Home), 1);
        cart.add(product("70000000000000000000000000000", Category::Books), 1);

        let err = engine().try_calculate_total_price(&cart).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { operation: "add" }));
    }

    #[test]
    fn test_try_price_breakdown_reports_overflow() {
        let err = engine().try_price_breakdown(&overflowing_cart()).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { .. }));
    }

    #[test]
    fn test_try_price_breakdown_matches_plain_path() {
        let mut cart = Cart::new();
        cart.add(product("100.00", Category::Electronics), 11);
        cart.add(product("50.00", Category::Electronics), 5);
        cart.add(product("2.50", Category::Drinks), 2);

        let engine = engine();
        assert_eq!(engine.try_price_breakdown(&cart).unwrap(), engine.price_breakdown(&cart));

        cart.add(product("1.00", Category::Drinks), 0);
        assert!(matches!(
            engine.try_price_breakdown(&cart),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    #[should_panic]
    fn test_plain_path_panics_on_overflow() {
        let _ = engine().calculate_total_price(&overflowing_cart());
    }

    #[test]
    fn test_try_calculate_reports_precision_loss() {
        let engine = PricingEngine::from_parts(
            0,
            DiscountRate::from_decimal(dec!(0.1234567890123456789)),
            DiscountRate::zero(),
        );
        let mut cart = Cart::new();
        cart.add(product("12345678901.23456789", Category::Food), 1);

        let err = engine.try_calculate_total_price(&cart).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PrecisionLoss {
                operation: "apply_discount"
            }
        ));
    }

    #[test]
    fn test_category_sum_beyond_i64_does_not_overflow() {
        let mut cart = Cart::new();
        cart.add(product("0.00", Category::Food), i64::MAX);
        cart.add(product("2.00", Category::Food), 1);

        let engine = engine();
        let quantities = cart.quantity_per_category();
        assert_eq!(quantities[&Category::Food], i128::from(i64::MAX) + 1);
        assert_eq!(
            engine.calculate_discount(&cart.items()[1], &quantities).kind,
            DiscountKind::Category
        );

        // 0.00 × i64::MAX × 0.90 + 2.00 × 0.95
        assert_eq!(engine.calculate_total_price(&cart), money("1.90"));
        assert_eq!(engine.try_calculate_total_price(&cart).unwrap(), money("1.90"));
    }
}
