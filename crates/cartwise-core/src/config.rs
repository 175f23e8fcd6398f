//! Discount configuration.
//!
//! A [`DiscountConfig`] can be built three ways: directly, through
//! [`DiscountConfigBuilder`], or loaded from the environment / JSON. The
//! last two can fail when a field is absent, which is the only
//! construction-time failure in the crate. Once built, a config is
//! immutable.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::DiscountRate;
use crate::validation::{validate_discount_rate, ValidationResult};

/// Environment variable holding the quantity threshold.
pub const ENV_DISCOUNT_AMOUNT: &str = "CARTWISE_DISCOUNT_AMOUNT";
/// Environment variable holding the product-level rate.
pub const ENV_PRODUCT_DISCOUNT: &str = "CARTWISE_PRODUCT_DISCOUNT";
/// Environment variable holding the category-level rate.
pub const ENV_CATEGORY_DISCOUNT: &str = "CARTWISE_CATEGORY_DISCOUNT";

/// Volume discount settings.
///
/// ## Fields
/// - `discount_amount`: quantity threshold, exclusive (`quantity > threshold`)
/// - `product_discount`: rate when one line item alone beats the threshold
/// - `category_discount`: rate when the line's category total beats it
///
/// A negative threshold is accepted and makes every line qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DiscountConfigBuilder")]
pub struct DiscountConfig {
    discount_amount: i64,
    product_discount: DiscountRate,
    category_discount: DiscountRate,
}

impl DiscountConfig {
    pub const fn new(
        discount_amount: i64,
        product_discount: DiscountRate,
        category_discount: DiscountRate,
    ) -> Self {
        DiscountConfig {
            discount_amount,
            product_discount,
            category_discount,
        }
    }

    pub fn builder() -> DiscountConfigBuilder {
        DiscountConfigBuilder::default()
    }

    #[inline]
    pub const fn discount_amount(&self) -> i64 {
        self.discount_amount
    }

    #[inline]
    pub const fn product_discount(&self) -> DiscountRate {
        self.product_discount
    }

    #[inline]
    pub const fn category_discount(&self) -> DiscountRate {
        self.category_discount
    }

    /// Load configuration from environment variables.
    ///
    /// All three of `CARTWISE_DISCOUNT_AMOUNT`, `CARTWISE_PRODUCT_DISCOUNT`
    /// and `CARTWISE_CATEGORY_DISCOUNT` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingRequired(key.to_string()))
        };

        let discount_amount = read(ENV_DISCOUNT_AMOUNT)?
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidValue(ENV_DISCOUNT_AMOUNT.to_string()))?;

        let product_discount = read(ENV_PRODUCT_DISCOUNT)?
            .parse::<DiscountRate>()
            .map_err(|_| ConfigError::InvalidValue(ENV_PRODUCT_DISCOUNT.to_string()))?;

        let category_discount = read(ENV_CATEGORY_DISCOUNT)?
            .parse::<DiscountRate>()
            .map_err(|_| ConfigError::InvalidValue(ENV_CATEGORY_DISCOUNT.to_string()))?;

        debug!(
            discount_amount,
            %product_discount,
            %category_discount,
            "Loaded discount configuration"
        );

        Ok(DiscountConfig::new(
            discount_amount,
            product_discount,
            category_discount,
        ))
    }

    /// Parses a JSON document such as
    /// `{"discount_amount": 10, "product_discount": "0.10", "category_discount": "0.05"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Opt-in range check: both rates must lie in `[0, 1]`.
    ///
    /// The engine itself never calls this; out-of-range rates flow
    /// through the arithmetic unchanged.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_discount_rate("product_discount", self.product_discount)?;
        validate_discount_rate("category_discount", self.category_discount)?;
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects config fields; `build` fails if any is missing.
///
/// Also serves as the raw deserialization shape, so JSON with a missing
/// or `null` rate is rejected the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscountConfigBuilder {
    discount_amount: Option<i64>,
    product_discount: Option<DiscountRate>,
    category_discount: Option<DiscountRate>,
}

impl DiscountConfigBuilder {
    pub fn discount_amount(mut self, threshold: i64) -> Self {
        self.discount_amount = Some(threshold);
        self
    }

    pub fn product_discount(mut self, rate: DiscountRate) -> Self {
        self.product_discount = Some(rate);
        self
    }

    pub fn category_discount(mut self, rate: DiscountRate) -> Self {
        self.category_discount = Some(rate);
        self
    }

    pub fn build(self) -> Result<DiscountConfig, ConfigError> {
        let discount_amount = self
            .discount_amount
            .ok_or_else(|| ConfigError::MissingRequired("discount_amount".to_string()))?;
        let product_discount = self
            .product_discount
            .ok_or_else(|| ConfigError::MissingRequired("product_discount".to_string()))?;
        let category_discount = self
            .category_discount
            .ok_or_else(|| ConfigError::MissingRequired("category_discount".to_string()))?;

        Ok(DiscountConfig::new(
            discount_amount,
            product_discount,
            category_discount,
        ))
    }
}

impl TryFrom<DiscountConfigBuilder> for DiscountConfig {
    type Error = ConfigError;

    fn try_from(builder: DiscountConfigBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}
