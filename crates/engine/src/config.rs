//! Engine configuration.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use larder_core::DomainResult;
use larder_inventory::{DEFAULT_MARKUP_RATE, PricingPolicy};

/// Environment variable overriding the markup rate (e.g. `0.20` for 20%).
pub const MARKUP_RATE_ENV: &str = "LARDER_MARKUP_RATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of the unit cost added on top to get the sale price.
    pub markup_rate: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            markup_rate: DEFAULT_MARKUP_RATE,
        }
    }
}

impl EngineConfig {
    /// Load from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    ///
    /// Unparseable or negative values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MARKUP_RATE_ENV) {
            match Decimal::from_str(raw.trim()) {
                Ok(rate) if rate >= Decimal::ZERO => config.markup_rate = rate,
                Ok(rate) => tracing::warn!(
                    %rate,
                    default = %DEFAULT_MARKUP_RATE,
                    "{MARKUP_RATE_ENV} is negative; using default"
                ),
                Err(err) => tracing::warn!(
                    value = %raw,
                    error = %err,
                    default = %DEFAULT_MARKUP_RATE,
                    "{MARKUP_RATE_ENV} is not a decimal; using default"
                ),
            }
        }

        config
    }

    pub fn pricing(&self) -> DomainResult<PricingPolicy> {
        PricingPolicy::new(self.markup_rate)
    }
}
