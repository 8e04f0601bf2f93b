//! Sale price derivation for incoming deliveries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use larder_core::{DomainError, DomainResult, Money};

/// Markup applied on top of the unit cost unless configured otherwise (20%).
pub const DEFAULT_MARKUP_RATE: Decimal = dec!(0.20);

/// Unit cost and sale price derived for one delivery.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub unit_cost: Money,
    pub unit_sale_price: Money,
}

/// Cost-plus pricing.
///
/// The unit cost is rounded to cents *before* the markup is applied, and the
/// marked-up price is rounded again. Both roundings are half-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    markup_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            markup_rate: DEFAULT_MARKUP_RATE,
        }
    }
}

impl PricingPolicy {
    pub fn new(markup_rate: Decimal) -> DomainResult<Self> {
        if markup_rate < Decimal::ZERO {
            return Err(DomainError::invalid_price(format!(
                "markup rate cannot be negative (got {markup_rate})"
            )));
        }
        Ok(Self { markup_rate })
    }

    pub fn markup_rate(&self) -> Decimal {
        self.markup_rate
    }

    /// Price one basket out of a delivery of `quantity` baskets costing `delivery_price`.
    pub fn quote(&self, delivery_price: Money, quantity: u32) -> DomainResult<Quote> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity("delivery must contain at least one basket"));
        }
        if !delivery_price.is_positive() {
            return Err(DomainError::invalid_price(format!(
                "delivery price must be positive (got {delivery_price})"
            )));
        }

        let unit_cost = delivery_price.checked_split(quantity).ok_or_else(|| {
            DomainError::arithmetic(format!("cannot divide {delivery_price} by {quantity}"))
        })?;
        let unit_sale_price = unit_cost.checked_markup(self.markup_rate).ok_or_else(|| {
            DomainError::arithmetic(format!(
                "cannot apply markup {} to {unit_cost}",
                self.markup_rate
            ))
        })?;

        if !unit_sale_price.is_positive() {
            return Err(DomainError::invalid_price(format!(
                "delivery price {delivery_price} over {quantity} baskets gives a zero sale price"
            )));
        }

        Ok(Quote {
            unit_cost,
            unit_sale_price,
        })
    }
}
