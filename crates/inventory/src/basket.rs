use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::{Entity, Money};

/// Position of a basket in the order it was received (unique per warehouse).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketId(pub u64);

impl core::fmt::Display for BasketId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "basket#{}", self.0)
    }
}

/// One unit of perishable stock.
///
/// Immutable once created. Callers treat baskets with the same expiry date and
/// price as interchangeable; the id only exists so stock is pruned by identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basket {
    id: BasketId,
    expiry_date: NaiveDate,
    unit_sale_price: Money,
}

impl Basket {
    pub fn new(id: BasketId, expiry_date: NaiveDate, unit_sale_price: Money) -> Self {
        Self {
            id,
            expiry_date,
            unit_sale_price,
        }
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn unit_sale_price(&self) -> Money {
        self.unit_sale_price
    }

    /// Expired means the expiry date is strictly before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }
}

impl Entity for Basket {
    type Id = BasketId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
