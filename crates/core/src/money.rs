//! Fixed-point money with two fractional digits.
//!
//! Every amount that leaves this type has been rounded to [`Money::SCALE`]
//! digits using round-half-up (away from zero at the midpoint). Intermediate
//! results that need their own rounding step (e.g. unit cost before markup) go
//! through the `checked_*` helpers so each step rounds exactly once.
//!
//! There is no `Add` or `Sum`. Totals go through [`Money::checked_sum`] and
//! overflow comes back as `None`.

use core::ops::Neg;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount (signed), always held at two decimal places.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Number of fractional digits kept for every monetary value.
    pub const SCALE: u32 = 2;

    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Build from an arbitrary decimal, rounding half-up to two places.
    pub fn new(amount: Decimal) -> Self {
        Self(round_half_up(amount))
    }

    /// Build from an integer number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, Self::SCALE))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Divide evenly into `parts`, rounding the share to two places.
    ///
    /// Returns `None` when `parts` is zero or the division overflows.
    pub fn checked_split(&self, parts: u32) -> Option<Money> {
        self.0.checked_div(Decimal::from(parts)).map(Money::new)
    }

    /// `self + self * rate`, rounded to two places.
    pub fn checked_markup(&self, rate: Decimal) -> Option<Money> {
        let markup = self.0.checked_mul(rate)?;
        self.0.checked_add(markup).map(Money::new)
    }

    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money::new)
    }

    /// Sum a sequence of amounts, `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }
}

fn round_half_up(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(Money::SCALE, RoundingStrategy::MidpointAwayFromZero);
    // Keep the scale fixed so "12" and "12.00" render identically.
    rounded.rescale(Money::SCALE);
    rounded
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money::new)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}
