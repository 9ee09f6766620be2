//! Currency amounts and tax rates as exact integer quantities.
//!
//! Amounts are carried in smallest currency units (cents) and tax rates in
//! basis points, so aggregation never touches floating point. Rounding to
//! whole cents happens once, at the end of a tax computation.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Amount in smallest currency unit (e.g., cents).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Convenience for whole-currency amounts (`from_dollars(85)` == 85.00).
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiply by a line quantity. `None` on overflow.
    pub fn checked_mul(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Exact sum of a sequence of amounts.
    ///
    /// Accumulates in `i128`; a sum outside the `i64` range saturates rather
    /// than wrapping.
    pub fn sum<I: IntoIterator<Item = Money>>(amounts: I) -> Money {
        let raw: i128 = amounts.into_iter().map(|a| i128::from(a.0)).sum();
        Money(raw.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Tax rate in basis points (one hundredth of a percent).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 10% GST, the rate preset for a new business.
    pub const DEFAULT_GST: TaxRate = TaxRate(1000);

    pub const ZERO: TaxRate = TaxRate(0);

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Build from a percentage (`10.0` == 10%), as stored in business settings.
    pub fn from_percent(percent: f64) -> DomainResult<Self> {
        if !percent.is_finite() || percent < 0.0 {
            return Err(DomainError::validation(
                "tax rate must be a non-negative percentage",
            ));
        }
        Ok(Self((percent * 100.0).round() as u32))
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    /// Tax on a sum of amounts.
    ///
    /// Each product is accumulated at full cent-times-basis-point precision;
    /// the division to whole cents happens once, rounding half-up, so
    /// per-line rounding error cannot compound across many lines.
    pub fn applied_to_sum<I: IntoIterator<Item = Money>>(self, amounts: I) -> Money {
        let raw: i128 = amounts
            .into_iter()
            .map(|a| i128::from(a.cents()) * i128::from(self.0))
            .sum();
        Money::from_cents(round_basis_point_product(raw))
    }

    /// Tax on a single amount, rounded half-up to the nearest cent.
    pub fn applied_to(self, amount: Money) -> Money {
        self.applied_to_sum([amount])
    }
}

/// Divide a cent-times-basis-point product back to cents, rounding half-up
/// away from zero.
fn round_basis_point_product(raw: i128) -> i64 {
    let rounded = if raw >= 0 {
        (raw + 5_000) / 10_000
    } else {
        -((-raw + 5_000) / 10_000)
    };
    rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
