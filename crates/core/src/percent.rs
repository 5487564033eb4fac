//! Discount percentage with two decimals of precision.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::money::{Money, DECIMAL_PLACES};

/// Basis points in 100%.
pub const FULL_BASIS_POINTS: u32 = 10_000;

/// A discount in `[0, 100]` percent, stored as basis points (1 bp = 0.01%).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DiscountPercent(u32);

impl DiscountPercent {
    pub const ZERO: DiscountPercent = DiscountPercent(0);
    pub const FULL: DiscountPercent = DiscountPercent(FULL_BASIS_POINTS);

    /// Strict constructor from basis points.
    pub fn from_basis_points(bps: u32) -> DomainResult<Self> {
        if bps > FULL_BASIS_POINTS {
            return Err(DomainError::validation(format!(
                "discount percent must be within 0..=100 (got {}.{:02})",
                bps / 100,
                bps % 100
            )));
        }
        Ok(Self(bps))
    }

    /// Strict constructor from a percentage; rejects non-finite or
    /// out-of-range values.
    pub fn try_from_percent(percent: f64) -> DomainResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(DomainError::validation(format!(
                "discount percent must be within 0..=100 (got {percent})"
            )));
        }
        let bps = percent_to_basis_points(percent)
            .ok_or_else(|| DomainError::validation(format!("invalid discount: {percent}")))?;
        Ok(Self::clamped_basis_points(bps))
    }

    /// Lenient constructor: clamps any input to `[0, 100]`. NaN counts as 0.
    pub fn clamped(percent: f64) -> Self {
        if percent.is_nan() || percent <= 0.0 {
            return Self::ZERO;
        }
        if percent >= 100.0 {
            return Self::FULL;
        }
        Self::clamped_basis_points(percent_to_basis_points(percent).unwrap_or(0))
    }

    pub fn clamped_basis_points(bps: i64) -> Self {
        Self(bps.clamp(0, i64::from(FULL_BASIS_POINTS)) as u32)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Share of `whole` that `part` represents, rounded half-up to a basis
    /// point and clamped to `[0, 100]`. Zero when `whole` is not positive.
    pub fn share_of(part: Money, whole: Money) -> Self {
        if !whole.is_positive() {
            return Self::ZERO;
        }
        let bps = (part.to_decimal() * Decimal::from(FULL_BASIS_POINTS))
            .checked_div(whole.to_decimal())
            .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|d| d.to_i64())
            .unwrap_or(0);
        Self::clamped_basis_points(bps)
    }

    /// Fraction of a whole (`0.25` for 25%).
    pub fn as_fraction(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(FULL_BASIS_POINTS)
    }

    /// Discount amount for `base`, rounded half-up to the minor unit.
    pub fn amount_of(self, base: Money) -> Money {
        // |amount| <= |base| because bps <= 10_000, so it always fits.
        Money::from_decimal(base.to_decimal() * self.as_fraction()).unwrap_or(base)
    }
}

/// Percentage rounded to two decimals (ties away from zero), in basis points.
fn percent_to_basis_points(percent: f64) -> Option<i64> {
    Decimal::from_f64(percent)?
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
}

impl TryFrom<u32> for DiscountPercent {
    type Error = DomainError;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::from_basis_points(bps)
    }
}

impl From<DiscountPercent> for u32 {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl core::fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
