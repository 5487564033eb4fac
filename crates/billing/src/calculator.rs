//! Invoice totals.
//!
//! ```text
//! subtotal        = Σ line_amount
//! discount_amount = round_half_up(subtotal × discount% / 100)
//!                   (or a recorded absolute amount, capped at subtotal)
//! net_amount      = max(subtotal − discount_amount, 0)
//! due_amount      = net_amount − amount_received      (may be negative)
//! ```

use serde::Serialize;

use visionpoint_core::{DiscountPercent, Money};

use crate::error::{BillingError, BillingField};
use crate::line_item::LineItem;
use crate::policy::{DueView, OverpaymentPolicy};

/// Amount of a single line: `unit_price × quantity`.
///
/// Rejects a negative price or a quantity below one. Amounts are in minor
/// units, so the product is exact and already at two decimals.
pub fn compute_line_amount(unit_price: Money, quantity: i64) -> Result<Money, BillingError> {
    if unit_price.is_negative() {
        return Err(BillingError::invalid(
            BillingField::UnitPrice,
            format!("must not be negative (got {unit_price})"),
        ));
    }
    if quantity < 1 {
        return Err(BillingError::invalid(
            BillingField::Quantity,
            format!("must be at least 1 (got {quantity})"),
        ));
    }
    unit_price
        .checked_mul(quantity)
        .ok_or_else(|| BillingError::invalid(BillingField::Quantity, "line amount overflow"))
}

/// Bill-level discount.
///
/// Bills are discounted by percentage. Older records stored an absolute
/// amount instead; it is kept as recorded so those totals reproduce exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Discount {
    Percent(DiscountPercent),
    Amount(Money),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Percent(DiscountPercent::ZERO)
    }
}

impl From<DiscountPercent> for Discount {
    fn from(percent: DiscountPercent) -> Self {
        Discount::Percent(percent)
    }
}

impl Discount {
    /// Absolute discount. Rejects a negative amount.
    pub fn fixed(amount: Money) -> Result<Self, BillingError> {
        if amount.is_negative() {
            return Err(BillingError::invalid(
                BillingField::DiscountAmount,
                format!("must not be negative (got {amount})"),
            ));
        }
        Ok(Discount::Amount(amount))
    }

    /// Discount taken off `subtotal`; never more than the subtotal.
    pub fn amount_of(self, subtotal: Money) -> Money {
        match self {
            Discount::Percent(percent) => percent.amount_of(subtotal),
            Discount::Amount(amount) => amount.non_negative().min(subtotal.non_negative()),
        }
    }

    /// Percentage shown for this discount on `subtotal`.
    pub fn percent_of(self, subtotal: Money) -> DiscountPercent {
        match self {
            Discount::Percent(percent) => percent,
            Discount::Amount(amount) => DiscountPercent::share_of(amount, subtotal),
        }
    }
}

/// Totals shown on a bill and sent along with it to the backend.
///
/// Only produced by [`compute_totals`] (or derived from an existing value), so
/// the arithmetic identities always hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    subtotal: Money,
    #[serde(skip)]
    discount: Discount,
    discount_percent: DiscountPercent,
    discount_amount: Money,
    net_amount: Money,
    amount_received: Money,
    due_amount: Money,
    total_quantity: u64,
}

impl InvoiceTotals {
    /// Totals of an empty bill with nothing received.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    /// Effective percentage; derived from the amount for absolute discounts.
    pub fn discount_percent(&self) -> DiscountPercent {
        self.discount_percent
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    pub fn net_amount(&self) -> Money {
        self.net_amount
    }

    pub fn amount_received(&self) -> Money {
        self.amount_received
    }

    pub fn due_amount(&self) -> Money {
        self.due_amount
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn is_overpaid(&self) -> bool {
        self.due_amount.is_negative()
    }

    /// Same bill with a different received figure.
    pub fn with_amount_received(&self, amount_received: Money) -> Self {
        Self {
            amount_received,
            due_amount: self.net_amount - amount_received,
            ..*self
        }
    }

    /// How the due figure should be presented under `policy`.
    pub fn due_view(&self, policy: OverpaymentPolicy) -> DueView {
        DueView::resolve(self.due_amount, policy)
    }

    pub fn is_consistent(&self) -> bool {
        self.discount_amount == self.discount.amount_of(self.subtotal)
            && self.discount_percent == self.discount.percent_of(self.subtotal)
            && self.net_amount == (self.subtotal - self.discount_amount).non_negative()
            && self.due_amount == self.net_amount - self.amount_received
            && !self.net_amount.is_negative()
    }
}

/// Compute bill totals from already-validated line items.
///
/// Each line amount is overflow-checked, but their sum saturates at
/// `i64::MAX` paise like every other [`Money`] addition.
pub fn compute_totals(
    items: &[LineItem],
    discount: impl Into<Discount>,
    amount_received: Money,
) -> InvoiceTotals {
    let discount = discount.into();
    let subtotal: Money = items.iter().map(LineItem::line_amount).sum();
    let total_quantity = items.iter().map(|i| u64::from(i.quantity())).sum();
    let discount_amount = discount.amount_of(subtotal);
    let net_amount = (subtotal - discount_amount).non_negative();

    InvoiceTotals {
        subtotal,
        discount,
        discount_percent: discount.percent_of(subtotal),
        discount_amount,
        net_amount,
        amount_received,
        due_amount: net_amount - amount_received,
        total_quantity,
    }
}

/// [`compute_totals`] with a raw discount percentage, clamped to `[0, 100]`.
pub fn compute_totals_raw(items: &[LineItem], discount_percent: f64, amount_received: Money) -> InvoiceTotals {
    compute_totals(items, DiscountPercent::clamped(discount_percent), amount_received)
}
