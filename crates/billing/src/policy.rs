//! Presentation of overpaid bills.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use visionpoint_core::{DomainError, Money};

/// What to do with a negative due amount (more received than billed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Show the negative due as-is.
    #[default]
    ShowNegative,
    /// Treat any overpayment as a settled bill.
    ClampToZero,
    /// Settle the bill and carry the excess as customer credit.
    CreditBalance,
}

impl OverpaymentPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            OverpaymentPolicy::ShowNegative => "show_negative",
            OverpaymentPolicy::ClampToZero => "clamp_to_zero",
            OverpaymentPolicy::CreditBalance => "credit_balance",
        }
    }
}

impl core::fmt::Display for OverpaymentPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverpaymentPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "show_negative" | "negative" => Ok(Self::ShowNegative),
            "clamp_to_zero" | "clamp" => Ok(Self::ClampToZero),
            "credit_balance" | "credit" => Ok(Self::CreditBalance),
            other => Err(DomainError::validation(format!(
                "unknown overpayment policy: {other:?}"
            ))),
        }
    }
}

/// A bill's due figure after applying an [`OverpaymentPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "amount", rename_all = "snake_case")]
pub enum DueView {
    /// Money is still owed.
    Outstanding(Money),
    Settled,
    /// Received exceeds net by this (positive) amount; shown as a negative due.
    Overpaid(Money),
    /// Received exceeds net by this (positive) amount, kept as credit.
    Credit(Money),
}

impl DueView {
    pub fn resolve(due_amount: Money, policy: OverpaymentPolicy) -> Self {
        if due_amount.is_positive() {
            return DueView::Outstanding(due_amount);
        }
        if due_amount.is_zero() {
            return DueView::Settled;
        }
        let excess = due_amount.abs();
        match policy {
            OverpaymentPolicy::ShowNegative => DueView::Overpaid(excess),
            OverpaymentPolicy::ClampToZero => DueView::Settled,
            OverpaymentPolicy::CreditBalance => DueView::Credit(excess),
        }
    }

    pub fn state(&self) -> &'static str {
        match self {
            DueView::Outstanding(_) => "outstanding",
            DueView::Settled => "settled",
            DueView::Overpaid(_) => "overpaid",
            DueView::Credit(_) => "credit",
        }
    }

    /// Due amount to print on the bill.
    pub fn display_amount(&self) -> Money {
        match self {
            DueView::Outstanding(due) => *due,
            DueView::Settled | DueView::Credit(_) => Money::ZERO,
            DueView::Overpaid(excess) => -*excess,
        }
    }

    pub fn credit(&self) -> Money {
        match self {
            DueView::Credit(excess) => *excess,
            _ => Money::ZERO,
        }
    }

    /// Whether an "add payment" action makes sense for the bill.
    pub fn accepts_payment(&self) -> bool {
        matches!(self, DueView::Outstanding(_))
    }
}
