use chrono::NaiveDate;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use visionpoint_core::{DomainError, Money};

use crate::calculator::InvoiceTotals;
use crate::error::{BillingError, BillingField};

/// How a customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl core::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            other => Err(DomainError::validation(format!("unknown payment method: {other:?}"))),
        }
    }
}

/// An amount applied against a bill's due balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Money,
    pub method: PaymentMethod,
    pub date: NaiveDate,
}

impl Payment {
    pub fn new(amount: Money, method: PaymentMethod, date: NaiveDate) -> Result<Self, BillingError> {
        let payment = Self { amount, method, date };
        payment.validate()?;
        Ok(payment)
    }

    pub fn validate(&self) -> Result<(), BillingError> {
        if !self.amount.is_positive() {
            return Err(BillingError::invalid(
                BillingField::PaymentAmount,
                format!("must be positive (got {})", self.amount),
            ));
        }
        Ok(())
    }
}

/// Append-only list of payments made against one bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentLog {
    payments: Vec<Payment>,
}

impl PaymentLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, payment: Payment) -> Result<(), BillingError> {
        payment.validate()?;
        self.payments.push(payment);
        Ok(())
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    pub fn total_received(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }
}

/// Soft guidance for the payment form. Nothing here is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentHint {
    /// Largest amount that does not overpay the bill.
    pub max_payable: Money,
    pub would_overpay: bool,
}

pub fn payment_hint(totals: &InvoiceTotals, proposed: Money) -> PaymentHint {
    let max_payable = totals.due_amount().non_negative();
    PaymentHint {
        max_payable,
        would_overpay: proposed > max_payable,
    }
}

/// Totals after `payment` has been received.
pub fn apply_payment(totals: &InvoiceTotals, payment: &Payment) -> InvoiceTotals {
    totals.with_amount_received(totals.amount_received() + payment.amount)
}
