//! Billing input errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use visionpoint_core::DomainError;

/// Bill input field that a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingField {
    UnitPrice,
    Quantity,
    DiscountPercent,
    DiscountAmount,
    AmountReceived,
    PaymentAmount,
    Label,
}

impl BillingField {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingField::UnitPrice => "unit_price",
            BillingField::Quantity => "quantity",
            BillingField::DiscountPercent => "discount_percent",
            BillingField::DiscountAmount => "discount_amount",
            BillingField::AmountReceived => "amount_received",
            BillingField::PaymentAmount => "payment_amount",
            BillingField::Label => "label",
        }
    }
}

impl core::fmt::Display for BillingField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single billing error kind: a rejected input field.
///
/// Totals are never partially applied; a caller receiving this error keeps
/// whatever totals it computed last.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("invalid {field}{}: {reason}", line_suffix(.index))]
    InvalidInput {
        field: BillingField,
        /// Position of the offending line item, when the field belongs to one.
        index: Option<usize>,
        reason: String,
    },
}

fn line_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" on line {}", i + 1)).unwrap_or_default()
}

impl BillingError {
    pub fn invalid(field: BillingField, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            index: None,
            reason: reason.into(),
        }
    }

    /// Attach the position of the offending line item.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::InvalidInput { field, reason, .. } => Self::InvalidInput {
                field,
                index: Some(line),
                reason,
            },
        }
    }

    pub fn field(&self) -> BillingField {
        match self {
            Self::InvalidInput { field, .. } => *field,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::InvalidInput { index, .. } => *index,
        }
    }
}

impl From<BillingError> for DomainError {
    fn from(err: BillingError) -> Self {
        DomainError::validation(err.to_string())
    }
}
