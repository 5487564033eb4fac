use thiserror::Error;

use visionpoint_billing::BillingError;
use visionpoint_core::DomainError;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid identifier in `{field}`: {value}")]
    InvalidId { field: &'static str, value: String },

    #[error("invalid amount in `{field}`: {value}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("invalid date in `{field}`: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid value in `{field}`: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl WireError {
    pub(crate) fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            value: value.into(),
        }
    }
}
