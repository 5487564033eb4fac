//! Loosely-typed scalar values as they appear in either schema.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use visionpoint_core::Money;

use crate::error::WireError;

/// A number that may arrive as an integer, a float or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl WireNumber {
    fn render(&self) -> String {
        match self {
            WireNumber::Int(v) => v.to_string(),
            WireNumber::Float(v) => v.to_string(),
            WireNumber::Text(v) => v.clone(),
        }
    }

    pub fn to_id(&self, field: &'static str) -> Result<u64, WireError> {
        let invalid = || WireError::InvalidId {
            field,
            value: self.render(),
        };
        match self {
            WireNumber::Int(v) => u64::try_from(*v).map_err(|_| invalid()),
            WireNumber::Float(_) => Err(invalid()),
            WireNumber::Text(s) => s.trim().parse::<u64>().map_err(|_| invalid()),
        }
    }

    pub fn to_money(&self, field: &'static str) -> Result<Money, WireError> {
        let parsed = match self {
            WireNumber::Int(v) => Money::from_major(*v).ok_or(()),
            WireNumber::Float(v) => Money::from_f64(*v).map_err(|_| ()),
            WireNumber::Text(s) => s.parse::<Money>().map_err(|_| ()),
        };
        parsed.map_err(|_| WireError::InvalidAmount {
            field,
            value: self.render(),
        })
    }

    /// Whole number; floats are accepted only when integral (`2.0`).
    pub fn to_integer(&self, field: &'static str) -> Result<i64, WireError> {
        let invalid = || WireError::invalid_field(field, self.render());
        match self {
            WireNumber::Int(v) => Ok(*v),
            WireNumber::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Ok(*v as i64),
            WireNumber::Float(_) => Err(invalid()),
            WireNumber::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        }
    }

    pub fn to_f64(&self, field: &'static str) -> Result<f64, WireError> {
        match self {
            WireNumber::Int(v) => Ok(*v as f64),
            WireNumber::Float(v) => Ok(*v),
            WireNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| WireError::invalid_field(field, s.clone())),
        }
    }
}

/// Trimmed, non-empty text.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Calendar date from `YYYY-MM-DD` or a timestamp (its date part is used).
pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, WireError> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_timestamp(field, s).map(|ts| ts.date_naive())
}

/// RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
pub(crate) fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, WireError> {
    let s = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(WireError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

pub(crate) fn optional_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, WireError> {
    present(raw).map(|s| parse_date(field, s)).transpose()
}
