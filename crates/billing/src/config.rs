//! Billing configuration.

use serde::{Deserialize, Serialize};

use visionpoint_core::Money;

use crate::policy::OverpaymentPolicy;

pub const OVERPAYMENT_POLICY_ENV: &str = "VISIONPOINT_OVERPAYMENT_POLICY";
pub const CURRENCY_SYMBOL_ENV: &str = "VISIONPOINT_CURRENCY_SYMBOL";

const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    pub overpayment_policy: OverpaymentPolicy,
    pub currency_symbol: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            overpayment_policy: OverpaymentPolicy::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl BillingConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset keys keep their defaults; unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(OVERPAYMENT_POLICY_ENV) {
            match raw.parse::<OverpaymentPolicy>() {
                Ok(policy) => config.overpayment_policy = policy,
                Err(err) => tracing::warn!(
                    %err,
                    default = %config.overpayment_policy,
                    "{OVERPAYMENT_POLICY_ENV} is invalid; using default"
                ),
            }
        }

        if let Some(symbol) = lookup(CURRENCY_SYMBOL_ENV) {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                tracing::warn!("{CURRENCY_SYMBOL_ENV} is empty; using default");
            } else {
                config.currency_symbol = symbol.to_string();
            }
        }

        config
    }

    pub fn with_overpayment_policy(mut self, policy: OverpaymentPolicy) -> Self {
        self.overpayment_policy = policy;
        self
    }

    /// `₹1100.00`, `-₹210.00`.
    pub fn format_amount(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.currency_symbol, amount.abs())
        } else {
            format!("{}{}", self.currency_symbol, amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = BillingConfig::from_lookup(lookup(&[]));
        assert_eq!(config, BillingConfig::default());
        assert_eq!(config.overpayment_policy, OverpaymentPolicy::ShowNegative);
    }

    #[test]
    fn reads_policy_and_symbol() {
        let config = BillingConfig::from_lookup(lookup(&[
            (OVERPAYMENT_POLICY_ENV, "credit_balance"),
            (CURRENCY_SYMBOL_ENV, "Rs."),
        ]));
        assert_eq!(config.overpayment_policy, OverpaymentPolicy::CreditBalance);
        assert_eq!(config.currency_symbol, "Rs.");
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = BillingConfig::from_lookup(lookup(&[
            (OVERPAYMENT_POLICY_ENV, "refund"),
            (CURRENCY_SYMBOL_ENV, "  "),
        ]));
        assert_eq!(config, BillingConfig::default());
    }

    #[test]
    fn formats_signed_amounts() {
        let config = BillingConfig::default();
        assert_eq!(config.format_amount(Money::from_minor(110_000)), "₹1100.00");
        assert_eq!(config.format_amount(Money::from_minor(-21_000)), "-₹210.00");
    }
}
