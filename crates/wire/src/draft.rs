//! Bill drafts as typed into the billing form.

use serde::Deserialize;

use visionpoint_billing::BillingSession;

use crate::error::WireError;
use crate::sale::WireSaleItem;
use crate::value::WireNumber;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillDraft {
    #[serde(default)]
    pub items: Vec<WireSaleItem>,
    #[serde(default)]
    pub discount_percent: Option<WireNumber>,
    #[serde(default, rename = "discountPercent")]
    pub discount_percent_legacy: Option<WireNumber>,
    #[serde(default)]
    pub amount_received: Option<WireNumber>,
    #[serde(default)]
    pub received_amount: Option<WireNumber>,
    #[serde(default, rename = "amountReceived")]
    pub amount_received_legacy: Option<WireNumber>,
}

impl BillDraft {
    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay the draft into a billing session.
    ///
    /// The discount is clamped the way the form clamps it; a bad line or a
    /// negative received amount fails the whole draft.
    pub fn to_session(&self) -> Result<BillingSession, WireError> {
        let mut session = BillingSession::new();
        for (index, raw) in self.items.iter().enumerate() {
            let draft = raw.to_draft().map_err(|err| {
                tracing::warn!(line = index + 1, error = %err, "unreadable bill line");
                err
            })?;
            session.add_item(draft)?;
        }
        let discount = self.discount_percent.as_ref().or(self.discount_percent_legacy.as_ref());
        if let Some(raw) = discount {
            session.set_discount(raw.to_f64("discount_percent")?)?;
        }
        let received = self
            .amount_received
            .as_ref()
            .or(self.received_amount.as_ref())
            .or(self.amount_received_legacy.as_ref());
        if let Some(raw) = received {
            session.set_amount_received(raw.to_money("amount_received")?)?;
        }
        Ok(session)
    }
}
