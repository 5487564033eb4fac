//! Editable bill state.
//!
//! The form keeps whatever the user typed, while the totals only ever move
//! from one valid state to the next: a rejected input leaves the previous
//! totals in place.

use visionpoint_core::{DiscountPercent, Money};

use crate::calculator::{InvoiceTotals, compute_totals};
use crate::error::{BillingError, BillingField};
use crate::line_item::{LineItem, LineItemDraft};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillingSession {
    drafts: Vec<LineItemDraft>,
    discount_percent: DiscountPercent,
    amount_received: Money,
    items: Vec<LineItem>,
    totals: InvoiceTotals,
}

impl BillingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drafts(&self) -> &[LineItemDraft] {
        &self.drafts
    }

    /// Line items of the last valid state.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Totals of the last valid state.
    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    pub fn amount_received(&self) -> Money {
        self.amount_received
    }

    /// Append a line. An invalid draft is not added.
    pub fn add_item(&mut self, draft: LineItemDraft) -> Result<&InvoiceTotals, BillingError> {
        let index = self.drafts.len();
        if let Err(err) = draft.validate() {
            let err = err.at_line(index);
            tracing::warn!(error = %err, "line item rejected");
            return Err(err);
        }
        self.drafts.push(draft);
        self.recompute()
    }

    /// Replace the draft at `index` (e.g. while the user edits it).
    ///
    /// The draft is kept even when invalid; totals stay at the last valid
    /// state until the line is fixed. Returns `None` if there is no such line.
    pub fn update_item(
        &mut self,
        index: usize,
        draft: LineItemDraft,
    ) -> Option<Result<&InvoiceTotals, BillingError>> {
        let slot = self.drafts.get_mut(index)?;
        *slot = draft;
        Some(self.recompute())
    }

    pub fn remove_item(&mut self, index: usize) -> Option<LineItemDraft> {
        if index >= self.drafts.len() {
            return None;
        }
        let removed = self.drafts.remove(index);
        // Remaining drafts may still hold an invalid edit; keep last totals then.
        let _ = self.recompute();
        Some(removed)
    }

    /// Set the discount from raw form input; out-of-range values are clamped.
    pub fn set_discount(&mut self, percent: f64) -> Result<&InvoiceTotals, BillingError> {
        self.discount_percent = DiscountPercent::clamped(percent);
        self.recompute()
    }

    pub fn set_amount_received(&mut self, amount: Money) -> Result<&InvoiceTotals, BillingError> {
        if amount.is_negative() {
            let err = BillingError::invalid(
                BillingField::AmountReceived,
                format!("must not be negative (got {amount})"),
            );
            tracing::warn!(error = %err, "received amount rejected");
            return Err(err);
        }
        self.amount_received = amount;
        self.recompute()
    }

    /// Validate every draft and, only if all pass, replace the stored totals.
    pub fn recompute(&mut self) -> Result<&InvoiceTotals, BillingError> {
        let items = self
            .drafts
            .iter()
            .enumerate()
            .map(|(i, draft)| draft.validate().map_err(|e| e.at_line(i)))
            .collect::<Result<Vec<_>, _>>();

        let items = match items {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, "bill input rejected; keeping previous totals");
                return Err(err);
            }
        };

        self.totals = compute_totals(&items, self.discount_percent, self.amount_received);
        self.items = items;
        tracing::debug!(
            lines = self.items.len(),
            subtotal = %self.totals.subtotal(),
            net = %self.totals.net_amount(),
            due = %self.totals.due_amount(),
            "bill totals recomputed"
        );
        Ok(&self.totals)
    }
}
