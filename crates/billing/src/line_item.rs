use serde::{Deserialize, Serialize};

use visionpoint_core::Money;

use crate::calculator::compute_line_amount;
use crate::error::{BillingError, BillingField};

/// What a line item bills for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Frames, lenses, contact lenses, accessories.
    #[default]
    Product,
    /// Eye tests, fittings, repairs.
    Service,
}

/// Build the display label of a line item.
///
/// A structured `item_type` / `item_detail` pair wins (joined with `" - "`);
/// otherwise the free-text name is used. Blank parts are ignored.
pub fn derive_label(
    item_type: Option<&str>,
    item_detail: Option<&str>,
    name: Option<&str>,
) -> Option<String> {
    fn present(s: Option<&str>) -> Option<&str> {
        s.map(str::trim).filter(|s| !s.is_empty())
    }

    let parts: Vec<&str> = [present(item_type), present(item_detail)]
        .into_iter()
        .flatten()
        .collect();
    if !parts.is_empty() {
        return Some(parts.join(" - "));
    }
    present(name).map(str::to_string)
}

/// Line item as typed into the bill form, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDraft {
    #[serde(default)]
    pub category: ItemCategory,
    pub label: String,
    #[serde(default)]
    pub note: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl LineItemDraft {
    pub fn new(category: ItemCategory, label: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        Self {
            category,
            label: label.into(),
            note: String::new(),
            unit_price,
            quantity,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn validate(&self) -> Result<LineItem, BillingError> {
        LineItem::new(self.category, &self.label, self.unit_price, self.quantity)
            .map(|item| item.with_note(&self.note))
    }
}

/// One priced entry on a bill.
///
/// Invariant: `line_amount == unit_price × quantity`. The amount is never set
/// directly; every constructor and setter recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LineItemDraft")]
pub struct LineItem {
    category: ItemCategory,
    label: String,
    note: String,
    unit_price: Money,
    quantity: u32,
    line_amount: Money,
}

impl LineItem {
    pub fn new(
        category: ItemCategory,
        label: &str,
        unit_price: Money,
        quantity: i64,
    ) -> Result<Self, BillingError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(BillingError::invalid(BillingField::Label, "must not be empty"));
        }
        let line_amount = compute_line_amount(unit_price, quantity)?;
        let quantity = u32::try_from(quantity)
            .map_err(|_| BillingError::invalid(BillingField::Quantity, "is too large"))?;

        Ok(Self {
            category,
            label: label.to_string(),
            note: String::new(),
            unit_price,
            quantity,
            line_amount,
        })
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = note.trim().to_string();
        self
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_amount(&self) -> Money {
        self.line_amount
    }

    /// Change the price; the item is left untouched if the price is rejected.
    pub fn set_unit_price(&mut self, unit_price: Money) -> Result<(), BillingError> {
        self.line_amount = compute_line_amount(unit_price, i64::from(self.quantity))?;
        self.unit_price = unit_price;
        Ok(())
    }

    /// Change the quantity; the item is left untouched if the quantity is rejected.
    pub fn set_quantity(&mut self, quantity: i64) -> Result<(), BillingError> {
        let line_amount = compute_line_amount(self.unit_price, quantity)?;
        self.quantity = u32::try_from(quantity)
            .map_err(|_| BillingError::invalid(BillingField::Quantity, "is too large"))?;
        self.line_amount = line_amount;
        Ok(())
    }

    pub fn to_draft(&self) -> LineItemDraft {
        LineItemDraft {
            category: self.category,
            label: self.label.clone(),
            note: self.note.clone(),
            unit_price: self.unit_price,
            quantity: i64::from(self.quantity),
        }
    }
}

impl TryFrom<LineItemDraft> for LineItem {
    type Error = BillingError;

    fn try_from(draft: LineItemDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(major: i64) -> Money {
        Money::from_major(major).unwrap()
    }

    #[test]
    fn new_item_computes_line_amount() {
        let item = LineItem::new(ItemCategory::Product, "Frame - Titan", rupees(300), 2).unwrap();
        assert_eq!(item.line_amount(), rupees(600));
        assert_eq!(item.quantity(), 2);
    }

    #[test]
    fn setters_recompute_and_reject_without_partial_update() {
        let mut item = LineItem::new(ItemCategory::Service, "Eye test", rupees(200), 1).unwrap();

        item.set_quantity(3).unwrap();
        assert_eq!(item.line_amount(), rupees(600));

        let err = item.set_unit_price(Money::from_minor(-500)).unwrap_err();
        assert_eq!(err.field(), BillingField::UnitPrice);
        assert_eq!(item.unit_price(), rupees(200));
        assert_eq!(item.line_amount(), rupees(600));

        let err = item.set_quantity(0).unwrap_err();
        assert_eq!(err.field(), BillingField::Quantity);
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn blank_label_is_rejected() {
        let err = LineItem::new(ItemCategory::Product, "   ", rupees(10), 1).unwrap_err();
        assert_eq!(err.field(), BillingField::Label);
    }

    #[test]
    fn label_prefers_structured_type_and_detail() {
        assert_eq!(
            derive_label(Some("Lens"), Some("Progressive"), Some("ignored")).as_deref(),
            Some("Lens - Progressive")
        );
        assert_eq!(derive_label(Some("Frame"), Some(" "), None).as_deref(), Some("Frame"));
        assert_eq!(derive_label(None, None, Some(" Sunglasses ")).as_deref(), Some("Sunglasses"));
        assert_eq!(derive_label(None, Some(""), Some("")), None);
    }

    #[test]
    fn deserializing_recomputes_line_amount() {
        let json = r#"{"category":"Service","label":"Fitting","unit_price":15000,"quantity":2}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.line_amount(), rupees(300));

        let bad = r#"{"label":"Fitting","unit_price":15000,"quantity":0}"#;
        assert!(serde_json::from_str::<LineItem>(bad).is_err());
    }
}
