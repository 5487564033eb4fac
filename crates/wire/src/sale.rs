//! Inbound sale payloads.
//!
//! The backend sends snake_case (`net_amount`, `received_amount`,
//! `sale_date`); records written by the older console use camelCase
//! (`netAmount`, `amountReceived`, `date`) and an absolute `discount`. Both
//! deserialize into [`WireSale`]; [`normalize_sale`] turns either into a
//! canonical [`Sale`] whose totals come from the calculator, never from the
//! payload.

use chrono::NaiveDate;
use serde::Deserialize;

use visionpoint_billing::{
    BillingError, BillingField, Discount, ItemCategory, LineItem, LineItemDraft, Payment,
    PaymentMethod, derive_label,
};
use visionpoint_core::{CustomerId, DiscountPercent, Money, PrescriptionId, SaleId};
use visionpoint_records::{NewSale, Sale, SaleStatus};

use crate::error::WireError;
use crate::value::{WireNumber, optional_date, parse_date, present};

/// Largest disagreement between a stored figure and its recomputation that
/// is not reported.
const TOLERANCE: Money = Money::from_minor(1);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSaleItem {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub item_detail: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub price: Option<WireNumber>,
    #[serde(default)]
    pub unit_price: Option<WireNumber>,
    #[serde(default, rename = "unitPrice")]
    pub unit_price_legacy: Option<WireNumber>,
    #[serde(default)]
    pub quantity: Option<WireNumber>,
    /// Stored line amount; only compared against the recomputed one.
    #[serde(default)]
    pub amount: Option<WireNumber>,
}

impl WireSaleItem {
    /// Canonical draft. Missing quantity means one unit.
    pub fn to_draft(&self) -> Result<LineItemDraft, WireError> {
        let category = match present(self.category.as_deref()) {
            None => ItemCategory::Product,
            Some(c) if c.eq_ignore_ascii_case("product") => ItemCategory::Product,
            Some(c) if c.eq_ignore_ascii_case("service") => ItemCategory::Service,
            Some(other) => return Err(WireError::invalid_field("items.category", other)),
        };
        let label = derive_label(
            self.item_type.as_deref(),
            self.item_detail.as_deref(),
            self.name.as_deref(),
        )
        .ok_or(WireError::MissingField("items.name"))?;
        let unit_price = self
            .price
            .as_ref()
            .or(either(self.unit_price.as_ref(), self.unit_price_legacy.as_ref()))
            .ok_or(WireError::MissingField("items.price"))?
            .to_money("items.price")?;
        let quantity = match &self.quantity {
            Some(q) => q.to_integer("items.quantity")?,
            None => 1,
        };

        let mut draft = LineItemDraft::new(category, label, unit_price, quantity);
        if let Some(note) = present(self.note.as_deref()) {
            draft = draft.with_note(note);
        }
        Ok(draft)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePayment {
    pub amount: WireNumber,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
}

impl WirePayment {
    /// Payments without a date are taken to be made on `fallback_date`.
    pub fn to_payment(&self, fallback_date: NaiveDate) -> Result<Payment, WireError> {
        let amount = self.amount.to_money("payments.amount")?;
        let method = parse_method(
            "payments.method",
            either(self.method.as_deref(), self.payment_method.as_deref()),
        )?;
        let date = match present(either(self.date.as_deref(), self.payment_date.as_deref())) {
            Some(raw) => parse_date("payments.date", raw)?,
            None => fallback_date,
        };
        Ok(Payment::new(amount, method, date)?)
    }
}

/// Embedded customer object; only its id is read.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCustomerRef {
    pub id: WireNumber,
}

/// A sale in either schema.
///
/// Snake_case and camelCase spellings are separate fields so a payload that
/// carries both still deserializes; the snake_case value wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSale {
    #[serde(default)]
    pub id: Option<WireNumber>,
    #[serde(default)]
    pub customer_id: Option<WireNumber>,
    #[serde(default, rename = "customerId")]
    pub customer_id_legacy: Option<WireNumber>,
    #[serde(default)]
    pub customer: Option<WireCustomerRef>,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default, rename = "date")]
    pub sale_date_legacy: Option<String>,
    #[serde(default)]
    pub items: Vec<WireSaleItem>,
    #[serde(default)]
    pub subtotal: Option<WireNumber>,
    #[serde(default, rename = "totalAmount")]
    pub total_amount_legacy: Option<WireNumber>,
    #[serde(default)]
    pub discount_percent: Option<WireNumber>,
    /// Absolute discount written by the older console.
    #[serde(default)]
    pub discount: Option<WireNumber>,
    #[serde(default)]
    pub net_amount: Option<WireNumber>,
    #[serde(default, rename = "netAmount")]
    pub net_amount_legacy: Option<WireNumber>,
    #[serde(default)]
    pub received_amount: Option<WireNumber>,
    #[serde(default, rename = "amountReceived")]
    pub received_amount_legacy: Option<WireNumber>,
    #[serde(default)]
    pub due_amount: Option<WireNumber>,
    #[serde(default, rename = "dueAmount")]
    pub due_amount_legacy: Option<WireNumber>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, rename = "paymentMethod")]
    pub payment_method_legacy: Option<String>,
    #[serde(default)]
    pub recall_date: Option<String>,
    #[serde(default, rename = "recallDate")]
    pub recall_date_legacy: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub prescription_id: Option<WireNumber>,
    #[serde(default, rename = "prescriptionId")]
    pub prescription_id_legacy: Option<WireNumber>,
    #[serde(default)]
    pub payments: Vec<WirePayment>,
}

fn either<T>(preferred: Option<T>, legacy: Option<T>) -> Option<T> {
    preferred.or(legacy)
}

fn parse_method(field: &'static str, raw: Option<&str>) -> Result<PaymentMethod, WireError> {
    match present(raw) {
        None => Ok(PaymentMethod::default()),
        Some(s) => s
            .parse::<PaymentMethod>()
            .map_err(|_| WireError::invalid_field(field, s)),
    }
}

fn parse_status(raw: Option<&str>) -> Result<SaleStatus, WireError> {
    match present(raw) {
        None => Ok(SaleStatus::default()),
        Some(s) => s
            .parse::<SaleStatus>()
            .map_err(|_| WireError::invalid_field("status", s)),
    }
}

/// Absolute discount from an older record, kept exactly as recorded.
///
/// A discount above the subtotal is capped at the subtotal when totals are
/// computed.
pub fn legacy_discount(discount: Money, subtotal: Money) -> Result<Discount, WireError> {
    let fixed = Discount::fixed(discount)?;
    if discount > subtotal.non_negative() {
        tracing::warn!(%discount, %subtotal, "legacy discount exceeds subtotal; capped");
    }
    Ok(fixed)
}

fn discount_of(wire: &WireSale, subtotal: Money) -> Result<Discount, WireError> {
    if let Some(raw) = &wire.discount_percent {
        let percent = raw.to_f64("discount_percent")?;
        return DiscountPercent::try_from_percent(percent)
            .map(Discount::Percent)
            .map_err(|_| {
                BillingError::invalid(
                    BillingField::DiscountPercent,
                    format!("must be within 0..=100 (got {percent})"),
                )
                .into()
            });
    }
    match &wire.discount {
        Some(raw) => legacy_discount(raw.to_money("discount")?, subtotal),
        None => Ok(Discount::default()),
    }
}

/// Warn when a figure stored in the payload disagrees with the canonical one.
fn check_stored(sale_id: SaleId, field: &'static str, stored: Option<&WireNumber>, canonical: Money) {
    let Some(raw) = stored else {
        return;
    };
    match raw.to_money(field) {
        Ok(stored) if (stored - canonical).abs() > TOLERANCE => {
            tracing::warn!(
                sale_id = %sale_id,
                field,
                %stored,
                %canonical,
                "stored figure disagrees with recomputed total; using recomputed"
            );
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(sale_id = %sale_id, field, error = %err, "unreadable stored figure ignored");
        }
    }
}

/// Normalize a sale from either schema into the canonical record.
///
/// Totals are recomputed; stored `subtotal`, `net_amount`, `due_amount` and
/// line `amount` values are only cross-checked. When the payload lists later
/// payments, `received_amount` is taken to include them.
pub fn normalize_sale(wire: WireSale) -> Result<Sale, WireError> {
    let id = SaleId::new(
        wire.id
            .as_ref()
            .ok_or(WireError::MissingField("id"))?
            .to_id("id")?,
    );

    let customer_raw = wire
        .customer_id
        .as_ref()
        .or(wire.customer_id_legacy.as_ref())
        .or(wire.customer.as_ref().map(|c| &c.id))
        .ok_or(WireError::MissingField("customer_id"))?;
    let customer_id = CustomerId::new(customer_raw.to_id("customer_id")?);

    let sale_date_raw = either(wire.sale_date.as_deref(), wire.sale_date_legacy.as_deref());
    let sale_date = parse_date(
        "sale_date",
        present(sale_date_raw).ok_or(WireError::MissingField("sale_date"))?,
    )?;

    let mut items = Vec::with_capacity(wire.items.len());
    for (index, raw) in wire.items.iter().enumerate() {
        let item: LineItem = raw
            .to_draft()?
            .validate()
            .map_err(|err| err.at_line(index))?;
        check_stored(id, "items.amount", raw.amount.as_ref(), item.line_amount());
        items.push(item);
    }
    let subtotal: Money = items.iter().map(LineItem::line_amount).sum();

    let discount = discount_of(&wire, subtotal)?;

    let received = match either(wire.received_amount.as_ref(), wire.received_amount_legacy.as_ref()) {
        Some(raw) => raw.to_money("received_amount")?,
        None => Money::ZERO,
    };
    if received.is_negative() {
        return Err(BillingError::invalid(
            BillingField::AmountReceived,
            format!("must not be negative (got {received})"),
        )
        .into());
    }
    let payments = wire
        .payments
        .iter()
        .map(|p| p.to_payment(sale_date))
        .collect::<Result<Vec<_>, _>>()?;
    let paid_later: Money = payments.iter().map(|p| p.amount).sum();
    let amount_received = if paid_later <= received {
        received - paid_later
    } else {
        tracing::warn!(
            sale_id = %id,
            %received,
            %paid_later,
            "recorded payments exceed received amount; using payments"
        );
        Money::ZERO
    };

    let payment_method = parse_method(
        "payment_method",
        either(wire.payment_method.as_deref(), wire.payment_method_legacy.as_deref()),
    )?;
    let recall_date = optional_date(
        "recall_date",
        either(wire.recall_date.as_deref(), wire.recall_date_legacy.as_deref()),
    )?;
    let prescription_id = either(wire.prescription_id.as_ref(), wire.prescription_id_legacy.as_ref())
        .map(|raw| raw.to_id("prescription_id").map(PrescriptionId::new))
        .transpose()?;

    let sale = Sale::create(NewSale {
        id,
        customer_id,
        sale_date,
        items,
        discount,
        amount_received,
        payment_method,
        payments,
        recall_date,
        status: parse_status(wire.status.as_deref())?,
        prescription_id,
    })?;

    let totals = sale.totals();
    check_stored(
        id,
        "subtotal",
        either(wire.subtotal.as_ref(), wire.total_amount_legacy.as_ref()),
        totals.subtotal(),
    );
    if wire.discount_percent.is_some() {
        check_stored(id, "discount", wire.discount.as_ref(), totals.discount_amount());
    }
    check_stored(
        id,
        "net_amount",
        either(wire.net_amount.as_ref(), wire.net_amount_legacy.as_ref()),
        totals.net_amount(),
    );
    check_stored(
        id,
        "due_amount",
        either(wire.due_amount.as_ref(), wire.due_amount_legacy.as_ref()),
        totals.due_amount(),
    );

    tracing::debug!(sale_id = %id, net = %totals.net_amount(), due = %totals.due_amount(), "sale normalized");
    Ok(sale)
}

/// Deserialize and normalize a sale payload.
pub fn parse_sale(json: &str) -> Result<Sale, WireError> {
    let wire: WireSale = serde_json::from_str(json)?;
    normalize_sale(wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(major: i64) -> Money {
        Money::from_major(major).unwrap()
    }

    #[test]
    fn backend_schema_normalizes() {
        let sale = parse_sale(
            r#"{
                "id": 41,
                "customer_id": "7",
                "sale_date": "2024-03-15T10:30:00Z",
                "items": [
                    {"category": "Product", "item_type": "Frame", "item_detail": "Rimless", "price": 500, "quantity": 1, "amount": 500},
                    {"category": "Service", "name": "Eye test", "price": "300", "quantity": 2}
                ],
                "subtotal": 1100,
                "discount_percent": 10,
                "net_amount": 990,
                "received_amount": 400,
                "due_amount": 590,
                "payment_method": "UPI",
                "recall_date": "2025-03-15",
                "status": "Ready"
            }"#,
        )
        .unwrap();

        assert_eq!(sale.id(), SaleId::new(41));
        assert_eq!(sale.customer_id(), CustomerId::new(7));
        assert_eq!(sale.items()[0].label(), "Frame - Rimless");
        assert_eq!(sale.items()[1].category(), ItemCategory::Service);
        assert_eq!(sale.totals().net_amount(), rupees(990));
        assert_eq!(sale.totals().due_amount(), rupees(590));
        assert_eq!(sale.payment_method(), PaymentMethod::Upi);
        assert_eq!(sale.status(), SaleStatus::Ready);
        assert!(sale.recall_date().is_some());
    }

    #[test]
    fn legacy_schema_normalizes() {
        let sale = parse_sale(
            r#"{
                "id": "1710495000000",
                "customerId": "3",
                "date": "2024-03-15",
                "items": [{"name": "Frame", "price": 1000, "quantity": 1}],
                "totalAmount": 1000,
                "discount": 150,
                "netAmount": 850,
                "amountReceived": 850,
                "dueAmount": 0,
                "paymentMethod": "Cash"
            }"#,
        )
        .unwrap();

        assert_eq!(sale.discount(), Discount::Amount(rupees(150)));
        assert_eq!(sale.discount_percent().basis_points(), 1_500);
        assert_eq!(sale.totals().discount_amount(), rupees(150));
        assert_eq!(sale.totals().net_amount(), rupees(850));
        assert_eq!(sale.totals().due_amount(), Money::ZERO);
        assert_eq!(sale.status(), SaleStatus::Pending);
    }

    #[test]
    fn stored_totals_never_override_recomputation() {
        let sale = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15",
                "items": [{"name": "Lens", "price": 250, "quantity": 2, "amount": 999}],
                "net_amount": 12345, "due_amount": 1}"#,
        )
        .unwrap();
        assert_eq!(sale.totals().net_amount(), rupees(500));
        assert_eq!(sale.totals().due_amount(), rupees(500));
    }

    #[test]
    fn both_spellings_present_prefers_snake_case() {
        let sale = parse_sale(
            r#"{"id": 1, "customer_id": 2, "customerId": 9, "sale_date": "2024-03-15",
                "date": "2020-01-01", "items": [{"name": "Lens", "price": 100}],
                "received_amount": 100, "amountReceived": 0}"#,
        )
        .unwrap();
        assert_eq!(sale.customer_id(), CustomerId::new(2));
        assert_eq!(sale.sale_date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(sale.totals().due_amount(), Money::ZERO);
    }

    #[test]
    fn nested_customer_supplies_id() {
        let sale = parse_sale(
            r#"{"id": 5, "customer": {"id": 12, "name": "Asha"}, "sale_date": "2024-03-15",
                "items": [{"name": "Lens", "price": 100}]}"#,
        )
        .unwrap();
        assert_eq!(sale.customer_id(), CustomerId::new(12));
    }

    #[test]
    fn later_payments_are_split_from_received() {
        let sale = parse_sale(
            r#"{"id": 5, "customer_id": 1, "sale_date": "2024-03-15",
                "items": [{"name": "Frame", "price": 1000}],
                "received_amount": 700,
                "payments": [{"amount": 300, "method": "Card", "date": "2024-03-20"}]}"#,
        )
        .unwrap();
        assert_eq!(sale.amount_received_at_sale(), rupees(400));
        assert_eq!(sale.payments().len(), 1);
        assert_eq!(sale.totals().amount_received(), rupees(700));
        assert_eq!(sale.totals().due_amount(), rupees(300));
    }

    #[test]
    fn rejects_bad_input() {
        let missing_date = parse_sale(r#"{"id": 1, "customer_id": 1, "items": []}"#).unwrap_err();
        assert!(matches!(missing_date, WireError::MissingField("sale_date")));

        let bad_id = parse_sale(
            r#"{"id": "lx3k9a", "customer_id": 1, "sale_date": "2024-03-15", "items": []}"#,
        )
        .unwrap_err();
        assert!(matches!(bad_id, WireError::InvalidId { field: "id", .. }));

        let bad_discount = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15",
                "items": [{"name": "Lens", "price": 100}], "discount_percent": 120}"#,
        )
        .unwrap_err();
        match bad_discount {
            WireError::Billing(err) => assert_eq!(err.field(), BillingField::DiscountPercent),
            other => panic!("unexpected error: {other:?}"),
        }

        let bad_line = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15",
                "items": [{"name": "Lens", "price": 100}, {"name": "Frame", "price": -5}]}"#,
        )
        .unwrap_err();
        match bad_line {
            WireError::Billing(err) => {
                assert_eq!(err.field(), BillingField::UnitPrice);
                assert_eq!(err.index(), Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let empty = parse_sale(r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15"}"#).unwrap_err();
        assert!(matches!(empty, WireError::Domain(_)));

        assert!(matches!(parse_sale("{"), Err(WireError::Json(_))));
    }

    #[test]
    fn legacy_discount_that_does_not_divide_the_subtotal_settles() {
        let sale = parse_sale(
            r#"{"id": 9, "customerId": 3, "date": "2024-03-15",
                "items": [{"name": "Frame", "price": 300}],
                "discount": 100, "netAmount": 200, "amountReceived": 200, "dueAmount": 0}"#,
        )
        .unwrap();
        assert_eq!(sale.totals().discount_amount(), rupees(100));
        assert_eq!(sale.totals().net_amount(), rupees(200));
        assert_eq!(sale.totals().due_amount(), Money::ZERO);
        assert!(!sale.is_open());
    }

    #[test]
    fn legacy_discount_is_kept_as_an_amount() {
        assert_eq!(
            legacy_discount(rupees(100), rupees(300)).unwrap(),
            Discount::Amount(rupees(100))
        );
        let over = legacy_discount(rupees(500), rupees(300)).unwrap();
        assert_eq!(over.amount_of(rupees(300)), rupees(300));
        assert_eq!(over.percent_of(rupees(300)), DiscountPercent::FULL);

        let err = legacy_discount(rupees(-1), rupees(100)).unwrap_err();
        match err {
            WireError::Billing(err) => assert_eq!(err.field(), BillingField::DiscountAmount),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn negative_received_amount_is_rejected() {
        let err = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15",
                "items": [{"name": "Frame", "price": 300}], "received_amount": -50}"#,
        )
        .unwrap_err();
        match err {
            WireError::Billing(err) => assert_eq!(err.field(), BillingField::AmountReceived),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn item_and_payment_spellings_may_both_appear() {
        let sale = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15",
                "prescription_id": 4, "prescriptionId": 8,
                "items": [{"name": "Frame", "price": 300, "unit_price": 999, "unitPrice": 1}],
                "received_amount": 300,
                "payments": [{"amount": 100, "method": "Card", "payment_method": "Cash",
                              "date": "2024-03-20", "payment_date": "2024-01-01"}]}"#,
        )
        .unwrap();
        assert_eq!(sale.items()[0].unit_price(), rupees(300));
        assert_eq!(sale.prescription_id(), Some(PrescriptionId::new(4)));
        let payment = &sale.payments().payments()[0];
        assert_eq!(payment.method, PaymentMethod::Card);
        assert_eq!(payment.date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn alternate_spellings_are_read_when_alone() {
        let sale = parse_sale(
            r#"{"id": 1, "customer_id": 1, "sale_date": "2024-03-15", "prescriptionId": 8,
                "items": [{"name": "Frame", "unitPrice": 250}],
                "received_amount": 100,
                "payments": [{"amount": 100, "payment_method": "UPI"}]}"#,
        )
        .unwrap();
        assert_eq!(sale.items()[0].unit_price(), rupees(250));
        assert_eq!(sale.prescription_id(), Some(PrescriptionId::new(8)));
        assert_eq!(sale.payments().payments()[0].method, PaymentMethod::Upi);
    }
}
