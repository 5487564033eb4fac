use chrono::NaiveDate;
use serde::Serialize;

use visionpoint_billing::{DueView, InvoiceTotals, ItemCategory, LineItem, Payment, PaymentMethod};
use visionpoint_core::Money;
use visionpoint_records::{Sale, SaleStatus};

/// Amounts go out in major units (rupees) as JSON numbers.
pub(crate) mod amount {
    use serde::Serializer;
    use visionpoint_core::Money;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64())
    }
}

// -------------------------
// Request bodies
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItemBody {
    pub category: ItemCategory,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(with = "amount")]
    pub price: Money,
    pub quantity: u32,
    #[serde(with = "amount")]
    pub amount: Money,
}

impl From<&LineItem> for SaleItemBody {
    fn from(item: &LineItem) -> Self {
        Self {
            category: item.category(),
            name: item.label().to_string(),
            note: item.note().to_string(),
            price: item.unit_price(),
            quantity: item.quantity(),
            amount: item.line_amount(),
        }
    }
}

/// Body of `POST /sales`. Every figure comes from the canonical totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRequest {
    pub customer_id: u64,
    pub sale_date: NaiveDate,
    pub items: Vec<SaleItemBody>,
    #[serde(with = "amount")]
    pub subtotal: Money,
    pub discount_percent: f64,
    #[serde(with = "amount")]
    pub discount_amount: Money,
    #[serde(with = "amount")]
    pub net_amount: Money,
    #[serde(with = "amount")]
    pub received_amount: Money,
    #[serde(with = "amount")]
    pub due_amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall_date: Option<NaiveDate>,
    pub status: SaleStatus,
}

impl SaleRequest {
    pub fn from_sale(sale: &Sale) -> Self {
        let totals = sale.totals();
        Self {
            customer_id: sale.customer_id().get(),
            sale_date: sale.sale_date(),
            items: sale.items().iter().map(SaleItemBody::from).collect(),
            subtotal: totals.subtotal(),
            discount_percent: totals.discount_percent().as_percent(),
            discount_amount: totals.discount_amount(),
            net_amount: totals.net_amount(),
            received_amount: totals.amount_received(),
            due_amount: totals.due_amount(),
            payment_method: sale.payment_method(),
            recall_date: sale.recall_date(),
            status: sale.status(),
        }
    }
}

/// Body of `POST /sales/{id}/payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRequest {
    #[serde(with = "amount")]
    pub amount: Money,
    pub method: PaymentMethod,
    pub date: NaiveDate,
}

impl From<&Payment> for PaymentRequest {
    fn from(payment: &Payment) -> Self {
        Self {
            amount: payment.amount,
            method: payment.method,
            date: payment.date,
        }
    }
}

// -------------------------
// Response views
// -------------------------

/// Bill totals in major units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsBody {
    #[serde(with = "amount")]
    pub subtotal: Money,
    pub discount_percent: f64,
    #[serde(with = "amount")]
    pub discount_amount: Money,
    #[serde(with = "amount")]
    pub net_amount: Money,
    #[serde(with = "amount")]
    pub amount_received: Money,
    #[serde(with = "amount")]
    pub due_amount: Money,
    pub total_quantity: u64,
}

impl From<&InvoiceTotals> for TotalsBody {
    fn from(totals: &InvoiceTotals) -> Self {
        Self {
            subtotal: totals.subtotal(),
            discount_percent: totals.discount_percent().as_percent(),
            discount_amount: totals.discount_amount(),
            net_amount: totals.net_amount(),
            amount_received: totals.amount_received(),
            due_amount: totals.due_amount(),
            total_quantity: totals.total_quantity(),
        }
    }
}

/// Due figure as the bill shows it under the configured policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueBody {
    pub state: &'static str,
    #[serde(with = "amount")]
    pub display_amount: Money,
    #[serde(with = "amount")]
    pub credit: Money,
    pub accepts_payment: bool,
}

impl From<DueView> for DueBody {
    fn from(view: DueView) -> Self {
        Self {
            state: view.state(),
            display_amount: view.display_amount(),
            credit: view.credit(),
            accepts_payment: view.accepts_payment(),
        }
    }
}
