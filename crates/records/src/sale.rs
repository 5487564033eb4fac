use chrono::NaiveDate;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use visionpoint_billing::{
    Discount, DueView, InvoiceTotals, LineItem, OverpaymentPolicy, Payment, PaymentLog, PaymentMethod,
    BillingError, BillingField, compute_totals, payment_hint,
};
use visionpoint_core::{
    CustomerId, DiscountPercent, DomainError, DomainResult, Entity, Money, PrescriptionId, SaleId,
};
use visionpoint_store::{FieldValue, Queryable};

/// Order fulfilment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleStatus {
    #[default]
    Pending,
    Ready,
    Completed,
}

impl SaleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "Pending",
            SaleStatus::Ready => "Ready",
            SaleStatus::Completed => "Completed",
        }
    }
}

impl FromStr for SaleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            other => Err(DomainError::validation(format!("unknown sale status: {other:?}"))),
        }
    }
}

/// Inputs for a new sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub id: SaleId,
    pub customer_id: CustomerId,
    pub sale_date: NaiveDate,
    pub items: Vec<LineItem>,
    pub discount: Discount,
    /// Amount taken at the counter when the bill was created.
    pub amount_received: Money,
    pub payment_method: PaymentMethod,
    pub payments: Vec<Payment>,
    pub recall_date: Option<NaiveDate>,
    pub status: SaleStatus,
    pub prescription_id: Option<PrescriptionId>,
}

/// A billed sale with its totals.
///
/// Totals are derived from items, discount and payments on every change and
/// are never set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    id: SaleId,
    customer_id: CustomerId,
    sale_date: NaiveDate,
    items: Vec<LineItem>,
    discount: Discount,
    amount_received_at_sale: Money,
    payment_method: PaymentMethod,
    payments: PaymentLog,
    recall_date: Option<NaiveDate>,
    status: SaleStatus,
    prescription_id: Option<PrescriptionId>,
    totals: InvoiceTotals,
}

impl Sale {
    pub fn create(new: NewSale) -> DomainResult<Self> {
        if new.items.is_empty() {
            return Err(DomainError::validation("sale must have at least one item"));
        }
        if new.amount_received.is_negative() {
            return Err(BillingError::invalid(
                BillingField::AmountReceived,
                format!("must not be negative (got {})", new.amount_received),
            )
            .into());
        }
        if let Discount::Amount(amount) = new.discount {
            Discount::fixed(amount)?;
        }

        let mut payments = PaymentLog::new();
        for payment in new.payments {
            payments.record(payment)?;
        }

        let mut sale = Self {
            id: new.id,
            customer_id: new.customer_id,
            sale_date: new.sale_date,
            items: new.items,
            discount: new.discount,
            amount_received_at_sale: new.amount_received,
            payment_method: new.payment_method,
            payments,
            recall_date: new.recall_date,
            status: new.status,
            prescription_id: new.prescription_id,
            totals: InvoiceTotals::zero(),
        };
        sale.recompute();
        Ok(sale)
    }

    pub fn id(&self) -> SaleId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn sale_date(&self) -> NaiveDate {
        self.sale_date
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn discount(&self) -> Discount {
        self.discount
    }

    pub fn discount_percent(&self) -> DiscountPercent {
        self.totals.discount_percent()
    }

    pub fn amount_received_at_sale(&self) -> Money {
        self.amount_received_at_sale
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn payments(&self) -> &PaymentLog {
        &self.payments
    }

    pub fn recall_date(&self) -> Option<NaiveDate> {
        self.recall_date
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn prescription_id(&self) -> Option<PrescriptionId> {
        self.prescription_id
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }

    pub fn due_view(&self, policy: OverpaymentPolicy) -> DueView {
        self.totals.due_view(policy)
    }

    /// Something is still owed on this sale.
    pub fn is_open(&self) -> bool {
        self.totals.due_amount().is_positive()
    }

    pub fn set_status(&mut self, status: SaleStatus) {
        self.status = status;
    }

    pub fn set_recall_date(&mut self, recall_date: Option<NaiveDate>) {
        self.recall_date = recall_date;
    }

    /// Re-run the calculator over items, discount and everything received.
    pub fn recompute(&mut self) -> &InvoiceTotals {
        let received = self.amount_received_at_sale + self.payments.total_received();
        self.totals = compute_totals(&self.items, self.discount, received);
        &self.totals
    }

    /// Append a payment and refresh totals.
    ///
    /// Overpaying is allowed; it is only logged.
    pub fn record_payment(&mut self, payment: Payment) -> DomainResult<&InvoiceTotals> {
        let hint = payment_hint(&self.totals, payment.amount);
        if hint.would_overpay {
            tracing::warn!(
                sale_id = %self.id,
                amount = %payment.amount,
                max_payable = %hint.max_payable,
                "payment exceeds amount due"
            );
        }
        self.payments.record(payment)?;
        Ok(self.recompute())
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Queryable for Sale {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.get())),
            "customer_id" => Some(FieldValue::Id(self.customer_id.get())),
            "sale_date" => Some(FieldValue::Date(self.sale_date)),
            "recall_date" => self.recall_date.map(FieldValue::Date),
            "status" => Some(FieldValue::Text(self.status.as_str().to_string())),
            "payment_method" => Some(FieldValue::Text(self.payment_method.as_str().to_string())),
            "open" => Some(FieldValue::Flag(self.is_open())),
            _ => None,
        }
    }
}
