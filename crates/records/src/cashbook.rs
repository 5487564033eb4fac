//! Cashbook: money in and out of the till.

use chrono::NaiveDate;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use visionpoint_billing::{BillingError, BillingField, Payment, PaymentMethod};
use visionpoint_core::{DomainError, DomainResult, Entity, Money, SaleId, TransactionId};
use visionpoint_store::{FieldValue, Queryable};

use crate::sale::Sale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money received.
    Credit,
    /// Money paid out (expenses).
    Debit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(DomainError::validation(format!("unknown transaction type: {other:?}"))),
        }
    }
}

/// One cashbook line. `amount` is always positive; `kind` carries direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Money,
    pub method: PaymentMethod,
    pub note: String,
    pub bill_number: Option<SaleId>,
}

impl Transaction {
    /// Credit posted when a sale is billed with money taken at the counter.
    ///
    /// `None` when nothing was received.
    pub fn for_sale(id: TransactionId, sale: &Sale, customer_name: &str) -> Option<Self> {
        let amount = sale.amount_received_at_sale();
        if !amount.is_positive() {
            return None;
        }
        Some(Self {
            id,
            date: sale.sale_date(),
            kind: TransactionKind::Credit,
            amount,
            method: sale.payment_method(),
            note: format!("Sale to {customer_name}"),
            bill_number: Some(sale.id()),
        })
    }

    /// Credit posted for a later payment against a sale.
    pub fn for_payment(id: TransactionId, sale_id: SaleId, payment: &Payment) -> Self {
        Self {
            id,
            date: payment.date,
            kind: TransactionKind::Credit,
            amount: payment.amount,
            method: payment.method,
            note: format!("Payment for bill #{sale_id}"),
            bill_number: Some(sale_id),
        }
    }

    /// Manually entered income or expense. A blank note becomes `"<kind> transaction"`.
    pub fn manual(
        id: TransactionId,
        date: NaiveDate,
        kind: TransactionKind,
        amount: Money,
        method: PaymentMethod,
        note: &str,
    ) -> DomainResult<Self> {
        if !amount.is_positive() {
            return Err(BillingError::invalid(
                BillingField::PaymentAmount,
                format!("must be positive (got {amount})"),
            )
            .into());
        }
        let note = match note.trim() {
            "" => format!("{} transaction", kind.as_str()),
            n => n.to_string(),
        };
        Ok(Self {
            id,
            date,
            kind,
            amount,
            method,
            note,
            bill_number: None,
        })
    }

    /// Amount with sign: positive for credits, negative for debits.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Queryable for Transaction {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.get())),
            "date" => Some(FieldValue::Date(self.date)),
            "type" | "kind" => Some(FieldValue::Text(self.kind.as_str().to_string())),
            "method" => Some(FieldValue::Text(self.method.as_str().to_string())),
            "bill_number" => self.bill_number.map(|id| FieldValue::Id(id.get())),
            _ => None,
        }
    }
}

/// Cashbook list filter; unset fields match everything. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashbookFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub method: Option<PaymentMethod>,
    pub kind: Option<TransactionKind>,
}

impl CashbookFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.from.is_none_or(|from| txn.date >= from)
            && self.to.is_none_or(|to| txn.date <= to)
            && self.method.is_none_or(|m| txn.method == m)
            && self.kind.is_none_or(|k| txn.kind == k)
    }

    pub fn apply<'a>(&self, txns: &'a [Transaction]) -> Vec<&'a Transaction> {
        txns.iter().filter(|t| self.matches(t)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashbookSummary {
    pub total_credit: Money,
    pub total_debit: Money,
    pub net_earnings: Money,
}

impl CashbookSummary {
    pub fn from_transactions<'a>(txns: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Self::default();
        for txn in txns {
            match txn.kind {
                TransactionKind::Credit => summary.total_credit += txn.amount,
                TransactionKind::Debit => summary.total_debit += txn.amount,
            }
        }
        summary.net_earnings = summary.total_credit - summary.total_debit;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::tests::{date, new_sale, rupees};

    fn txn(id: u64, day: u32, kind: TransactionKind, amount: i64, method: PaymentMethod) -> Transaction {
        Transaction::manual(
            TransactionId::new(id),
            date(2024, 3, day),
            kind,
            rupees(amount),
            method,
            "",
        )
        .unwrap()
    }

    #[test]
    fn sale_with_counter_payment_posts_credit() {
        let sale = Sale::create(new_sale(12, 1, rupees(400))).unwrap();
        let entry = Transaction::for_sale(TransactionId::new(1), &sale, "Asha").unwrap();
        assert_eq!(entry.kind, TransactionKind::Credit);
        assert_eq!(entry.amount, rupees(400));
        assert_eq!(entry.note, "Sale to Asha");
        assert_eq!(entry.bill_number, Some(SaleId::new(12)));
    }

    #[test]
    fn unpaid_sale_posts_nothing() {
        let sale = Sale::create(new_sale(12, 1, Money::ZERO)).unwrap();
        assert!(Transaction::for_sale(TransactionId::new(1), &sale, "Asha").is_none());
    }

    #[test]
    fn manual_entry_defaults_note_and_rejects_zero() {
        let t = txn(1, 1, TransactionKind::Debit, 50, PaymentMethod::Cash);
        assert_eq!(t.note, "Debit transaction");
        assert_eq!(t.signed_amount(), rupees(-50));

        let err = Transaction::manual(
            TransactionId::new(2),
            date(2024, 3, 1),
            TransactionKind::Debit,
            Money::ZERO,
            PaymentMethod::Cash,
            "rent",
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn filter_and_summary() {
        let txns = vec![
            txn(1, 1, TransactionKind::Credit, 1000, PaymentMethod::Cash),
            txn(2, 5, TransactionKind::Debit, 300, PaymentMethod::Cash),
            txn(3, 10, TransactionKind::Credit, 500, PaymentMethod::Upi),
            txn(4, 20, TransactionKind::Debit, 100, PaymentMethod::Card),
        ];

        let all = CashbookSummary::from_transactions(&txns);
        assert_eq!(all.total_credit, rupees(1500));
        assert_eq!(all.total_debit, rupees(400));
        assert_eq!(all.net_earnings, rupees(1100));

        let filter = CashbookFilter {
            from: Some(date(2024, 3, 5)),
            to: Some(date(2024, 3, 10)),
            ..CashbookFilter::default()
        };
        let ids: Vec<u64> = filter.apply(&txns).iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![2, 3]);

        let cash_only = CashbookFilter {
            method: Some(PaymentMethod::Cash),
            kind: Some(TransactionKind::Credit),
            ..CashbookFilter::default()
        };
        let summary = CashbookSummary::from_transactions(cash_only.apply(&txns));
        assert_eq!(summary.total_credit, rupees(1000));
        assert_eq!(summary.total_debit, Money::ZERO);
    }
}
