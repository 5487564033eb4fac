//! Accounts receivable derived from sales.

use std::collections::BTreeMap;

use serde::Serialize;

use visionpoint_core::{CustomerId, Money};

use crate::sale::Sale;

/// Per-customer billing position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerBalance {
    pub customer_id: CustomerId,
    pub total_billed: Money,
    pub total_received: Money,
    /// Sum of positive dues. Overpaid sales do not offset other sales.
    pub outstanding: Money,
    pub open_sales: u32,
}

impl CustomerBalance {
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            total_billed: Money::ZERO,
            total_received: Money::ZERO,
            outstanding: Money::ZERO,
            open_sales: 0,
        }
    }

    fn add(&mut self, sale: &Sale) {
        let totals = sale.totals();
        self.total_billed += totals.net_amount();
        self.total_received += totals.amount_received();
        if sale.is_open() {
            self.outstanding += totals.due_amount();
            self.open_sales += 1;
        }
    }
}

/// Balances for every customer with at least one sale, ordered by customer id.
pub fn balances<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<CustomerBalance> {
    let mut by_customer: BTreeMap<CustomerId, CustomerBalance> = BTreeMap::new();
    for sale in sales {
        by_customer
            .entry(sale.customer_id())
            .or_insert_with(|| CustomerBalance::new(sale.customer_id()))
            .add(sale);
    }
    by_customer.into_values().collect()
}

/// Total still owed across all sales.
pub fn total_due<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Money {
    sales
        .into_iter()
        .filter(|s| s.is_open())
        .map(|s| s.totals().due_amount())
        .sum()
}
