//! Daily outreach lists: recalls and birthdays.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use visionpoint_core::CustomerId;

use crate::customer::Customer;
use crate::sale::Sale;

/// Customers with a sale whose recall (follow-up) date is `date`.
///
/// Each customer appears once, in id order; customers missing from
/// `customers` are skipped.
pub fn recalls_on<'a>(sales: &[Sale], customers: &'a [Customer], date: NaiveDate) -> Vec<&'a Customer> {
    let due: BTreeSet<CustomerId> = sales
        .iter()
        .filter(|s| s.recall_date() == Some(date))
        .map(Sale::customer_id)
        .collect();

    let mut found: Vec<&Customer> = customers.iter().filter(|c| due.contains(&c.id)).collect();
    found.sort_by_key(|c| c.id);
    found.dedup_by_key(|c| c.id);
    found
}

/// Customers whose birthday falls on `date`.
pub fn birthdays_on(customers: &[Customer], date: NaiveDate) -> Vec<&Customer> {
    customers.iter().filter(|c| c.has_birthday_on(date)).collect()
}
