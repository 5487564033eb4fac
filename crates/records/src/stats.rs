//! Sales figures for the dashboard.

use chrono::NaiveDate;
use serde::Serialize;

use visionpoint_core::Money;

use crate::sale::Sale;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalesStats {
    /// Sum of net amounts.
    pub amount: Money,
    pub count: u32,
}

/// Sales dated within `from..=to`.
pub fn sales_between<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    from: NaiveDate,
    to: NaiveDate,
) -> SalesStats {
    sales
        .into_iter()
        .filter(|s| (from..=to).contains(&s.sale_date()))
        .fold(SalesStats::default(), |mut stats, sale| {
            stats.amount += sale.totals().net_amount();
            stats.count += 1;
            stats
        })
}
