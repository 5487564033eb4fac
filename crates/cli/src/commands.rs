//! Command implementations; `main` only wires flags to these.

use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use visionpoint_billing::{BillingConfig, OverpaymentPolicy};
use visionpoint_wire::{BillDraft, DueBody, SaleRequest, TotalsBody, parse_sale};

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct BillReport {
    pub totals: TotalsBody,
    pub due: DueBody,
    pub policy: OverpaymentPolicy,
}

impl BillReport {
    pub fn render_text(&self, config: &BillingConfig) -> String {
        let t = &self.totals;
        let mut out = String::new();
        let _ = writeln!(out, "Items:       {}", t.total_quantity);
        let _ = writeln!(out, "Subtotal:    {}", config.format_amount(t.subtotal));
        let _ = writeln!(
            out,
            "Discount:    {} ({}%)",
            config.format_amount(t.discount_amount),
            t.discount_percent
        );
        let _ = writeln!(out, "Net amount:  {}", config.format_amount(t.net_amount));
        let _ = writeln!(out, "Received:    {}", config.format_amount(t.amount_received));
        let _ = writeln!(
            out,
            "Due:         {} [{}]",
            config.format_amount(self.due.display_amount),
            self.due.state
        );
        if self.due.credit.is_positive() {
            let _ = writeln!(out, "Credit:      {}", config.format_amount(self.due.credit));
        }
        out
    }
}

pub fn bill(raw: &str, config: &BillingConfig) -> anyhow::Result<BillReport> {
    let draft = BillDraft::from_json(raw).context("bill draft is not readable")?;
    let session = draft.to_session().context("bill draft rejected")?;
    let totals = session.totals();
    tracing::info!(
        lines = session.items().len(),
        net = %totals.net_amount(),
        due = %totals.due_amount(),
        "bill computed"
    );
    Ok(BillReport {
        totals: TotalsBody::from(totals),
        due: DueBody::from(totals.due_view(config.overpayment_policy)),
        policy: config.overpayment_policy,
    })
}

pub fn normalize(raw: &str) -> anyhow::Result<SaleRequest> {
    let sale = parse_sale(raw).context("sale payload rejected")?;
    Ok(SaleRequest::from_sale(&sale))
}

pub fn render_request(request: &SaleRequest, config: &BillingConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Customer {} on {}", request.customer_id, request.sale_date);
    for item in &request.items {
        let _ = writeln!(
            out,
            "  {} x{} @ {} = {}",
            item.name,
            item.quantity,
            config.format_amount(item.price),
            config.format_amount(item.amount)
        );
    }
    let _ = writeln!(
        out,
        "Net {}  Received {}  Due {}",
        config.format_amount(request.net_amount),
        config.format_amount(request.received_amount),
        config.format_amount(request.due_amount)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAFT: &str = r#"{"items": [{"name": "Frame", "price": 1000}], "discount_percent": 0, "amount_received": 1200}"#;

    #[test]
    fn bill_reports_due_under_policy() {
        let config = BillingConfig::default().with_overpayment_policy(OverpaymentPolicy::CreditBalance);
        let report = bill(DRAFT, &config).unwrap();
        assert_eq!(report.due.state, "credit");
        assert_eq!(report.due.credit.minor(), 20_000);

        let text = report.render_text(&config);
        assert!(text.contains("Net amount:  ₹1000.00"));
        assert!(text.contains("Credit:      ₹200.00"));
    }

    #[test]
    fn show_negative_prints_negative_due() {
        let report = bill(DRAFT, &BillingConfig::default()).unwrap();
        assert_eq!(report.due.state, "overpaid");
        assert!(report.render_text(&BillingConfig::default()).contains("Due:         -₹200.00 [overpaid]"));
    }

    #[test]
    fn rejected_draft_keeps_context() {
        let err = bill(r#"{"items": [{"name": "Frame", "price": -1}]}"#, &BillingConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "bill draft rejected");
        assert!(err.chain().count() >= 2);
    }

    #[test]
    fn normalize_produces_request_body() {
        let request = normalize(
            r#"{"id": "9", "customerId": "4", "date": "2024-03-15",
                "items": [{"name": "Lens", "price": 300, "quantity": 2}], "amountReceived": 600}"#,
        )
        .unwrap();
        assert_eq!(request.customer_id, 4);
        assert!(request.due_amount.is_zero());
        assert!(render_request(&request, &BillingConfig::default()).contains("Lens x2 @ ₹300.00 = ₹600.00"));
    }
}
