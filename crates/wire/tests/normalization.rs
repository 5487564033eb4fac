use chrono::NaiveDate;
use serde_json::json;

use visionpoint_billing::{DueView, OverpaymentPolicy, Payment, PaymentMethod};
use visionpoint_core::{Money, SaleId};
use visionpoint_records::{Sale, receivables};
use visionpoint_store::{FieldValue, InMemoryRepository, Repository};
use visionpoint_wire::{PaymentRequest, SaleRequest, parse_sale};

const BACKEND: &str = r#"{
    "id": 101,
    "customer_id": 7,
    "sale_date": "2024-03-15",
    "items": [
        {"category": "Product", "item_type": "Frame", "item_detail": "Full rim", "price": 500, "quantity": 1},
        {"category": "Product", "name": "Lens", "price": 300, "quantity": 2}
    ],
    "discount_percent": 10,
    "net_amount": 990,
    "received_amount": 400,
    "due_amount": 590,
    "payment_method": "Cash"
}"#;

const LEGACY: &str = r#"{
    "id": "102",
    "customerId": "7",
    "date": "2024-03-16",
    "items": [{"name": "Contact lenses", "price": 1200, "quantity": 1}],
    "totalAmount": 1200,
    "discount": 0,
    "netAmount": 1200,
    "amountReceived": 1500,
    "dueAmount": -300,
    "paymentMethod": "UPI"
}"#;

fn rupees(major: i64) -> Money {
    Money::from_major(major).unwrap()
}

#[test]
fn both_schemas_land_in_one_repository() {
    let repo: InMemoryRepository<Sale> = InMemoryRepository::new();
    repo.put(parse_sale(BACKEND).unwrap()).unwrap();
    repo.put(parse_sale(LEGACY).unwrap()).unwrap();

    let for_customer = repo
        .query_by_field("customer_id", &FieldValue::Id(7));
    assert_eq!(for_customer.len(), 2);

    let legacy = repo.get(&SaleId::new(102)).unwrap();
    assert_eq!(legacy.totals().due_amount(), rupees(-300));
    assert_eq!(
        legacy.due_view(OverpaymentPolicy::ShowNegative),
        DueView::Overpaid(rupees(300))
    );
    assert_eq!(
        legacy.due_view(OverpaymentPolicy::ClampToZero),
        DueView::Settled
    );

    // The overpaid bill does not offset what is owed on the first.
    assert_eq!(receivables::total_due(&for_customer), rupees(590));
}

#[test]
fn payment_flow_produces_consistent_request_bodies() {
    let mut sale = parse_sale(BACKEND).unwrap();
    let payment = Payment::new(
        rupees(590),
        PaymentMethod::Card,
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
    )
    .unwrap();

    let payment_body = serde_json::to_value(PaymentRequest::from(&payment)).unwrap();
    assert_eq!(payment_body["amount"], json!(590.0));

    sale.record_payment(payment).unwrap();
    assert!(sale.totals().is_consistent());

    let body = serde_json::to_value(SaleRequest::from_sale(&sale)).unwrap();
    assert_eq!(body["net_amount"], json!(990.0));
    assert_eq!(body["received_amount"], json!(990.0));
    assert_eq!(body["due_amount"], json!(0.0));
    assert_eq!(body["items"][0]["name"], json!("Frame - Full rim"));
}

#[test]
fn renormalizing_a_request_body_is_stable() {
    let sale = parse_sale(BACKEND).unwrap();
    let mut body = serde_json::to_value(SaleRequest::from_sale(&sale)).unwrap();
    body["id"] = json!(101);

    let again = parse_sale(&body.to_string()).unwrap();
    assert_eq!(again.totals(), sale.totals());
    assert_eq!(again.items(), sale.items());
}
