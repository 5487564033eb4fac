//! Wire shapes exchanged with the backend.
//!
//! Two historical schemas are in circulation (`net_amount` vs `netAmount`,
//! `sale_date` vs `date`, ...). Everything inbound goes through one
//! normalization step into the canonical records of `visionpoint-records`;
//! everything outbound is built from canonical records.

pub mod customer;
pub mod draft;
pub mod error;
pub mod request;
pub mod sale;
pub mod value;

pub use customer::{WireCustomer, normalize_customer, parse_customer};
pub use draft::BillDraft;
pub use error::WireError;
pub use request::{DueBody, PaymentRequest, SaleItemBody, SaleRequest, TotalsBody};
pub use sale::{
    WireCustomerRef, WirePayment, WireSale, WireSaleItem, legacy_discount, normalize_sale,
    parse_sale,
};
pub use value::WireNumber;
