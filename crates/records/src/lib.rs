//! Shop records: customers, prescriptions, sales and the cashbook.
//!
//! Records here are the canonical in-memory shapes. Wire formats are mapped
//! into them once, at the boundary (see `visionpoint-wire`).

pub mod cashbook;
pub mod customer;
pub mod prescription;
pub mod receivables;
pub mod reminders;
pub mod sale;
pub mod stats;

pub use cashbook::{CashbookFilter, CashbookSummary, Transaction, TransactionKind};
pub use customer::{Customer, Gender};
pub use prescription::{EyePower, Prescription, PrescriptionKind};
pub use receivables::CustomerBalance;
pub use sale::{NewSale, Sale, SaleStatus};
pub use stats::SalesStats;
