//! Billing module: the invoice calculator behind every bill.
//!
//! Pure, deterministic arithmetic over line items, discount and payments.
//! Nothing here performs IO; the only stateful piece is [`BillingSession`],
//! which keeps the last valid totals while a bill is being edited.

pub mod calculator;
pub mod config;
pub mod error;
pub mod line_item;
pub mod payment;
pub mod policy;
pub mod session;

pub use calculator::{Discount, InvoiceTotals, compute_line_amount, compute_totals, compute_totals_raw};
pub use config::BillingConfig;
pub use error::{BillingError, BillingField};
pub use line_item::{ItemCategory, LineItem, LineItemDraft, derive_label};
pub use payment::{Payment, PaymentHint, PaymentLog, PaymentMethod, apply_payment, payment_hint};
pub use policy::{DueView, OverpaymentPolicy};
pub use session::BillingSession;
