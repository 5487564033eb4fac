//! `visionpoint-core`: domain building blocks shared by every crate.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, money in minor units, discount percentages and the shared
//! error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod percent;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, PrescriptionId, SaleId, TransactionId};
pub use money::Money;
pub use percent::DiscountPercent;
