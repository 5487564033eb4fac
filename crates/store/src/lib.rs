//! Keyed record storage.
//!
//! Every layer that needs persistence receives a [`Repository`] explicitly;
//! there is no process-wide store.

pub mod in_memory;
pub mod repository;

pub use in_memory::InMemoryRepository;
pub use repository::{FieldValue, Queryable, Repository, StoreError};
