use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use visionpoint_core::Entity;

/// Value of a queryable record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Id(u64),
    Text(String),
    Date(NaiveDate),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Records that can be looked up by named fields.
pub trait Queryable {
    /// Value of `name`, or `None` if the record has no such field (or it is unset).
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    Duplicate(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Durable keyed storage for one record type.
pub trait Repository<T>: Send + Sync
where
    T: Entity,
{
    fn get(&self, id: &T::Id) -> Option<T>;

    /// Insert or replace the record with the same id.
    fn put(&self, record: T) -> Result<(), StoreError>;

    /// Insert a record whose id must not exist yet.
    fn put_new(&self, record: T) -> Result<(), StoreError>;

    fn remove(&self, id: &T::Id) -> Option<T>;

    /// All records whose `field` equals `value`, ordered by id.
    fn query_by_field(&self, field: &str, value: &FieldValue) -> Vec<T>;

    /// All records, ordered by id.
    fn list(&self) -> Vec<T>;
}

impl<T, R> Repository<T> for Arc<R>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    fn get(&self, id: &T::Id) -> Option<T> {
        (**self).get(id)
    }

    fn put(&self, record: T) -> Result<(), StoreError> {
        (**self).put(record)
    }

    fn put_new(&self, record: T) -> Result<(), StoreError> {
        (**self).put_new(record)
    }

    fn remove(&self, id: &T::Id) -> Option<T> {
        (**self).remove(id)
    }

    fn query_by_field(&self, field: &str, value: &FieldValue) -> Vec<T> {
        (**self).query_by_field(field, value)
    }

    fn list(&self) -> Vec<T> {
        (**self).list()
    }
}
