use std::collections::BTreeMap;
use std::sync::RwLock;

use visionpoint_core::Entity;

use crate::repository::{FieldValue, Queryable, Repository, StoreError};

/// In-memory repository for tests/dev and offline use.
#[derive(Debug)]
pub struct InMemoryRepository<T: Entity> {
    inner: RwLock<BTreeMap<T::Id, T>>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> FromIterator<T> for InMemoryRepository<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let map = iter.into_iter().map(|r| (*r.id(), r)).collect();
        Self {
            inner: RwLock::new(map),
        }
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Queryable + Clone + Send + Sync + 'static,
    T::Id: Send + Sync,
{
    fn get(&self, id: &T::Id) -> Option<T> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn put(&self, record: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(*record.id(), record);
        Ok(())
    }

    fn put_new(&self, record: T) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let id = *record.id();
        if map.contains_key(&id) {
            tracing::debug!(?id, "rejected duplicate record");
            return Err(StoreError::Duplicate(format!("{id:?}")));
        }
        map.insert(id, record);
        Ok(())
    }

    fn remove(&self, id: &T::Id) -> Option<T> {
        let mut map = self.inner.write().ok()?;
        map.remove(id)
    }

    fn query_by_field(&self, field: &str, value: &FieldValue) -> Vec<T> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.values()
            .filter(|r| r.field(field).as_ref() == Some(value))
            .cloned()
            .collect()
    }

    fn list(&self) -> Vec<T> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: u64,
        owner: u64,
        text: String,
    }

    impl Entity for Note {
        type Id = u64;

        fn id(&self) -> &u64 {
            &self.id
        }
    }

    impl Queryable for Note {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "owner" => Some(FieldValue::Id(self.owner)),
                "text" => Some(FieldValue::Text(self.text.clone())),
                _ => None,
            }
        }
    }

    fn note(id: u64, owner: u64, text: &str) -> Note {
        Note {
            id,
            owner,
            text: text.to_string(),
        }
    }

    #[test]
    fn put_replaces_and_get_returns_latest() {
        let repo = InMemoryRepository::<Note>::new();
        repo.put(note(1, 7, "first")).unwrap();
        repo.put(note(1, 7, "second")).unwrap();
        assert_eq!(repo.get(&1).unwrap().text, "second");
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn put_new_rejects_existing_id() {
        let repo = InMemoryRepository::<Note>::new();
        repo.put_new(note(1, 7, "a")).unwrap();
        let err = repo.put_new(note(1, 8, "b")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(repo.get(&1).unwrap().owner, 7);
    }

    #[test]
    fn query_by_field_filters_and_orders_by_id() {
        let repo: InMemoryRepository<Note> =
            [note(3, 7, "c"), note(1, 7, "a"), note(2, 9, "b")].into_iter().collect();

        let owned: Vec<u64> = repo
            .query_by_field("owner", &FieldValue::Id(7))
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(owned, vec![1, 3]);

        assert!(repo.query_by_field("missing", &FieldValue::Id(7)).is_empty());
        assert_eq!(repo.query_by_field("text", &"b".into()).len(), 1);
    }

    #[test]
    fn shared_handle_sees_writes() {
        let repo = Arc::new(InMemoryRepository::<Note>::new());
        let writer = Arc::clone(&repo);
        writer.put(note(5, 1, "x")).unwrap();
        assert_eq!(Repository::<Note>::list(&repo).len(), 1);
        assert_eq!(Repository::<Note>::remove(&repo, &5).map(|n| n.id), Some(5));
        assert!(repo.is_empty());
    }
}
