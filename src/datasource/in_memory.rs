//! InMemoryDataSource - HashMap-backed data source for testing and
//! development.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::deferred::Deferred;
use crate::error::DataError;
use crate::query::{IdQuery, KeyQuery, Query};

use super::traits::{DeleteDataSource, GetDataSource, PutDataSource};

/// In-memory data source backed by a HashMap.
///
/// Entities are stored as serialized JSON bytes. Single entities live
/// under the key a `KeyQuery` / `IdQuery<String>` carries; batches stored
/// with `put_all` live in a separate map under the same kind of key.
/// Clone-friendly via `Arc`: clones share storage.
pub struct InMemoryDataSource<T> {
    items: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    batches: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryDataSource<T> {
    fn clone(&self) -> Self {
        InMemoryDataSource {
            items: Arc::clone(&self.items),
            batches: Arc::clone(&self.batches),
            _entity: PhantomData,
        }
    }
}

impl<T> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryDataSource<T> {
    /// Create a new empty data source.
    pub fn new() -> Self {
        InMemoryDataSource {
            items: Arc::new(RwLock::new(HashMap::new())),
            batches: Arc::new(RwLock::new(HashMap::new())),
            _entity: PhantomData,
        }
    }

    /// Number of single entities currently stored.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key_of(query: &dyn Query) -> Option<String> {
        if let Some(key) = query.downcast_ref::<KeyQuery>() {
            Some(key.key().to_string())
        } else {
            query
                .downcast_ref::<IdQuery<String>>()
                .map(|id| id.id().clone())
        }
    }
}

fn poisoned<T: Send + 'static>() -> Deferred<T> {
    Deferred::of_error(DataError::Other("storage lock poisoned".into()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DataError> {
    serde_json::from_slice(bytes).map_err(|e| DataError::Other(e.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DataError> {
    serde_json::to_vec(value).map_err(|e| DataError::Other(e.to_string()))
}

impl<T> GetDataSource<T> for InMemoryDataSource<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn get(&self, query: Arc<dyn Query>) -> Deferred<T> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let items = match self.items.read() {
            Ok(items) => items,
            Err(_) => return poisoned(),
        };
        match items.get(&key) {
            Some(bytes) => Deferred::of_result(decode(bytes)),
            None => Deferred::of_error(DataError::NotFound),
        }
    }

    fn get_all(&self, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let batches = match self.batches.read() {
            Ok(batches) => batches,
            Err(_) => return poisoned(),
        };
        match batches.get(&key) {
            Some(bytes) => Deferred::of_result(decode(bytes)),
            None => Deferred::of_error(DataError::NotFound),
        }
    }
}

impl<T> PutDataSource<T> for InMemoryDataSource<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>) -> Deferred<T> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let value = match value {
            Some(value) => value,
            None => {
                return Deferred::of_error(DataError::IllegalArgument(
                    "in-memory put requires a value".into(),
                ))
            }
        };
        let bytes = match encode(&value) {
            Ok(bytes) => bytes,
            Err(error) => return Deferred::of_error(error),
        };
        let mut items = match self.items.write() {
            Ok(items) => items,
            Err(_) => return poisoned(),
        };
        items.insert(key, bytes);
        Deferred::of_value(value)
    }

    fn put_all(&self, values: Vec<T>, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let bytes = match encode(&values) {
            Ok(bytes) => bytes,
            Err(error) => return Deferred::of_error(error),
        };
        let mut batches = match self.batches.write() {
            Ok(batches) => batches,
            Err(_) => return poisoned(),
        };
        batches.insert(key, bytes);
        Deferred::of_value(values)
    }
}

impl<T> DeleteDataSource for InMemoryDataSource<T>
where
    T: Send + 'static,
{
    fn delete(&self, query: Arc<dyn Query>) -> Deferred<()> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let mut items = match self.items.write() {
            Ok(items) => items,
            Err(_) => return poisoned(),
        };
        // Deleting an absent entity is fine.
        items.remove(&key);
        Deferred::of_value(())
    }

    fn delete_all(&self, query: Arc<dyn Query>) -> Deferred<()> {
        let key = match Self::key_of(query.as_ref()) {
            Some(key) => key,
            None => return Deferred::of_error(DataError::QueryNotSupported),
        };
        let mut batches = match self.batches.write() {
            Ok(batches) => batches,
            Err(_) => return poisoned(),
        };
        batches.remove(&key);
        Deferred::of_value(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{query, BlankQuery};
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct TestEntity {
        id: String,
        value: i32,
    }

    fn entity(id: &str, value: i32) -> TestEntity {
        TestEntity {
            id: id.into(),
            value,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let source = InMemoryDataSource::new();
        source
            .put(Some(entity("1", 42)), query(KeyQuery::new("e:1")))
            .result()
            .unwrap();

        let loaded = source.get(query(KeyQuery::new("e:1"))).result().unwrap();
        assert_eq!(loaded, entity("1", 42));
    }

    #[test]
    fn get_missing_fails_not_found() {
        let source: InMemoryDataSource<TestEntity> = InMemoryDataSource::new();
        assert_eq!(
            source.get(query(KeyQuery::new("missing"))).result(),
            Err(DataError::NotFound)
        );
    }

    #[test]
    fn put_none_fails_illegal_argument() {
        let source: InMemoryDataSource<TestEntity> = InMemoryDataSource::new();
        let result = source.put(None, query(KeyQuery::new("e:1"))).result();
        assert!(matches!(result, Err(DataError::IllegalArgument(_))));
    }

    #[test]
    fn unknown_query_fails_query_not_supported() {
        let source: InMemoryDataSource<TestEntity> = InMemoryDataSource::new();
        assert_eq!(
            source.get(query(BlankQuery)).result(),
            Err(DataError::QueryNotSupported)
        );
    }

    #[test]
    fn id_query_addresses_same_storage_as_key_query() {
        let source = InMemoryDataSource::new();
        source
            .put(Some(entity("1", 1)), query(IdQuery::new("e:1".to_string())))
            .result()
            .unwrap();
        assert!(source.get(query(KeyQuery::new("e:1"))).result().is_ok());
    }

    #[test]
    fn delete_is_idempotent() {
        let source = InMemoryDataSource::new();
        source
            .put(Some(entity("1", 1)), query(KeyQuery::new("e:1")))
            .result()
            .unwrap();

        assert_eq!(source.delete(query(KeyQuery::new("e:1"))).result(), Ok(()));
        assert_eq!(source.delete(query(KeyQuery::new("e:1"))).result(), Ok(()));
        assert_eq!(
            source.get(query(KeyQuery::new("e:1"))).result(),
            Err(DataError::NotFound)
        );
    }

    #[test]
    fn batches_round_trip_under_their_key() {
        let source = InMemoryDataSource::new();
        let all = vec![entity("1", 1), entity("2", 2)];
        source
            .put_all(all.clone(), query(KeyQuery::new("everyone")))
            .result()
            .unwrap();

        let loaded = source
            .get_all(query(KeyQuery::new("everyone")))
            .result()
            .unwrap();
        assert_eq!(loaded, all);
    }

    #[test]
    fn clones_share_storage() {
        let source = InMemoryDataSource::new();
        let twin = source.clone();
        source
            .put(Some(entity("1", 9)), query(KeyQuery::new("e:1")))
            .result()
            .unwrap();

        assert_eq!(
            twin.get(query(KeyQuery::new("e:1"))).result().unwrap(),
            entity("1", 9)
        );
        assert_eq!(twin.len(), 1);
    }
}
