//! Validating decorator over a data source.

use std::sync::Arc;

use log::warn;

use crate::deferred::Deferred;
use crate::error::DataError;
use crate::query::Query;

use super::traits::{DeleteDataSource, GetDataSource, PutDataSource};

/// Strategy deciding whether a fetched entity is still acceptable.
/// Stateless with respect to the decorator.
pub trait Validator<T>: Send + Sync {
    fn is_valid(&self, entity: &T) -> bool;
}

/// Closures are validators.
impl<T, F> Validator<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_valid(&self, entity: &T) -> bool {
        self(entity)
    }
}

/// Fails reads with `NotValid` when the validator rejects a fetched
/// entity. Writes and deletes pass through untouched.
pub struct ValidatedDataSource<S, V> {
    inner: S,
    validator: Arc<V>,
}

impl<S, V> ValidatedDataSource<S, V> {
    pub fn new(inner: S, validator: V) -> Self {
        ValidatedDataSource {
            inner,
            validator: Arc::new(validator),
        }
    }

    /// Access the decorated source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<T, S, V> GetDataSource<T> for ValidatedDataSource<S, V>
where
    T: Send + 'static,
    S: GetDataSource<T>,
    V: Validator<T> + 'static,
{
    fn get(&self, query: Arc<dyn Query>) -> Deferred<T> {
        let validator = Arc::clone(&self.validator);
        self.inner.get(query).filter(move |entity| {
            if validator.is_valid(entity) {
                None
            } else {
                warn!("validator rejected fetched entity");
                Some(DataError::NotValid)
            }
        })
    }

    fn get_all(&self, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let validator = Arc::clone(&self.validator);
        self.inner.get_all(query).filter(move |entities| {
            if entities.iter().all(|entity| validator.is_valid(entity)) {
                None
            } else {
                warn!("validator rejected at least one fetched entity");
                Some(DataError::NotValid)
            }
        })
    }
}

impl<T, S, V> PutDataSource<T> for ValidatedDataSource<S, V>
where
    T: Send + 'static,
    S: PutDataSource<T>,
    V: Send + Sync,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>) -> Deferred<T> {
        self.inner.put(value, query)
    }

    fn put_all(&self, values: Vec<T>, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        self.inner.put_all(values, query)
    }
}

impl<S, V> DeleteDataSource for ValidatedDataSource<S, V>
where
    S: DeleteDataSource,
    V: Send + Sync,
{
    fn delete(&self, query: Arc<dyn Query>) -> Deferred<()> {
        self.inner.delete(query)
    }

    fn delete_all(&self, query: Arc<dyn Query>) -> Deferred<()> {
        self.inner.delete_all(query)
    }
}

/// Builder sugar: wrap any readable source in a validator.
pub trait Validatable<T: Send + 'static>: GetDataSource<T> + Sized {
    fn validated<V: Validator<T>>(self, validator: V) -> ValidatedDataSource<Self, V> {
        ValidatedDataSource::new(self, validator)
    }
}

impl<T: Send + 'static, S: GetDataSource<T>> Validatable<T> for S {}
