//! Mapping repository bridging two entity representations.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::mapper::{map_all, Mapper};
use crate::query::Query;

use super::operation::Operation;
use super::traits::{DeleteRepository, GetRepository, PutRepository};

/// Presents an inner repository of `U` as a repository of `T` through a
/// pair of mappers.
///
/// Reads map results outward; writes map the input inward, then the
/// response outward. Deletes and the operation value pass through
/// unchanged. Mapping failures propagate as data errors.
pub struct MappingRepository<R, T: 'static, U: 'static> {
    inner: R,
    inward: Arc<dyn Mapper<T, U>>,
    outward: Arc<dyn Mapper<U, T>>,
}

impl<R, T: 'static, U: 'static> MappingRepository<R, T, U> {
    pub fn new(
        inner: R,
        inward: impl Mapper<T, U> + 'static,
        outward: impl Mapper<U, T> + 'static,
    ) -> Self {
        MappingRepository {
            inner,
            inward: Arc::new(inward),
            outward: Arc::new(outward),
        }
    }

    /// Access the wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R, T, U> GetRepository<T> for MappingRepository<R, T, U>
where
    R: GetRepository<U>,
    T: Send + 'static,
    U: Send + 'static,
{
    fn get(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<T> {
        let outward = Arc::clone(&self.outward);
        self.inner
            .get(query, operation)
            .flat_map(move |entity| Deferred::of_result(outward.map(entity)))
    }

    fn get_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<Vec<T>> {
        let outward = Arc::clone(&self.outward);
        self.inner
            .get_all(query, operation)
            .flat_map(move |entities| Deferred::of_result(map_all(outward.as_ref(), entities)))
    }
}

impl<R, T, U> PutRepository<T> for MappingRepository<R, T, U>
where
    R: PutRepository<U>,
    T: Send + 'static,
    U: Send + 'static,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>, operation: Operation) -> Deferred<T> {
        let mapped = match value {
            Some(value) => match self.inward.map(value) {
                Ok(mapped) => Some(mapped),
                Err(error) => return Deferred::of_error(error),
            },
            None => None,
        };
        let outward = Arc::clone(&self.outward);
        self.inner
            .put(mapped, query, operation)
            .flat_map(move |stored| Deferred::of_result(outward.map(stored)))
    }

    fn put_all(
        &self,
        values: Vec<T>,
        query: Arc<dyn Query>,
        operation: Operation,
    ) -> Deferred<Vec<T>> {
        let mapped = match map_all(self.inward.as_ref(), values) {
            Ok(mapped) => mapped,
            Err(error) => return Deferred::of_error(error),
        };
        let outward = Arc::clone(&self.outward);
        self.inner
            .put_all(mapped, query, operation)
            .flat_map(move |stored| Deferred::of_result(map_all(outward.as_ref(), stored)))
    }
}

impl<R, T, U> DeleteRepository for MappingRepository<R, T, U>
where
    R: DeleteRepository,
    T: 'static,
    U: 'static,
{
    fn delete(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()> {
        self.inner.delete(query, operation)
    }

    fn delete_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()> {
        self.inner.delete_all(query, operation)
    }
}
