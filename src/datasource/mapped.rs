//! Mapping decorator bridging a source of one entity type to another.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::mapper::{map_all, Mapper};
use crate::query::Query;

use super::traits::{DeleteDataSource, GetDataSource, PutDataSource};

/// Presents an inner source of `U` as a source of `T` through a pair of
/// mappers. Mapping failures resolve the returned deferred with their
/// error.
pub struct MappedDataSource<S, T: 'static, U: 'static> {
    inner: S,
    inward: Arc<dyn Mapper<T, U>>,
    outward: Arc<dyn Mapper<U, T>>,
}

impl<S, T: 'static, U: 'static> MappedDataSource<S, T, U> {
    pub fn new(
        inner: S,
        inward: impl Mapper<T, U> + 'static,
        outward: impl Mapper<U, T> + 'static,
    ) -> Self {
        MappedDataSource {
            inner,
            inward: Arc::new(inward),
            outward: Arc::new(outward),
        }
    }
}

impl<S, T, U> GetDataSource<T> for MappedDataSource<S, T, U>
where
    S: GetDataSource<U>,
    T: Send + 'static,
    U: Send + 'static,
{
    fn get(&self, query: Arc<dyn Query>) -> Deferred<T> {
        let outward = Arc::clone(&self.outward);
        self.inner
            .get(query)
            .flat_map(move |entity| Deferred::of_result(outward.map(entity)))
    }

    fn get_all(&self, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let outward = Arc::clone(&self.outward);
        self.inner
            .get_all(query)
            .flat_map(move |entities| Deferred::of_result(map_all(outward.as_ref(), entities)))
    }
}

impl<S, T, U> PutDataSource<T> for MappedDataSource<S, T, U>
where
    S: PutDataSource<U>,
    T: Send + 'static,
    U: Send + 'static,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>) -> Deferred<T> {
        let mapped = match value {
            Some(value) => match self.inward.map(value) {
                Ok(mapped) => Some(mapped),
                Err(error) => return Deferred::of_error(error),
            },
            None => None,
        };
        let outward = Arc::clone(&self.outward);
        self.inner
            .put(mapped, query)
            .flat_map(move |stored| Deferred::of_result(outward.map(stored)))
    }

    fn put_all(&self, values: Vec<T>, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let mapped = match map_all(self.inward.as_ref(), values) {
            Ok(mapped) => mapped,
            Err(error) => return Deferred::of_error(error),
        };
        let outward = Arc::clone(&self.outward);
        self.inner
            .put_all(mapped, query)
            .flat_map(move |stored| Deferred::of_result(map_all(outward.as_ref(), stored)))
    }
}

impl<S, T, U> DeleteDataSource for MappedDataSource<S, T, U>
where
    S: DeleteDataSource,
    T: 'static,
    U: 'static,
{
    fn delete(&self, query: Arc<dyn Query>) -> Deferred<()> {
        self.inner.delete(query)
    }

    fn delete_all(&self, query: Arc<dyn Query>) -> Deferred<()> {
        self.inner.delete_all(query)
    }
}
