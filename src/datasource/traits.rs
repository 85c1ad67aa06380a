//! The capability triplet backends implement.
//!
//! A backend implements any subset of the three sub-traits; every method
//! defaults to an `Unimplemented` failure, so partial backends stay honest
//! without boilerplate.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::error::DataError;
use crate::query::Query;

/// Read capability over entities addressed by opaque queries.
pub trait GetDataSource<T: Send + 'static>: Send + Sync {
    /// Produce the single entity the query addresses; fails `NotFound`
    /// when absent.
    fn get(&self, query: Arc<dyn Query>) -> Deferred<T> {
        let _ = query;
        Deferred::of_error(DataError::Unimplemented)
    }

    /// Produce every entity the query addresses.
    fn get_all(&self, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let _ = query;
        Deferred::of_error(DataError::Unimplemented)
    }
}

/// Write capability.
pub trait PutDataSource<T: Send + 'static>: Send + Sync {
    /// Store or upsert; returns the stored form, which may differ from the
    /// input (server-assigned ids). A `None` value is routed to the
    /// backend, which may reject it with `IllegalArgument`.
    fn put(&self, value: Option<T>, query: Arc<dyn Query>) -> Deferred<T> {
        let _ = (value, query);
        Deferred::of_error(DataError::Unimplemented)
    }

    /// Bulk variant of [`put`](PutDataSource::put).
    fn put_all(&self, values: Vec<T>, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        let _ = (values, query);
        Deferred::of_error(DataError::Unimplemented)
    }
}

/// Removal capability. Deleting an absent entity is not an error.
pub trait DeleteDataSource: Send + Sync {
    fn delete(&self, query: Arc<dyn Query>) -> Deferred<()> {
        let _ = query;
        Deferred::of_error(DataError::Unimplemented)
    }

    fn delete_all(&self, query: Arc<dyn Query>) -> Deferred<()> {
        let _ = query;
        Deferred::of_error(DataError::Unimplemented)
    }
}

/// The full capability set.
pub trait DataSource<T: Send + 'static>:
    GetDataSource<T> + PutDataSource<T> + DeleteDataSource
{
}

// Blanket implementation: anything with all three capabilities is a DataSource
impl<T, S> DataSource<T> for S
where
    T: Send + 'static,
    S: GetDataSource<T> + PutDataSource<T> + DeleteDataSource,
{
}

// Shared handles forward to the source they wrap. These must override the
// default bodies or an `Arc<S>` would answer `Unimplemented` for
// capabilities `S` has.
impl<T, S> GetDataSource<T> for Arc<S>
where
    T: Send + 'static,
    S: GetDataSource<T> + ?Sized,
{
    fn get(&self, query: Arc<dyn Query>) -> Deferred<T> {
        (**self).get(query)
    }

    fn get_all(&self, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        (**self).get_all(query)
    }
}

impl<T, S> PutDataSource<T> for Arc<S>
where
    T: Send + 'static,
    S: PutDataSource<T> + ?Sized,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>) -> Deferred<T> {
        (**self).put(value, query)
    }

    fn put_all(&self, values: Vec<T>, query: Arc<dyn Query>) -> Deferred<Vec<T>> {
        (**self).put_all(values, query)
    }
}

impl<S> DeleteDataSource for Arc<S>
where
    S: DeleteDataSource + ?Sized,
{
    fn delete(&self, query: Arc<dyn Query>) -> Deferred<()> {
        (**self).delete(query)
    }

    fn delete_all(&self, query: Arc<dyn Query>) -> Deferred<()> {
        (**self).delete_all(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{query, BlankQuery};

    struct GetOnly;

    impl GetDataSource<i32> for GetOnly {
        fn get(&self, _query: Arc<dyn Query>) -> Deferred<i32> {
            Deferred::of_value(1)
        }
    }

    impl PutDataSource<i32> for GetOnly {}
    impl DeleteDataSource for GetOnly {}

    #[test]
    fn unimplemented_methods_fail_soft() {
        let source = GetOnly;
        assert_eq!(source.get(query(BlankQuery)).result(), Ok(1));
        assert_eq!(
            source.get_all(query(BlankQuery)).result(),
            Err(DataError::Unimplemented)
        );
        assert_eq!(
            source.put(Some(2), query(BlankQuery)).result(),
            Err(DataError::Unimplemented)
        );
        assert_eq!(
            source.delete(query(BlankQuery)).result(),
            Err(DataError::Unimplemented)
        );
    }
}
