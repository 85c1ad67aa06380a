//! Single-source repositories that delegate blindly.
//!
//! The operation parameter is accepted for signature uniformity and
//! ignored; whatever policy the caller names, there is only one source to
//! consult.

use std::sync::Arc;

use crate::datasource::{DataSource, DeleteDataSource, GetDataSource, PutDataSource};
use crate::deferred::Deferred;
use crate::query::Query;

use super::operation::Operation;
use super::traits::{DeleteRepository, GetRepository, PutRepository};

/// Get-only repository over one data source.
pub struct SingleGetRepository<S> {
    source: S,
}

impl<S> SingleGetRepository<S> {
    pub fn new(source: S) -> Self {
        SingleGetRepository { source }
    }
}

impl<T, S> GetRepository<T> for SingleGetRepository<S>
where
    T: Send + 'static,
    S: GetDataSource<T>,
{
    fn get(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<T> {
        self.source.get(query)
    }

    fn get_all(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<Vec<T>> {
        self.source.get_all(query)
    }
}

/// Put-only repository over one data source.
pub struct SinglePutRepository<S> {
    source: S,
}

impl<S> SinglePutRepository<S> {
    pub fn new(source: S) -> Self {
        SinglePutRepository { source }
    }
}

impl<T, S> PutRepository<T> for SinglePutRepository<S>
where
    T: Send + 'static,
    S: PutDataSource<T>,
{
    fn put(&self, value: Option<T>, query: Arc<dyn Query>, _operation: Operation) -> Deferred<T> {
        self.source.put(value, query)
    }

    fn put_all(
        &self,
        values: Vec<T>,
        query: Arc<dyn Query>,
        _operation: Operation,
    ) -> Deferred<Vec<T>> {
        self.source.put_all(values, query)
    }
}

/// Delete-only repository over one data source.
pub struct SingleDeleteRepository<S> {
    source: S,
}

impl<S> SingleDeleteRepository<S> {
    pub fn new(source: S) -> Self {
        SingleDeleteRepository { source }
    }
}

impl<S> DeleteRepository for SingleDeleteRepository<S>
where
    S: DeleteDataSource,
{
    fn delete(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<()> {
        self.source.delete(query)
    }

    fn delete_all(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<()> {
        self.source.delete_all(query)
    }
}

/// Repository over up to three independent data source handles.
///
/// Any handle may be absent. Invoking a capability whose handle is absent
/// is a programming error and panics; a caller that wired the repository
/// has promised the capability exists.
pub struct DataSourceRepository<T> {
    get: Option<Arc<dyn GetDataSource<T>>>,
    put: Option<Arc<dyn PutDataSource<T>>>,
    delete: Option<Arc<dyn DeleteDataSource>>,
}

impl<T: Send + 'static> DataSourceRepository<T> {
    pub fn new(
        get: Option<Arc<dyn GetDataSource<T>>>,
        put: Option<Arc<dyn PutDataSource<T>>>,
        delete: Option<Arc<dyn DeleteDataSource>>,
    ) -> Self {
        DataSourceRepository { get, put, delete }
    }

    fn require_get(&self) -> &Arc<dyn GetDataSource<T>> {
        match &self.get {
            Some(source) => source,
            None => panic!("get invoked on a repository wired without a get source"),
        }
    }

    fn require_put(&self) -> &Arc<dyn PutDataSource<T>> {
        match &self.put {
            Some(source) => source,
            None => panic!("put invoked on a repository wired without a put source"),
        }
    }

    fn require_delete(&self) -> &Arc<dyn DeleteDataSource> {
        match &self.delete {
            Some(source) => source,
            None => panic!("delete invoked on a repository wired without a delete source"),
        }
    }
}

impl<T: Send + 'static> GetRepository<T> for DataSourceRepository<T> {
    fn get(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<T> {
        self.require_get().get(query)
    }

    fn get_all(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<Vec<T>> {
        self.require_get().get_all(query)
    }
}

impl<T: Send + 'static> PutRepository<T> for DataSourceRepository<T> {
    fn put(&self, value: Option<T>, query: Arc<dyn Query>, _operation: Operation) -> Deferred<T> {
        self.require_put().put(value, query)
    }

    fn put_all(
        &self,
        values: Vec<T>,
        query: Arc<dyn Query>,
        _operation: Operation,
    ) -> Deferred<Vec<T>> {
        self.require_put().put_all(values, query)
    }
}

impl<T: Send + 'static> DeleteRepository for DataSourceRepository<T> {
    fn delete(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<()> {
        self.require_delete().delete(query)
    }

    fn delete_all(&self, query: Arc<dyn Query>, _operation: Operation) -> Deferred<()> {
        self.require_delete().delete_all(query)
    }
}

/// Builder sugar: view one full data source as a repository.
pub trait IntoRepository<T: Send + 'static>: DataSource<T> + Sized + 'static {
    fn into_repository(self) -> DataSourceRepository<T> {
        let source = Arc::new(self);
        DataSourceRepository::new(
            Some(Arc::clone(&source) as Arc<dyn GetDataSource<T>>),
            Some(Arc::clone(&source) as Arc<dyn PutDataSource<T>>),
            Some(source as Arc<dyn DeleteDataSource>),
        )
    }
}

impl<T, S> IntoRepository<T> for S
where
    T: Send + 'static,
    S: DataSource<T> + 'static,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::query::{query, BlankQuery};

    struct Fixed(i32);

    impl GetDataSource<i32> for Fixed {
        fn get(&self, _query: Arc<dyn Query>) -> Deferred<i32> {
            Deferred::of_value(self.0)
        }
    }

    #[test]
    fn single_get_ignores_operation() {
        let repository = SingleGetRepository::new(Fixed(5));
        assert_eq!(
            repository.get(query(BlankQuery), Operation::Network).result(),
            Ok(5)
        );
        assert_eq!(
            repository.get(query(BlankQuery), Operation::Blank).result(),
            Ok(5)
        );
    }

    #[test]
    fn partial_repository_serves_wired_capability() {
        let repository =
            DataSourceRepository::new(Some(Arc::new(Fixed(7)) as Arc<dyn GetDataSource<i32>>), None, None);
        assert_eq!(
            repository.get(query(BlankQuery), Operation::Default).result(),
            Ok(7)
        );
    }

    #[test]
    #[should_panic(expected = "wired without a put source")]
    fn missing_capability_is_fatal() {
        let repository = DataSourceRepository::new(
            Some(Arc::new(Fixed(7)) as Arc<dyn GetDataSource<i32>>),
            None,
            None,
        );
        repository.put(Some(1), query(BlankQuery), Operation::Default);
    }

    #[test]
    fn full_source_becomes_repository() {
        struct Nothing;
        impl GetDataSource<i32> for Nothing {}
        impl crate::datasource::PutDataSource<i32> for Nothing {}
        impl crate::datasource::DeleteDataSource for Nothing {}

        let repository = Nothing.into_repository();
        assert_eq!(
            repository.get(query(BlankQuery), Operation::Default).result(),
            Err(DataError::Unimplemented)
        );
    }
}
