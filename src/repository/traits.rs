//! The repository surface: the data source capability set plus a policy
//! argument.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::query::Query;

use super::operation::Operation;

/// Read capability with policy selection.
pub trait GetRepository<T: Send + 'static>: Send + Sync {
    fn get(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<T>;

    fn get_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<Vec<T>>;
}

/// Write capability with policy selection.
pub trait PutRepository<T: Send + 'static>: Send + Sync {
    fn put(&self, value: Option<T>, query: Arc<dyn Query>, operation: Operation) -> Deferred<T>;

    fn put_all(
        &self,
        values: Vec<T>,
        query: Arc<dyn Query>,
        operation: Operation,
    ) -> Deferred<Vec<T>>;
}

/// Removal capability with policy selection.
pub trait DeleteRepository: Send + Sync {
    fn delete(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()>;

    fn delete_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()>;
}

/// Full repository surface combining all capabilities.
pub trait Repository<T: Send + 'static>:
    GetRepository<T> + PutRepository<T> + DeleteRepository
{
}

// Blanket implementation: anything implementing all three traits is a Repository
impl<T, R> Repository<T> for R
where
    T: Send + 'static,
    R: GetRepository<T> + PutRepository<T> + DeleteRepository,
{
}
