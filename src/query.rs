//! Opaque request descriptors dispatched on concrete variants by each backend.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque description of *what* is being asked for.
///
/// The core never interprets a query; backends downcast to the concrete
/// variants they understand and fail anything else with
/// [`DataError::QueryNotSupported`](crate::DataError::QueryNotSupported).
/// Queries travel as `Arc<dyn Query>` so tiered compositions can replay the
/// same query against a second source.
pub trait Query: Send + Sync + 'static {
    /// Downcasting hook for backend dispatch.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Query {
    /// Downcast this query to a concrete variant.
    pub fn downcast_ref<Q: Query>(&self) -> Option<&Q> {
        self.as_any().downcast_ref::<Q>()
    }

    /// Whether this query is the given concrete variant.
    pub fn is<Q: Query>(&self) -> bool {
        self.as_any().is::<Q>()
    }
}

/// A query with no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlankQuery;

impl Query for BlankQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A query addressing one entity by string key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyQuery {
    key: String,
}

impl KeyQuery {
    pub fn new(key: impl Into<String>) -> Self {
        KeyQuery { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for KeyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{}", self.key)
    }
}

impl Query for KeyQuery {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A query addressing one entity by typed id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdQuery<K> {
    id: K,
}

impl<K: Send + Sync + 'static> IdQuery<K> {
    pub fn new(id: K) -> Self {
        IdQuery { id }
    }

    pub fn id(&self) -> &K {
        &self.id
    }
}

impl<K: Send + Sync + 'static> Query for IdQuery<K> {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Wrap a concrete query for the `Arc<dyn Query>` signatures.
pub fn query<Q: Query>(q: Q) -> Arc<dyn Query> {
    Arc::new(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_hits_concrete_variant() {
        let q: Arc<dyn Query> = query(KeyQuery::new("user:42"));
        let key = q.downcast_ref::<KeyQuery>().unwrap();
        assert_eq!(key.key(), "user:42");
        assert!(q.downcast_ref::<BlankQuery>().is_none());
    }

    #[test]
    fn id_query_keeps_typed_id() {
        let q: Arc<dyn Query> = query(IdQuery::new(7u64));
        assert_eq!(*q.downcast_ref::<IdQuery<u64>>().unwrap().id(), 7);
        assert!(!q.is::<IdQuery<String>>());
    }
}
