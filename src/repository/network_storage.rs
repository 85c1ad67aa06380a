//! NetworkStorageRepository - the tiered engine over a (network, storage)
//! pair.

use std::sync::Arc;

use log::debug;

use crate::datasource::DataSource;
use crate::deferred::Deferred;
use crate::error::DataError;
use crate::query::Query;

use super::operation::Operation;
use super::traits::{DeleteRepository, GetRepository, PutRepository};

/// Orchestrates an authoritative but slow network source and a fast but
/// possibly stale storage source behind one surface.
///
/// Policy per operation:
///
/// | operation     | reads                       | writes / deletes            |
/// |---------------|-----------------------------|-----------------------------|
/// | `Network`     | network only                | network only                |
/// | `Storage`     | storage only                | storage only                |
/// | `NetworkSync` | network, mirror to storage  | network, mirror to storage  |
/// | `StorageSync` | storage, miss syncs network | storage, forward to network |
/// | `Default`     | `StorageSync`               | `NetworkSync`               |
///
/// Every two-step policy is strictly sequential: the second source is
/// consulted only after the first delivers a value. A failed first step
/// leaves the second untouched; the only failure the engine recovers from
/// is a `StorageSync` read missing with `NotFound` or `NotValid`.
pub struct NetworkStorageRepository<T> {
    network: Arc<dyn DataSource<T>>,
    storage: Arc<dyn DataSource<T>>,
}

impl<T: Send + 'static> NetworkStorageRepository<T> {
    pub fn new(network: Arc<dyn DataSource<T>>, storage: Arc<dyn DataSource<T>>) -> Self {
        NetworkStorageRepository { network, storage }
    }

    fn unsupported<U: Send + 'static>(operation: Operation) -> Deferred<U> {
        debug!("tiered engine rejects operation {:?}", operation);
        Deferred::of_error(DataError::Unimplemented)
    }

    /// Fetch from network, then mirror the value into storage; the stored
    /// form is what the caller sees.
    fn get_then_mirror(
        network: &Arc<dyn DataSource<T>>,
        storage: &Arc<dyn DataSource<T>>,
        query: Arc<dyn Query>,
    ) -> Deferred<T> {
        let storage = Arc::clone(storage);
        let write_back = Arc::clone(&query);
        network
            .get(query)
            .flat_map(move |value| storage.put(Some(value), write_back))
    }

    fn get_all_then_mirror(
        network: &Arc<dyn DataSource<T>>,
        storage: &Arc<dyn DataSource<T>>,
        query: Arc<dyn Query>,
    ) -> Deferred<Vec<T>> {
        let storage = Arc::clone(storage);
        let write_back = Arc::clone(&query);
        network
            .get_all(query)
            .flat_map(move |values| storage.put_all(values, write_back))
    }

    fn recovers(error: &DataError) -> bool {
        matches!(error, DataError::NotFound | DataError::NotValid)
    }
}

impl<T: Send + 'static> GetRepository<T> for NetworkStorageRepository<T> {
    fn get(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<T> {
        match operation {
            Operation::Network => self.network.get(query),
            Operation::Storage => self.storage.get(query),
            Operation::NetworkSync => Self::get_then_mirror(&self.network, &self.storage, query),
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let storage = Arc::clone(&self.storage);
                let retry = Arc::clone(&query);
                self.storage.get(query).recover(move |error| {
                    if Self::recovers(&error) {
                        debug!("storage get missed ({}), syncing from network", error);
                        Self::get_then_mirror(&network, &storage, retry)
                    } else {
                        Deferred::of_error(error)
                    }
                })
            }
            Operation::Default => self.get(query, Operation::StorageSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }

    fn get_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<Vec<T>> {
        match operation {
            Operation::Network => self.network.get_all(query),
            Operation::Storage => self.storage.get_all(query),
            Operation::NetworkSync => {
                Self::get_all_then_mirror(&self.network, &self.storage, query)
            }
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let storage = Arc::clone(&self.storage);
                let retry = Arc::clone(&query);
                self.storage.get_all(query).recover(move |error| {
                    if Self::recovers(&error) {
                        debug!("storage get_all missed ({}), syncing from network", error);
                        Self::get_all_then_mirror(&network, &storage, retry)
                    } else {
                        Deferred::of_error(error)
                    }
                })
            }
            Operation::Default => self.get_all(query, Operation::StorageSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }
}

impl<T: Send + 'static> PutRepository<T> for NetworkStorageRepository<T> {
    fn put(&self, value: Option<T>, query: Arc<dyn Query>, operation: Operation) -> Deferred<T> {
        match operation {
            Operation::Network => self.network.put(value, query),
            Operation::Storage => self.storage.put(value, query),
            Operation::NetworkSync => {
                // Storage receives the server-confirmed form, not the input.
                let storage = Arc::clone(&self.storage);
                let write_back = Arc::clone(&query);
                self.network
                    .put(value, query)
                    .flat_map(move |accepted| storage.put(Some(accepted), write_back))
            }
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let forward = Arc::clone(&query);
                self.storage
                    .put(value, query)
                    .flat_map(move |stored| network.put(Some(stored), forward))
            }
            Operation::Default => self.put(value, query, Operation::NetworkSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }

    fn put_all(
        &self,
        values: Vec<T>,
        query: Arc<dyn Query>,
        operation: Operation,
    ) -> Deferred<Vec<T>> {
        match operation {
            Operation::Network => self.network.put_all(values, query),
            Operation::Storage => self.storage.put_all(values, query),
            Operation::NetworkSync => {
                let storage = Arc::clone(&self.storage);
                let write_back = Arc::clone(&query);
                self.network
                    .put_all(values, query)
                    .flat_map(move |accepted| storage.put_all(accepted, write_back))
            }
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let forward = Arc::clone(&query);
                self.storage
                    .put_all(values, query)
                    .flat_map(move |stored| network.put_all(stored, forward))
            }
            Operation::Default => self.put_all(values, query, Operation::NetworkSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }
}

impl<T: Send + 'static> DeleteRepository for NetworkStorageRepository<T> {
    fn delete(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()> {
        match operation {
            Operation::Network => self.network.delete(query),
            Operation::Storage => self.storage.delete(query),
            Operation::NetworkSync => {
                let storage = Arc::clone(&self.storage);
                let follow = Arc::clone(&query);
                self.network
                    .delete(query)
                    .flat_map(move |_| storage.delete(follow))
            }
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let follow = Arc::clone(&query);
                self.storage
                    .delete(query)
                    .flat_map(move |_| network.delete(follow))
            }
            Operation::Default => self.delete(query, Operation::NetworkSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }

    fn delete_all(&self, query: Arc<dyn Query>, operation: Operation) -> Deferred<()> {
        match operation {
            Operation::Network => self.network.delete_all(query),
            Operation::Storage => self.storage.delete_all(query),
            Operation::NetworkSync => {
                let storage = Arc::clone(&self.storage);
                let follow = Arc::clone(&query);
                self.network
                    .delete_all(query)
                    .flat_map(move |_| storage.delete_all(follow))
            }
            Operation::StorageSync => {
                let network = Arc::clone(&self.network);
                let follow = Arc::clone(&query);
                self.storage
                    .delete_all(query)
                    .flat_map(move |_| network.delete_all(follow))
            }
            Operation::Default => self.delete_all(query, Operation::NetworkSync),
            Operation::Blank => Self::unsupported(operation),
        }
    }
}
