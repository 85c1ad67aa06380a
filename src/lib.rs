//! strata - tiered data-access core.
//!
//! Unifies a fast but possibly stale local store with an authoritative but
//! slower remote store behind one uniform surface. Three layers compose
//! bottom-up:
//!
//! 1. [`Deferred`] - the single-shot async result cell every operation
//!    returns.
//! 2. The data source capability triplet ([`GetDataSource`],
//!    [`PutDataSource`], [`DeleteDataSource`]) backends implement, keyed by
//!    opaque [`Query`] descriptors.
//! 3. Repositories - compositions over data sources, selected per call by
//!    an [`Operation`] policy; [`NetworkStorageRepository`] is the tiered
//!    engine.
//!
//! ```
//! use std::sync::Arc;
//! use strata::{
//!     query, DataSource, GetRepository, InMemoryDataSource, KeyQuery,
//!     NetworkStorageRepository, Operation, PutRepository,
//! };
//!
//! let network: Arc<dyn DataSource<String>> = Arc::new(InMemoryDataSource::new());
//! let storage: Arc<dyn DataSource<String>> = Arc::new(InMemoryDataSource::new());
//! let repository = NetworkStorageRepository::new(network, storage);
//!
//! repository
//!     .put(
//!         Some("ada".to_string()),
//!         query(KeyQuery::new("user:42")),
//!         Operation::Default,
//!     )
//!     .result()
//!     .unwrap();
//!
//! let cached = repository
//!     .get(query(KeyQuery::new("user:42")), Operation::Default)
//!     .result();
//! assert_eq!(cached, Ok("ada".to_string()));
//! ```

mod datasource;
mod deferred;
mod error;
mod mapper;
mod query;
mod repository;

pub use datasource::{
    DataSource, DeleteDataSource, GetDataSource, InMemoryDataSource, MappedDataSource,
    PutDataSource, Validatable, ValidatedDataSource, Validator,
};
pub use deferred::{Deferred, DeferredState, Delivery, Executor, Job, Resolver, ThreadExecutor};
pub use error::DataError;
pub use mapper::Mapper;
pub use query::{query, BlankQuery, IdQuery, KeyQuery, Query};
pub use repository::{
    DataSourceRepository, DeleteRepository, GetRepository, IntoRepository, MappingRepository,
    NetworkStorageRepository, Operation, PutRepository, Repository, SingleDeleteRepository,
    SingleGetRepository, SinglePutRepository,
};
