//! Repository compositions over data sources, with policy selection.

mod mapping;
mod network_storage;
mod operation;
mod single;
mod traits;

pub use mapping::MappingRepository;
pub use network_storage::NetworkStorageRepository;
pub use operation::Operation;
pub use single::{
    DataSourceRepository, IntoRepository, SingleDeleteRepository, SingleGetRepository,
    SinglePutRepository,
};
pub use traits::{DeleteRepository, GetRepository, PutRepository, Repository};
