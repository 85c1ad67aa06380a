//! Data source contracts and the decorators the core ships.

mod in_memory;
mod mapped;
mod traits;
mod validated;

pub use in_memory::InMemoryDataSource;
pub use mapped::MappedDataSource;
pub use traits::{DataSource, DeleteDataSource, GetDataSource, PutDataSource};
pub use validated::{Validatable, ValidatedDataSource, Validator};
