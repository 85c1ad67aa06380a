//! Single-shot deferred results and their delivery machinery.

mod cell;
mod combinators;
mod executor;
mod latch;
mod resolver;

pub use cell::{Deferred, DeferredState};
pub use executor::{Delivery, Executor, Job, ThreadExecutor};
pub use resolver::Resolver;
