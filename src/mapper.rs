use crate::error::DataError;

/// Fallible one-way mapping between two entity representations.
///
/// Mapping failures propagate as data errors through whatever deferred
/// chain the mapping runs in.
pub trait Mapper<In, Out>: Send + Sync {
    fn map(&self, value: In) -> Result<Out, DataError>;
}

/// Closures are mappers.
impl<In, Out, F> Mapper<In, Out> for F
where
    F: Fn(In) -> Result<Out, DataError> + Send + Sync,
{
    fn map(&self, value: In) -> Result<Out, DataError> {
        self(value)
    }
}

/// Map a batch, short-circuiting on the first failure.
pub(crate) fn map_all<In, Out>(
    mapper: &dyn Mapper<In, Out>,
    values: Vec<In>,
) -> Result<Vec<Out>, DataError> {
    values.into_iter().map(|value| mapper.map(value)).collect()
}
