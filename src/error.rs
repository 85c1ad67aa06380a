use std::fmt;

/// Failure taxonomy shared by data sources, repositories, and deferreds.
///
/// These are data errors: they resolve a [`Deferred`](crate::Deferred) with
/// its error arm and never abort the process. Contract violations (double
/// consumer installation, blocking reads after a consumer is installed,
/// invoking an absent capability) panic instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The requested entity does not exist at the queried source.
    NotFound,
    /// The entity exists but was rejected by a validator (stale, malformed).
    NotValid,
    /// The caller passed an argument the backend cannot accept.
    IllegalArgument(String),
    /// The backend does not recognize the query variant it was given.
    QueryNotSupported,
    /// The invoked capability has no implementation at this source.
    Unimplemented,
    /// Backend-originated failure carried opaquely.
    Other(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::NotFound => write!(f, "entity not found"),
            DataError::NotValid => write!(f, "entity rejected by validator"),
            DataError::IllegalArgument(reason) => {
                write!(f, "illegal argument: {}", reason)
            }
            DataError::QueryNotSupported => write!(f, "query not supported by this source"),
            DataError::Unimplemented => write!(f, "capability not implemented by this source"),
            DataError::Other(cause) => write!(f, "data source failure: {}", cause),
        }
    }
}

impl std::error::Error for DataError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(DataError::NotFound.to_string(), "entity not found");
        assert_eq!(
            DataError::IllegalArgument("null value".into()).to_string(),
            "illegal argument: null value"
        );
        assert_eq!(
            DataError::Other("500".into()).to_string(),
            "data source failure: 500"
        );
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(DataError::NotFound, DataError::NotFound);
        assert_ne!(DataError::NotFound, DataError::NotValid);
        assert_eq!(
            DataError::Other("disk-io".into()),
            DataError::Other("disk-io".into())
        );
    }
}
