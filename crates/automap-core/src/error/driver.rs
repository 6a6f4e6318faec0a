use super::{Error, ErrorKind};

use std::{error::Error as StdError, fmt};

/// Failure reported by a [`DatabaseConnector`](crate::DatabaseConnector)
/// implementation: opening the database, preparing or running a statement,
/// or converting a column it returned.
#[derive(Debug)]
pub(super) struct ConnectorError {
    pub(super) cause: Box<dyn StdError + Send + Sync>,
}

impl StdError for ConnectorError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.cause)
    }
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cause)?;

        // rusqlite nests the SQLite message one level down
        let mut next = self.cause.source();
        while let Some(cause) = next {
            write!(f, ": {cause}")?;
            next = cause.source();
        }
        Ok(())
    }
}

impl Error {
    /// Wraps an error raised below the connector seam.
    ///
    /// The mapper hands these to the caller as is; a failed statement is
    /// never retried, and the caller's transaction decides what to roll back.
    pub fn driver(err: impl StdError + Send + Sync + 'static) -> Error {
        Error::from(ErrorKind::Driver(ConnectorError {
            cause: Box::new(err),
        }))
    }

    /// Same as [`Error::driver`], shaped for `map_err`.
    pub fn driver_operation_failed(err: impl StdError + Send + Sync + 'static) -> Error {
        Error::driver(err)
    }

    /// True if a connector call failed.
    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), ErrorKind::Driver(_))
    }
}
