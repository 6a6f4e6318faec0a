use super::Error;

/// Error when an optimistic-lock check fails.
///
/// An `UPDATE` or `DELETE` guarded by the version token loaded with the row
/// affected no rows: some other session changed or removed the row after it
/// was read.
#[derive(Debug)]
pub(super) struct ConcurrentModification {
    message: Box<str>,
}

impl std::error::Error for ConcurrentModification {}

impl core::fmt::Display for ConcurrentModification {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "concurrent modification: {}", self.message)
    }
}

impl Error {
    /// Creates a concurrent modification error.
    pub fn concurrent_modification(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ConcurrentModification(
            ConcurrentModification {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is a concurrent modification error.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ConcurrentModification(_))
    }
}
