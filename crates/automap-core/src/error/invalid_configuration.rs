use super::Error;

/// Error when a class mapper cannot be built from its configuration.
///
/// This occurs when:
/// - A class exposes no persistent properties
/// - A collection strategy name is not recognized
/// - A required key (such as `element-type`) is missing
/// - A boolean key holds something other than a boolean
/// - A collection's element type is not a persistent class
///
/// These errors are raised while the mapper is constructed, never on first use.
#[derive(Debug)]
pub(super) struct InvalidConfiguration {
    message: Box<str>,
}

impl std::error::Error for InvalidConfiguration {}

impl core::fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidConfiguration(
            InvalidConfiguration {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidConfiguration(_))
    }
}
