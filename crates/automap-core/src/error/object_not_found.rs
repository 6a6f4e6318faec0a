use super::Error;

/// Error when a load finds no row for the requested identity.
#[derive(Debug)]
pub(super) struct ObjectNotFound {
    context: Option<Box<str>>,
}

impl std::error::Error for ObjectNotFound {}

impl core::fmt::Display for ObjectNotFound {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("object not found")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates an object not found error.
    pub fn object_not_found(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ObjectNotFound(ObjectNotFound {
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error is an object not found error.
    pub fn is_object_not_found(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ObjectNotFound(_))
    }
}
