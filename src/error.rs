//! Error utilities shared across this crate.

use std::fmt::{self, Debug, Display};

/// A type-erased error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A type-erased error value.
///
/// Used where the concrete failure type carries no information a caller
/// could act on, such as parse failures of configuration values.
pub struct OpaqueError(BoxError);

impl OpaqueError {
    /// create an [`OpaqueError`] from an std error
    pub fn from_std(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Box::new(error))
    }

    /// create an [`OpaqueError`] from a display object
    pub fn from_display(msg: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self::from_std(MessageError(msg))
    }

    /// create an [`OpaqueError`] from a boxed error
    pub fn from_boxed(inner: BoxError) -> Self {
        Self(inner)
    }

    /// Consumes the [`OpaqueError`] and returns it as a [`BoxError`].
    pub fn into_boxed(self) -> BoxError {
        self.0
    }
}

impl Debug for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for OpaqueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for OpaqueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<BoxError> for OpaqueError {
    fn from(error: BoxError) -> Self {
        Self(error)
    }
}

#[repr(transparent)]
/// An error type that wraps a message.
struct MessageError<M>(M);

impl<M> Debug for MessageError<M>
where
    M: Display + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<M> Display for MessageError<M>
where
    M: Display + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<M> std::error::Error for MessageError<M> where M: Display + Debug + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    #[test]
    fn opaque_error_from_std_displays_source() {
        let error = OpaqueError::from_std(io::Error::other("boom"));
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn opaque_error_from_display() {
        let error = OpaqueError::from_display("invalid environment: staging");
        assert_eq!(error.to_string(), "invalid environment: staging");
    }

    #[test]
    fn opaque_error_into_boxed_round_trip() {
        let error = OpaqueError::from_display("hello");
        let error = OpaqueError::from_boxed(error.into_boxed());
        assert_eq!(error.to_string(), "hello");
    }
}
