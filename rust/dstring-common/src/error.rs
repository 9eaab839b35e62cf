use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn missing_arg(name: impl Into<String>) -> Error {
        Error(ErrorKind::MissingArgument { name: name.into() }.into())
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn allocation_failure(requested: usize) -> Error {
        Error(ErrorKind::AllocationFailure { requested }.into())
    }

    /// Returns `true` for errors reported before any storage was touched because an
    /// argument was absent or violated a precondition.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MissingArgument { .. } | ErrorKind::InvalidArgument { .. }
        )
    }

    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind(), ErrorKind::AllocationFailure { .. })
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A required input is absent. Handles are references and are never null, so in
    /// practice this reports a buffer that has no storage where existing content is
    /// required.
    #[error("missing argument {name}")]
    MissingArgument { name: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("failed to allocate {requested} bytes of storage")]
    AllocationFailure { requested: usize },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<dstring_budget::AllocationError> for Error {
    fn from(e: dstring_budget::AllocationError) -> Self {
        Error::allocation_failure(e.requested())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        // The standard library does not expose the failed layout size.
        Error::allocation_failure(0)
    }
}
