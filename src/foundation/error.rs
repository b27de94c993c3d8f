/// Convenience result type used across relingo.
pub type RelingoResult<T> = Result<T, RelingoError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// [`RelingoError::Aborted`] is a cancellation signal, not a failure. Callers should check
/// [`RelingoError::is_abort`] before surfacing an error to a user.
#[derive(thiserror::Error, Debug)]
pub enum RelingoError {
    /// Source media or a substitute audio asset could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// No output container/codec combination is supported by the runtime.
    #[error("unsupported container: {0}")]
    UnsupportedContainer(String),

    /// The render was cancelled by the caller.
    #[error("render aborted")]
    Aborted,

    /// Opaque failure from an external collaborator, tagged with the operation name.
    #[error("{operation} failed: {message}")]
    Service {
        /// Operation that failed (`transcribe`, `translate`, `synthesize`).
        operation: String,
        /// Human-readable failure description.
        message: String,
    },

    /// Missing credential or configuration, detected before any work begins.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal encoding failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RelingoError {
    /// Build a [`RelingoError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RelingoError::UnsupportedContainer`] value.
    pub fn unsupported_container(msg: impl Into<String>) -> Self {
        Self::UnsupportedContainer(msg.into())
    }

    /// Build a [`RelingoError::Service`] value.
    pub fn service(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Service {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Build a [`RelingoError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`RelingoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RelingoError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for user-initiated cancellation.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Re-tag any error as a [`RelingoError::Service`] failure of `operation`.
    ///
    /// A service error raised under another operation name keeps that name as a message prefix.
    /// Configuration problems and aborts keep their variant.
    pub(crate) fn into_service(self, operation: &str) -> Self {
        match self {
            e @ (Self::Configuration(_) | Self::Aborted) => e,
            Self::Service {
                operation: inner,
                message,
            } if inner == operation => Self::service(inner, message),
            Self::Service {
                operation: inner,
                message,
            } => Self::service(operation, format!("{inner}: {message}")),
            other => Self::service(operation, other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
