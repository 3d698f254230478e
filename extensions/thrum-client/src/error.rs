use thrum::message::{ApplicationException, ApplicationExceptionKind, UserException};
use thrum::payload::{PayloadError, ValueTypeError};
use thrum::protocol::ProtocolError;

/// Caller mistakes detected while binding arguments, before anything is sent.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("`{method}` takes {expected} arguments, {given} were given")]
    TooManyArguments {
        method: &'static str,
        expected: usize,
        given: usize,
    },

    #[error("`{method}` has no argument named `{name}`")]
    UnknownArgument { method: &'static str, name: String },

    #[error("`{method}` got argument `{name}` more than once")]
    DuplicateArgument { method: &'static str, name: String },

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Every way a client call can end other than returning a value.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The method is not part of the client's own service description.
    #[error("service `{service}` has no method `{method}`")]
    UnknownMethod { service: String, method: String },

    #[error(transparent)]
    Bind(#[from] BindError),

    /// The codec or the stream underneath it failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A protocol-level fault, raised by the server or detected locally.
    #[error("application exception: {0}")]
    Application(#[from] ApplicationException),

    /// A declared exception of the called method.
    #[error("declared exception: {0}")]
    Declared(#[from] UserException),

    /// A typed facade received a value of an unexpected shape.
    #[error(transparent)]
    Value(#[from] ValueTypeError),
}

impl CallError {
    pub fn application_kind(&self) -> Option<ApplicationExceptionKind> {
        match self {
            CallError::Application(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn as_declared(&self) -> Option<&UserException> {
        match self {
            CallError::Declared(e) => Some(e),
            _ => None,
        }
    }
}
