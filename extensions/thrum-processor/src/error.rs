use crate::HandlerError;
use thrum::payload::PayloadError;
use thrum::protocol::ProtocolError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The codec or the stream underneath it failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("service `{service}` has no method `{method}`")]
    UnknownMethod { service: String, method: String },

    #[error("a handler for `{0}` is already registered")]
    HandlerAlreadyRegistered(String),

    /// A call arrived for a method of the service that nobody registered a
    /// handler for. The call has been consumed; no reply was written.
    #[error("no handler registered for `{0}`")]
    HandlerNotRegistered(String),

    /// The handler failed with an error that matches none of the method's
    /// declared exception slots. No reply was written.
    #[error("handler for `{method}` failed with an undeclared error: {source}")]
    Undeclared {
        method: String,
        source: HandlerError,
    },

    /// The handler returned a value its result schema cannot hold.
    #[error("handler for `{method}` returned an unusable value: {source}")]
    Payload {
        method: String,
        source: PayloadError,
    },
}

impl ProcessError {
    /// True when the peer went away, which ends a serving loop cleanly.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ProcessError::Protocol(e) if e.is_disconnect())
    }
}
