use std::sync::Arc;
use thrum::message::ApplicationException;
use thrum::payload::{Payload, Value};

/// Failure type handlers return. Declared exceptions are returned as a boxed
/// [`thrum::message::UserException`].
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// `Ok(None)` means the handler produced no value (void method).
pub type HandlerResult = Result<Option<Value>, HandlerError>;

/// Type-erased handler for one method. Receives the processor context and
/// the decoded argument payload.
pub type MethodHandler<C> = Arc<dyn Fn(&C, Payload) -> HandlerResult + Send + Sync>;

/// What [`crate::Processor::decode`] made of one inbound message.
pub enum Inbound<C> {
    /// The method is not part of the service. The message has been skipped
    /// and `exception` is what goes back to the caller.
    Rejected {
        method: String,
        sequence_id: i32,
        exception: ApplicationException,
    },

    /// A decoded call, ready to run.
    Call {
        method: String,
        sequence_id: i32,
        result: Payload,
        invocation: Invocation<C>,
    },
}

impl<C> Inbound<C> {
    pub fn method(&self) -> &str {
        match self {
            Inbound::Rejected { method, .. } | Inbound::Call { method, .. } => method,
        }
    }

    pub fn sequence_id(&self) -> i32 {
        match self {
            Inbound::Rejected { sequence_id, .. } | Inbound::Call { sequence_id, .. } => {
                *sequence_id
            }
        }
    }
}

/// A handler bound to its decoded arguments, not yet run.
pub struct Invocation<C> {
    method: &'static str,
    handler: MethodHandler<C>,
    args: Payload,
}

impl<C> Invocation<C> {
    pub(crate) fn new(method: &'static str, handler: MethodHandler<C>, args: Payload) -> Self {
        Self {
            method,
            handler,
            args,
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn args(&self) -> &Payload {
        &self.args
    }

    pub fn invoke(self, context: &C) -> HandlerResult {
        (self.handler)(context, self.args)
    }
}
