use crate::payload::{Payload, PayloadSchema, Value};
use std::fmt;

/// A declared exception raised by a handler or received by a client.
///
/// The exception kind is the schema of the wrapped payload. Handlers return
/// it boxed as `Box<dyn Error + Send + Sync>`; the processor recovers it by
/// downcast and files it into the first result slot declared for its kind.
#[derive(Clone, PartialEq)]
pub struct UserException {
    payload: Payload,
}

impl UserException {
    pub fn new(payload: Payload) -> Self {
        Self { payload }
    }

    pub fn kind(&self) -> &'static PayloadSchema {
        self.payload.schema()
    }

    /// True when this exception is of the kind described by `schema`.
    pub fn is(&self, schema: &PayloadSchema) -> bool {
        self.kind().is(schema)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

impl From<Payload> for UserException {
    fn from(payload: Payload) -> Self {
        Self::new(payload)
    }
}

impl fmt::Display for UserException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

impl fmt::Debug for UserException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserException({})", self.payload)
    }
}

impl std::error::Error for UserException {}
