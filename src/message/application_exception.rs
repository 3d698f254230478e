use crate::payload::{FieldSpec, FieldType, Payload, PayloadSchema, Value};
use crate::protocol::{InputProtocol, OutputProtocol, ProtocolError};
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt;

static APPLICATION_EXCEPTION_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new(1, "message", FieldType::String),
    FieldSpec::new(2, "type", FieldType::I32),
];

/// Wire schema of [`ApplicationException`].
pub static APPLICATION_EXCEPTION_SCHEMA: PayloadSchema =
    PayloadSchema::new("ApplicationException", &APPLICATION_EXCEPTION_FIELDS);

/// Protocol-level failure codes. Codes this enum does not know decode as
/// `Unknown`.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, FromPrimitive, IntoPrimitive)]
pub enum ApplicationExceptionKind {
    #[num_enum(default)]
    Unknown = 0,
    UnknownMethod = 1,
    InvalidMessageType = 2,
    WrongMethodName = 3,
    BadSequenceId = 4,
    MissingResult = 5,
    InternalError = 6,
    ProtocolError = 7,
}

impl ApplicationExceptionKind {
    #[inline]
    pub fn code(self) -> i32 {
        self.into()
    }

    /// Text used when the exception carries no message of its own.
    pub fn default_message(self) -> &'static str {
        match self {
            ApplicationExceptionKind::UnknownMethod => "Unknown method",
            ApplicationExceptionKind::InvalidMessageType => "Invalid message type",
            ApplicationExceptionKind::WrongMethodName => "Wrong method name",
            ApplicationExceptionKind::BadSequenceId => "Bad sequence ID",
            ApplicationExceptionKind::MissingResult => "Missing result",
            _ => "Default (unknown) ApplicationException",
        }
    }
}

/// A typed protocol-level failure.
///
/// This is both the error the dispatchers raise for protocol faults and the
/// struct sent in an `EXCEPTION` message, so it reads and writes through the
/// same payload contract as any other exception value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationException {
    kind: ApplicationExceptionKind,
    message: Option<String>,
}

impl ApplicationException {
    pub fn new(kind: ApplicationExceptionKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    pub fn with_message(kind: ApplicationExceptionKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            message: (!message.is_empty()).then_some(message),
        }
    }

    pub fn kind(&self) -> ApplicationExceptionKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    /// The explicit message, if one was set.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The explicit message, or the default text for the kind.
    pub fn describe(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }

    pub fn to_payload(&self) -> Payload {
        let mut payload = Payload::new(&APPLICATION_EXCEPTION_SCHEMA);
        if let Some(message) = &self.message {
            payload.insert(1, Value::String(message.clone()));
        }
        payload.insert(2, Value::I32(self.kind.code()));
        payload
    }

    /// Builds the exception from a payload of [`APPLICATION_EXCEPTION_SCHEMA`].
    /// A missing `type` field means `Unknown`.
    pub fn from_payload(payload: &Payload) -> Self {
        let kind = match payload.get("type") {
            Some(Value::I32(code)) => ApplicationExceptionKind::from_primitive(*code),
            _ => ApplicationExceptionKind::Unknown,
        };
        match payload.get("message").and_then(Value::as_str) {
            Some(message) => Self::with_message(kind, message),
            None => Self::new(kind),
        }
    }

    pub fn read<P>(iprot: &mut P) -> Result<Self, ProtocolError>
    where
        P: InputProtocol + ?Sized,
    {
        let mut payload = Payload::new(&APPLICATION_EXCEPTION_SCHEMA);
        payload.read(iprot)?;
        Ok(Self::from_payload(&payload))
    }

    pub fn write<P>(&self, oprot: &mut P) -> Result<(), ProtocolError>
    where
        P: OutputProtocol + ?Sized,
    {
        self.to_payload().write(oprot)
    }
}

impl From<ApplicationExceptionKind> for ApplicationException {
    fn from(kind: ApplicationExceptionKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for ApplicationException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

impl std::error::Error for ApplicationException {}
