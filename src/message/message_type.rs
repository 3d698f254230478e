use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Kind of message carried by an envelope.
///
/// Only application exceptions travel as `Exception`; declared exceptions of
/// a service method travel inside a `Reply`.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum MessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl MessageType {
    #[inline]
    pub fn value(self) -> u8 {
        self.into()
    }

    /// True for the two kinds a client may receive in answer to a call.
    pub fn is_response(self) -> bool {
        matches!(self, MessageType::Reply | MessageType::Exception)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageType::Call => "CALL",
            MessageType::Reply => "REPLY",
            MessageType::Exception => "EXCEPTION",
            MessageType::Oneway => "ONEWAY",
        };
        f.write_str(name)
    }
}
