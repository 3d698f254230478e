use super::TType;
use crate::message::MessageType;

/// The envelope preceding every serialized payload on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageIdentifier {
    /// Name of the service method this message belongs to.
    pub name: String,

    pub message_type: MessageType,

    /// Client-minted correlation number. A reply echoes the id of its call.
    pub sequence_number: i32,
}

impl MessageIdentifier {
    pub fn new(name: impl Into<String>, message_type: MessageType, sequence_number: i32) -> Self {
        Self {
            name: name.into(),
            message_type,
            sequence_number,
        }
    }
}

/// Header of one field inside a struct.
///
/// The terminating `Stop` marker carries no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIdentifier {
    pub name: Option<String>,
    pub field_type: TType,
    pub id: Option<i16>,
}

impl FieldIdentifier {
    pub fn new(name: impl Into<String>, field_type: TType, id: i16) -> Self {
        Self {
            name: Some(name.into()),
            field_type,
            id: Some(id),
        }
    }

    pub fn stop() -> Self {
        Self {
            name: None,
            field_type: TType::Stop,
            id: None,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.field_type == TType::Stop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListIdentifier {
    pub element_type: TType,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetIdentifier {
    pub element_type: TType,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapIdentifier {
    pub key_type: TType,
    pub value_type: TType,
    pub size: usize,
}
