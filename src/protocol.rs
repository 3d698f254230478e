mod protocol_error;
mod protocol_identifiers;
mod protocol_traits;
mod wire_type;

pub mod loopback;

pub use protocol_error::ProtocolError;
pub use protocol_identifiers::{
    FieldIdentifier, ListIdentifier, MapIdentifier, MessageIdentifier, SetIdentifier,
};
pub use protocol_traits::{InputProtocol, OutputProtocol};
pub use wire_type::TType;
