//! An in-memory codec that moves structured tokens instead of bytes.
//!
//! The byte encoding of values belongs to a real codec; this one keeps the
//! exact sequence of `write_*` calls as tokens and replays them to the
//! matching `read_*` calls on the other side. It is what the tests and the
//! demo app use to connect a client to a processor.

use super::{
    FieldIdentifier, InputProtocol, ListIdentifier, MapIdentifier, MessageIdentifier,
    OutputProtocol, ProtocolError, SetIdentifier,
};
use std::sync::mpsc::{self, Receiver, Sender};

/// One recorded codec call.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    MessageBegin(MessageIdentifier),
    MessageEnd,
    StructBegin(String),
    StructEnd,
    FieldBegin(FieldIdentifier),
    FieldEnd,
    FieldStop,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
    ListBegin(ListIdentifier),
    ListEnd,
    SetBegin(SetIdentifier),
    SetEnd,
    MapBegin(MapIdentifier),
    MapEnd,
}

/// Creates a one-directional pipe: tokens flushed into the output half come
/// out of the input half in order.
pub fn pipe() -> (LoopbackOutput, LoopbackInput) {
    let (tx, rx) = mpsc::channel();
    (
        LoopbackOutput {
            pending: Vec::new(),
            tx,
        },
        LoopbackInput { rx },
    )
}

/// Creates two connected endpoints. Whatever one side writes, the other
/// side reads.
pub fn duplex() -> (LoopbackEndpoint, LoopbackEndpoint) {
    let (a_out, b_in) = pipe();
    let (b_out, a_in) = pipe();
    (
        LoopbackEndpoint {
            input: a_in,
            output: a_out,
        },
        LoopbackEndpoint {
            input: b_in,
            output: b_out,
        },
    )
}

/// One side of a [`duplex`] connection.
pub struct LoopbackEndpoint {
    pub input: LoopbackInput,
    pub output: LoopbackOutput,
}

impl LoopbackEndpoint {
    pub fn split(self) -> (LoopbackInput, LoopbackOutput) {
        (self.input, self.output)
    }
}

/// Write half. Tokens are buffered until `flush`.
pub struct LoopbackOutput {
    pending: Vec<Token>,
    tx: Sender<Token>,
}

impl LoopbackOutput {
    fn push(&mut self, token: Token) -> Result<(), ProtocolError> {
        self.pending.push(token);
        Ok(())
    }

    /// Number of tokens written since the last flush.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl OutputProtocol for LoopbackOutput {
    fn write_message_begin(
        &mut self,
        identifier: &MessageIdentifier,
    ) -> Result<(), ProtocolError> {
        self.push(Token::MessageBegin(identifier.clone()))
    }

    fn write_message_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::MessageEnd)
    }

    fn write_struct_begin(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.push(Token::StructBegin(name.to_string()))
    }

    fn write_struct_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::StructEnd)
    }

    fn write_field_begin(&mut self, identifier: &FieldIdentifier) -> Result<(), ProtocolError> {
        self.push(Token::FieldBegin(identifier.clone()))
    }

    fn write_field_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::FieldEnd)
    }

    fn write_field_stop(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::FieldStop)
    }

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        self.push(Token::Bool(value))
    }

    fn write_i8(&mut self, value: i8) -> Result<(), ProtocolError> {
        self.push(Token::I8(value))
    }

    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        self.push(Token::I16(value))
    }

    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        self.push(Token::I32(value))
    }

    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError> {
        self.push(Token::I64(value))
    }

    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError> {
        self.push(Token::Double(value))
    }

    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        self.push(Token::String(value.to_string()))
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError> {
        self.push(Token::Binary(value.to_vec()))
    }

    fn write_list_begin(&mut self, identifier: &ListIdentifier) -> Result<(), ProtocolError> {
        self.push(Token::ListBegin(*identifier))
    }

    fn write_list_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::ListEnd)
    }

    fn write_set_begin(&mut self, identifier: &SetIdentifier) -> Result<(), ProtocolError> {
        self.push(Token::SetBegin(*identifier))
    }

    fn write_set_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::SetEnd)
    }

    fn write_map_begin(&mut self, identifier: &MapIdentifier) -> Result<(), ProtocolError> {
        self.push(Token::MapBegin(*identifier))
    }

    fn write_map_end(&mut self) -> Result<(), ProtocolError> {
        self.push(Token::MapEnd)
    }

    fn flush(&mut self) -> Result<(), ProtocolError> {
        for token in self.pending.drain(..) {
            self.tx
                .send(token)
                .map_err(|_| ProtocolError::Disconnected)?;
        }
        Ok(())
    }
}

/// Read half. Every read blocks until the peer has flushed a token.
pub struct LoopbackInput {
    rx: Receiver<Token>,
}

/// Pulls the next token and destructures it, or reports what was found
/// instead.
macro_rules! expect_token {
    ($self:ident, $pattern:pat => $value:expr, $what:literal) => {
        match $self.next_token()? {
            $pattern => Ok($value),
            other => Err(ProtocolError::invalid_data(format!(
                concat!("expected ", $what, ", found {:?}"),
                other
            ))),
        }
    };
}

impl LoopbackInput {
    fn next_token(&mut self) -> Result<Token, ProtocolError> {
        self.rx.recv().map_err(|_| ProtocolError::Disconnected)
    }

    /// Returns the next token if one has already been flushed, without
    /// blocking.
    pub fn try_next_token(&mut self) -> Option<Token> {
        self.rx.try_recv().ok()
    }
}

impl InputProtocol for LoopbackInput {
    fn read_message_begin(&mut self) -> Result<MessageIdentifier, ProtocolError> {
        expect_token!(self, Token::MessageBegin(identifier) => identifier, "message begin")
    }

    fn read_message_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::MessageEnd => (), "message end")
    }

    fn read_struct_begin(&mut self) -> Result<Option<String>, ProtocolError> {
        expect_token!(self, Token::StructBegin(name) => Some(name), "struct begin")
    }

    fn read_struct_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::StructEnd => (), "struct end")
    }

    fn read_field_begin(&mut self) -> Result<FieldIdentifier, ProtocolError> {
        match self.next_token()? {
            Token::FieldBegin(identifier) => Ok(identifier),
            Token::FieldStop => Ok(FieldIdentifier::stop()),
            other => Err(ProtocolError::invalid_data(format!(
                "expected field begin, found {other:?}"
            ))),
        }
    }

    fn read_field_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::FieldEnd => (), "field end")
    }

    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        expect_token!(self, Token::Bool(v) => v, "bool")
    }

    fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        expect_token!(self, Token::I8(v) => v, "i8")
    }

    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        expect_token!(self, Token::I16(v) => v, "i16")
    }

    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        expect_token!(self, Token::I32(v) => v, "i32")
    }

    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        expect_token!(self, Token::I64(v) => v, "i64")
    }

    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        expect_token!(self, Token::Double(v) => v, "double")
    }

    fn read_string(&mut self) -> Result<String, ProtocolError> {
        match self.next_token()? {
            Token::String(v) => Ok(v),
            Token::Binary(bytes) => String::from_utf8(bytes)
                .map_err(|e| ProtocolError::invalid_data(format!("string is not UTF-8: {e}"))),
            other => Err(ProtocolError::invalid_data(format!(
                "expected string, found {other:?}"
            ))),
        }
    }

    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        match self.next_token()? {
            Token::Binary(bytes) => Ok(bytes),
            Token::String(v) => Ok(v.into_bytes()),
            other => Err(ProtocolError::invalid_data(format!(
                "expected binary, found {other:?}"
            ))),
        }
    }

    fn read_list_begin(&mut self) -> Result<ListIdentifier, ProtocolError> {
        expect_token!(self, Token::ListBegin(identifier) => identifier, "list begin")
    }

    fn read_list_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::ListEnd => (), "list end")
    }

    fn read_set_begin(&mut self) -> Result<SetIdentifier, ProtocolError> {
        expect_token!(self, Token::SetBegin(identifier) => identifier, "set begin")
    }

    fn read_set_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::SetEnd => (), "set end")
    }

    fn read_map_begin(&mut self) -> Result<MapIdentifier, ProtocolError> {
        expect_token!(self, Token::MapBegin(identifier) => identifier, "map begin")
    }

    fn read_map_end(&mut self) -> Result<(), ProtocolError> {
        expect_token!(self, Token::MapEnd => (), "map end")
    }
}
