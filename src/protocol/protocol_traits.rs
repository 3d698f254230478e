use super::{
    FieldIdentifier, ListIdentifier, MapIdentifier, MessageIdentifier, ProtocolError,
    SetIdentifier, TType,
};
use crate::constants::MAXIMUM_SKIP_DEPTH;

/// Read half of a schema-aware codec.
///
/// Implementations own the byte (or token) format; everything above this
/// trait only ever talks in terms of envelopes, field headers and typed
/// primitives.
pub trait InputProtocol {
    fn read_message_begin(&mut self) -> Result<MessageIdentifier, ProtocolError>;
    fn read_message_end(&mut self) -> Result<(), ProtocolError>;

    fn read_struct_begin(&mut self) -> Result<Option<String>, ProtocolError>;
    fn read_struct_end(&mut self) -> Result<(), ProtocolError>;

    /// Reads the next field header. A header whose type is `TType::Stop`
    /// terminates the enclosing struct.
    fn read_field_begin(&mut self) -> Result<FieldIdentifier, ProtocolError>;
    fn read_field_end(&mut self) -> Result<(), ProtocolError>;

    fn read_bool(&mut self) -> Result<bool, ProtocolError>;
    fn read_i8(&mut self) -> Result<i8, ProtocolError>;
    fn read_i16(&mut self) -> Result<i16, ProtocolError>;
    fn read_i32(&mut self) -> Result<i32, ProtocolError>;
    fn read_i64(&mut self) -> Result<i64, ProtocolError>;
    fn read_double(&mut self) -> Result<f64, ProtocolError>;
    fn read_string(&mut self) -> Result<String, ProtocolError>;
    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError>;

    fn read_list_begin(&mut self) -> Result<ListIdentifier, ProtocolError>;
    fn read_list_end(&mut self) -> Result<(), ProtocolError>;
    fn read_set_begin(&mut self) -> Result<SetIdentifier, ProtocolError>;
    fn read_set_end(&mut self) -> Result<(), ProtocolError>;
    fn read_map_begin(&mut self) -> Result<MapIdentifier, ProtocolError>;
    fn read_map_end(&mut self) -> Result<(), ProtocolError>;

    /// Discards one value of the given wire type, including everything
    /// nested inside it.
    fn skip(&mut self, field_type: TType) -> Result<(), ProtocolError> {
        self.skip_till_depth(field_type, MAXIMUM_SKIP_DEPTH)
    }

    fn skip_till_depth(&mut self, field_type: TType, depth: usize) -> Result<(), ProtocolError> {
        if depth == 0 {
            return Err(ProtocolError::DepthLimit);
        }

        match field_type {
            TType::Bool => self.read_bool().map(|_| ()),
            TType::I08 => self.read_i8().map(|_| ()),
            TType::I16 => self.read_i16().map(|_| ()),
            TType::I32 => self.read_i32().map(|_| ()),
            TType::I64 => self.read_i64().map(|_| ()),
            TType::Double => self.read_double().map(|_| ()),
            TType::String | TType::Utf8 | TType::Utf16 => self.read_binary().map(|_| ()),
            TType::Struct => {
                self.read_struct_begin()?;
                loop {
                    let field = self.read_field_begin()?;
                    if field.is_stop() {
                        break;
                    }
                    self.skip_till_depth(field.field_type, depth - 1)?;
                    self.read_field_end()?;
                }
                self.read_struct_end()
            }
            TType::List => {
                let list = self.read_list_begin()?;
                for _ in 0..list.size {
                    self.skip_till_depth(list.element_type, depth - 1)?;
                }
                self.read_list_end()
            }
            TType::Set => {
                let set = self.read_set_begin()?;
                for _ in 0..set.size {
                    self.skip_till_depth(set.element_type, depth - 1)?;
                }
                self.read_set_end()
            }
            TType::Map => {
                let map = self.read_map_begin()?;
                for _ in 0..map.size {
                    self.skip_till_depth(map.key_type, depth - 1)?;
                    self.skip_till_depth(map.value_type, depth - 1)?;
                }
                self.read_map_end()
            }
            TType::Stop | TType::Void => Err(ProtocolError::invalid_data(format!(
                "cannot skip a value of type {field_type}"
            ))),
        }
    }
}

/// Write half of a schema-aware codec.
///
/// Nothing is guaranteed to reach the peer until [`OutputProtocol::flush`]
/// returns.
pub trait OutputProtocol {
    fn write_message_begin(&mut self, identifier: &MessageIdentifier)
    -> Result<(), ProtocolError>;
    fn write_message_end(&mut self) -> Result<(), ProtocolError>;

    fn write_struct_begin(&mut self, name: &str) -> Result<(), ProtocolError>;
    fn write_struct_end(&mut self) -> Result<(), ProtocolError>;

    fn write_field_begin(&mut self, identifier: &FieldIdentifier) -> Result<(), ProtocolError>;
    fn write_field_end(&mut self) -> Result<(), ProtocolError>;
    fn write_field_stop(&mut self) -> Result<(), ProtocolError>;

    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError>;
    fn write_i8(&mut self, value: i8) -> Result<(), ProtocolError>;
    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError>;
    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError>;
    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError>;
    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError>;
    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError>;
    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError>;

    fn write_list_begin(&mut self, identifier: &ListIdentifier) -> Result<(), ProtocolError>;
    fn write_list_end(&mut self) -> Result<(), ProtocolError>;
    fn write_set_begin(&mut self, identifier: &SetIdentifier) -> Result<(), ProtocolError>;
    fn write_set_end(&mut self) -> Result<(), ProtocolError>;
    fn write_map_begin(&mut self, identifier: &MapIdentifier) -> Result<(), ProtocolError>;
    fn write_map_end(&mut self) -> Result<(), ProtocolError>;

    fn flush(&mut self) -> Result<(), ProtocolError>;
}

impl<P: InputProtocol + ?Sized> InputProtocol for &mut P {
    fn read_message_begin(&mut self) -> Result<MessageIdentifier, ProtocolError> {
        (**self).read_message_begin()
    }
    fn read_message_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_message_end()
    }
    fn read_struct_begin(&mut self) -> Result<Option<String>, ProtocolError> {
        (**self).read_struct_begin()
    }
    fn read_struct_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_struct_end()
    }
    fn read_field_begin(&mut self) -> Result<FieldIdentifier, ProtocolError> {
        (**self).read_field_begin()
    }
    fn read_field_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_field_end()
    }
    fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        (**self).read_bool()
    }
    fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        (**self).read_i8()
    }
    fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        (**self).read_i16()
    }
    fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        (**self).read_i32()
    }
    fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        (**self).read_i64()
    }
    fn read_double(&mut self) -> Result<f64, ProtocolError> {
        (**self).read_double()
    }
    fn read_string(&mut self) -> Result<String, ProtocolError> {
        (**self).read_string()
    }
    fn read_binary(&mut self) -> Result<Vec<u8>, ProtocolError> {
        (**self).read_binary()
    }
    fn read_list_begin(&mut self) -> Result<ListIdentifier, ProtocolError> {
        (**self).read_list_begin()
    }
    fn read_list_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_list_end()
    }
    fn read_set_begin(&mut self) -> Result<SetIdentifier, ProtocolError> {
        (**self).read_set_begin()
    }
    fn read_set_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_set_end()
    }
    fn read_map_begin(&mut self) -> Result<MapIdentifier, ProtocolError> {
        (**self).read_map_begin()
    }
    fn read_map_end(&mut self) -> Result<(), ProtocolError> {
        (**self).read_map_end()
    }
    fn skip(&mut self, field_type: TType) -> Result<(), ProtocolError> {
        (**self).skip(field_type)
    }
}

impl<P: OutputProtocol + ?Sized> OutputProtocol for &mut P {
    fn write_message_begin(
        &mut self,
        identifier: &MessageIdentifier,
    ) -> Result<(), ProtocolError> {
        (**self).write_message_begin(identifier)
    }
    fn write_message_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_message_end()
    }
    fn write_struct_begin(&mut self, name: &str) -> Result<(), ProtocolError> {
        (**self).write_struct_begin(name)
    }
    fn write_struct_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_struct_end()
    }
    fn write_field_begin(&mut self, identifier: &FieldIdentifier) -> Result<(), ProtocolError> {
        (**self).write_field_begin(identifier)
    }
    fn write_field_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_field_end()
    }
    fn write_field_stop(&mut self) -> Result<(), ProtocolError> {
        (**self).write_field_stop()
    }
    fn write_bool(&mut self, value: bool) -> Result<(), ProtocolError> {
        (**self).write_bool(value)
    }
    fn write_i8(&mut self, value: i8) -> Result<(), ProtocolError> {
        (**self).write_i8(value)
    }
    fn write_i16(&mut self, value: i16) -> Result<(), ProtocolError> {
        (**self).write_i16(value)
    }
    fn write_i32(&mut self, value: i32) -> Result<(), ProtocolError> {
        (**self).write_i32(value)
    }
    fn write_i64(&mut self, value: i64) -> Result<(), ProtocolError> {
        (**self).write_i64(value)
    }
    fn write_double(&mut self, value: f64) -> Result<(), ProtocolError> {
        (**self).write_double(value)
    }
    fn write_string(&mut self, value: &str) -> Result<(), ProtocolError> {
        (**self).write_string(value)
    }
    fn write_binary(&mut self, value: &[u8]) -> Result<(), ProtocolError> {
        (**self).write_binary(value)
    }
    fn write_list_begin(&mut self, identifier: &ListIdentifier) -> Result<(), ProtocolError> {
        (**self).write_list_begin(identifier)
    }
    fn write_list_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_list_end()
    }
    fn write_set_begin(&mut self, identifier: &SetIdentifier) -> Result<(), ProtocolError> {
        (**self).write_set_begin(identifier)
    }
    fn write_set_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_set_end()
    }
    fn write_map_begin(&mut self, identifier: &MapIdentifier) -> Result<(), ProtocolError> {
        (**self).write_map_begin(identifier)
    }
    fn write_map_end(&mut self) -> Result<(), ProtocolError> {
        (**self).write_map_end()
    }
    fn flush(&mut self) -> Result<(), ProtocolError> {
        (**self).flush()
    }
}
