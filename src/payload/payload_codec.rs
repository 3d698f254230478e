use super::{FieldType, Payload, Value};
use crate::constants::MAXIMUM_PREALLOCATED_ELEMENTS;
use crate::protocol::{
    InputProtocol, ListIdentifier, MapIdentifier, OutputProtocol, ProtocolError, SetIdentifier,
    TType,
};

fn check_element(declared: TType, received: TType) -> Result<(), ProtocolError> {
    if declared == received {
        Ok(())
    } else {
        Err(ProtocolError::invalid_data(format!(
            "container declares {received} elements, schema expects {declared}"
        )))
    }
}

fn reserve<T>(declared: usize) -> Vec<T> {
    Vec::with_capacity(declared.min(MAXIMUM_PREALLOCATED_ELEMENTS))
}

/// Reads one value of the declared type. `depth` is the remaining nesting
/// budget; structs and containers each consume one level.
pub(super) fn read_value<P>(
    iprot: &mut P,
    ty: &FieldType,
    depth: usize,
) -> Result<Value, ProtocolError>
where
    P: InputProtocol + ?Sized,
{
    if depth == 0 && ty.is_nested() {
        return Err(ProtocolError::DepthLimit);
    }

    let value = match ty {
        FieldType::Bool => Value::Bool(iprot.read_bool()?),
        FieldType::I8 => Value::I8(iprot.read_i8()?),
        FieldType::I16 => Value::I16(iprot.read_i16()?),
        FieldType::I32 => Value::I32(iprot.read_i32()?),
        FieldType::I64 => Value::I64(iprot.read_i64()?),
        FieldType::Double => Value::Double(iprot.read_double()?),
        FieldType::String => Value::String(iprot.read_string()?),
        FieldType::Binary => Value::Binary(iprot.read_binary()?),
        FieldType::Struct(schema) => {
            let mut nested = Payload::new(*schema);
            nested.read_till_depth(iprot, depth)?;
            Value::Struct(nested)
        }
        FieldType::List(element) => {
            let list = iprot.read_list_begin()?;
            check_element(element.ttype(), list.element_type)?;
            let mut items = reserve(list.size);
            for _ in 0..list.size {
                items.push(read_value(iprot, element, depth - 1)?);
            }
            iprot.read_list_end()?;
            Value::List(items)
        }
        FieldType::Set(element) => {
            let set = iprot.read_set_begin()?;
            check_element(element.ttype(), set.element_type)?;
            let mut items = reserve(set.size);
            for _ in 0..set.size {
                items.push(read_value(iprot, element, depth - 1)?);
            }
            iprot.read_set_end()?;
            Value::Set(items)
        }
        FieldType::Map(key, val) => {
            let map = iprot.read_map_begin()?;
            check_element(key.ttype(), map.key_type)?;
            check_element(val.ttype(), map.value_type)?;
            let mut entries = reserve(map.size);
            for _ in 0..map.size {
                let k = read_value(iprot, key, depth - 1)?;
                let v = read_value(iprot, val, depth - 1)?;
                entries.push((k, v));
            }
            iprot.read_map_end()?;
            Value::Map(entries)
        }
    };

    Ok(value)
}

pub(super) fn write_value<P>(
    oprot: &mut P,
    ty: &FieldType,
    value: &Value,
) -> Result<(), ProtocolError>
where
    P: OutputProtocol + ?Sized,
{
    match (ty, value) {
        (FieldType::Bool, Value::Bool(v)) => oprot.write_bool(*v),
        (FieldType::I8, Value::I8(v)) => oprot.write_i8(*v),
        (FieldType::I16, Value::I16(v)) => oprot.write_i16(*v),
        (FieldType::I32, Value::I32(v)) => oprot.write_i32(*v),
        (FieldType::I64, Value::I64(v)) => oprot.write_i64(*v),
        (FieldType::Double, Value::Double(v)) => oprot.write_double(*v),
        (FieldType::String, Value::String(v)) => oprot.write_string(v),
        (FieldType::Binary, Value::Binary(v)) => oprot.write_binary(v),
        (FieldType::Struct(_), Value::Struct(payload)) => payload.write(oprot),
        (FieldType::List(element), Value::List(items)) => {
            oprot.write_list_begin(&ListIdentifier {
                element_type: element.ttype(),
                size: items.len(),
            })?;
            for item in items {
                write_value(oprot, element, item)?;
            }
            oprot.write_list_end()
        }
        (FieldType::Set(element), Value::Set(items)) => {
            oprot.write_set_begin(&SetIdentifier {
                element_type: element.ttype(),
                size: items.len(),
            })?;
            for item in items {
                write_value(oprot, element, item)?;
            }
            oprot.write_set_end()
        }
        (FieldType::Map(key, val), Value::Map(entries)) => {
            oprot.write_map_begin(&MapIdentifier {
                key_type: key.ttype(),
                value_type: val.ttype(),
                size: entries.len(),
            })?;
            for (k, v) in entries {
                write_value(oprot, key, k)?;
                write_value(oprot, val, v)?;
            }
            oprot.write_map_end()
        }
        (ty, value) => Err(ProtocolError::invalid_data(format!(
            "cannot write a {} value as {ty:?}",
            value.ttype()
        ))),
    }
}
