use super::{PayloadSchema, Value};
use crate::protocol::TType;
use std::fmt;

/// Declared type of a schema field.
///
/// Unlike [`TType`], this keeps the full shape of a value: the schema of a
/// nested struct, the element type of a list or set, the key and value types
/// of a map. `String` and `Binary` share a wire type but are distinct here.
#[derive(Clone, Copy)]
pub enum FieldType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Double,
    String,
    Binary,
    Struct(&'static PayloadSchema),
    List(&'static FieldType),
    Set(&'static FieldType),
    Map(&'static FieldType, &'static FieldType),
}

impl FieldType {
    /// The wire type this field is written with.
    pub fn ttype(&self) -> TType {
        match self {
            FieldType::Bool => TType::Bool,
            FieldType::I8 => TType::I08,
            FieldType::I16 => TType::I16,
            FieldType::I32 => TType::I32,
            FieldType::I64 => TType::I64,
            FieldType::Double => TType::Double,
            FieldType::String | FieldType::Binary => TType::String,
            FieldType::Struct(_) => TType::Struct,
            FieldType::List(_) => TType::List,
            FieldType::Set(_) => TType::Set,
            FieldType::Map(_, _) => TType::Map,
        }
    }

    /// Structs and containers, which hold further values.
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            FieldType::Struct(_) | FieldType::List(_) | FieldType::Set(_) | FieldType::Map(_, _)
        )
    }

    /// Checks that `value` has this shape, descending into containers and
    /// comparing nested struct schemas by identity.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Bool, Value::Bool(_))
            | (FieldType::I8, Value::I8(_))
            | (FieldType::I16, Value::I16(_))
            | (FieldType::I32, Value::I32(_))
            | (FieldType::I64, Value::I64(_))
            | (FieldType::Double, Value::Double(_))
            | (FieldType::String, Value::String(_))
            | (FieldType::Binary, Value::Binary(_)) => true,
            (FieldType::Struct(schema), Value::Struct(payload)) => payload.schema().is(schema),
            (FieldType::List(element), Value::List(items))
            | (FieldType::Set(element), Value::Set(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            (FieldType::Map(key, val), Value::Map(entries)) => entries
                .iter()
                .all(|(k, v)| key.accepts(k) && val.accepts(v)),
            _ => false,
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Struct(a), FieldType::Struct(b)) => a.is(b),
            (FieldType::List(a), FieldType::List(b)) | (FieldType::Set(a), FieldType::Set(b)) => {
                a == b
            }
            (FieldType::Map(ak, av), FieldType::Map(bk, bv)) => ak == bk && av == bv,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => f.write_str("bool"),
            FieldType::I8 => f.write_str("i8"),
            FieldType::I16 => f.write_str("i16"),
            FieldType::I32 => f.write_str("i32"),
            FieldType::I64 => f.write_str("i64"),
            FieldType::Double => f.write_str("double"),
            FieldType::String => f.write_str("string"),
            FieldType::Binary => f.write_str("binary"),
            // Schemas may nest themselves, so only the name is printed.
            FieldType::Struct(schema) => f.write_str(schema.name),
            FieldType::List(element) => write!(f, "list<{element:?}>"),
            FieldType::Set(element) => write!(f, "set<{element:?}>"),
            FieldType::Map(key, value) => write!(f, "map<{key:?}, {value:?}>"),
        }
    }
}
