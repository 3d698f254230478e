use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Wire type of a single field, list element, set element or map entry.
///
/// `BYTE` and `I08` share code 3, and `STRING`, `UTF7` and `BINARY` share
/// code 11, so only one variant exists for each.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive, IntoPrimitive)]
pub enum TType {
    Stop = 0,
    Void = 1,
    Bool = 2,
    I08 = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
    Utf8 = 16,
    Utf16 = 17,
}

impl TType {
    #[inline]
    pub fn value(self) -> u8 {
        self.into()
    }

    pub fn name(self) -> &'static str {
        match self {
            TType::Stop => "STOP",
            TType::Void => "VOID",
            TType::Bool => "BOOL",
            TType::I08 => "BYTE",
            TType::Double => "DOUBLE",
            TType::I16 => "I16",
            TType::I32 => "I32",
            TType::I64 => "I64",
            TType::String => "STRING",
            TType::Struct => "STRUCT",
            TType::Map => "MAP",
            TType::Set => "SET",
            TType::List => "LIST",
            TType::Utf8 => "UTF8",
            TType::Utf16 => "UTF16",
        }
    }
}

impl fmt::Display for TType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
