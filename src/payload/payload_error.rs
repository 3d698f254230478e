use crate::protocol::TType;

/// Raised when a value is put into a payload that its schema does not allow.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("`{schema}` has no field named `{field}`")]
    UnknownField {
        schema: &'static str,
        field: String,
    },

    #[error("field `{schema}.{field}` is declared as {expected}, got a {found} value")]
    TypeMismatch {
        schema: &'static str,
        field: &'static str,
        expected: String,
        found: TType,
    },

    #[error("required field `{schema}.{field}` is not set")]
    MissingField {
        schema: &'static str,
        field: &'static str,
    },

    #[error("field `{schema}.{field}`: {source}")]
    Value {
        schema: &'static str,
        field: &'static str,
        source: ValueTypeError,
    },
}

/// Raised when a schema breaks one of the layout rules checked at load time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("`{schema}`: field `{field}` uses reserved id 0")]
    ReservedFieldId {
        schema: &'static str,
        field: &'static str,
    },

    #[error("`{schema}`: field id {id} is out of order or duplicated")]
    FieldOrder { schema: &'static str, id: i16 },

    #[error("`{schema}`: field name `{field}` is declared twice")]
    DuplicateFieldName {
        schema: &'static str,
        field: &'static str,
    },

    #[error("`{schema}`: the success slot must use id 0")]
    MisplacedSuccess { schema: &'static str },

    #[error("`{schema}`: exception slot `{field}` must hold a struct")]
    ExceptionNotStruct {
        schema: &'static str,
        field: &'static str,
    },

    #[error("`{schema}`: result field `{field}` is neither the success slot nor an exception slot")]
    PlainResultField {
        schema: &'static str,
        field: &'static str,
    },
}

/// Raised when a [`crate::payload::Value`] is converted into a Rust type it
/// does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} value, found {found}")]
pub struct ValueTypeError {
    pub expected: &'static str,
    pub found: TType,
}
