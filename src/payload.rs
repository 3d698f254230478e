mod field_type;
mod payload_codec;
mod payload_error;
mod payload_instance;
mod payload_schema;
mod payload_value;

pub use field_type::FieldType;
pub use payload_error::{PayloadError, SchemaError, ValueTypeError};
pub use payload_instance::Payload;
pub use payload_schema::{FieldSpec, PayloadSchema};
pub use payload_value::Value;
