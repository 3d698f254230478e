use thrum::payload::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("service `{service}` declares method `{method}` twice")]
    DuplicateMethod {
        service: String,
        method: &'static str,
    },

    #[error("service `{service}`: methods `{first}` and `{second}` hash to the same id")]
    MethodIdCollision {
        service: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("service `{service}`, method `{method}`: {source}")]
    Schema {
        service: String,
        method: &'static str,
        source: SchemaError,
    },
}
