mod application_exception;
mod message_type;
mod user_exception;

pub use application_exception::{
    APPLICATION_EXCEPTION_SCHEMA, ApplicationException, ApplicationExceptionKind,
};
pub use message_type::MessageType;
pub use user_exception::UserException;
