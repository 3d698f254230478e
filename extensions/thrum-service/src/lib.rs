mod macros;
pub use macros::*;

mod method_descriptor;
pub use method_descriptor::*;

mod service_description;
pub use service_description::*;

pub mod error;
pub use error::ServiceError;
