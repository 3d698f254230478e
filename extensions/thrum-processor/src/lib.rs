mod inbound;
pub use inbound::*;

mod processor;
pub use processor::*;

pub mod error;
pub use error::ProcessError;
