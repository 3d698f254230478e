mod call_args;
pub use call_args::*;

mod client;
pub use client::*;

mod client_options;
pub use client_options::*;

pub mod error;
pub use error::{BindError, CallError};
