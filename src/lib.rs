//! Call-dispatch primitives shared by the `thrum` client and processor.
//!
//! This crate holds the wire vocabulary (wire types, message types), the
//! codec traits a concrete encoding must implement, and the schema-described
//! [`payload::Payload`] that carries request arguments, results and
//! exceptions across those codecs.

pub mod constants;
pub mod message;
pub mod payload;
pub mod protocol;
