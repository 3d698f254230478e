/// Field id reserved for the "success" slot of a result schema.
///
/// Every other field id must be a small positive integer, so a declared
/// field can never collide with the success slot.
pub const SUCCESS_FIELD_ID: i16 = 0;

/// Field name of the "success" slot of a result schema.
pub const SUCCESS_FIELD_NAME: &str = "success";

/// Sequence id minted for the first call of a freshly created client.
pub const DEFAULT_INITIAL_SEQUENCE_ID: i32 = 0;

/// How deep `InputProtocol::skip` will recurse into nested structs and
/// containers before giving up.
pub const MAXIMUM_SKIP_DEPTH: usize = 64;

/// How deep `Payload::read` will descend into nested structs and containers
/// before giving up with `ProtocolError::DepthLimit`.
pub const MAXIMUM_READ_DEPTH: usize = 64;

/// Upper bound on the capacity reserved up front for a decoded container.
///
/// Container sizes come from the peer, so larger containers grow as their
/// elements actually arrive.
pub const MAXIMUM_PREALLOCATED_ELEMENTS: usize = 1024;
