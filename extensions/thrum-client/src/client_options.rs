use thrum::constants::DEFAULT_INITIAL_SEQUENCE_ID;

/// How a client treats a reply whose envelope does not echo the call it
/// just sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyValidation {
    /// Log a warning and interpret the reply anyway.
    ///
    /// A client issues one call at a time, so a mismatch points at a broken
    /// peer rather than at a reply for some other in-flight call. Nothing is
    /// matched or reordered either way.
    #[default]
    Lenient,

    /// Discard the reply and fail with `WRONG_METHOD_NAME` or
    /// `BAD_SEQUENCE_ID`.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Sequence id of the first call. Each later call adds one.
    pub initial_sequence_id: i32,

    pub reply_validation: ReplyValidation,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            initial_sequence_id: DEFAULT_INITIAL_SEQUENCE_ID,
            reply_validation: ReplyValidation::default(),
        }
    }
}

impl ClientOptions {
    pub fn strict() -> Self {
        Self {
            reply_validation: ReplyValidation::Strict,
            ..Self::default()
        }
    }
}
