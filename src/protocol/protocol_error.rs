use std::io;

/// Failure raised by a codec or the stream underneath it.
///
/// These are never recovered by the dispatchers; they end the current
/// call or request cycle and propagate to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The underlying stream failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    /// The peer hung up before the expected data arrived.
    #[error("peer disconnected")]
    Disconnected,

    /// Bytes or tokens were read that do not form the expected shape.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown wire type code {0}")]
    UnknownWireType(u8),

    #[error("unknown message type code {0}")]
    UnknownMessageType(u8),

    /// `skip` hit `MAXIMUM_SKIP_DEPTH` while discarding nested data.
    #[error("maximum skip depth exceeded")]
    DepthLimit,
}

impl ProtocolError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        ProtocolError::InvalidData(message.into())
    }

    /// True when the error means the other side is gone, which a serving
    /// loop treats as the end of the connection rather than a fault.
    pub fn is_disconnect(&self) -> bool {
        match self {
            ProtocolError::Disconnected => true,
            ProtocolError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }
}
