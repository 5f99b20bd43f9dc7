/// Errors that can occur in link management.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] gslink_transport::TransportError),

    /// I/O error on a stream transport.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation required an active transport and none is configured.
    #[error("no active transport")]
    NotConnected,

    /// The reader thread panicked while being joined.
    #[error("reader thread panicked")]
    ReaderPanicked,
}

pub type Result<T> = std::result::Result<T, LinkError>;
