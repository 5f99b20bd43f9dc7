/// Errors that can occur on a link transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying endpoint.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint was closed by the other side or torn down locally.
    #[error("transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
