use thiserror::Error;

/// Errors raised while loading, transforming or writing a point cloud.
#[derive(Debug, Error)]
pub enum Error {
    /// A path could not be read from or written to.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata, raster tags or LAS records are malformed or missing.
    #[error("format error: {0}")]
    Format(String),

    /// The caller passed a value outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing point store was already closed.
    #[error("the point store has been closed")]
    ClosedHandle,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
