use thiserror::Error;

/// Errors produced by the portway protocol layer.
#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("channel open failed: {0}")]
    OpenFailed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type ProtoResult<T> = Result<T, ProtoError>;
