use thiserror::Error;

/// Errors produced while building, evaluating, or (de)serializing a network.
#[derive(Error, Debug)]
pub enum Error {
    /// Dimension or arity mismatch between layers, weights, or inputs.
    #[error("shape error: {0}")]
    Shape(String),

    /// Truncated, malformed, or out-of-range bytes in a model buffer.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The network was used before linking and readiness checks succeeded.
    #[error("network not ready: layer {layer}: {reason}")]
    NotReady { layer: usize, reason: Box<Error> },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn shape(msg: impl Into<String>) -> Error {
        Error::Shape(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Error {
        Error::Encoding(msg.into())
    }

    /// True for `Shape`, including a `NotReady` whose cause is a shape error.
    pub fn is_shape(&self) -> bool {
        match self {
            Error::Shape(_) => true,
            Error::NotReady { reason, .. } => reason.is_shape(),
            _ => false,
        }
    }
}
