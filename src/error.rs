use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabheError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("modulus mismatch")]
    ModulusMismatch,

    #[error("ring degree must be a power of 2, got {0}")]
    InvalidRingDegree(usize),

    #[error("key not available: {0}")]
    MissingKey(String),

    #[error("labeled ciphertext has the wrong shape: {0}")]
    ShapeMismatch(String),

    #[error("randomness source failed: {0}")]
    Randomness(String),
}

pub type Result<T> = std::result::Result<T, LabheError>;
