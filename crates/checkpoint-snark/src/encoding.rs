use crate::config::ConfigError;
use ark_serialize::SerializationError;
use checkpoint_crypto::BLSError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Union type for data serialization errors
pub enum EncodingError {
    #[error("Serialization Error: {0}")]
    Serialization(#[from] SerializationError),
    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("BLS Error: {0}")]
    BLSError(#[from] BLSError),
    #[error("Config Error: {0}")]
    Config(#[from] ConfigError),
    #[error("expected {expected} public inputs, got {got}")]
    PublicInputLength { expected: usize, got: usize },
    #[error("signed stake {0} is not a valid stake amount")]
    InvalidStake(String),
}
