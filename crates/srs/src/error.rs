use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SrsError {
    #[error("failed to read SRS points from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SRS source holds {available} points but {required} were requested")]
    Insufficient { available: usize, required: usize },

    #[error("SRS point {index} is not a valid BN254 G1 point")]
    InvalidPoint { index: usize },

    #[error("the first SRS point must be the BN254 G1 generator")]
    BadGenerator,

    #[error("requested SRS size {required} exceeds the configured limit of {limit} points")]
    ExceedsLimit { required: usize, limit: usize },
}
