use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcirError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("corrupt gzip stream: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("decompressed bytecode exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("bytecode payload is empty")]
    Empty,

    #[error("unsupported bytecode serialization format {0:#04x}")]
    UnsupportedFormat(u8),

    #[error("malformed program: {0}")]
    Deserialize(#[from] rmp_serde::decode::Error),

    #[error("failed to serialize program: {0}")]
    Serialize(#[from] rmp_serde::encode::Error),

    #[error("failed to compress program: {0}")]
    Compress(#[source] std::io::Error),

    #[error("program must contain exactly one circuit, found {0}")]
    FunctionCount(usize),

    #[error("current_witness_index {0} leaves no room for the witness count")]
    TooManyWitnesses(u32),

    #[error("witness index {index} exceeds current_witness_index {max}")]
    WitnessOutOfRange { index: u32, max: u32 },
}

impl AcirError {
    /// Whether the failure happened before the payload could be read at all
    /// (transport encoding), as opposed to a malformed payload.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::Base64(_) | Self::Decompress(_) | Self::TooLarge { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum WitnessError {
    #[error("malformed witness document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("witness {index}: {reason}")]
    InvalidValue { index: u32, reason: String },

    #[error("witness map key {key:?} is not an index: {reason}")]
    InvalidIndex { key: String, reason: String },

    #[error("witness map has no value for index {0}")]
    Missing(u32),
}
