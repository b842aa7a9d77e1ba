use bbrs_transcript::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("optimized_solidity_verifier requires oracle_hash_type \"keccak\"")]
    SolidityRequiresKeccak,

    #[error("unknown oracle hash id {0}")]
    UnknownOracle(u8),

    #[error("unknown settings flags {0:#04x}")]
    UnknownFlags(u8),
}

#[derive(Debug, Error)]
pub enum VerificationKeyError {
    #[error("verification key truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("not a verification key (bad magic)")]
    BadMagic,

    #[error("unsupported verification key version {0}")]
    UnsupportedVersion(u8),

    #[error("reserved verification key byte is {0:#04x}, expected zero")]
    Reserved(u8),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("{what} count {count} exceeds the remaining {remaining} bytes")]
    CountTooLarge {
        what: &'static str,
        count: usize,
        remaining: usize,
    },

    #[error("{what} {value} is out of range")]
    OutOfRange { what: &'static str, value: usize },

    #[error("public input indices must be strictly increasing")]
    UnsortedPublicInputs,

    #[error("non-canonical field element at byte {offset}")]
    NonCanonicalField { offset: usize },

    #[error("SRS size {actual} does not match the {expected} points the circuit needs")]
    SrsSizeMismatch { expected: usize, actual: usize },

    #[error("{0} trailing bytes after verification key")]
    TrailingBytes(usize),

    #[error("{what} {value} does not fit the 32-bit key encoding")]
    TooLarge { what: &'static str, value: usize },
}

#[derive(Debug, Error)]
pub enum ProofError {
    #[error("malformed proof envelope: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to encode proof: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("{field}[{index}] is {len} bytes, expected 32")]
    WordLength {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("public input {0} is not a canonical field element")]
    NonCanonicalPublicInput(usize),

    #[error("proof envelope is not canonically encoded")]
    NonCanonicalEncoding,
}

#[derive(Debug, Error)]
pub enum ProverError {
    #[error("witness has {actual} values but the circuit has {expected} witnesses")]
    WitnessLength { expected: usize, actual: usize },

    #[error("witness does not satisfy opcode {opcode}")]
    UnsatisfiedConstraint { opcode: usize },

    #[error("SRS holds {available} points but the circuit needs {required}")]
    SrsTooSmall { available: usize, required: usize },

    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error("circuit too large: {0}")]
    VerificationKey(#[from] VerificationKeyError),
}

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Proof(#[from] ProofError),

    #[error("malformed proof transcript: {0}")]
    Transcript(#[from] CodecError),

    #[error("proof carries {actual} public inputs but the verification key expects {expected}")]
    PublicInputCount { expected: usize, actual: usize },

    #[error("proof has {actual} words but the verification key expects {expected}")]
    ProofLength { expected: usize, actual: usize },

    #[error("SRS holds {available} points but the verification key needs {required}")]
    SrsTooSmall { available: usize, required: usize },
}
