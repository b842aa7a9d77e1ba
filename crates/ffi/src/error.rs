use bbrs_acir::{AcirError, WitnessError};
use bbrs_srs::SrsError;
use bbrs_ultra_honk::{
    ProofError, ProverError, SettingsError, VerificationKeyError, VerifierError,
};
use thiserror::Error;

/// Error class carried across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decode,
    Format,
    WitnessMismatch,
    SrsUnavailable,
    Proving,
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Decode => "DecodeError",
            Self::Format => "FormatError",
            Self::WitnessMismatch => "WitnessMismatchError",
            Self::SrsUnavailable => "SrsUnavailableError",
            Self::Proving => "ProvingError",
            Self::Internal => "InternalError",
        }
    }
}

/// Every failure an operation can report. The display string starts with the
/// class name so callers that only see text can still tell classes apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BbError {
    #[error("DecodeError: {0}")]
    Decode(String),

    #[error("FormatError: {0}")]
    Format(String),

    #[error("WitnessMismatchError: {0}")]
    WitnessMismatch(String),

    #[error("SrsUnavailableError: {0}")]
    SrsUnavailable(String),

    #[error("ProvingError: {0}")]
    Proving(String),

    #[error("InternalError: {0}")]
    Internal(String),
}

impl BbError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Format(_) => ErrorKind::Format,
            Self::WitnessMismatch(_) => ErrorKind::WitnessMismatch,
            Self::SrsUnavailable(_) => ErrorKind::SrsUnavailable,
            Self::Proving(_) => ErrorKind::Proving,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<AcirError> for BbError {
    fn from(err: AcirError) -> Self {
        if err.is_decode_error() {
            Self::Decode(err.to_string())
        } else {
            Self::Format(err.to_string())
        }
    }
}

impl From<WitnessError> for BbError {
    fn from(err: WitnessError) -> Self {
        Self::Format(format!("witness: {err}"))
    }
}

impl From<SettingsError> for BbError {
    fn from(err: SettingsError) -> Self {
        Self::Format(format!("settings: {err}"))
    }
}

impl From<VerificationKeyError> for BbError {
    fn from(err: VerificationKeyError) -> Self {
        Self::Format(format!("verification key: {err}"))
    }
}

impl From<ProofError> for BbError {
    fn from(err: ProofError) -> Self {
        Self::Format(format!("proof: {err}"))
    }
}

impl From<SrsError> for BbError {
    fn from(err: SrsError) -> Self {
        Self::SrsUnavailable(err.to_string())
    }
}

impl From<ProverError> for BbError {
    fn from(err: ProverError) -> Self {
        match err {
            ProverError::WitnessLength { .. } | ProverError::UnsatisfiedConstraint { .. } => {
                Self::WitnessMismatch(err.to_string())
            }
            ProverError::SrsTooSmall { .. } => Self::SrsUnavailable(err.to_string()),
            ProverError::VerificationKey(_) => Self::Format(err.to_string()),
            ProverError::Proof(_) => Self::Proving(err.to_string()),
        }
    }
}

impl From<VerifierError> for BbError {
    fn from(err: VerifierError) -> Self {
        match err {
            VerifierError::SrsTooSmall { .. } => Self::SrsUnavailable(err.to_string()),
            VerifierError::Proof(_)
            | VerifierError::Transcript(_)
            | VerifierError::PublicInputCount { .. }
            | VerifierError::ProofLength { .. } => Self::Format(format!("proof: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_with_class_name() {
        let err = BbError::WitnessMismatch("witness does not satisfy opcode 0".into());
        assert_eq!(
            err.to_string(),
            "WitnessMismatchError: witness does not satisfy opcode 0"
        );
        assert!(err.to_string().starts_with(err.kind().as_str()));
    }

    #[test]
    fn acir_errors_split_into_decode_and_format() {
        let decode: BbError = AcirError::TooLarge { limit: 8 }.into();
        assert_eq!(decode.kind(), ErrorKind::Decode);
        let format: BbError = AcirError::UnsupportedFormat(1).into();
        assert_eq!(format.kind(), ErrorKind::Format);
    }

    #[test]
    fn prover_errors_are_classified() {
        let mismatch: BbError = ProverError::UnsatisfiedConstraint { opcode: 2 }.into();
        assert_eq!(mismatch.kind(), ErrorKind::WitnessMismatch);
        let srs: BbError = ProverError::SrsTooSmall {
            available: 1,
            required: 4,
        }
        .into();
        assert_eq!(srs.kind(), ErrorKind::SrsUnavailable);
    }

    #[test]
    fn proof_shape_errors_are_format_errors() {
        let length: BbError = VerifierError::ProofLength {
            expected: 20,
            actual: 19,
        }
        .into();
        assert_eq!(length.kind(), ErrorKind::Format);
    }
}
