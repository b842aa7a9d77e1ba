use bbrs_ecc::curves::bn254::Fr;
use bbrs_transcript::Word;
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::error::ProofError;

/// Public inputs and transcript words of one proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HonkProof {
    pub public_inputs: Vec<Fr>,
    pub proof: Vec<Word>,
}

/// On-the-wire form: a msgpack map of two arrays of 32-byte binaries.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProofEnvelope {
    public_inputs: Vec<ByteBuf>,
    proof: Vec<ByteBuf>,
}

impl HonkProof {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, ProofError> {
        let envelope = ProofEnvelope {
            public_inputs: self
                .public_inputs
                .iter()
                .map(|fr| ByteBuf::from(fr.to_be_bytes().to_vec()))
                .collect(),
            proof: self.proof.iter().map(|w| ByteBuf::from(w.to_vec())).collect(),
        };
        Ok(rmp_serde::to_vec_named(&envelope)?)
    }

    /// Decode a proof, accepting only the exact bytes [`to_msgpack`](Self::to_msgpack)
    /// would produce.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, ProofError> {
        let envelope: ProofEnvelope = rmp_serde::from_slice(bytes)?;

        let public_inputs = envelope
            .public_inputs
            .iter()
            .enumerate()
            .map(|(index, bytes)| {
                let word = to_word("public_inputs", index, bytes)?;
                Fr::from_be_bytes_canonical(&word).ok_or(ProofError::NonCanonicalPublicInput(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let proof = envelope
            .proof
            .iter()
            .enumerate()
            .map(|(index, bytes)| to_word("proof", index, bytes))
            .collect::<Result<Vec<_>, _>>()?;

        let decoded = Self {
            public_inputs,
            proof,
        };
        if decoded.to_msgpack()? != bytes {
            return Err(ProofError::NonCanonicalEncoding);
        }
        Ok(decoded)
    }
}

fn to_word(field: &'static str, index: usize, bytes: &[u8]) -> Result<Word, ProofError> {
    bytes.try_into().map_err(|_| ProofError::WordLength {
        field,
        index,
        len: bytes.len(),
    })
}
