//! Verifier for the committed-slot argument; replays the prover's transcript.

use bbrs_ecc::curves::bn254::{Fr, G1Affine, G1Element};
use bbrs_srs::factories::Bn254Crs;
use bbrs_transcript::{
    BaseTranscript, Blake2sHasher, Keccak256Hasher, Poseidon2Hasher, TranscriptHasher,
};
use tracing::{debug, instrument};

use crate::commitment_key::CommitmentKey;
use crate::error::VerifierError;
use crate::proof::HonkProof;
use crate::settings::OracleHashType;
use crate::ultra_prover::labels;
use crate::verification_key::VerificationKey;

pub struct UltraVerifier<'a> {
    verification_key: &'a VerificationKey,
    commitment_key: CommitmentKey,
}

impl<'a> UltraVerifier<'a> {
    pub fn new(verification_key: &'a VerificationKey, crs: &dyn Bn254Crs) -> Result<Self, VerifierError> {
        let required = verification_key.srs_size;
        let available = crs.get_monomial_size();
        let too_small = VerifierError::SrsTooSmall {
            available,
            required,
        };
        if available < required {
            return Err(too_small);
        }
        let commitment_key =
            CommitmentKey::new(crs, verification_key.constraint_system.num_slots()).ok_or(too_small)?;
        Ok(Self {
            verification_key,
            commitment_key,
        })
    }

    /// `Ok(false)` for a well-formed proof that fails a check; `Err` when the proof
    /// cannot be read against this key.
    #[instrument(skip_all, fields(num_words = proof.proof.len()))]
    pub fn verify(&self, proof: &HonkProof) -> Result<bool, VerifierError> {
        self.verification_key.check_proof_shape(proof)?;
        let verified = match self.verification_key.settings.oracle_hash_type {
            OracleHashType::Poseidon2 => self.verify_with::<Poseidon2Hasher>(proof)?,
            OracleHashType::Keccak => self.verify_with::<Keccak256Hasher>(proof)?,
            OracleHashType::Blake2s => self.verify_with::<Blake2sHasher>(proof)?,
        };
        debug!(verified, "proof checked");
        Ok(verified)
    }

    fn verify_with<H: TranscriptHasher>(&self, proof: &HonkProof) -> Result<bool, VerifierError> {
        let vk = self.verification_key;
        let cs = &vk.constraint_system;
        let ck = &self.commitment_key;
        let num_slots = cs.num_slots();

        let mut transcript = BaseTranscript::<H>::from_proof(&proof.proof);
        transcript.add_to_hash_buffer(labels::VK_HASH, &vk.hash());
        for input in &proof.public_inputs {
            transcript.add_to_hash_buffer(labels::PUBLIC_INPUT, input);
        }

        // Public slots are committed without blinding, so the verifier rebuilds them.
        let mut known: Vec<Option<G1Element>> = vec![None; num_slots];
        for (&index, value) in cs.public_inputs.iter().zip(&proof.public_inputs) {
            known[index] = Some(ck.value_base().mul_scalar(value));
        }
        let commitments = known
            .into_iter()
            .map(|commitment| match commitment {
                Some(commitment) => Ok(commitment),
                None => transcript
                    .receive_from_prover::<G1Affine>(labels::SLOT_COMMITMENT)
                    .map(|point| G1Element::from_affine(&point)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let gamma = transcript.get_challenge(labels::GAMMA);

        let mut slot_masks = Vec::with_capacity(num_slots);
        for _ in 0..num_slots {
            let point = transcript.receive_from_prover::<G1Affine>(labels::SLOT_MASK)?;
            slot_masks.push(G1Element::from_affine(&point));
        }
        let mut product_masks = Vec::with_capacity(cs.products.len());
        for _ in &cs.products {
            let point = transcript.receive_from_prover::<G1Affine>(labels::PRODUCT_MASK)?;
            product_masks.push(G1Element::from_affine(&point));
        }
        let tau = transcript.receive_from_prover::<Fr>(labels::TAU)?;
        let e = transcript.get_challenge(labels::E);

        let mut z_values = Vec::with_capacity(num_slots);
        let mut z_blindings = Vec::with_capacity(num_slots);
        for _ in 0..num_slots {
            z_values.push(transcript.receive_from_prover::<Fr>(labels::Z_VALUE)?);
            z_blindings.push(transcript.receive_from_prover::<Fr>(labels::Z_BLINDING)?);
        }
        let mut z_cross = Vec::with_capacity(cs.products.len());
        for _ in &cs.products {
            z_cross.push(transcript.receive_from_prover::<Fr>(labels::Z_CROSS)?);
        }
        transcript.finish()?;

        // Openings: z_v·G + z_ρ·H_j == T_j + e·C_j.
        let g = ck.value_base();
        for j in 0..num_slots {
            let lhs = g.mul_scalar(&z_values[j]) + ck.blinding_base(j).mul_scalar(&z_blindings[j]);
            if lhs != slot_masks[j] + commitments[j].mul_scalar(&e) {
                debug!(slot = j, "opening check failed");
                return Ok(false);
            }
        }

        // Products: z_v[a]·C_b + z_ρ[s]·H_s + z_t·H_b == U_p + e·C_s.
        for (p, &(a, b)) in cs.products.iter().enumerate() {
            let s = cs.product_slot(p);
            let lhs = commitments[b].mul_scalar(&z_values[a])
                + ck.blinding_base(s).mul_scalar(&z_blindings[s])
                + ck.blinding_base(b).mul_scalar(&z_cross[p]);
            if lhs != product_masks[p] + commitments[s].mul_scalar(&e) {
                debug!(product = p, "product check failed");
                return Ok(false);
            }
        }

        // Gates: Σ γ^g Σ coeff·z_v == τ - e·Σ γ^g·c_g.
        let batched = cs.batch_linear_terms(&gamma, &z_values);
        if batched != tau - e * cs.batch_constants(&gamma) {
            debug!("gate check failed");
            return Ok(false);
        }
        Ok(true)
    }
}
