//! Prover for the committed-slot argument.
//!
//! Each slot value is committed with a Pedersen commitment. The prover then shows,
//! in one Fiat-Shamir sigma protocol, that it knows openings of every commitment,
//! that every product slot commits to the product of its operands, and that the
//! γ-batched gates vanish on the committed values.
//!
//! Transcript schedule, shared with [`UltraVerifier`](crate::UltraVerifier):
//!
//! 1. absorb the verification key hash and the public inputs, send `C_j` for every
//!    non-public slot, derive `γ`;
//! 2. send `T_j` for every slot, `U_p` for every product and `τ`, derive `e`;
//! 3. send `z_v[j]`, `z_ρ[j]` for every slot and `z_t[p]` for every product.

use bbrs_ecc::curves::bn254::{Fr, G1Element};
use bbrs_transcript::{
    BaseTranscript, Blake2sHasher, Keccak256Hasher, Poseidon2Hasher, TranscriptHasher, Word,
};
use tracing::{debug, instrument};

use crate::error::ProverError;
use crate::proof::HonkProof;
use crate::proving_key::ProvingKey;
use crate::settings::OracleHashType;

pub(crate) mod labels {
    pub const VK_HASH: &str = "vk_hash";
    pub const PUBLIC_INPUT: &str = "public_input";
    pub const SLOT_COMMITMENT: &str = "slot_commitment";
    pub const GAMMA: &str = "gamma";
    pub const SLOT_MASK: &str = "slot_mask_commitment";
    pub const PRODUCT_MASK: &str = "product_mask_commitment";
    pub const TAU: &str = "tau";
    pub const E: &str = "e";
    pub const Z_VALUE: &str = "z_value";
    pub const Z_BLINDING: &str = "z_blinding";
    pub const Z_CROSS: &str = "z_cross";
}

pub struct UltraProver<'a> {
    proving_key: &'a ProvingKey,
}

impl<'a> UltraProver<'a> {
    pub fn new(proving_key: &'a ProvingKey) -> Self {
        Self { proving_key }
    }

    /// Prove that `witness` satisfies the circuit behind the proving key.
    #[instrument(skip_all, fields(num_witnesses = witness.len()))]
    pub fn prove(&self, witness: &[Fr]) -> Result<HonkProof, ProverError> {
        let cs = self.proving_key.constraint_system();
        let slots = cs.assign_slots(witness)?;
        let public_inputs: Vec<Fr> = cs.public_inputs.iter().map(|&i| slots[i]).collect();

        let proof = match self.proving_key.settings().oracle_hash_type {
            OracleHashType::Poseidon2 => self.construct_proof::<Poseidon2Hasher>(&slots, &public_inputs),
            OracleHashType::Keccak => self.construct_proof::<Keccak256Hasher>(&slots, &public_inputs),
            OracleHashType::Blake2s => self.construct_proof::<Blake2sHasher>(&slots, &public_inputs),
        };
        debug!(num_words = proof.len(), "proof constructed");
        Ok(HonkProof {
            public_inputs,
            proof,
        })
    }

    fn construct_proof<H: TranscriptHasher>(&self, slots: &[Fr], public_inputs: &[Fr]) -> Vec<Word> {
        let pk = self.proving_key;
        let cs = pk.constraint_system();
        let ck = &pk.commitment_key;
        let public = cs.public_mask();
        let zk = !pk.settings().disable_zk;

        let blindings: Vec<Fr> = public
            .iter()
            .map(|&is_public| {
                if zk && !is_public {
                    Fr::random_element()
                } else {
                    Fr::zero()
                }
            })
            .collect();
        let commitments: Vec<G1Element> = slots
            .iter()
            .zip(&blindings)
            .enumerate()
            .map(|(j, (value, blinding))| ck.commit(j, value, blinding))
            .collect();

        let mut transcript = BaseTranscript::<H>::new();
        transcript.add_to_hash_buffer(labels::VK_HASH, &pk.vk_hash);
        for input in public_inputs {
            transcript.add_to_hash_buffer(labels::PUBLIC_INPUT, input);
        }
        for (commitment, &is_public) in commitments.iter().zip(&public) {
            if !is_public {
                transcript.send_to_verifier(labels::SLOT_COMMITMENT, &commitment.to_affine());
            }
        }
        let gamma = transcript.get_challenge(labels::GAMMA);

        // Masks for values, blindings and product cross terms.
        let value_masks: Vec<Fr> = slots.iter().map(|_| Fr::random_element()).collect();
        let blinding_masks: Vec<Fr> = slots.iter().map(|_| Fr::random_element()).collect();
        let cross_masks: Vec<Fr> = cs.products.iter().map(|_| Fr::random_element()).collect();

        for j in 0..slots.len() {
            let mask_commitment = ck.commit(j, &value_masks[j], &blinding_masks[j]);
            transcript.send_to_verifier(labels::SLOT_MASK, &mask_commitment.to_affine());
        }
        // C_s = v_a·C_b + ρ_s·H_s + t·H_b with t = -v_a·ρ_b.
        let mut cross_terms = Vec::with_capacity(cs.products.len());
        for (p, &(a, b)) in cs.products.iter().enumerate() {
            let s = cs.product_slot(p);
            let mask_commitment = commitments[b].ladder_mul_scalar(&value_masks[a])
                + ck.blinding_base(s).ladder_mul_scalar(&blinding_masks[s])
                + ck.blinding_base(b).ladder_mul_scalar(&cross_masks[p]);
            transcript.send_to_verifier(labels::PRODUCT_MASK, &mask_commitment.to_affine());
            cross_terms.push(-(slots[a] * blindings[b]));
        }
        let tau = cs.batch_linear_terms(&gamma, &value_masks);
        transcript.send_to_verifier(labels::TAU, &tau);
        let e = transcript.get_challenge(labels::E);

        for j in 0..slots.len() {
            transcript.send_to_verifier(labels::Z_VALUE, &(value_masks[j] + e * slots[j]));
            transcript.send_to_verifier(labels::Z_BLINDING, &(blinding_masks[j] + e * blindings[j]));
        }
        for (mask, cross) in cross_masks.iter().zip(&cross_terms) {
            transcript.send_to_verifier(labels::Z_CROSS, &(*mask + e * *cross));
        }
        transcript.export_proof()
    }
}
