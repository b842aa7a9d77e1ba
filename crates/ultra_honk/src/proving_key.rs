//! Proving key: verification key plus the commitment bases the prover needs.

use bbrs_srs::factories::Bn254Crs;
use tracing::debug;

use crate::commitment_key::CommitmentKey;
use crate::constraint_system::ConstraintSystem;
use crate::error::ProverError;
use crate::settings::ProofSystemSettings;
use crate::verification_key::VerificationKey;

pub struct ProvingKey {
    pub verification_key: VerificationKey,
    pub commitment_key: CommitmentKey,
    /// SHA-256 of the serialized verification key, absorbed first by every proof.
    pub vk_hash: [u8; 32],
}

impl ProvingKey {
    /// Build a proving key for `constraint_system` from an SRS of at least
    /// `constraint_system.required_srs_size()` points.
    pub fn create(
        constraint_system: ConstraintSystem,
        settings: ProofSystemSettings,
        crs: &dyn Bn254Crs,
    ) -> Result<Self, ProverError> {
        let required = constraint_system.required_srs_size();
        let available = crs.get_monomial_size();
        if available < required {
            return Err(ProverError::SrsTooSmall {
                available,
                required,
            });
        }
        let commitment_key = CommitmentKey::new(crs, constraint_system.num_slots())
            .ok_or(ProverError::SrsTooSmall {
                available,
                required,
            })?;

        let verification_key = VerificationKey::new(settings, constraint_system)?;
        let vk_hash = verification_key.hash();
        debug!(
            num_witnesses = verification_key.constraint_system.num_witnesses,
            num_products = verification_key.constraint_system.products.len(),
            num_gates = verification_key.constraint_system.gates.len(),
            srs_size = required,
            "proving key created"
        );
        Ok(Self {
            verification_key,
            commitment_key,
            vk_hash,
        })
    }

    pub fn constraint_system(&self) -> &ConstraintSystem {
        &self.verification_key.constraint_system
    }

    pub fn settings(&self) -> &ProofSystemSettings {
        &self.verification_key.settings
    }
}
