//! Proof-lifecycle orchestration behind the C ABI.

use std::sync::{Arc, OnceLock};

use bbrs_acir::{decode_circuit, parse_witness_json, Circuit};
use bbrs_srs::factories::{Bn254CrsFactory, DerivedBn254CrsFactory, FileBn254CrsFactory};
use bbrs_srs::global_crs::{get_or_init_srs_manager, SrsManager};
use bbrs_ultra_honk::{
    ConstraintSystem, HonkProof, ProofSystemSettings, ProvingKey, UltraProver, UltraVerifier,
    VerificationKey,
};
use tracing::{debug, info, warn};

use crate::config::FfiConfig;
use crate::error::BbError;
use crate::key_cache::{fingerprint, KeyCache};

/// SRS manager with the point source `config` selects.
pub fn srs_manager_from_config(config: &FfiConfig) -> SrsManager {
    let factory: Arc<dyn Bn254CrsFactory> = match &config.srs_path {
        Some(path) => Arc::new(FileBn254CrsFactory::new(path)),
        None => Arc::new(DerivedBn254CrsFactory::default()),
    };
    SrsManager::new(factory, config.max_srs_size)
}

/// Runs each operation against a shared SRS manager and proving-key cache.
pub struct Backend {
    config: FfiConfig,
    srs: Arc<SrsManager>,
    keys: KeyCache,
}

impl Backend {
    pub fn new(srs: Arc<SrsManager>, config: FfiConfig) -> Self {
        Self {
            keys: KeyCache::new(config.key_cache_size),
            config,
            srs,
        }
    }

    /// A backend with its own SRS manager.
    pub fn from_config(config: FfiConfig) -> Self {
        let srs = Arc::new(srs_manager_from_config(&config));
        Self::new(srs, config)
    }

    pub fn config(&self) -> &FfiConfig {
        &self.config
    }

    pub fn srs_manager(&self) -> &Arc<SrsManager> {
        &self.srs
    }

    pub fn key_cache(&self) -> &KeyCache {
        &self.keys
    }

    fn decode(&self, bytecode_b64_gz: &str) -> Result<Circuit, BbError> {
        Ok(decode_circuit(bytecode_b64_gz, self.config.max_bytecode_bytes)?)
    }

    /// Decode a circuit and grow the SRS to cover it.
    pub fn init_srs_from_bytecode(&self, bytecode_b64_gz: &str) -> Result<(), BbError> {
        debug!(bytecode_len = bytecode_b64_gz.len(), "init_srs_from_bytecode");
        let circuit = self.decode(bytecode_b64_gz)?;
        let required = ConstraintSystem::from_circuit(&circuit).required_srs_size();
        self.srs.ensure(required)?;
        Ok(())
    }

    /// Cached proving key for a decoded circuit, building it on a miss.
    fn proving_key(
        &self,
        bytecode_b64_gz: &str,
        circuit: &Circuit,
        settings: ProofSystemSettings,
    ) -> Result<Arc<ProvingKey>, BbError> {
        let key = fingerprint(bytecode_b64_gz, &settings);
        if let Some(proving_key) = self.keys.get(&key) {
            debug!("proving key cache hit");
            return Ok(proving_key);
        }
        let constraint_system = ConstraintSystem::from_circuit(circuit);
        let crs = self.srs.ensure(constraint_system.required_srs_size())?;
        let proving_key = Arc::new(ProvingKey::create(constraint_system, settings, &*crs)?);
        info!(
            srs_size = proving_key.verification_key.srs_size,
            "proving key cache miss"
        );
        self.keys.insert(key, proving_key.clone());
        Ok(proving_key)
    }

    /// Prove `witness_json` against the circuit; returns the msgpack proof envelope.
    pub fn prove(
        &self,
        bytecode_b64_gz: &str,
        witness_json: &str,
        settings_json: &str,
    ) -> Result<Vec<u8>, BbError> {
        debug!(
            bytecode_len = bytecode_b64_gz.len(),
            witness_len = witness_json.len(),
            "prove"
        );
        let result = self.prove_inner(bytecode_b64_gz, witness_json, settings_json);
        if let Err(err) = &result {
            warn!(error = %err, "prove failed");
        }
        result
    }

    fn prove_inner(
        &self,
        bytecode_b64_gz: &str,
        witness_json: &str,
        settings_json: &str,
    ) -> Result<Vec<u8>, BbError> {
        let circuit = self.decode(bytecode_b64_gz)?;
        let settings = ProofSystemSettings::from_json(settings_json)?;
        let witness = parse_witness_json(witness_json)?;
        if witness.len() != circuit.num_witnesses() {
            return Err(BbError::WitnessMismatch(format!(
                "witness has {} values but the circuit has {} witnesses",
                witness.len(),
                circuit.num_witnesses()
            )));
        }
        let proving_key = self.proving_key(bytecode_b64_gz, &circuit, settings)?;
        let proof = UltraProver::new(&proving_key).prove(&witness)?;
        proof
            .to_msgpack()
            .map_err(|err| BbError::Proving(format!("failed to encode proof: {err}")))
    }

    /// Serialized verification key; byte-identical for identical inputs.
    pub fn get_verification_key(
        &self,
        bytecode_b64_gz: &str,
        settings_json: &str,
    ) -> Result<Vec<u8>, BbError> {
        debug!(bytecode_len = bytecode_b64_gz.len(), "get_verification_key");
        let result = self.get_verification_key_inner(bytecode_b64_gz, settings_json);
        if let Err(err) = &result {
            warn!(error = %err, "get_verification_key failed");
        }
        result
    }

    fn get_verification_key_inner(
        &self,
        bytecode_b64_gz: &str,
        settings_json: &str,
    ) -> Result<Vec<u8>, BbError> {
        let circuit = self.decode(bytecode_b64_gz)?;
        let settings = ProofSystemSettings::from_json(settings_json)?;
        let proving_key = self.proving_key(bytecode_b64_gz, &circuit, settings)?;
        Ok(proving_key.verification_key.to_buffer())
    }

    /// `Ok(true)` accepted, `Ok(false)` rejected, `Err` when verification could
    /// not be attempted.
    pub fn verify_detailed(
        &self,
        proof_msgpack: &[u8],
        verification_key: &[u8],
        settings_json: &str,
    ) -> Result<bool, BbError> {
        debug!(
            proof_len = proof_msgpack.len(),
            vk_len = verification_key.len(),
            "verify"
        );
        let result = self.verify_inner(proof_msgpack, verification_key, settings_json);
        match &result {
            Ok(verified) => debug!(verified, "verification finished"),
            Err(err) => warn!(error = %err, "verification could not be attempted"),
        }
        result
    }

    fn verify_inner(
        &self,
        proof_msgpack: &[u8],
        verification_key: &[u8],
        settings_json: &str,
    ) -> Result<bool, BbError> {
        let settings = ProofSystemSettings::from_json(settings_json)?;
        let vk = VerificationKey::from_buffer(verification_key)?;
        if vk.settings != settings {
            return Err(BbError::Format(format!(
                "settings {settings:?} do not match the verification key's {:?}",
                vk.settings
            )));
        }
        let proof = HonkProof::from_msgpack(proof_msgpack)?;
        // The key is untrusted; check the proof fits it before growing the SRS.
        vk.check_proof_shape(&proof)?;
        let crs = self.srs.ensure(vk.srs_size)?;
        let verifier = UltraVerifier::new(&vk, &*crs)?;
        Ok(verifier.verify(&proof)?)
    }

    /// Bare-boolean form of [`verify_detailed`](Self::verify_detailed); any error is `false`.
    pub fn verify(&self, proof_msgpack: &[u8], verification_key: &[u8], settings_json: &str) -> bool {
        matches!(
            self.verify_detailed(proof_msgpack, verification_key, settings_json),
            Ok(true)
        )
    }
}

static GLOBAL_BACKEND: OnceLock<Backend> = OnceLock::new();

/// The process-wide backend, configured from the environment on first use.
///
/// Its SRS manager is the one in [`bbrs_srs::global_crs`], so embedders that
/// install a manager there first decide the point source.
pub fn global_backend() -> &'static Backend {
    GLOBAL_BACKEND.get_or_init(|| {
        let config = FfiConfig::from_env();
        let srs = get_or_init_srs_manager(|| srs_manager_from_config(&config));
        info!(?config, "backend initialized");
        Backend::new(srs, config)
    })
}
