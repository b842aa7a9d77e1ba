//! Proving system over lowered arithmetic circuits.
//!
//! - **Settings**: proof-system options and their packed form
//! - **Constraint system**: circuit opcodes lowered to linear gates over witness and product slots
//! - **Proving key / verification key**: per-circuit material; the verification key has a strict binary encoding
//! - **Ultra prover / verifier**: Pedersen-committed sigma argument under a Fiat-Shamir transcript
//! - **Proof**: msgpack envelope carrying public inputs and transcript words

pub mod commitment_key;
pub mod constraint_system;
pub mod error;
pub mod proof;
pub mod proving_key;
pub mod settings;
pub mod ultra_prover;
pub mod ultra_verifier;
pub mod verification_key;


pub use commitment_key::CommitmentKey;
pub use constraint_system::{ArithmeticGate, ConstraintSystem};
pub use error::{ProofError, ProverError, SettingsError, VerificationKeyError, VerifierError};
pub use proof::HonkProof;
pub use proving_key::ProvingKey;
pub use settings::{OracleHashType, ProofSystemSettings};
pub use ultra_prover::UltraProver;
pub use ultra_verifier::UltraVerifier;
pub use verification_key::VerificationKey;
