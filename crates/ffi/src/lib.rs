//! C ABI over the proving system.
//!
//! Callers hand in base64/gzip circuit bytecode, JSON witness and settings
//! documents, and get back owned byte buffers (`BBResult`) that they release with
//! `bb_free_bytes` / `bb_free_err`. [`Backend`] is the same surface for Rust callers.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod error;
pub mod ffi;
pub mod key_cache;
pub mod logging;


pub use backend::{global_backend, srs_manager_from_config, Backend};
pub use buffer::{BBResult, BBVerifyResult, BBVerifyStatus, ByteBuffer, OwnedBuffer};
pub use config::FfiConfig;
pub use error::{BbError, ErrorKind};
pub use logging::init_logging;

/// [`Backend::prove`] on the process-wide backend.
pub fn prove(bytecode_b64_gz: &str, witness_json: &str, settings_json: &str) -> Result<Vec<u8>, BbError> {
    global_backend().prove(bytecode_b64_gz, witness_json, settings_json)
}

/// [`Backend::get_verification_key`] on the process-wide backend.
pub fn get_verification_key(bytecode_b64_gz: &str, settings_json: &str) -> Result<Vec<u8>, BbError> {
    global_backend().get_verification_key(bytecode_b64_gz, settings_json)
}

/// [`Backend::verify_detailed`] on the process-wide backend.
pub fn verify_detailed(proof_msgpack: &[u8], verification_key: &[u8], settings_json: &str) -> Result<bool, BbError> {
    global_backend().verify_detailed(proof_msgpack, verification_key, settings_json)
}

/// [`Backend::init_srs_from_bytecode`] on the process-wide backend.
pub fn init_srs_from_bytecode(bytecode_b64_gz: &str) -> Result<(), BbError> {
    global_backend().init_srs_from_bytecode(bytecode_b64_gz)
}
