//! `extern "C"` entry points. Every call runs inside `catch_unwind`.

use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::backend::global_backend;
use crate::buffer::{free_error_string, BBResult, BBVerifyResult, ByteBuffer, OwnedBuffer};
use crate::error::BbError;
use crate::logging::init_logging;

/// Borrow a caller-supplied C string.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string valid for the call.
unsafe fn c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, BbError> {
    if ptr.is_null() {
        return Err(BbError::Format(format!("{what} is null")));
    }
    // SAFETY: non-null and NUL-terminated per the caller contract.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|err| BbError::Decode(format!("{what} is not UTF-8: {err}")))
}

/// Borrow a caller-supplied byte range. Null with zero length is an empty slice.
///
/// # Safety
///
/// A non-null `ptr` must be valid for reads of `len` bytes for the call.
unsafe fn byte_slice<'a>(ptr: *const u8, len: usize, what: &str) -> Result<&'a [u8], BbError> {
    if ptr.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err(BbError::Format(format!("{what} is null")));
    }
    // SAFETY: valid for `len` bytes per the caller contract.
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn guarded<T>(operation: &str, f: impl FnOnce() -> Result<T, BbError>) -> Result<T, BbError> {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!(operation, panic = %message, "panic contained at ABI boundary");
        Err(BbError::Internal(format!("{operation} panicked: {message}")))
    })
}

/// # Safety
///
/// `bytecode_b64_gz` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bb_init_srs_from_bytecode(bytecode_b64_gz: *const c_char) -> BBResult {
    guarded("bb_init_srs_from_bytecode", || {
        let bytecode = unsafe { c_str(bytecode_b64_gz, "bytecode") }?;
        global_backend().init_srs_from_bytecode(bytecode)?;
        Ok(Vec::new())
    })
    .into()
}

/// # Safety
///
/// Every argument must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bb_prove_ultrahonk(
    bytecode_b64_gz: *const c_char,
    witness_json: *const c_char,
    settings_json: *const c_char,
) -> BBResult {
    guarded("bb_prove_ultrahonk", || {
        let bytecode = unsafe { c_str(bytecode_b64_gz, "bytecode") }?;
        let witness = unsafe { c_str(witness_json, "witness") }?;
        let settings = unsafe { c_str(settings_json, "settings") }?;
        global_backend().prove(bytecode, witness, settings)
    })
    .into()
}

/// # Safety
///
/// Every argument must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bb_get_vk_ultrahonk(
    bytecode_b64_gz: *const c_char,
    settings_json: *const c_char,
) -> BBResult {
    guarded("bb_get_vk_ultrahonk", || {
        let bytecode = unsafe { c_str(bytecode_b64_gz, "bytecode") }?;
        let settings = unsafe { c_str(settings_json, "settings") }?;
        global_backend().get_verification_key(bytecode, settings)
    })
    .into()
}

unsafe fn verify_detailed(
    proof_ptr: *const u8,
    proof_len: usize,
    vk_ptr: *const u8,
    vk_len: usize,
    settings_json: *const c_char,
) -> Result<bool, BbError> {
    guarded("bb_verify_ultrahonk", || {
        let proof = unsafe { byte_slice(proof_ptr, proof_len, "proof") }?;
        let vk = unsafe { byte_slice(vk_ptr, vk_len, "verification key") }?;
        let settings = unsafe { c_str(settings_json, "settings") }?;
        global_backend().verify_detailed(proof, vk, settings)
    })
}

/// `true` only for an accepted proof; any error reads as `false`.
///
/// # Safety
///
/// Non-null pointers must be valid for their lengths; `settings_json` must be null
/// or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bb_verify_ultrahonk(
    proof_msgpack_ptr: *const u8,
    proof_msgpack_len: usize,
    vk_ptr: *const u8,
    vk_len: usize,
    settings_json: *const c_char,
) -> bool {
    matches!(
        unsafe { verify_detailed(proof_msgpack_ptr, proof_msgpack_len, vk_ptr, vk_len, settings_json) },
        Ok(true)
    )
}

/// Like [`bb_verify_ultrahonk`] but separates "rejected" from "could not verify".
///
/// # Safety
///
/// Same contract as [`bb_verify_ultrahonk`].
#[no_mangle]
pub unsafe extern "C" fn bb_verify_ultrahonk_detailed(
    proof_msgpack_ptr: *const u8,
    proof_msgpack_len: usize,
    vk_ptr: *const u8,
    vk_len: usize,
    settings_json: *const c_char,
) -> BBVerifyResult {
    unsafe { verify_detailed(proof_msgpack_ptr, proof_msgpack_len, vk_ptr, vk_len, settings_json) }
        .into()
}

/// # Safety
///
/// `buf` must be the `data` of a `BBResult` from this library, released once.
#[no_mangle]
pub unsafe extern "C" fn bb_free_bytes(buf: ByteBuffer) {
    drop(unsafe { OwnedBuffer::from_raw(buf) });
}

/// # Safety
///
/// `err` must be null or an error string from this library, released once.
#[no_mangle]
pub unsafe extern "C" fn bb_free_err(err: *mut c_char) {
    unsafe { free_error_string(err) };
}

/// Install the `BB_LOG`-filtered subscriber; `false` if one was already installed.
#[no_mangle]
pub extern "C" fn bb_init_logging() -> bool {
    catch_unwind(init_logging).unwrap_or(false)
}
