//! Memory crossing the boundary: byte buffers, error strings and result envelopes.
//!
//! Everything handed to the caller is a fresh allocation the caller releases
//! exactly once, through `bb_free_bytes` or `bb_free_err`.

use std::ffi::{c_char, CString};
use std::mem::ManuallyDrop;
use std::ptr::null_mut;

use crate::error::BbError;

/// `{ ptr, len, cap }` of a `Vec<u8>` whose ownership moved to the caller.
///
/// An empty buffer has a null `ptr`.
#[repr(C)]
#[derive(Debug)]
pub struct ByteBuffer {
    pub ptr: *mut u8,
    pub len: usize,
    pub cap: usize,
}

impl ByteBuffer {
    pub fn empty() -> Self {
        Self {
            ptr: null_mut(),
            len: 0,
            cap: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

/// Owns bytes until the ABI edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBuffer(Vec<u8>);

impl OwnedBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Hand the allocation to the caller.
    pub fn into_raw(self) -> ByteBuffer {
        if self.0.capacity() == 0 {
            return ByteBuffer::empty();
        }
        let mut bytes = ManuallyDrop::new(self.0);
        ByteBuffer {
            ptr: bytes.as_mut_ptr(),
            len: bytes.len(),
            cap: bytes.capacity(),
        }
    }

    /// Take back a buffer produced by [`into_raw`](Self::into_raw). `None` for a
    /// null buffer.
    ///
    /// # Safety
    ///
    /// `buf` must come from `into_raw` and must not have been reclaimed before.
    pub unsafe fn from_raw(buf: ByteBuffer) -> Option<Self> {
        if buf.ptr.is_null() {
            return None;
        }
        // SAFETY: ptr/len/cap describe a Vec<u8> leaked by `into_raw`.
        Some(Self(unsafe { Vec::from_raw_parts(buf.ptr, buf.len, buf.cap) }))
    }
}

/// Allocate a C string for `message`. Interior NULs become `\0` escapes.
pub fn error_string(message: &str) -> *mut c_char {
    let sanitized = message.replace('\0', "\\0");
    match CString::new(sanitized) {
        Ok(c) => c.into_raw(),
        // NULs were escaped above.
        Err(_) => null_mut(),
    }
}

/// Release a string from [`error_string`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or come from `error_string` and not have been released.
pub unsafe fn free_error_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        // SAFETY: produced by CString::into_raw in `error_string`.
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// `{ ok, err, data }`: exactly one of `err` and `data` is meaningful.
#[repr(C)]
#[derive(Debug)]
pub struct BBResult {
    pub ok: bool,
    pub err: *mut c_char,
    pub data: ByteBuffer,
}

impl BBResult {
    pub fn success(data: Vec<u8>) -> Self {
        Self {
            ok: true,
            err: null_mut(),
            data: OwnedBuffer::new(data).into_raw(),
        }
    }

    pub fn failure(err: &BbError) -> Self {
        Self {
            ok: false,
            err: error_string(&err.to_string()),
            data: ByteBuffer::empty(),
        }
    }
}

impl From<Result<Vec<u8>, BbError>> for BBResult {
    fn from(result: Result<Vec<u8>, BbError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::failure(&err),
        }
    }
}

/// Outcome class of a detailed verification.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BBVerifyStatus {
    Accepted = 0,
    Rejected = 1,
    Error = 2,
}

/// `err` is non-null only when `status` is [`BBVerifyStatus::Error`].
#[repr(C)]
#[derive(Debug)]
pub struct BBVerifyResult {
    pub status: BBVerifyStatus,
    pub err: *mut c_char,
}

impl From<Result<bool, BbError>> for BBVerifyResult {
    fn from(result: Result<bool, BbError>) -> Self {
        match result {
            Ok(true) => Self {
                status: BBVerifyStatus::Accepted,
                err: null_mut(),
            },
            Ok(false) => Self {
                status: BBVerifyStatus::Rejected,
                err: null_mut(),
            },
            Err(err) => Self {
                status: BBVerifyStatus::Error,
                err: error_string(&err.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn owned_buffer_round_trips_through_raw() {
        let raw = OwnedBuffer::new(vec![1, 2, 3]).into_raw();
        assert!(!raw.is_null());
        assert_eq!(raw.len, 3);
        let back = unsafe { OwnedBuffer::from_raw(raw) }.unwrap();
        assert_eq!(back.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn empty_vec_becomes_null_buffer() {
        let raw = OwnedBuffer::new(Vec::new()).into_raw();
        assert!(raw.is_null());
        assert!(unsafe { OwnedBuffer::from_raw(raw) }.is_none());
    }

    #[test]
    fn failure_result_has_error_and_no_data() {
        let result = BBResult::failure(&BbError::Decode("bad base64".into()));
        assert!(!result.ok);
        assert!(result.data.is_null());
        let message = unsafe { CStr::from_ptr(result.err) }.to_str().unwrap().to_owned();
        assert_eq!(message, "DecodeError: bad base64");
        unsafe { free_error_string(result.err) };
    }

    #[test]
    fn interior_nul_is_escaped() {
        let ptr = error_string("a\0b");
        let message = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_owned();
        assert_eq!(message, "a\\0b");
        unsafe { free_error_string(ptr) };
    }

    #[test]
    fn verify_result_statuses() {
        let accepted = BBVerifyResult::from(Ok(true));
        assert_eq!(accepted.status, BBVerifyStatus::Accepted);
        assert!(accepted.err.is_null());

        let rejected = BBVerifyResult::from(Ok(false));
        assert_eq!(rejected.status, BBVerifyStatus::Rejected);
        assert!(rejected.err.is_null());

        let error = BBVerifyResult::from(Err(BbError::Format("proof: truncated".into())));
        assert_eq!(error.status, BBVerifyStatus::Error);
        assert!(!error.err.is_null());
        unsafe { free_error_string(error.err) };
    }
}
