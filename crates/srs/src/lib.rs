//! Structured reference string (SRS) for BN254 G1.
//!
//! Point sources implement [`factories::Bn254CrsFactory`]; the
//! [`global_crs::SrsManager`] grows an immutable snapshot on demand and never
//! shrinks it.

pub mod error;
pub mod factories;
pub mod global_crs;

pub use error::SrsError;

#[cfg(test)]
mod tests;
