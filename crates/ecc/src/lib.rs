//! BN254 arithmetic: Montgomery-form prime fields and the G1 group.

pub mod curves;
pub mod fields;
pub mod groups;

pub use curves::bn254::{Fq, Fr, G1Affine, G1Element};
