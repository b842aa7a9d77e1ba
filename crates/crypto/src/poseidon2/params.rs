//! Poseidon2 constants for BN254 Fr with t = 4, x^5 S-box, 8 full and 56 partial rounds.
//!
//! Round constants and the internal diagonal are expanded from a BLAKE3 XOF keyed
//! on a fixed label; every element is taken from 64 XOF bytes reduced mod r.
//! These constants are self-consistent but do not reproduce the published
//! Poseidon2 BN254 instance, so digests differ from other implementations.

use std::sync::LazyLock;

use bbrs_ecc::curves::bn254::Fr;

use crate::generators::read_uint256_be;

pub const T: usize = 4;
pub const ROUNDS_F: usize = 8;
pub const ROUNDS_P: usize = 56;
pub const NUM_ROUNDS: usize = ROUNDS_F + ROUNDS_P;

const ROUND_CONSTANTS_LABEL: &[u8] = b"BBRS_POSEIDON2_BN254_T4_ROUND_CONSTANTS";
const INTERNAL_DIAGONAL_LABEL: &[u8] = b"BBRS_POSEIDON2_BN254_T4_INTERNAL_DIAGONAL";

fn expand(label: &[u8], count: usize) -> Vec<Fr> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(label);
    let mut reader = hasher.finalize_xof();
    (0..count)
        .map(|_| {
            let mut wide = [0u8; 64];
            reader.fill(&mut wide);
            let mut hi = [0u8; 32];
            let mut lo = [0u8; 32];
            hi.copy_from_slice(&wide[..32]);
            lo.copy_from_slice(&wide[32..]);
            Fr::from_u512(read_uint256_be(&lo), read_uint256_be(&hi))
        })
        .collect()
}

pub static ROUND_CONSTANTS: LazyLock<[[Fr; T]; NUM_ROUNDS]> = LazyLock::new(|| {
    let flat = expand(ROUND_CONSTANTS_LABEL, NUM_ROUNDS * T);
    let mut rc = [[Fr::zero(); T]; NUM_ROUNDS];
    for (round, chunk) in rc.iter_mut().zip(flat.chunks_exact(T)) {
        round.copy_from_slice(chunk);
    }
    rc
});

pub static INTERNAL_DIAGONAL: LazyLock<[Fr; T]> = LazyLock::new(|| {
    let flat = expand(INTERNAL_DIAGONAL_LABEL, T);
    let mut diag = [Fr::zero(); T];
    diag.copy_from_slice(&flat);
    diag
});
