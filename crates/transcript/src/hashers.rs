//! Oracle hashes that turn transcript words into challenge digests.

use bbrs_crypto::generators::read_uint256_be;
use bbrs_crypto::poseidon2::Poseidon2;
use bbrs_ecc::curves::bn254::Fr;
use blake2::{Blake2s256, Digest};
use tiny_keccak::{Hasher, Keccak};

use crate::codec::Word;

/// Compresses a round's words into a 32-byte digest.
pub trait TranscriptHasher {
    fn hash(words: &[Word]) -> Word;
}

/// Keccak-256 over the concatenated words.
pub struct Keccak256Hasher;

impl TranscriptHasher for Keccak256Hasher {
    fn hash(words: &[Word]) -> Word {
        let mut keccak = Keccak::v256();
        for word in words {
            keccak.update(word);
        }
        let mut out = [0u8; 32];
        keccak.finalize(&mut out);
        out
    }
}

/// BLAKE2s-256 over the concatenated words.
pub struct Blake2sHasher;

impl TranscriptHasher for Blake2sHasher {
    fn hash(words: &[Word]) -> Word {
        let mut hasher = Blake2s256::new();
        for word in words {
            hasher.update(word);
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    }
}

/// Poseidon2 sponge over BN254 Fr.
///
/// Each word is split into two 128-bit halves (low, then high) so that every
/// absorbed element fits the field without reduction.
pub struct Poseidon2Hasher;

impl TranscriptHasher for Poseidon2Hasher {
    fn hash(words: &[Word]) -> Word {
        let frs: Vec<Fr> = words
            .iter()
            .flat_map(|word| {
                let limbs = read_uint256_be(word);
                [
                    Fr::from_limbs([limbs[0], limbs[1], 0, 0]),
                    Fr::from_limbs([limbs[2], limbs[3], 0, 0]),
                ]
            })
            .collect();
        Poseidon2::hash(&frs).to_be_bytes()
    }
}
