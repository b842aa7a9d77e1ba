//! Fiat-Shamir transcripts for the proof system.
//!
//! Proofs are sequences of 32-byte words. A transcript is parameterised by the
//! oracle hash that compresses each round into the next challenge.

pub mod codec;
pub mod hashers;
pub mod manifest;
pub mod transcript;

pub use codec::{CodecError, Word, WordSerializable, WORD_SIZE};
pub use hashers::{Blake2sHasher, Keccak256Hasher, Poseidon2Hasher, TranscriptHasher};
pub use transcript::BaseTranscript;

pub type Poseidon2Transcript = BaseTranscript<Poseidon2Hasher>;
pub type KeccakTranscript = BaseTranscript<Keccak256Hasher>;
pub type Blake2sTranscript = BaseTranscript<Blake2sHasher>;
