//! Word codec for transcript serialization.
//!
//! Every proof element is carried as one or more 32-byte big-endian words.
//! Decoding is strict: field elements must be canonical and points must lie on
//! the curve, so malformed proofs fail here rather than in the verifier.

use bbrs_ecc::curves::bn254::{Fq, Fr, G1Affine};
use thiserror::Error;

pub const WORD_SIZE: usize = 32;

/// One 32-byte unit of a proof.
pub type Word = [u8; WORD_SIZE];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("proof truncated: needed {needed} words, {remaining} remaining")]
    OutOfData { needed: usize, remaining: usize },
    #[error("field element is not canonical")]
    NonCanonicalField,
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("integer word has non-zero high bytes")]
    IntegerOverflow,
    #[error("{0} unread words left in proof")]
    TrailingWords(usize),
}

/// Types that can be written to and read from the transcript as whole words.
pub trait WordSerializable: Sized {
    const NUM_WORDS: usize;

    fn serialize_to_words(&self) -> Vec<Word>;

    /// `words` has exactly `NUM_WORDS` entries.
    fn deserialize_from_words(words: &[Word]) -> Result<Self, CodecError>;
}

impl WordSerializable for Word {
    const NUM_WORDS: usize = 1;

    fn serialize_to_words(&self) -> Vec<Word> {
        vec![*self]
    }

    fn deserialize_from_words(words: &[Word]) -> Result<Self, CodecError> {
        Ok(words[0])
    }
}

impl WordSerializable for u32 {
    const NUM_WORDS: usize = 1;

    fn serialize_to_words(&self) -> Vec<Word> {
        let mut word = [0u8; WORD_SIZE];
        word[WORD_SIZE - 4..].copy_from_slice(&self.to_be_bytes());
        vec![word]
    }

    fn deserialize_from_words(words: &[Word]) -> Result<Self, CodecError> {
        let word = &words[0];
        if word[..WORD_SIZE - 4].iter().any(|b| *b != 0) {
            return Err(CodecError::IntegerOverflow);
        }
        let mut be = [0u8; 4];
        be.copy_from_slice(&word[WORD_SIZE - 4..]);
        Ok(u32::from_be_bytes(be))
    }
}

impl WordSerializable for Fr {
    const NUM_WORDS: usize = 1;

    fn serialize_to_words(&self) -> Vec<Word> {
        vec![self.to_be_bytes()]
    }

    fn deserialize_from_words(words: &[Word]) -> Result<Self, CodecError> {
        Fr::from_be_bytes_canonical(&words[0]).ok_or(CodecError::NonCanonicalField)
    }
}

// BN254 G1 points take two words, x then y. Infinity is (0, 0).
impl WordSerializable for G1Affine {
    const NUM_WORDS: usize = 2;

    fn serialize_to_words(&self) -> Vec<Word> {
        let bytes = self.to_be_bytes();
        let mut x = [0u8; WORD_SIZE];
        let mut y = [0u8; WORD_SIZE];
        x.copy_from_slice(&bytes[..WORD_SIZE]);
        y.copy_from_slice(&bytes[WORD_SIZE..]);
        vec![x, y]
    }

    fn deserialize_from_words(words: &[Word]) -> Result<Self, CodecError> {
        if Fq::from_be_bytes_canonical(&words[0]).is_none()
            || Fq::from_be_bytes_canonical(&words[1]).is_none()
        {
            return Err(CodecError::NonCanonicalField);
        }
        let mut bytes = [0u8; 2 * WORD_SIZE];
        bytes[..WORD_SIZE].copy_from_slice(&words[0]);
        bytes[WORD_SIZE..].copy_from_slice(&words[1]);
        G1Affine::from_be_bytes(&bytes).ok_or(CodecError::NotOnCurve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbrs_ecc::curves::bn254::G1Element;

    #[test]
    fn u32_occupies_low_bytes() {
        let words = 0xDEADBEEFu32.serialize_to_words();
        assert_eq!(words.len(), 1);
        assert_eq!(&words[0][28..], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(words[0][..28].iter().all(|b| *b == 0));
        assert_eq!(u32::deserialize_from_words(&words), Ok(0xDEADBEEF));
    }

    #[test]
    fn u32_rejects_high_bytes() {
        let mut word = [0u8; WORD_SIZE];
        word[0] = 1;
        assert_eq!(
            u32::deserialize_from_words(&[word]),
            Err(CodecError::IntegerOverflow)
        );
    }

    #[test]
    fn fr_rejects_non_canonical_word() {
        let word = [0xFFu8; WORD_SIZE];
        assert_eq!(
            Fr::deserialize_from_words(&[word]),
            Err(CodecError::NonCanonicalField)
        );
    }

    #[test]
    fn point_decoding_checks_curve_membership() {
        let point = (G1Element::one() * Fr::from(11u64)).to_affine();
        let mut words = point.serialize_to_words();
        assert_eq!(G1Affine::deserialize_from_words(&words), Ok(point));

        words[1][31] ^= 1;
        assert_eq!(
            G1Affine::deserialize_from_words(&words),
            Err(CodecError::NotOnCurve)
        );
    }

    #[test]
    fn infinity_is_two_zero_words() {
        let words = G1Affine::infinity().serialize_to_words();
        assert_eq!(words, vec![[0u8; WORD_SIZE]; 2]);
        assert!(G1Affine::deserialize_from_words(&words)
            .unwrap()
            .is_point_at_infinity());
    }
}
