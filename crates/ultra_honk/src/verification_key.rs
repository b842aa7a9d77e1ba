//! Verification key: the lowered circuit plus the settings it was derived under.
//!
//! Binary layout, integers big-endian:
//!
//! ```text
//! "BBVK" | version u8 | flags u8 | oracle u8 | reserved u8
//! srs_size u32 | num_witnesses u32
//! num_public u32 | index u32 *
//! num_products u32 | (a u32, b u32) *
//! num_gates u32 | (num_terms u32 | (slot u32, coeff [32]) * | constant [32]) *
//! ```

use bbrs_ecc::curves::bn254::{Fr, G1Affine};
use bbrs_transcript::WordSerializable;
use sha2::{Digest, Sha256};

use crate::constraint_system::{ArithmeticGate, ConstraintSystem};
use crate::error::{VerificationKeyError, VerifierError};
use crate::proof::HonkProof;
use crate::settings::ProofSystemSettings;

pub const VK_MAGIC: &[u8; 4] = b"BBVK";
pub const VK_VERSION: u8 = 1;

const FIELD_SIZE: usize = 32;
const U32_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    pub settings: ProofSystemSettings,
    /// Number of SRS points proofs against this key commit with.
    pub srs_size: usize,
    pub constraint_system: ConstraintSystem,
}

impl VerificationKey {
    /// Fails when a count or index of `constraint_system` does not fit in a u32.
    pub fn new(
        settings: ProofSystemSettings,
        constraint_system: ConstraintSystem,
    ) -> Result<Self, VerificationKeyError> {
        fits_u32("slot count", constraint_system.num_slots())?;
        fits_u32("gate count", constraint_system.gates.len())?;
        for gate in &constraint_system.gates {
            fits_u32("gate term count", gate.terms.len())?;
        }
        let srs_size = constraint_system.required_srs_size();
        fits_u32("SRS size", srs_size)?;
        Ok(Self {
            settings,
            srs_size,
            constraint_system,
        })
    }

    pub fn to_buffer(&self) -> Vec<u8> {
        let cs = &self.constraint_system;
        let mut out = Vec::new();
        out.extend_from_slice(VK_MAGIC);
        out.push(VK_VERSION);
        out.push(self.settings.flags());
        out.push(self.settings.oracle_hash_type.to_byte());
        out.push(0);
        put_u32(&mut out, self.srs_size);
        put_u32(&mut out, cs.num_witnesses);

        put_u32(&mut out, cs.public_inputs.len());
        for &index in &cs.public_inputs {
            put_u32(&mut out, index);
        }

        put_u32(&mut out, cs.products.len());
        for &(a, b) in &cs.products {
            put_u32(&mut out, a);
            put_u32(&mut out, b);
        }

        put_u32(&mut out, cs.gates.len());
        for gate in &cs.gates {
            put_u32(&mut out, gate.terms.len());
            for (slot, coeff) in &gate.terms {
                put_u32(&mut out, *slot);
                out.extend_from_slice(&coeff.to_be_bytes());
            }
            out.extend_from_slice(&gate.constant.to_be_bytes());
        }
        out
    }

    /// Strict inverse of [`to_buffer`](Self::to_buffer).
    ///
    /// Rejects truncation, trailing bytes, unknown flags, out-of-range indices,
    /// non-canonical field elements and an SRS size that does not match the circuit.
    pub fn from_buffer(bytes: &[u8]) -> Result<Self, VerificationKeyError> {
        let mut reader = ByteReader::new(bytes);
        if reader.take(VK_MAGIC.len())? != VK_MAGIC {
            return Err(VerificationKeyError::BadMagic);
        }
        let version = reader.u8()?;
        if version != VK_VERSION {
            return Err(VerificationKeyError::UnsupportedVersion(version));
        }
        let flags = reader.u8()?;
        let oracle = reader.u8()?;
        let settings = ProofSystemSettings::from_packed(flags, oracle)?;
        let reserved = reader.u8()?;
        if reserved != 0 {
            return Err(VerificationKeyError::Reserved(reserved));
        }

        let srs_size = reader.u32()?;
        let num_witnesses = reader.u32()?;
        if num_witnesses == 0 {
            return Err(VerificationKeyError::OutOfRange {
                what: "witness count",
                value: 0,
            });
        }

        let num_public = reader.count("public input", U32_SIZE)?;
        let mut public_inputs = Vec::with_capacity(num_public);
        for _ in 0..num_public {
            let index = reader.index("public input index", num_witnesses)?;
            if public_inputs.last().is_some_and(|&prev| prev >= index) {
                return Err(VerificationKeyError::UnsortedPublicInputs);
            }
            public_inputs.push(index);
        }

        let num_products = reader.count("product", 2 * U32_SIZE)?;
        let mut products = Vec::with_capacity(num_products);
        for _ in 0..num_products {
            let a = reader.index("product operand", num_witnesses)?;
            let b = reader.index("product operand", num_witnesses)?;
            if a > b {
                return Err(VerificationKeyError::OutOfRange {
                    what: "product operand",
                    value: a,
                });
            }
            products.push((a, b));
        }

        let num_slots = num_witnesses + num_products;
        let num_gates = reader.count("gate", U32_SIZE + FIELD_SIZE)?;
        let mut gates = Vec::with_capacity(num_gates);
        for _ in 0..num_gates {
            let num_terms = reader.count("term", U32_SIZE + FIELD_SIZE)?;
            let mut terms = Vec::with_capacity(num_terms);
            for _ in 0..num_terms {
                let slot = reader.index("gate slot", num_slots)?;
                terms.push((slot, reader.field()?));
            }
            gates.push(ArithmeticGate {
                terms,
                constant: reader.field()?,
            });
        }
        reader.finish()?;

        let constraint_system = ConstraintSystem {
            num_witnesses,
            public_inputs,
            products,
            gates,
        };
        let expected = constraint_system.required_srs_size();
        if srs_size != expected {
            return Err(VerificationKeyError::SrsSizeMismatch {
                expected,
                actual: srs_size,
            });
        }
        Ok(Self {
            settings,
            srs_size,
            constraint_system,
        })
    }

    /// SHA-256 of the serialized key; binds proofs to the exact key.
    pub fn hash(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Sha256::digest(self.to_buffer()));
        out
    }

    pub fn num_public_inputs(&self) -> usize {
        self.constraint_system.public_inputs.len()
    }

    /// Number of transcript words in a proof against this key.
    ///
    /// Non-public slot commitments, slot and product masks, `τ`, then the
    /// per-slot and per-product responses.
    pub fn proof_length(&self) -> usize {
        let cs = &self.constraint_system;
        let point = G1Affine::NUM_WORDS;
        let num_slots = cs.num_slots();
        let num_products = cs.products.len();
        (num_slots - self.num_public_inputs()) * point
            + num_slots * point
            + num_products * point
            + 1
            + 2 * num_slots
            + num_products
    }

    /// Public input and word counts of `proof` against this key. Cheap, and
    /// needs no SRS.
    pub fn check_proof_shape(&self, proof: &HonkProof) -> Result<(), VerifierError> {
        let expected = self.num_public_inputs();
        if proof.public_inputs.len() != expected {
            return Err(VerifierError::PublicInputCount {
                expected,
                actual: proof.public_inputs.len(),
            });
        }
        let expected = self.proof_length();
        if proof.proof.len() != expected {
            return Err(VerifierError::ProofLength {
                expected,
                actual: proof.proof.len(),
            });
        }
        Ok(())
    }
}

fn fits_u32(what: &'static str, value: usize) -> Result<(), VerificationKeyError> {
    u32::try_from(value)
        .map(|_| ())
        .map_err(|_| VerificationKeyError::TooLarge { what, value })
}

// Every count and index is bounded by `VerificationKey::new` or `from_buffer`.
fn put_u32(out: &mut Vec<u8>, value: usize) {
    debug_assert!(u32::try_from(value).is_ok(), "{value} exceeds u32");
    out.extend_from_slice(&(value as u32).to_be_bytes());
}

struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], VerificationKeyError> {
        if self.remaining() < len {
            return Err(VerificationKeyError::Truncated {
                offset: self.offset,
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, VerificationKeyError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<usize, VerificationKeyError> {
        let mut buf = [0u8; U32_SIZE];
        buf.copy_from_slice(self.take(U32_SIZE)?);
        Ok(u32::from_be_bytes(buf) as usize)
    }

    /// A count whose items occupy at least `min_item_size` bytes each.
    fn count(&mut self, what: &'static str, min_item_size: usize) -> Result<usize, VerificationKeyError> {
        let count = self.u32()?;
        let remaining = self.remaining();
        if count.saturating_mul(min_item_size) > remaining {
            return Err(VerificationKeyError::CountTooLarge {
                what,
                count,
                remaining,
            });
        }
        Ok(count)
    }

    fn index(&mut self, what: &'static str, bound: usize) -> Result<usize, VerificationKeyError> {
        let value = self.u32()?;
        if value >= bound {
            return Err(VerificationKeyError::OutOfRange { what, value });
        }
        Ok(value)
    }

    fn field(&mut self) -> Result<Fr, VerificationKeyError> {
        let offset = self.offset;
        let mut buf = [0u8; FIELD_SIZE];
        buf.copy_from_slice(self.take(FIELD_SIZE)?);
        Fr::from_be_bytes_canonical(&buf).ok_or(VerificationKeyError::NonCanonicalField { offset })
    }

    fn finish(&self) -> Result<(), VerificationKeyError> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(VerificationKeyError::TrailingBytes(extra)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::OracleHashType;

    fn sample_key() -> VerificationKey {
        // w0 * w1 - w2 + 1 = 0, w2 public
        let cs = ConstraintSystem {
            num_witnesses: 3,
            public_inputs: vec![2],
            products: vec![(0, 1)],
            gates: vec![ArithmeticGate {
                terms: vec![(2, -Fr::one()), (3, Fr::one())],
                constant: Fr::one(),
            }],
        };
        let settings = ProofSystemSettings {
            oracle_hash_type: OracleHashType::Keccak,
            disable_zk: true,
            ..Default::default()
        };
        VerificationKey::new(settings, cs).unwrap()
    }

    #[test]
    fn buffer_round_trips() {
        let vk = sample_key();
        let bytes = vk.to_buffer();
        assert_eq!(&bytes[..4], VK_MAGIC);
        assert_eq!(VerificationKey::from_buffer(&bytes).unwrap(), vk);
        assert_eq!(vk.srs_size, 8);
    }

    #[test]
    fn hash_tracks_content() {
        let vk = sample_key();
        assert_eq!(vk.hash(), vk.clone().hash());
        let mut other = vk.clone();
        other.settings.disable_zk = false;
        assert_ne!(vk.hash(), other.hash());
    }

    #[test]
    fn every_truncation_is_rejected() {
        let bytes = sample_key().to_buffer();
        for len in 0..bytes.len() {
            assert!(
                VerificationKey::from_buffer(&bytes[..len]).is_err(),
                "prefix of {len} bytes parsed"
            );
        }
    }

    #[test]
    fn proof_shape_follows_the_circuit() {
        let vk = sample_key();
        // 3 private slot commitments, 4 slot masks, 1 product mask (2 words each),
        // tau, 4 pairs of slot responses and 1 cross response.
        assert_eq!(vk.proof_length(), 26);

        let proof = HonkProof {
            public_inputs: vec![Fr::zero()],
            proof: vec![[0u8; 32]; 26],
        };
        assert!(vk.check_proof_shape(&proof).is_ok());

        let short = HonkProof {
            proof: vec![[0u8; 32]; 25],
            ..proof.clone()
        };
        assert!(matches!(
            vk.check_proof_shape(&short),
            Err(VerifierError::ProofLength { expected: 26, actual: 25 })
        ));

        let no_inputs = HonkProof {
            public_inputs: vec![],
            ..proof
        };
        assert!(matches!(
            vk.check_proof_shape(&no_inputs),
            Err(VerifierError::PublicInputCount { expected: 1, actual: 0 })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn counts_beyond_u32_are_refused() {
        let cs = ConstraintSystem {
            num_witnesses: u32::MAX as usize + 1,
            public_inputs: vec![],
            products: vec![],
            gates: vec![],
        };
        assert!(matches!(
            VerificationKey::new(ProofSystemSettings::default(), cs),
            Err(VerificationKeyError::TooLarge { what: "slot count", .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = sample_key().to_buffer();
        bytes.push(0);
        assert!(matches!(
            VerificationKey::from_buffer(&bytes),
            Err(VerificationKeyError::TrailingBytes(1))
        ));
    }

    #[test]
    fn header_fields_are_checked() {
        let bytes = sample_key().to_buffer();

        let mut bad = bytes.clone();
        bad[0] = b'X';
        assert!(matches!(
            VerificationKey::from_buffer(&bad),
            Err(VerificationKeyError::BadMagic)
        ));

        let mut bad = bytes.clone();
        bad[4] = 2;
        assert!(matches!(
            VerificationKey::from_buffer(&bad),
            Err(VerificationKeyError::UnsupportedVersion(2))
        ));

        let mut bad = bytes.clone();
        bad[5] |= 0x40;
        assert!(matches!(
            VerificationKey::from_buffer(&bad),
            Err(VerificationKeyError::Settings(_))
        ));

        let mut bad = bytes.clone();
        bad[7] = 1;
        assert!(matches!(
            VerificationKey::from_buffer(&bad),
            Err(VerificationKeyError::Reserved(1))
        ));

        let mut bad = bytes;
        bad[11] = 16;
        assert!(matches!(
            VerificationKey::from_buffer(&bad),
            Err(VerificationKeyError::SrsSizeMismatch {
                expected: 8,
                actual: 16
            })
        ));
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut vk = sample_key();
        vk.constraint_system.gates[0].terms.push((4, Fr::one()));
        assert!(matches!(
            VerificationKey::from_buffer(&vk.to_buffer()),
            Err(VerificationKeyError::OutOfRange { what: "gate slot", value: 4 })
        ));
    }

    #[test]
    fn huge_counts_are_rejected_before_allocating() {
        let mut bytes = sample_key().to_buffer();
        // num_public sits right after the 16-byte header.
        bytes[16..20].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            VerificationKey::from_buffer(&bytes),
            Err(VerificationKeyError::CountTooLarge { what: "public input", .. })
        ));
    }

    #[test]
    fn non_canonical_constant_is_rejected() {
        let mut bytes = sample_key().to_buffer();
        let len = bytes.len();
        bytes[len - 32..].copy_from_slice(&[0xFF; 32]);
        assert!(matches!(
            VerificationKey::from_buffer(&bytes),
            Err(VerificationKeyError::NonCanonicalField { .. })
        ));
    }
}
