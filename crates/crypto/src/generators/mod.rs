use bbrs_ecc::curves::bn254::{Fq, G1Affine};

/// Derive `num_generators` independent BN254 G1 points via BLAKE3 hash-to-curve.
///
/// Generator `i` hashes a 64-byte preimage laid out as
/// `[blake3(domain_separator) (32 bytes) | i as u32 big-endian | zeros (28 bytes)]`.
/// Nobody knows the discrete log of any derived point relative to another.
pub fn derive_generators(
    domain_separator: &[u8],
    num_generators: usize,
    starting_index: usize,
) -> Vec<G1Affine> {
    let domain_hash = blake3::hash(domain_separator);

    let mut generator_preimage = [0u8; 64];
    generator_preimage[..32].copy_from_slice(domain_hash.as_bytes());

    (starting_index..starting_index + num_generators)
        .map(|i| {
            generator_preimage[32..36].copy_from_slice(&(i as u32).to_be_bytes());
            hash_to_curve(&generator_preimage)
        })
        .collect()
}

/// Hash a seed buffer into a BN254 G1 point.
///
/// Each attempt hashes `seed || attempt || selector` twice (selector 0 gives the
/// high half, selector 1 the low half), reduces the 512-bit value into Fq and
/// lifts it to the curve. The MSB of the high half picks the parity of y.
pub fn hash_to_curve(seed: &[u8]) -> G1Affine {
    let seed_size = seed.len();
    let mut target_seed = Vec::with_capacity(seed_size + 2);
    target_seed.extend_from_slice(seed);
    target_seed.push(0); // attempt_count
    target_seed.push(0); // hash selector

    for attempt_count in 0u8..=255 {
        target_seed[seed_size] = attempt_count;

        target_seed[seed_size + 1] = 0;
        let hash_hi = blake3::hash(&target_seed);
        target_seed[seed_size + 1] = 1;
        let hash_lo = blake3::hash(&target_seed);

        let x = Fq::from_u512(
            read_uint256_be(hash_lo.as_bytes()),
            read_uint256_be(hash_hi.as_bytes()),
        );
        let y_is_odd = hash_hi.as_bytes()[0] > 127;

        if let Some(point) = G1Affine::from_x_coordinate(x, y_is_odd) {
            return point;
        }
    }

    // Each attempt succeeds with probability ~1/2.
    unreachable!("hash_to_curve: no curve point found after 256 attempts")
}

/// Read 32 bytes (big-endian) as [u64; 4] in little-endian limb order.
pub fn read_uint256_be(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(word);
    }
    limbs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_generators_are_on_curve_and_distinct() {
        let gens = derive_generators(b"TEST_DOMAIN", 8, 0);
        assert_eq!(gens.len(), 8);
        for (i, g) in gens.iter().enumerate() {
            assert!(g.on_curve(), "generator {i} off curve");
            assert!(!g.is_point_at_infinity());
            for h in &gens[i + 1..] {
                assert_ne!(g, h);
            }
        }
    }

    #[test]
    fn starting_index_offsets_the_sequence() {
        let all = derive_generators(b"TEST_DOMAIN", 6, 0);
        let tail = derive_generators(b"TEST_DOMAIN", 3, 3);
        assert_eq!(&all[3..], &tail[..]);
    }

    #[test]
    fn domain_separator_changes_generators() {
        let a = derive_generators(b"DOMAIN_A", 1, 0);
        let b = derive_generators(b"DOMAIN_B", 1, 0);
        assert_ne!(a[0], b[0]);
    }

    #[test]
    fn read_uint256_be_orders_limbs() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        bytes[0] = 0x80;
        assert_eq!(read_uint256_be(&bytes), [1, 0, 0, 0x8000_0000_0000_0000]);
    }
}
