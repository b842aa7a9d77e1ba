pub mod params;
pub mod permutation;
pub mod sponge;

use bbrs_ecc::curves::bn254::Fr;

/// Poseidon2 hash function over BN254 Fr.
pub struct Poseidon2;

impl Poseidon2 {
    /// Hash a slice of field elements into a single field element.
    pub fn hash(input: &[Fr]) -> Fr {
        sponge::hash(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_determinism() {
        let a = Fr::from(42u64);
        let b = Fr::from(99u64);
        let c = Fr::from(1337u64);
        let d = Fr::from(7u64);

        let r0 = Poseidon2::hash(&[a, b, c, d]);
        let r1 = Poseidon2::hash(&[a, b, c, d]);
        let r2 = Poseidon2::hash(&[d, c, b, a]);

        assert_eq!(r0, r1, "same input must produce same output");
        assert_ne!(r0, r2, "different input order must produce different output");
    }

    #[test]
    fn test_hash_sensitivity() {
        let a = Fr::from(1u64);
        let b = Fr::from(2u64);
        assert_ne!(
            Poseidon2::hash(&[a, b]),
            Poseidon2::hash(&[a, b + Fr::one()])
        );
    }

    #[test]
    fn test_length_is_bound_into_capacity() {
        // Zero padding must not collide with a shorter input.
        let zero = Fr::zero();
        assert_ne!(Poseidon2::hash(&[zero]), Poseidon2::hash(&[zero, zero]));
        assert_ne!(Poseidon2::hash(&[]), Poseidon2::hash(&[zero]));
    }

    #[test]
    fn test_permutation_is_not_identity() {
        let input = [Fr::zero(), Fr::one(), Fr::from(2u64), Fr::from(3u64)];
        let output = permutation::permutation(&input);
        assert_ne!(input, output);
        assert_eq!(output, permutation::permutation(&input));
    }
}
