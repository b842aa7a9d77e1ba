use bbrs_ecc::curves::bn254::{Fr, G1Affine, G1Element};
use bbrs_srs::factories::Bn254Crs;

/// Pedersen bases taken from the SRS prefix.
///
/// `G = srs[0]` carries values; `H_j = srs[1 + j]` carries the blinding factor of
/// slot `j`.
#[derive(Debug, Clone)]
pub struct CommitmentKey {
    value_base: G1Affine,
    blinding_bases: Vec<G1Affine>,
}

impl CommitmentKey {
    /// `None` when the CRS holds fewer than `num_slots + 1` points.
    pub fn new(crs: &dyn Bn254Crs, num_slots: usize) -> Option<Self> {
        let points = crs.get_monomial_points();
        if points.len() < num_slots + 1 {
            return None;
        }
        Some(Self {
            value_base: points[0],
            blinding_bases: points[1..=num_slots].to_vec(),
        })
    }

    pub fn num_slots(&self) -> usize {
        self.blinding_bases.len()
    }

    pub fn value_base(&self) -> G1Element {
        G1Element::from_affine(&self.value_base)
    }

    pub fn blinding_base(&self, slot: usize) -> G1Element {
        G1Element::from_affine(&self.blinding_bases[slot])
    }

    /// `value · G + blinding · H_slot`, with ladder multiplications since both
    /// scalars are secret on the prover side.
    ///
    /// A zero blinding only occurs for public slots or with zk disabled.
    pub fn commit(&self, slot: usize, value: &Fr, blinding: &Fr) -> G1Element {
        let mut commitment = self.value_base().ladder_mul_scalar(value);
        if !blinding.is_zero() {
            commitment += self.blinding_base(slot).ladder_mul_scalar(blinding);
        }
        commitment
    }
}

#[cfg(test)]
mod tests {
    use bbrs_srs::factories::{Bn254CrsFactory, DerivedBn254CrsFactory, MemBn254Crs};

    use super::*;

    fn crs(size: usize) -> MemBn254Crs {
        let points = DerivedBn254CrsFactory::default().load_points(0, size).unwrap();
        MemBn254Crs::new(points).unwrap()
    }

    #[test]
    fn needs_one_point_per_slot_plus_value_base() {
        let crs = crs(4);
        assert!(CommitmentKey::new(&crs, 3).is_some());
        assert!(CommitmentKey::new(&crs, 4).is_none());
    }

    #[test]
    fn commitment_is_additively_homomorphic() {
        let key = CommitmentKey::new(&crs(4), 3).unwrap();
        let (v1, r1) = (Fr::from(5u64), Fr::from(11u64));
        let (v2, r2) = (Fr::from(7u64), Fr::from(13u64));
        let sum = key.commit(2, &v1, &r1) + key.commit(2, &v2, &r2);
        assert_eq!(sum, key.commit(2, &(v1 + v2), &(r1 + r2)));
    }

    #[test]
    fn commitment_matches_variable_time_formula() {
        let key = CommitmentKey::new(&crs(4), 3).unwrap();
        let (v, r) = (Fr::random_element(), Fr::random_element());
        let expected = key.value_base().mul_scalar(&v) + key.blinding_base(1).mul_scalar(&r);
        assert_eq!(key.commit(1, &v, &r), expected);
    }

    #[test]
    fn unblinded_commitment_is_value_times_generator() {
        let key = CommitmentKey::new(&crs(2), 1).unwrap();
        let v = Fr::from(9u64);
        assert_eq!(key.commit(0, &v, &Fr::zero()), G1Element::one().mul_scalar(&v));
        assert_ne!(key.commit(0, &v, &Fr::one()), key.commit(0, &v, &Fr::zero()));
    }
}
