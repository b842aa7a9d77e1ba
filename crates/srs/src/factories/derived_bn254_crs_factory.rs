use bbrs_crypto::generators::derive_generators;
use bbrs_ecc::curves::bn254::G1Affine as Bn254G1Affine;

use super::crs_factory::Bn254CrsFactory;
use crate::error::SrsError;

pub const DEFAULT_SRS_DOMAIN_SEPARATOR: &[u8] = b"BBRS_SRS_BN254";

/// Deterministic SRS derived by hashing to the curve.
///
/// Point 0 is the BN254 generator; point `i > 0` is generator `i` of
/// [`derive_generators`] under the configured domain separator. No trusted setup
/// is involved, and every party derives the same points.
pub struct DerivedBn254CrsFactory {
    domain_separator: Vec<u8>,
}

impl Default for DerivedBn254CrsFactory {
    fn default() -> Self {
        Self::new(DEFAULT_SRS_DOMAIN_SEPARATOR)
    }
}

impl DerivedBn254CrsFactory {
    pub fn new(domain_separator: &[u8]) -> Self {
        Self {
            domain_separator: domain_separator.to_vec(),
        }
    }
}

impl Bn254CrsFactory for DerivedBn254CrsFactory {
    fn load_points(&self, start: usize, count: usize) -> Result<Vec<Bn254G1Affine>, SrsError> {
        let end = start.saturating_add(count);
        if end > u32::MAX as usize {
            return Err(SrsError::Insufficient {
                available: u32::MAX as usize,
                required: end,
            });
        }
        let mut points = Vec::with_capacity(count);
        let mut derived_start = start;
        if start == 0 && count > 0 {
            points.push(Bn254G1Affine::one());
            derived_start = 1;
        }
        points.extend(derive_generators(
            &self.domain_separator,
            end - derived_start,
            derived_start,
        ));
        Ok(points)
    }

    fn describe(&self) -> String {
        format!(
            "derived (domain {:?})",
            String::from_utf8_lossy(&self.domain_separator)
        )
    }
}
