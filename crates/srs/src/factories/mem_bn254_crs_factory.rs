use bbrs_ecc::curves::bn254::G1Affine as Bn254G1Affine;

use super::crs_factory::{Bn254Crs, Bn254CrsFactory};
use crate::error::SrsError;

// ---------------------------------------------------------------------------
// MemBn254Crs: in-memory CRS backed by a Vec of G1 affine points
// ---------------------------------------------------------------------------

/// Immutable in-memory CRS snapshot.
#[derive(Debug, Clone)]
pub struct MemBn254Crs {
    monomials: Vec<Bn254G1Affine>,
}

impl MemBn254Crs {
    /// Validates that the first point is the generator and every point is a
    /// finite point on the curve.
    pub fn new(points: Vec<Bn254G1Affine>) -> Result<Self, SrsError> {
        match points.first() {
            Some(g) if *g == Bn254G1Affine::one() => {}
            _ => return Err(SrsError::BadGenerator),
        }
        if let Some(index) = points
            .iter()
            .position(|p| p.is_point_at_infinity() || !p.on_curve())
        {
            return Err(SrsError::InvalidPoint { index });
        }
        Ok(Self { monomials: points })
    }
}

impl Bn254Crs for MemBn254Crs {
    fn get_monomial_points(&self) -> &[Bn254G1Affine] {
        &self.monomials
    }

    fn get_monomial_size(&self) -> usize {
        self.monomials.len()
    }

    fn get_g1_identity(&self) -> Bn254G1Affine {
        self.monomials[0]
    }
}

// ---------------------------------------------------------------------------
// MemBn254CrsFactory
// ---------------------------------------------------------------------------

/// Serves points from a fixed, pre-supplied set.
pub struct MemBn254CrsFactory {
    points: Vec<Bn254G1Affine>,
}

impl MemBn254CrsFactory {
    pub fn new(points: &[Bn254G1Affine]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}

impl Bn254CrsFactory for MemBn254CrsFactory {
    fn load_points(&self, start: usize, count: usize) -> Result<Vec<Bn254G1Affine>, SrsError> {
        let end = start.saturating_add(count);
        if end > self.points.len() {
            return Err(SrsError::Insufficient {
                available: self.points.len(),
                required: end,
            });
        }
        Ok(self.points[start..end].to_vec())
    }

    fn describe(&self) -> String {
        format!("memory ({} points)", self.points.len())
    }
}
