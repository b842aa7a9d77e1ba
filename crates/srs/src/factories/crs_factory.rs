use bbrs_ecc::curves::bn254::G1Affine as Bn254G1Affine;

use crate::error::SrsError;

/// Read access to a BN254 CRS.
pub trait Bn254Crs: Send + Sync {
    /// Monomial points `[G_0, G_1, ...]`, consumed by commitments.
    fn get_monomial_points(&self) -> &[Bn254G1Affine];

    fn get_monomial_size(&self) -> usize;

    /// The first G1 element, always the curve generator.
    fn get_g1_identity(&self) -> Bn254G1Affine;
}

/// A source of SRS points that can be loaded range by range.
///
/// Point `i` must be the same on every call so that a grown SRS extends the
/// previous one instead of replacing it.
pub trait Bn254CrsFactory: Send + Sync {
    /// Load points `start .. start + count`.
    fn load_points(&self, start: usize, count: usize) -> Result<Vec<Bn254G1Affine>, SrsError>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}
