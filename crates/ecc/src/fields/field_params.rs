/// Parameters of a 254-bit prime field held in Montgomery form.
///
/// All constants use 4 x u64 limbs in little-endian order.
/// Montgomery form: elements are stored as `a * R mod p` where `R = 2^256`.
pub trait FieldParams: 'static + Send + Sync + Sized {
    /// The prime modulus p, split into 4 little-endian 64-bit limbs.
    const MODULUS: [u64; 4];

    /// R^2 mod p, used to convert into Montgomery form.
    const R_SQUARED: [u64; 4];

    /// -(p^{-1}) mod 2^64, used in Montgomery reduction.
    const R_INV: u64;
}
