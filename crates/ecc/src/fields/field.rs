use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::field_params::FieldParams;

// ---------------------------------------------------------------------------
// Limb helpers
// ---------------------------------------------------------------------------

/// Multiply-accumulate: a + b*c + carry_in -> (result, carry_out).
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry_in: u64) -> (u64, u64) {
    let res = a as u128 + (b as u128 * c as u128) + carry_in as u128;
    (res as u64, (res >> 64) as u64)
}

/// Add with carry: a + b + carry_in -> (result, carry_out).
#[inline(always)]
const fn adc(a: u64, b: u64, carry_in: u64) -> (u64, u64) {
    let res = a as u128 + b as u128 + carry_in as u128;
    (res as u64, (res >> 64) as u64)
}

/// Subtract with borrow: a - b - borrow_in -> (result, borrow_out), borrows are 0 or 1.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow_in: u64) -> (u64, u64) {
    let res = (a as u128).wrapping_sub(b as u128 + borrow_in as u128);
    (res as u64, (res >> 127) as u64)
}

#[inline(always)]
fn limbs_add(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let (r0, c) = adc(a[0], b[0], 0);
    let (r1, c) = adc(a[1], b[1], c);
    let (r2, c) = adc(a[2], b[2], c);
    let (r3, c) = adc(a[3], b[3], c);
    ([r0, r1, r2, r3], c)
}

#[inline(always)]
fn limbs_sub(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let (r0, b0) = sbb(a[0], b[0], 0);
    let (r1, b1) = sbb(a[1], b[1], b0);
    let (r2, b2) = sbb(a[2], b[2], b1);
    let (r3, b3) = sbb(a[3], b[3], b2);
    ([r0, r1, r2, r3], b3)
}

/// Exponent helper: p + k for small k, shifted right by `shift` bits.
fn modulus_offset_shifted<P: FieldParams>(offset: u64, negative: bool, shift: u32) -> [u64; 4] {
    let (m, _) = if negative {
        limbs_sub(&P::MODULUS, &[offset, 0, 0, 0])
    } else {
        limbs_add(&P::MODULUS, &[offset, 0, 0, 0])
    };
    if shift == 0 {
        return m;
    }
    [
        (m[0] >> shift) | (m[1] << (64 - shift)),
        (m[1] >> shift) | (m[2] << (64 - shift)),
        (m[2] >> shift) | (m[3] << (64 - shift)),
        m[3] >> shift,
    ]
}

// ---------------------------------------------------------------------------
// Field element
// ---------------------------------------------------------------------------

/// A prime field element in Montgomery form, generic over parameters `P`.
///
/// Stores 4 x u64 limbs (little-endian). Every constructor and operation
/// returns a fully reduced value in `[0, p)`, so limb equality is field equality.
pub struct Field<P: FieldParams> {
    pub data: [u64; 4],
    _phantom: PhantomData<P>,
}

impl<P: FieldParams> Clone for Field<P> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: FieldParams> Copy for Field<P> {}

impl<P: FieldParams> Default for Field<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: FieldParams> std::fmt::Debug for Field<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let limbs = self.to_limbs();
        write!(
            f,
            "0x{:016x}{:016x}{:016x}{:016x}",
            limbs[3], limbs[2], limbs[1], limbs[0]
        )
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl<P: FieldParams> Field<P> {
    /// Wrap limbs that are already a reduced Montgomery representation.
    #[inline]
    pub const fn from_raw(data: [u64; 4]) -> Self {
        Self {
            data,
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::from_raw([0, 0, 0, 0])
    }

    #[inline]
    pub fn one() -> Self {
        Self::from_limbs([1, 0, 0, 0])
    }

    /// Build from a standard-form 256-bit integer. Inputs at or above the
    /// modulus are reduced.
    #[inline]
    pub fn from_limbs(data: [u64; 4]) -> Self {
        Self::from_raw(data).montgomery_mul(&Self::from_raw(P::R_SQUARED))
    }

    /// Standard-form limbs of this element.
    #[inline]
    pub fn to_limbs(&self) -> [u64; 4] {
        self.montgomery_mul(&Self::from_raw([1, 0, 0, 0])).data
    }

    /// Deserialize 32 big-endian bytes, reducing values at or above the modulus.
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_limbs(be_bytes_to_limbs(bytes))
    }

    /// Deserialize 32 big-endian bytes, rejecting non-canonical encodings.
    pub fn from_be_bytes_canonical(bytes: &[u8; 32]) -> Option<Self> {
        let limbs = be_bytes_to_limbs(bytes);
        let (_, borrow) = limbs_sub(&limbs, &P::MODULUS);
        if borrow == 0 {
            return None;
        }
        Some(Self::from_limbs(limbs))
    }

    /// Serialize to 32 big-endian bytes of the canonical integer.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let limbs = self.to_limbs();
        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&limbs[3].to_be_bytes());
        bytes[8..16].copy_from_slice(&limbs[2].to_be_bytes());
        bytes[16..24].copy_from_slice(&limbs[1].to_be_bytes());
        bytes[24..32].copy_from_slice(&limbs[0].to_be_bytes());
        bytes
    }

    /// Generate a uniformly random field element.
    ///
    /// Draws 512 random bits and reduces mod p so the bias is negligible.
    pub fn random_element() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let lo = [
            rng.random::<u64>(),
            rng.random::<u64>(),
            rng.random::<u64>(),
            rng.random::<u64>(),
        ];
        let hi = [
            rng.random::<u64>(),
            rng.random::<u64>(),
            rng.random::<u64>(),
            rng.random::<u64>(),
        ];
        Self::from_u512(lo, hi)
    }

    /// Reduce a 512-bit value `(hi << 256) | lo` modulo the field modulus.
    pub fn from_u512(lo: [u64; 4], hi: [u64; 4]) -> Self {
        use crypto_bigint::{NonZero, U256, U512};

        // Tuple order: (lower_half, upper_half)
        let val = U512::from((U256::from_words(lo), U256::from_words(hi)));
        let modulus_wide = U512::from((U256::from_words(P::MODULUS), U256::ZERO));
        let nz_mod = NonZero::new(modulus_wide).expect("modulus is nonzero");

        let (_, remainder) = val.div_rem(&nz_mod);
        let words: [u64; 8] = remainder.to_words();
        Self::from_limbs([words[0], words[1], words[2], words[3]])
    }
}

fn be_bytes_to_limbs(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(word);
    }
    limbs
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

impl<P: FieldParams> Field<P> {
    #[inline]
    fn reduce_once(data: [u64; 4]) -> [u64; 4] {
        let (reduced, borrow) = limbs_sub(&data, &P::MODULUS);
        if borrow == 0 {
            reduced
        } else {
            data
        }
    }

    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        // p < 2^254, so the sum never carries out of the top limb.
        let (sum, _) = limbs_add(&self.data, &other.data);
        Self::from_raw(Self::reduce_once(sum))
    }

    #[inline]
    pub fn subtract(&self, other: &Self) -> Self {
        let (diff, borrow) = limbs_sub(&self.data, &other.data);
        if borrow == 0 {
            Self::from_raw(diff)
        } else {
            let (wrapped, _) = limbs_add(&diff, &P::MODULUS);
            Self::from_raw(wrapped)
        }
    }

    #[inline]
    pub fn negate(&self) -> Self {
        Self::zero().subtract(self)
    }

    /// Montgomery product `self * other * R^{-1} mod p`.
    ///
    /// Schoolbook 4x4 multiply followed by word-by-word Montgomery reduction.
    /// Correct whenever `self * other < p * 2^256`.
    pub fn montgomery_mul(&self, other: &Self) -> Self {
        let a = &self.data;
        let b = &other.data;

        let (r0, carry) = mac(0, a[0], b[0], 0);
        let (r1, carry) = mac(0, a[0], b[1], carry);
        let (r2, carry) = mac(0, a[0], b[2], carry);
        let (r3, r4) = mac(0, a[0], b[3], carry);

        let (r1, carry) = mac(r1, a[1], b[0], 0);
        let (r2, carry) = mac(r2, a[1], b[1], carry);
        let (r3, carry) = mac(r3, a[1], b[2], carry);
        let (r4, r5) = mac(r4, a[1], b[3], carry);

        let (r2, carry) = mac(r2, a[2], b[0], 0);
        let (r3, carry) = mac(r3, a[2], b[1], carry);
        let (r4, carry) = mac(r4, a[2], b[2], carry);
        let (r5, r6) = mac(r5, a[2], b[3], carry);

        let (r3, carry) = mac(r3, a[3], b[0], 0);
        let (r4, carry) = mac(r4, a[3], b[1], carry);
        let (r5, carry) = mac(r5, a[3], b[2], carry);
        let (r6, r7) = mac(r6, a[3], b[3], carry);

        let m = &P::MODULUS;

        let k = r0.wrapping_mul(P::R_INV);
        let (_, carry) = mac(r0, k, m[0], 0);
        let (r1, carry) = mac(r1, k, m[1], carry);
        let (r2, carry) = mac(r2, k, m[2], carry);
        let (r3, carry) = mac(r3, k, m[3], carry);
        let (r4, carry2) = adc(r4, 0, carry);

        let k = r1.wrapping_mul(P::R_INV);
        let (_, carry) = mac(r1, k, m[0], 0);
        let (r2, carry) = mac(r2, k, m[1], carry);
        let (r3, carry) = mac(r3, k, m[2], carry);
        let (r4, carry) = mac(r4, k, m[3], carry);
        let (r5, carry2) = adc(r5, carry2, carry);

        let k = r2.wrapping_mul(P::R_INV);
        let (_, carry) = mac(r2, k, m[0], 0);
        let (r3, carry) = mac(r3, k, m[1], carry);
        let (r4, carry) = mac(r4, k, m[2], carry);
        let (r5, carry) = mac(r5, k, m[3], carry);
        let (r6, carry2) = adc(r6, carry2, carry);

        let k = r3.wrapping_mul(P::R_INV);
        let (_, carry) = mac(r3, k, m[0], 0);
        let (r4, carry) = mac(r4, k, m[1], carry);
        let (r5, carry) = mac(r5, k, m[2], carry);
        let (r6, carry) = mac(r6, k, m[3], carry);
        let (r7, _) = adc(r7, carry2, carry);

        // Result lies in [0, 2p).
        Self::from_raw(Self::reduce_once([r4, r5, r6, r7]))
    }

    #[inline]
    pub fn sqr(&self) -> Self {
        self.montgomery_mul(self)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.data == [0, 0, 0, 0]
    }

    /// Whether the canonical integer is odd.
    pub fn is_odd(&self) -> bool {
        self.to_limbs()[0] & 1 == 1
    }

    /// Bit `idx` of the canonical integer.
    pub fn get_bit(&self, idx: usize) -> bool {
        if idx >= 256 {
            return false;
        }
        (self.to_limbs()[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Exponentiation via square-and-multiply, MSB first.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut accumulator = Self::one();
        for i in (0..256).rev() {
            accumulator = accumulator.sqr();
            if (exp[i / 64] >> (i % 64)) & 1 == 1 {
                accumulator = accumulator.montgomery_mul(self);
            }
        }
        accumulator
    }

    /// Modular inverse via Fermat's little theorem. Zero maps to zero.
    pub fn invert(&self) -> Self {
        self.pow(&modulus_offset_shifted::<P>(2, true, 0))
    }

    /// Square root for fields with p ≡ 3 (mod 4).
    ///
    /// Returns `None` for non-residues and for moduli where the shortcut does not apply.
    pub fn sqrt(&self) -> Option<Self> {
        if P::MODULUS[0] & 0x3 != 0x3 {
            return None;
        }
        let root = self.pow(&modulus_offset_shifted::<P>(1, false, 2));
        if root.sqr() == *self {
            Some(root)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Operator impls
// ---------------------------------------------------------------------------

impl<P: FieldParams> Add for Field<P> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Field::add(&self, &rhs)
    }
}

impl<P: FieldParams> AddAssign for Field<P> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Field::add(self, &rhs);
    }
}

impl<P: FieldParams> Sub for Field<P> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.subtract(&rhs)
    }
}

impl<P: FieldParams> SubAssign for Field<P> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.subtract(&rhs);
    }
}

impl<P: FieldParams> Mul for Field<P> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.montgomery_mul(&rhs)
    }
}

impl<P: FieldParams> MulAssign for Field<P> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.montgomery_mul(&rhs);
    }
}

impl<P: FieldParams> Neg for Field<P> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl<P: FieldParams> PartialEq for Field<P> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<P: FieldParams> Eq for Field<P> {}

impl<P: FieldParams> Hash for Field<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}

impl<P: FieldParams> From<u64> for Field<P> {
    #[inline]
    fn from(val: u64) -> Self {
        Self::from_limbs([val, 0, 0, 0])
    }
}
