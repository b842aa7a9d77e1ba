use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use crate::groups::affine_element::AffineElement;
use crate::groups::curve_params::{BaseField, CurveParams, ScalarField};

/// An elliptic curve point in Jacobian projective coordinates (X : Y : Z).
///
/// Represents the affine point (X/Z^2, Y/Z^3). The point at infinity has Z = 0.
pub struct Element<C: CurveParams> {
    pub x: BaseField<C>,
    pub y: BaseField<C>,
    pub z: BaseField<C>,
    _phantom: PhantomData<C>,
}

impl<C: CurveParams> Clone for Element<C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: CurveParams> Copy for Element<C> {}

impl<C: CurveParams> std::fmt::Debug for Element<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_point_at_infinity() {
            write!(f, "Element(infinity)")
        } else {
            write!(f, "Element({:?}, {:?}, {:?})", self.x, self.y, self.z)
        }
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl<C: CurveParams> Element<C> {
    #[inline]
    pub fn new(x: BaseField<C>, y: BaseField<C>, z: BaseField<C>) -> Self {
        Self {
            x,
            y,
            z,
            _phantom: PhantomData,
        }
    }

    /// Construct from an affine point (sets z = 1).
    #[inline]
    pub fn from_affine(affine: &AffineElement<C>) -> Self {
        if affine.is_point_at_infinity() {
            return Self::infinity();
        }
        Self::new(affine.x, affine.y, BaseField::<C>::one())
    }

    /// The generator point in projective form.
    #[inline]
    pub fn one() -> Self {
        Self::from_affine(&AffineElement::one())
    }

    #[inline]
    pub fn infinity() -> Self {
        Self::new(
            BaseField::<C>::zero(),
            BaseField::<C>::one(),
            BaseField::<C>::zero(),
        )
    }

    #[inline]
    pub fn is_point_at_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Normalize to affine coordinates (one field inversion).
    pub fn to_affine(&self) -> AffineElement<C> {
        if self.is_point_at_infinity() {
            return AffineElement::infinity();
        }
        let z_inv = self.z.invert();
        let zz_inv = z_inv.sqr();
        AffineElement::new(self.x * zz_inv, self.y * zz_inv * z_inv)
    }

    pub fn on_curve(&self) -> bool {
        if self.is_point_at_infinity() {
            return true;
        }
        // Y^2 == X^3 + b * Z^6
        let zz = self.z.sqr();
        let z6 = zz.sqr() * zz;
        self.y.sqr() == self.x.sqr() * self.x + C::coeff_b() * z6
    }
}

// ---------------------------------------------------------------------------
// Group law
// ---------------------------------------------------------------------------

impl<C: CurveParams> Element<C> {
    /// Point doubling ("dbl-2009-l", a = 0).
    pub fn dbl(&self) -> Self {
        if self.is_point_at_infinity() {
            return *self;
        }
        let a = self.x.sqr();
        let b = self.y.sqr();
        let c = b.sqr();
        let d = (self.x + b).sqr() - a - c;
        let d = d + d;
        let e = a + a + a;
        let f = e.sqr();

        let x3 = f - (d + d);
        let mut c8 = c + c;
        c8 = c8 + c8;
        c8 = c8 + c8;
        let y3 = e * (d - x3) - c8;
        let yz = self.y * self.z;
        let z3 = yz + yz;
        Self::new(x3, y3, z3)
    }

    /// Full projective addition ("add-2007-bl"), handling doubling and inverse inputs.
    pub fn add_element(&self, other: &Self) -> Self {
        if self.is_point_at_infinity() {
            return *other;
        }
        if other.is_point_at_infinity() {
            return *self;
        }
        let z1z1 = self.z.sqr();
        let z2z2 = other.z.sqr();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * other.z * z2z2;
        let s2 = other.y * self.z * z1z1;
        let h = u2 - u1;
        let r = s2 - s1;

        if h.is_zero() {
            if r.is_zero() {
                return self.dbl();
            }
            return Self::infinity();
        }

        let i = (h + h).sqr();
        let j = h * i;
        let r = r + r;
        let v = u1 * i;
        let x3 = r.sqr() - j - (v + v);
        let s1j = s1 * j;
        let y3 = r * (v - x3) - (s1j + s1j);
        let z3 = ((self.z + other.z).sqr() - z1z1 - z2z2) * h;
        Self::new(x3, y3, z3)
    }

    /// Scalar multiplication by a raw 256-bit integer, MSB-first double-and-add.
    ///
    /// Running time depends on the scalar's bit length and Hamming weight. Use
    /// [`ladder_mul_scalar`](Self::ladder_mul_scalar) for secret scalars.
    pub fn mul_by_limbs(&self, scalar: &[u64; 4]) -> Self {
        let mut acc = Self::infinity();
        let top = scalar
            .iter()
            .rposition(|limb| *limb != 0)
            .map(|i| i * 64 + 64 - scalar[i].leading_zeros() as usize);
        let Some(num_bits) = top else {
            return acc;
        };
        for i in (0..num_bits).rev() {
            acc = acc.dbl();
            if (scalar[i / 64] >> (i % 64)) & 1 == 1 {
                acc = acc.add_element(self);
            }
        }
        acc
    }

    pub fn mul_scalar(&self, scalar: &ScalarField<C>) -> Self {
        self.mul_by_limbs(&scalar.to_limbs())
    }

    /// Montgomery ladder over all 256 scalar bits.
    ///
    /// Every bit costs one addition and one doubling whatever its value, so the
    /// operation sequence does not depend on the scalar. The field arithmetic and
    /// the exceptional cases of the group law are not constant-time.
    pub fn ladder_mul_scalar(&self, scalar: &ScalarField<C>) -> Self {
        let limbs = scalar.to_limbs();
        let mut r0 = Self::infinity();
        let mut r1 = *self;
        for i in (0..256).rev() {
            let bit = (limbs[i / 64] >> (i % 64)) & 1 == 1;
            if bit {
                std::mem::swap(&mut r0, &mut r1);
            }
            r1 = r0.add_element(&r1);
            r0 = r0.dbl();
            if bit {
                std::mem::swap(&mut r0, &mut r1);
            }
        }
        r0
    }

    /// Naive multi-scalar multiplication `sum_i scalars[i] * points[i]`.
    pub fn multi_scalar_mul(points: &[AffineElement<C>], scalars: &[ScalarField<C>]) -> Self {
        debug_assert_eq!(points.len(), scalars.len());
        points
            .iter()
            .zip(scalars)
            .fold(Self::infinity(), |acc, (point, scalar)| {
                acc + Self::from_affine(point).mul_scalar(scalar)
            })
    }
}

// ---------------------------------------------------------------------------
// Operator impls
// ---------------------------------------------------------------------------

impl<C: CurveParams> PartialEq for Element<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_point_at_infinity(), other.is_point_at_infinity()) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
        // X1 * Z2^2 == X2 * Z1^2 and Y1 * Z2^3 == Y2 * Z1^3
        let z1z1 = self.z.sqr();
        let z2z2 = other.z.sqr();
        self.x * z2z2 == other.x * z1z1
            && self.y * z2z2 * other.z == other.y * z1z1 * self.z
    }
}

impl<C: CurveParams> Eq for Element<C> {}

impl<C: CurveParams> Add for Element<C> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.add_element(&rhs)
    }
}

impl<C: CurveParams> AddAssign for Element<C> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.add_element(&rhs);
    }
}

impl<C: CurveParams> Sub for Element<C> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.add_element(&-rhs)
    }
}

impl<C: CurveParams> Neg for Element<C> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(self.x, -self.y, self.z)
    }
}

impl<C: CurveParams> Mul<ScalarField<C>> for Element<C> {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: ScalarField<C>) -> Self {
        self.mul_scalar(&scalar)
    }
}

impl<C: CurveParams> From<AffineElement<C>> for Element<C> {
    fn from(affine: AffineElement<C>) -> Self {
        Self::from_affine(&affine)
    }
}
