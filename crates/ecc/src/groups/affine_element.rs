use std::marker::PhantomData;

use crate::groups::curve_params::{BaseField, CurveParams};
use crate::groups::element::Element;

/// An elliptic curve point in affine coordinates (x, y).
///
/// The point at infinity carries an explicit flag; its coordinates are kept at zero
/// so that the 64-byte encoding of infinity is all zeros.
pub struct AffineElement<C: CurveParams> {
    pub x: BaseField<C>,
    pub y: BaseField<C>,
    infinity: bool,
    _phantom: PhantomData<C>,
}

impl<C: CurveParams> Clone for AffineElement<C> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: CurveParams> Copy for AffineElement<C> {}

impl<C: CurveParams> std::fmt::Debug for AffineElement<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_point_at_infinity() {
            write!(f, "AffineElement(infinity)")
        } else {
            write!(f, "AffineElement({:?}, {:?})", self.x, self.y)
        }
    }
}

impl<C: CurveParams> AffineElement<C> {
    /// Construct from coordinates. The caller is responsible for `on_curve`.
    #[inline]
    pub fn new(x: BaseField<C>, y: BaseField<C>) -> Self {
        Self {
            x,
            y,
            infinity: false,
            _phantom: PhantomData,
        }
    }

    /// The generator point.
    #[inline]
    pub fn one() -> Self {
        Self::new(C::generator_x(), C::generator_y())
    }

    #[inline]
    pub fn infinity() -> Self {
        Self {
            x: BaseField::<C>::zero(),
            y: BaseField::<C>::zero(),
            infinity: true,
            _phantom: PhantomData,
        }
    }

    #[inline]
    pub fn is_point_at_infinity(&self) -> bool {
        self.infinity
    }

    /// Try to construct a point from an x-coordinate and the parity of y.
    ///
    /// Returns `None` when `x^3 + b` is not a quadratic residue.
    pub fn from_x_coordinate(x: BaseField<C>, y_is_odd: bool) -> Option<Self> {
        let yy = x.sqr() * x + C::coeff_b();
        let y = yy.sqrt()?;
        let y = if y.is_odd() != y_is_odd { -y } else { y };
        Some(Self::new(x, y))
    }

    /// Check `y^2 == x^3 + b`. Infinity is on the curve.
    pub fn on_curve(&self) -> bool {
        if self.is_point_at_infinity() {
            return true;
        }
        self.y.sqr() == self.x.sqr() * self.x + C::coeff_b()
    }

    /// 64-byte encoding `x || y`, each coordinate 32 bytes big-endian.
    /// Infinity encodes as all zeros.
    pub fn to_be_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        if !self.is_point_at_infinity() {
            out[..32].copy_from_slice(&self.x.to_be_bytes());
            out[32..].copy_from_slice(&self.y.to_be_bytes());
        }
        out
    }

    /// Parse the 64-byte encoding produced by [`Self::to_be_bytes`].
    ///
    /// Rejects non-canonical coordinates and points off the curve.
    pub fn from_be_bytes(bytes: &[u8; 64]) -> Option<Self> {
        if bytes.iter().all(|b| *b == 0) {
            return Some(Self::infinity());
        }
        let mut x_bytes = [0u8; 32];
        let mut y_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[..32]);
        y_bytes.copy_from_slice(&bytes[32..]);
        let x = BaseField::<C>::from_be_bytes_canonical(&x_bytes)?;
        let y = BaseField::<C>::from_be_bytes_canonical(&y_bytes)?;
        let point = Self::new(x, y);
        point.on_curve().then_some(point)
    }
}

// ---------------------------------------------------------------------------
// Operator impls
// ---------------------------------------------------------------------------

impl<C: CurveParams> PartialEq for AffineElement<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_point_at_infinity(), other.is_point_at_infinity()) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl<C: CurveParams> Eq for AffineElement<C> {}

impl<C: CurveParams> From<Element<C>> for AffineElement<C> {
    fn from(e: Element<C>) -> Self {
        e.to_affine()
    }
}

impl<C: CurveParams> std::ops::Neg for AffineElement<C> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        if self.is_point_at_infinity() {
            return self;
        }
        Self::new(self.x, -self.y)
    }
}
