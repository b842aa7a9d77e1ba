use crate::fields::field::Field;
use crate::fields::field_params::FieldParams;

/// Parameters of a short Weierstrass curve `y^2 = x^3 + b` over the base field,
/// with a prime-order group whose scalars live in the scalar field.
pub trait CurveParams: 'static + Send + Sync + Sized {
    type BaseFieldParams: FieldParams;
    type ScalarFieldParams: FieldParams;

    /// Curve coefficient b.
    fn coeff_b() -> Field<Self::BaseFieldParams>;

    /// Generator point x-coordinate.
    fn generator_x() -> Field<Self::BaseFieldParams>;

    /// Generator point y-coordinate.
    fn generator_y() -> Field<Self::BaseFieldParams>;
}

// Convenience type aliases
pub type BaseField<C> = Field<<C as CurveParams>::BaseFieldParams>;
pub type ScalarField<C> = Field<<C as CurveParams>::ScalarFieldParams>;
