use crate::fields::field::Field;
use crate::fields::field_params::FieldParams;
use crate::groups::affine_element::AffineElement;
use crate::groups::curve_params::CurveParams;
use crate::groups::element::Element;

// ---------------------------------------------------------------------------
// BN254 Base Field (Fq)
// ---------------------------------------------------------------------------

pub struct Bn254FqParams;

impl FieldParams for Bn254FqParams {
    const MODULUS: [u64; 4] = [
        0x3C208C16D87CFD47,
        0x97816a916871ca8d,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const R_SQUARED: [u64; 4] = [
        0xF32CFC5B538AFA89,
        0xB5E71911D44501FB,
        0x47AB1EFF0A417FF6,
        0x06D89F71CAB8351F,
    ];
    const R_INV: u64 = 0x87d20782e4866389;
}

pub type Fq = Field<Bn254FqParams>;

// ---------------------------------------------------------------------------
// BN254 Scalar Field (Fr)
// ---------------------------------------------------------------------------

pub struct Bn254FrParams;

impl FieldParams for Bn254FrParams {
    const MODULUS: [u64; 4] = [
        0x43E1F593F0000001,
        0x2833E84879B97091,
        0xB85045B68181585D,
        0x30644E72E131A029,
    ];
    const R_SQUARED: [u64; 4] = [
        0x1BB8E645AE216DA7,
        0x53FE3AB1E35C59E3,
        0x8C49833D53BB8085,
        0x0216D0B17F4E44A5,
    ];
    const R_INV: u64 = 0xc2e1f593efffffff;
}

pub type Fr = Field<Bn254FrParams>;

// ---------------------------------------------------------------------------
// BN254 G1: y^2 = x^3 + 3, generator (1, 2), cofactor 1
// ---------------------------------------------------------------------------

pub struct Bn254G1Params;

impl CurveParams for Bn254G1Params {
    type BaseFieldParams = Bn254FqParams;
    type ScalarFieldParams = Bn254FrParams;

    fn coeff_b() -> Fq {
        Fq::from(3u64)
    }

    fn generator_x() -> Fq {
        Fq::one()
    }

    fn generator_y() -> Fq {
        Fq::from(2u64)
    }
}

pub type G1Affine = AffineElement<Bn254G1Params>;
pub type G1Element = Element<Bn254G1Params>;
