use std::collections::BTreeSet;

use bbrs_ecc::curves::bn254::Fr;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AcirError;

/// Index of a witness wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Witness(pub u32);

impl Witness {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A BN254 Fr constant, carried on the wire as 32 big-endian bytes.
///
/// Deserialization rejects encodings at or above the modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldElement(pub Fr);

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0.to_be_bytes())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::invalid_length(bytes.len(), &"32 bytes"))?;
        Fr::from_be_bytes_canonical(&array)
            .map(FieldElement)
            .ok_or_else(|| D::Error::custom("field element is not canonical"))
    }
}

/// `Σ q·w_a·w_b + Σ q·w_i + q_c`, asserted to be zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Expression {
    pub mul_terms: Vec<(FieldElement, Witness, Witness)>,
    pub linear_combinations: Vec<(FieldElement, Witness)>,
    pub q_c: FieldElement,
}

impl Default for FieldElement {
    fn default() -> Self {
        Self(Fr::zero())
    }
}

impl Expression {
    /// Evaluate against a dense assignment. Indices must already be validated.
    pub fn evaluate(&self, witness: &[Fr]) -> Fr {
        let products = self
            .mul_terms
            .iter()
            .map(|(q, a, b)| q.0 * witness[a.index()] * witness[b.index()]);
        let linear = self
            .linear_combinations
            .iter()
            .map(|(q, w)| q.0 * witness[w.index()]);
        products.chain(linear).fold(self.q_c.0, |acc, t| acc + t)
    }

    fn witnesses(&self) -> impl Iterator<Item = Witness> + '_ {
        self.mul_terms
            .iter()
            .flat_map(|(_, a, b)| [*a, *b])
            .chain(self.linear_combinations.iter().map(|(_, w)| *w))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Opcode {
    AssertZero(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub current_witness_index: u32,
    pub opcodes: Vec<Opcode>,
    pub private_parameters: BTreeSet<Witness>,
    pub public_parameters: BTreeSet<Witness>,
    pub return_values: BTreeSet<Witness>,
}

impl Circuit {
    /// Number of witness wires, `current_witness_index + 1`.
    pub fn num_witnesses(&self) -> usize {
        self.current_witness_index as usize + 1
    }

    /// Public inputs in ascending index order: parameters and return values.
    pub fn public_inputs(&self) -> Vec<Witness> {
        self.public_parameters
            .union(&self.return_values)
            .copied()
            .collect()
    }

    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.opcodes.iter().map(|Opcode::AssertZero(expr)| expr)
    }

    /// Check every referenced witness index is in range.
    pub fn validate(&self) -> Result<(), AcirError> {
        if self.current_witness_index == u32::MAX {
            return Err(AcirError::TooManyWitnesses(self.current_witness_index));
        }
        let max = self.current_witness_index;
        let parameters = self
            .private_parameters
            .iter()
            .chain(&self.public_parameters)
            .chain(&self.return_values)
            .copied();
        let referenced = self.expressions().flat_map(Expression::witnesses);
        match parameters.chain(referenced).find(|w| w.0 > max) {
            Some(w) => Err(AcirError::WitnessOutOfRange { index: w.0, max }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Circuit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_circuit() -> Circuit {
        // w0 * w0 - w1 = 0, w1 public
        Circuit {
            current_witness_index: 1,
            opcodes: vec![Opcode::AssertZero(Expression {
                mul_terms: vec![(FieldElement::from(1), Witness(0), Witness(0))],
                linear_combinations: vec![(FieldElement(-Fr::one()), Witness(1))],
                q_c: FieldElement::default(),
            })],
            private_parameters: [Witness(0)].into(),
            public_parameters: [Witness(1)].into(),
            return_values: BTreeSet::new(),
        }
    }

    #[test]
    fn evaluates_expression() {
        let circuit = square_circuit();
        let expr = circuit.expressions().next().unwrap();
        assert!(expr.evaluate(&[Fr::from(3u64), Fr::from(9u64)]).is_zero());
        assert!(!expr.evaluate(&[Fr::from(3u64), Fr::from(8u64)]).is_zero());
    }

    #[test]
    fn public_inputs_merge_parameters_and_return_values() {
        let mut circuit = square_circuit();
        circuit.current_witness_index = 3;
        circuit.return_values = [Witness(3), Witness(1)].into();
        assert_eq!(circuit.public_inputs(), vec![Witness(1), Witness(3)]);
    }

    #[test]
    fn validate_rejects_out_of_range_witness() {
        let mut circuit = square_circuit();
        circuit.validate().unwrap();
        circuit.public_parameters.insert(Witness(5));
        assert!(matches!(
            circuit.validate(),
            Err(AcirError::WitnessOutOfRange { index: 5, max: 1 })
        ));
    }

    #[test]
    fn field_element_rejects_non_canonical_bytes() {
        let encoded = rmp_serde::to_vec(&serde_bytes::ByteBuf::from(vec![0xFF; 32])).unwrap();
        assert!(rmp_serde::from_slice::<FieldElement>(&encoded).is_err());

        let short = rmp_serde::to_vec(&serde_bytes::ByteBuf::from(vec![1; 31])).unwrap();
        assert!(rmp_serde::from_slice::<FieldElement>(&short).is_err());

        let good = rmp_serde::to_vec(&FieldElement::from(7)).unwrap();
        assert_eq!(
            rmp_serde::from_slice::<FieldElement>(&good).unwrap(),
            FieldElement::from(7)
        );
    }
}
