use std::collections::{BTreeMap, HashMap};

use bbrs_acir::Circuit;
use bbrs_ecc::curves::bn254::Fr;

use crate::error::ProverError;

/// `Σ coeff · slot + constant == 0` over the slot vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArithmeticGate {
    /// `(slot, coefficient)` pairs, sorted by slot with zero coefficients dropped.
    pub terms: Vec<(usize, Fr)>,
    pub constant: Fr,
}

impl ArithmeticGate {
    pub fn evaluate(&self, slots: &[Fr]) -> Fr {
        self.terms
            .iter()
            .fold(self.constant, |acc, (slot, coeff)| acc + *coeff * slots[*slot])
    }
}

/// Circuit lowered to linear gates over witness and product slots.
///
/// Slots `0..num_witnesses` hold the witness values. Slot `num_witnesses + p`
/// holds `w_a · w_b` for `products[p] = (a, b)`, with `a <= b`; products appear in
/// the order the circuit first mentions them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSystem {
    pub num_witnesses: usize,
    /// Public witness indices, strictly increasing.
    pub public_inputs: Vec<usize>,
    pub products: Vec<(usize, usize)>,
    /// One gate per circuit opcode, in opcode order.
    pub gates: Vec<ArithmeticGate>,
}

impl ConstraintSystem {
    /// Lower a validated circuit.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let num_witnesses = circuit.num_witnesses();
        let mut products = Vec::new();
        let mut product_slots: HashMap<(usize, usize), usize> = HashMap::new();

        let gates = circuit
            .expressions()
            .map(|expr| {
                let mut terms: BTreeMap<usize, Fr> = BTreeMap::new();
                for (coeff, a, b) in &expr.mul_terms {
                    let key = if a <= b {
                        (a.index(), b.index())
                    } else {
                        (b.index(), a.index())
                    };
                    let slot = *product_slots.entry(key).or_insert_with(|| {
                        products.push(key);
                        num_witnesses + products.len() - 1
                    });
                    *terms.entry(slot).or_insert_with(Fr::zero) += coeff.0;
                }
                for (coeff, w) in &expr.linear_combinations {
                    *terms.entry(w.index()).or_insert_with(Fr::zero) += coeff.0;
                }
                ArithmeticGate {
                    terms: terms.into_iter().filter(|(_, c)| !c.is_zero()).collect(),
                    constant: expr.q_c.0,
                }
            })
            .collect();

        Self {
            num_witnesses,
            public_inputs: circuit.public_inputs().iter().map(|w| w.index()).collect(),
            products,
            gates,
        }
    }

    pub fn num_slots(&self) -> usize {
        self.num_witnesses + self.products.len()
    }

    pub fn product_slot(&self, product: usize) -> usize {
        self.num_witnesses + product
    }

    /// SRS points the circuit needs: the value base plus one blinding base per
    /// slot, rounded up to a power of two.
    pub fn required_srs_size(&self) -> usize {
        (1 + self.num_slots()).next_power_of_two()
    }

    /// Per slot, whether its value is public.
    pub fn public_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.num_slots()];
        for &index in &self.public_inputs {
            mask[index] = true;
        }
        mask
    }

    /// `Σ_g γ^g · Σ coeff · slots[slot]`, gate constants excluded.
    pub fn batch_linear_terms(&self, gamma: &Fr, slots: &[Fr]) -> Fr {
        self.batch(gamma, |gate| {
            gate.terms
                .iter()
                .fold(Fr::zero(), |acc, (slot, coeff)| acc + *coeff * slots[*slot])
        })
    }

    /// `Σ_g γ^g · constant_g`.
    pub fn batch_constants(&self, gamma: &Fr) -> Fr {
        self.batch(gamma, |gate| gate.constant)
    }

    fn batch(&self, gamma: &Fr, per_gate: impl Fn(&ArithmeticGate) -> Fr) -> Fr {
        let mut weight = Fr::one();
        let mut acc = Fr::zero();
        for gate in &self.gates {
            acc += weight * per_gate(gate);
            weight *= *gamma;
        }
        acc
    }

    /// Check `witness` against every gate and return the full slot vector.
    pub fn assign_slots(&self, witness: &[Fr]) -> Result<Vec<Fr>, ProverError> {
        if witness.len() != self.num_witnesses {
            return Err(ProverError::WitnessLength {
                expected: self.num_witnesses,
                actual: witness.len(),
            });
        }
        let mut slots = Vec::with_capacity(self.num_slots());
        slots.extend_from_slice(witness);
        slots.extend(self.products.iter().map(|&(a, b)| witness[a] * witness[b]));

        if let Some(opcode) = self
            .gates
            .iter()
            .position(|gate| !gate.evaluate(&slots).is_zero())
        {
            return Err(ProverError::UnsatisfiedConstraint { opcode });
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use bbrs_acir::{Expression, FieldElement, Opcode, Witness};

    use super::*;

    fn circuit(opcodes: Vec<Expression>, num_witnesses: u32, public: &[u32]) -> Circuit {
        Circuit {
            current_witness_index: num_witnesses - 1,
            opcodes: opcodes.into_iter().map(Opcode::AssertZero).collect(),
            private_parameters: BTreeSet::new(),
            public_parameters: public.iter().map(|&i| Witness(i)).collect(),
            return_values: BTreeSet::new(),
        }
    }

    #[test]
    fn products_are_shared_and_normalized() {
        // w0*w1 + w1*w0 - w2 = 0 ; w1*w0 + w2*w2 = 0
        let first = Expression {
            mul_terms: vec![
                (FieldElement::from(1), Witness(0), Witness(1)),
                (FieldElement::from(1), Witness(1), Witness(0)),
            ],
            linear_combinations: vec![(FieldElement(-Fr::one()), Witness(2))],
            q_c: FieldElement::default(),
        };
        let second = Expression {
            mul_terms: vec![
                (FieldElement::from(1), Witness(1), Witness(0)),
                (FieldElement::from(1), Witness(2), Witness(2)),
            ],
            ..Default::default()
        };
        let cs = ConstraintSystem::from_circuit(&circuit(vec![first, second], 3, &[2]));

        assert_eq!(cs.products, vec![(0, 1), (2, 2)]);
        assert_eq!(cs.num_slots(), 5);
        assert_eq!(cs.public_inputs, vec![2]);
        assert_eq!(
            cs.gates[0].terms,
            vec![(2, -Fr::one()), (3, Fr::from(2u64))]
        );
        assert_eq!(
            cs.gates[1].terms,
            vec![(3, Fr::one()), (4, Fr::one())]
        );
    }

    #[test]
    fn cancelling_terms_are_dropped() {
        let expr = Expression {
            linear_combinations: vec![
                (FieldElement::from(3), Witness(0)),
                (FieldElement(-Fr::from(3u64)), Witness(0)),
            ],
            q_c: FieldElement::from(1),
            ..Default::default()
        };
        let cs = ConstraintSystem::from_circuit(&circuit(vec![expr], 1, &[]));
        assert!(cs.gates[0].terms.is_empty());
        assert!(matches!(
            cs.assign_slots(&[Fr::zero()]),
            Err(ProverError::UnsatisfiedConstraint { opcode: 0 })
        ));
    }

    #[test]
    fn required_srs_size_rounds_up() {
        let cs = ConstraintSystem {
            num_witnesses: 2,
            public_inputs: vec![],
            products: vec![(0, 0)],
            gates: vec![],
        };
        assert_eq!(cs.required_srs_size(), 4);
        let cs = ConstraintSystem {
            products: vec![(0, 0), (0, 1)],
            ..cs
        };
        assert_eq!(cs.required_srs_size(), 8);
    }

    #[test]
    fn assign_slots_checks_length_and_gates() {
        let square = Expression {
            mul_terms: vec![(FieldElement::from(1), Witness(0), Witness(0))],
            linear_combinations: vec![(FieldElement(-Fr::one()), Witness(1))],
            ..Default::default()
        };
        let cs = ConstraintSystem::from_circuit(&circuit(vec![square], 2, &[1]));

        let slots = cs.assign_slots(&[Fr::from(3u64), Fr::from(9u64)]).unwrap();
        assert_eq!(slots, vec![Fr::from(3u64), Fr::from(9u64), Fr::from(9u64)]);
        assert_eq!(cs.public_mask(), vec![false, true, false]);

        assert!(matches!(
            cs.assign_slots(&[Fr::from(4u64), Fr::from(9u64)]),
            Err(ProverError::UnsatisfiedConstraint { opcode: 0 })
        ));
        assert!(matches!(
            cs.assign_slots(&[Fr::from(3u64)]),
            Err(ProverError::WitnessLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn batched_gates_vanish_on_satisfying_assignment() {
        let cs = ConstraintSystem {
            num_witnesses: 2,
            public_inputs: vec![],
            products: vec![],
            gates: vec![
                ArithmeticGate {
                    terms: vec![(0, Fr::one())],
                    constant: -Fr::from(3u64),
                },
                ArithmeticGate {
                    terms: vec![(1, Fr::from(2u64))],
                    constant: -Fr::from(10u64),
                },
            ],
        };
        let slots = cs.assign_slots(&[Fr::from(3u64), Fr::from(5u64)]).unwrap();
        let gamma = Fr::from(7u64);
        assert!((cs.batch_linear_terms(&gamma, &slots) + cs.batch_constants(&gamma)).is_zero());
        assert_eq!(cs.batch_constants(&gamma), -Fr::from(3u64) - Fr::from(70u64));
    }
}
