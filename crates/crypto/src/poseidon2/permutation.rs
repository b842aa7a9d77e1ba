use bbrs_ecc::curves::bn254::Fr;

use super::params::{INTERNAL_DIAGONAL, NUM_ROUNDS, ROUNDS_F, ROUNDS_P, ROUND_CONSTANTS, T};

/// S-box: x -> x^5
#[inline]
fn apply_single_sbox(x: &mut Fr) {
    let xx = x.sqr();
    let xxxx = xx.sqr();
    *x = *x * xxxx;
}

#[inline]
fn apply_sbox(state: &mut [Fr; T]) {
    for x in state.iter_mut() {
        apply_single_sbox(x);
    }
}

#[inline]
fn add_round_constants(state: &mut [Fr; T], rc: &[Fr; T]) {
    for (s, c) in state.iter_mut().zip(rc) {
        *s += *c;
    }
}

/// External MDS layer with the 4x4 matrix
///   | 5 7 1 3 |
///   | 4 6 1 1 |
///   | 1 3 5 7 |
///   | 1 1 4 6 |
#[inline]
fn matrix_multiplication_external(state: &mut [Fr; T]) {
    let t0 = state[0] + state[1]; // A + B
    let t1 = state[2] + state[3]; // C + D
    let t2 = state[1] + state[1] + t1; // 2B + C + D
    let t3 = state[3] + state[3] + t0; // 2D + A + B
    let mut t4 = t1 + t1;
    t4 = t4 + t4 + t3; // A + B + 4C + 6D
    let mut t5 = t0 + t0;
    t5 = t5 + t5 + t2; // 4A + 6B + C + D
    let t6 = t3 + t5; // 5A + 7B + C + 3D
    let t7 = t2 + t4; // A + 3B + 5C + 7D

    state[0] = t6;
    state[1] = t5;
    state[2] = t7;
    state[3] = t4;
}

/// Internal layer: state[i] = diagonal[i] * state[i] + sum(state).
#[inline]
fn matrix_multiplication_internal(state: &mut [Fr; T]) {
    let diag = &*INTERNAL_DIAGONAL;
    let sum = state.iter().fold(Fr::zero(), |acc, s| acc + *s);
    for (s, d) in state.iter_mut().zip(diag) {
        *s = *s * *d + sum;
    }
}

/// Poseidon2 permutation over BN254 Fr with t = 4.
///
/// Initial linear layer, 4 full rounds, 56 partial rounds, 4 full rounds.
pub fn permutation(input: &[Fr; T]) -> [Fr; T] {
    let rc = &*ROUND_CONSTANTS;
    let mut state = *input;

    matrix_multiplication_external(&mut state);

    let rounds_f_beginning = ROUNDS_F / 2;
    for round in &rc[..rounds_f_beginning] {
        add_round_constants(&mut state, round);
        apply_sbox(&mut state);
        matrix_multiplication_external(&mut state);
    }

    let p_end = rounds_f_beginning + ROUNDS_P;
    for round in &rc[rounds_f_beginning..p_end] {
        state[0] += round[0];
        apply_single_sbox(&mut state[0]);
        matrix_multiplication_internal(&mut state);
    }

    for round in &rc[p_end..NUM_ROUNDS] {
        add_round_constants(&mut state, round);
        apply_sbox(&mut state);
        matrix_multiplication_external(&mut state);
    }

    state
}
