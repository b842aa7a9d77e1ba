use bbrs_ecc::curves::bn254::Fr;

use super::params::T;
use super::permutation;

const RATE: usize = 3;

/// Poseidon2 sponge hash with rate 3 and capacity 1.
///
/// The capacity element starts as `input_length << 64`.
pub fn hash(input: &[Fr]) -> Fr {
    let iv = Fr::from_limbs([0, input.len() as u64, 0, 0]);

    let mut state = [Fr::zero(); T];
    state[RATE] = iv;

    let mut cache = [Fr::zero(); RATE];
    let mut cache_size = 0usize;

    for &elem in input {
        if cache_size == RATE {
            for (s, c) in state.iter_mut().zip(&cache) {
                *s += *c;
            }
            state = permutation::permutation(&state);
            cache = [Fr::zero(); RATE];
            cache[0] = elem;
            cache_size = 1;
        } else {
            cache[cache_size] = elem;
            cache_size += 1;
        }
    }

    for (s, c) in state.iter_mut().zip(&cache) {
        *s += *c;
    }
    state = permutation::permutation(&state);

    state[0]
}
