pub mod generators;
pub mod poseidon2;
