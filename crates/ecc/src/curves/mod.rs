pub mod bn254;
