//! Arithmetic circuit model and its wire encodings.
//!
//! Bytecode arrives as base64 text wrapping a gzip stream; the decompressed
//! payload is a format byte followed by a msgpack `Program`.

pub mod bytecode;
pub mod circuit;
pub mod error;
pub mod witness;

pub use bytecode::{
    compress_payload, decode_circuit, decode_program, encode_program, DEFAULT_MAX_DECOMPRESSED_SIZE,
};
pub use circuit::{Circuit, Expression, FieldElement, Opcode, Program, Witness};
pub use error::{AcirError, WitnessError};
pub use witness::{parse_field_literal, parse_witness_json};
