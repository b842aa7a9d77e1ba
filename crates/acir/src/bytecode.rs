use std::io::{Read, Write};

use base64::{engine::general_purpose, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::circuit::{Circuit, Program};
use crate::error::AcirError;

/// Format byte for a msgpack-encoded [`Program`].
pub const FORMAT_MSGPACK: u8 = 0x02;

/// Default bound on the decompressed payload.
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: usize = 64 << 20;

/// base64 → gzip, reading at most `max_decompressed` bytes of output.
pub fn decode_payload(bytecode_b64_gz: &str, max_decompressed: usize) -> Result<Vec<u8>, AcirError> {
    let compressed = general_purpose::STANDARD.decode(bytecode_b64_gz.trim())?;

    // One byte past the limit tells an exact fit from an overflow.
    let limit = (max_decompressed as u64).saturating_add(1);
    let mut decoder = GzDecoder::new(compressed.as_slice()).take(limit);
    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(AcirError::Decompress)?;
    if payload.len() > max_decompressed {
        return Err(AcirError::TooLarge {
            limit: max_decompressed,
        });
    }
    Ok(payload)
}

pub fn decode_program(bytecode_b64_gz: &str, max_decompressed: usize) -> Result<Program, AcirError> {
    let payload = decode_payload(bytecode_b64_gz, max_decompressed)?;
    let (&format, body) = payload.split_first().ok_or(AcirError::Empty)?;
    if format != FORMAT_MSGPACK {
        return Err(AcirError::UnsupportedFormat(format));
    }
    Ok(rmp_serde::from_slice(body)?)
}

/// Decode and validate a single-circuit program.
pub fn decode_circuit(bytecode_b64_gz: &str, max_decompressed: usize) -> Result<Circuit, AcirError> {
    let mut program = decode_program(bytecode_b64_gz, max_decompressed)?;
    if program.functions.len() != 1 {
        return Err(AcirError::FunctionCount(program.functions.len()));
    }
    let circuit = program.functions.remove(0);
    circuit.validate()?;
    Ok(circuit)
}

/// Inverse of [`decode_program`]: msgpack, format byte, gzip, base64.
pub fn encode_program(program: &Program) -> Result<String, AcirError> {
    let mut payload = vec![FORMAT_MSGPACK];
    payload.extend(rmp_serde::to_vec_named(program)?);
    compress_payload(&payload)
}

/// gzip + base64 of an arbitrary payload.
pub fn compress_payload(payload: &[u8]) -> Result<String, AcirError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).map_err(AcirError::Compress)?;
    let compressed = encoder.finish().map_err(AcirError::Compress)?;
    Ok(general_purpose::STANDARD.encode(compressed))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::circuit::{Expression, FieldElement, Opcode, Witness};

    fn sample_program() -> Program {
        Program {
            functions: vec![Circuit {
                current_witness_index: 2,
                opcodes: vec![Opcode::AssertZero(Expression {
                    mul_terms: vec![(FieldElement::from(1), Witness(0), Witness(1))],
                    linear_combinations: vec![(FieldElement::from(5), Witness(2))],
                    q_c: FieldElement::from(11),
                })],
                private_parameters: [Witness(0), Witness(1)].into(),
                public_parameters: [Witness(2)].into(),
                return_values: BTreeSet::new(),
            }],
        }
    }

    #[test]
    fn encoded_program_decodes_to_same_circuit() {
        let program = sample_program();
        let encoded = encode_program(&program).unwrap();
        let circuit = decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap();
        assert_eq!(circuit, program.functions[0]);
    }

    #[test]
    fn bad_base64_is_a_decode_error() {
        let err = decode_circuit("not base64!!", DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, AcirError::Base64(_)));
        assert!(err.is_decode_error());
    }

    #[test]
    fn non_gzip_payload_is_a_decode_error() {
        let encoded = general_purpose::STANDARD.encode(b"plain text, not gzip");
        let err = decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, AcirError::Decompress(_)));
        assert!(err.is_decode_error());
    }

    #[test]
    fn decompression_bound_is_enforced() {
        let bomb = compress_payload(&vec![0u8; 1 << 20]).unwrap();
        let err = decode_payload(&bomb, 1024).unwrap_err();
        assert!(matches!(err, AcirError::TooLarge { limit: 1024 }));

        // Exactly at the bound is accepted.
        let exact = compress_payload(&[7u8; 1024]).unwrap();
        assert_eq!(decode_payload(&exact, 1024).unwrap().len(), 1024);
    }

    #[test]
    fn unknown_format_byte_is_a_format_error() {
        let encoded = compress_payload(&[0x01, 0x90]).unwrap();
        let err = decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, AcirError::UnsupportedFormat(0x01)));
        assert!(!err.is_decode_error());
    }

    #[test]
    fn empty_payload_is_a_format_error() {
        let encoded = compress_payload(&[]).unwrap();
        assert!(matches!(
            decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE),
            Err(AcirError::Empty)
        ));
    }

    #[test]
    fn garbage_msgpack_is_a_format_error() {
        let encoded = compress_payload(&[FORMAT_MSGPACK, 0xc1, 0xc1]).unwrap();
        let err = decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE).unwrap_err();
        assert!(matches!(err, AcirError::Deserialize(_)));
        assert!(!err.is_decode_error());
    }

    #[test]
    fn multi_function_programs_are_rejected() {
        let mut program = sample_program();
        program.functions.push(program.functions[0].clone());
        let encoded = encode_program(&program).unwrap();
        assert!(matches!(
            decode_circuit(&encoded, DEFAULT_MAX_DECOMPRESSED_SIZE),
            Err(AcirError::FunctionCount(2))
        ));
    }
}
