use std::collections::BTreeMap;

use bbrs_ecc::curves::bn254::Fr;
use serde::Deserialize;

use crate::error::WitnessError;

/// `{"witness": [...]}` or `{"witness": {"0": ..., "1": ...}}`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WitnessDocument {
    witness: WitnessValues,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WitnessValues {
    List(Vec<FieldLiteral>),
    // Keys stay strings: untagged enums cannot parse integer map keys from JSON.
    Map(BTreeMap<String, FieldLiteral>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldLiteral {
    Text(String),
    Number(u64),
}

/// Parse a witness document into a dense assignment indexed from zero.
///
/// Map documents must cover every index from zero to their largest key.
pub fn parse_witness_json(json: &str) -> Result<Vec<Fr>, WitnessError> {
    let document: WitnessDocument = serde_json::from_str(json)?;
    let entries: Vec<(u32, FieldLiteral)> = match document.witness {
        WitnessValues::List(values) => (0u32..).zip(values).collect(),
        WitnessValues::Map(map) => {
            let mut indexed = BTreeMap::new();
            for (key, literal) in map {
                let index = key.trim().parse::<u32>().map_err(|e| WitnessError::InvalidIndex {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                indexed.insert(index, literal);
            }
            if let Some((missing, _)) = (0u32..).zip(indexed.keys()).find(|(i, k)| i != *k) {
                return Err(WitnessError::Missing(missing));
            }
            indexed.into_iter().collect()
        }
    };

    entries
        .into_iter()
        .map(|(index, literal)| {
            let parsed = match literal {
                FieldLiteral::Text(text) => parse_field_literal(&text),
                FieldLiteral::Number(value) => Ok(Fr::from(value)),
            };
            parsed.map_err(|reason| WitnessError::InvalidValue { index, reason })
        })
        .collect()
}

/// Parse a `0x`-prefixed hex (at most 32 bytes) or decimal field literal.
///
/// The value must be below the BN254 scalar modulus.
pub fn parse_field_literal(literal: &str) -> Result<Fr, String> {
    let literal = literal.trim();
    let bytes = match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(digits) => parse_hex(digits)?,
        None => parse_decimal(literal)?,
    };
    Fr::from_be_bytes_canonical(&bytes)
        .ok_or_else(|| format!("{literal} is not below the field modulus"))
}

fn parse_hex(digits: &str) -> Result<[u8; 32], String> {
    if digits.is_empty() {
        return Err("empty hex literal".into());
    }
    let padded;
    let even = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    let decoded = hex::decode(even).map_err(|e| e.to_string())?;
    if decoded.len() > 32 {
        return Err("hex literal longer than 32 bytes".into());
    }
    let mut out = [0u8; 32];
    out[32 - decoded.len()..].copy_from_slice(&decoded);
    Ok(out)
}

fn parse_decimal(digits: &str) -> Result<[u8; 32], String> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{digits:?} is neither hex nor decimal"));
    }
    // Little-endian limbs; acc = acc * 10 + digit.
    let mut limbs = [0u64; 4];
    for b in digits.bytes() {
        let mut carry = u128::from(b - b'0');
        for limb in limbs.iter_mut() {
            let wide = u128::from(*limb) * 10 + carry;
            *limb = wide as u64;
            carry = wide >> 64;
        }
        if carry != 0 {
            return Err("decimal literal exceeds 256 bits".into());
        }
    }
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().rev().enumerate() {
        out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
    }
    Ok(out)
}
