use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Hash used to derive Fiat-Shamir challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleHashType {
    #[default]
    Poseidon2,
    Keccak,
    Blake2s,
}

impl OracleHashType {
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Poseidon2 => 0,
            Self::Keccak => 1,
            Self::Blake2s => 2,
        }
    }

    pub fn from_byte(byte: u8) -> Result<Self, SettingsError> {
        match byte {
            0 => Ok(Self::Poseidon2),
            1 => Ok(Self::Keccak),
            2 => Ok(Self::Blake2s),
            other => Err(SettingsError::UnknownOracle(other)),
        }
    }
}

const FLAG_DISABLE_ZK: u8 = 1 << 0;
const FLAG_IPA_ACCUMULATION: u8 = 1 << 1;
const FLAG_OPTIMIZED_SOLIDITY_VERIFIER: u8 = 1 << 2;
const KNOWN_FLAGS: u8 = FLAG_DISABLE_ZK | FLAG_IPA_ACCUMULATION | FLAG_OPTIMIZED_SOLIDITY_VERIFIER;

/// Proof-system options supplied with every call.
///
/// Every field is optional in JSON; unknown fields are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProofSystemSettings {
    pub ipa_accumulation: bool,
    pub oracle_hash_type: OracleHashType,
    pub disable_zk: bool,
    pub optimized_solidity_verifier: bool,
}

impl ProofSystemSettings {
    /// Parse and validate a settings document. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.optimized_solidity_verifier && self.oracle_hash_type != OracleHashType::Keccak {
            return Err(SettingsError::SolidityRequiresKeccak);
        }
        Ok(())
    }

    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.disable_zk {
            flags |= FLAG_DISABLE_ZK;
        }
        if self.ipa_accumulation {
            flags |= FLAG_IPA_ACCUMULATION;
        }
        if self.optimized_solidity_verifier {
            flags |= FLAG_OPTIMIZED_SOLIDITY_VERIFIER;
        }
        flags
    }

    /// Rebuild settings from their packed form, as stored in a verification key.
    pub fn from_packed(flags: u8, oracle: u8) -> Result<Self, SettingsError> {
        if flags & !KNOWN_FLAGS != 0 {
            return Err(SettingsError::UnknownFlags(flags));
        }
        let settings = Self {
            ipa_accumulation: flags & FLAG_IPA_ACCUMULATION != 0,
            oracle_hash_type: OracleHashType::from_byte(oracle)?,
            disable_zk: flags & FLAG_DISABLE_ZK != 0,
            optimized_solidity_verifier: flags & FLAG_OPTIMIZED_SOLIDITY_VERIFIER != 0,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_empty_object_give_defaults() {
        assert_eq!(
            ProofSystemSettings::from_json("").unwrap(),
            ProofSystemSettings::default()
        );
        assert_eq!(
            ProofSystemSettings::from_json("{}").unwrap(),
            ProofSystemSettings::default()
        );
        assert_eq!(
            ProofSystemSettings::default().oracle_hash_type,
            OracleHashType::Poseidon2
        );
    }

    #[test]
    fn parses_all_fields() {
        let json = r#"{"ipa_accumulation": true, "oracle_hash_type": "keccak",
                       "disable_zk": true, "optimized_solidity_verifier": true}"#;
        let settings = ProofSystemSettings::from_json(json).unwrap();
        assert!(settings.ipa_accumulation);
        assert!(settings.disable_zk);
        assert!(settings.optimized_solidity_verifier);
        assert_eq!(settings.oracle_hash_type, OracleHashType::Keccak);
    }

    #[test]
    fn rejects_unknown_fields_and_values() {
        assert!(matches!(
            ProofSystemSettings::from_json(r#"{"zk": true}"#),
            Err(SettingsError::Json(_))
        ));
        assert!(matches!(
            ProofSystemSettings::from_json(r#"{"oracle_hash_type": "sha3"}"#),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn solidity_verifier_requires_keccak() {
        assert!(matches!(
            ProofSystemSettings::from_json(r#"{"optimized_solidity_verifier": true}"#),
            Err(SettingsError::SolidityRequiresKeccak)
        ));
    }

    #[test]
    fn packed_form_round_trips() {
        let settings = ProofSystemSettings {
            ipa_accumulation: true,
            oracle_hash_type: OracleHashType::Blake2s,
            disable_zk: true,
            optimized_solidity_verifier: false,
        };
        let rebuilt = ProofSystemSettings::from_packed(
            settings.flags(),
            settings.oracle_hash_type.to_byte(),
        )
        .unwrap();
        assert_eq!(rebuilt, settings);
        assert!(matches!(
            ProofSystemSettings::from_packed(0x80, 0),
            Err(SettingsError::UnknownFlags(0x80))
        ));
        assert!(matches!(
            ProofSystemSettings::from_packed(0, 9),
            Err(SettingsError::UnknownOracle(9))
        ));
    }
}
