use std::collections::VecDeque;
use std::sync::Arc;

use bbrs_ultra_honk::{ProofSystemSettings, ProvingKey};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

/// Identity of a proving key: SHA-256 over the bytecode text and packed settings.
pub type KeyFingerprint = [u8; 32];

pub fn fingerprint(bytecode_b64_gz: &str, settings: &ProofSystemSettings) -> KeyFingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytecode_b64_gz.trim().as_bytes());
    hasher.update([settings.flags(), settings.oracle_hash_type.to_byte()]);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Bounded least-recently-used cache of proving keys.
///
/// The lock is held only for lookup and insertion, never while a key is built or used.
pub struct KeyCache {
    capacity: usize,
    entries: Mutex<VecDeque<(KeyFingerprint, Arc<ProvingKey>)>>,
}

impl KeyCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &KeyFingerprint) -> Option<Arc<ProvingKey>> {
        let mut entries = self.entries.lock();
        let position = entries.iter().position(|(k, _)| k == key)?;
        let entry = entries.remove(position)?;
        let proving_key = entry.1.clone();
        entries.push_back(entry);
        Some(proving_key)
    }

    /// Insert, evicting the least recently used entry when full. A racing insert
    /// of the same key keeps a single entry.
    pub fn insert(&self, key: KeyFingerprint, proving_key: Arc<ProvingKey>) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|(k, _)| *k != key);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back((key, proving_key));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use bbrs_acir::{Circuit, Expression, FieldElement, Opcode, Witness};
    use bbrs_srs::factories::{Bn254CrsFactory, DerivedBn254CrsFactory, MemBn254Crs};
    use bbrs_ultra_honk::{ConstraintSystem, OracleHashType};

    use super::*;

    fn proving_key() -> Arc<ProvingKey> {
        let circuit = Circuit {
            current_witness_index: 0,
            opcodes: vec![Opcode::AssertZero(Expression {
                linear_combinations: vec![(FieldElement::from(1), Witness(0))],
                ..Default::default()
            })],
            private_parameters: [Witness(0)].into(),
            public_parameters: BTreeSet::new(),
            return_values: BTreeSet::new(),
        };
        let points = DerivedBn254CrsFactory::default().load_points(0, 2).unwrap();
        let crs = MemBn254Crs::new(points).unwrap();
        Arc::new(
            ProvingKey::create(
                ConstraintSystem::from_circuit(&circuit),
                ProofSystemSettings::default(),
                &crs,
            )
            .unwrap(),
        )
    }

    #[test]
    fn fingerprint_depends_on_bytecode_and_settings() {
        let defaults = ProofSystemSettings::default();
        let keccak = ProofSystemSettings {
            oracle_hash_type: OracleHashType::Keccak,
            ..defaults
        };
        assert_eq!(fingerprint("abc", &defaults), fingerprint(" abc\n", &defaults));
        assert_ne!(fingerprint("abc", &defaults), fingerprint("abd", &defaults));
        assert_ne!(fingerprint("abc", &defaults), fingerprint("abc", &keccak));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = KeyCache::new(2);
        let pk = proving_key();
        cache.insert([1; 32], pk.clone());
        cache.insert([2; 32], pk.clone());
        // Touch 1 so that 2 is the eviction candidate.
        assert!(cache.get(&[1; 32]).is_some());
        cache.insert([3; 32], pk);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&[1; 32]).is_some());
        assert!(cache.get(&[2; 32]).is_none());
        assert!(cache.get(&[3; 32]).is_some());
    }

    #[test]
    fn reinsert_keeps_one_entry() {
        let cache = KeyCache::new(4);
        let pk = proving_key();
        cache.insert([7; 32], pk.clone());
        cache.insert([7; 32], pk);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = KeyCache::new(0);
        cache.insert([1; 32], proving_key());
        assert!(cache.is_empty());
        assert!(cache.get(&[1; 32]).is_none());
    }
}
