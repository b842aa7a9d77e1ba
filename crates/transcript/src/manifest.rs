use std::collections::BTreeMap;
use std::fmt;

/// Per-round record of what a transcript absorbed and which challenges it drew.
///
/// Prover and verifier following the same schedule build equal manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptManifest {
    manifest: BTreeMap<usize, RoundData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RoundData {
    challenge_labels: Vec<String>,
    entries: Vec<(String, usize)>,
}

impl TranscriptManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_challenge(&mut self, round: usize, label: &str) {
        self.manifest
            .entry(round)
            .or_default()
            .challenge_labels
            .push(label.to_string());
    }

    /// Record an element label and its width in words.
    pub fn add_entry(&mut self, round: usize, label: &str, num_words: usize) {
        self.manifest
            .entry(round)
            .or_default()
            .entries
            .push((label.to_string(), num_words));
    }

    pub fn size(&self) -> usize {
        self.manifest.len()
    }
}

impl fmt::Display for TranscriptManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (round, data) in &self.manifest {
            writeln!(f, "Round: {round}")?;
            for label in &data.challenge_labels {
                writeln!(f, "\tchallenge: {label}")?;
            }
            for (label, size) in &data.entries {
                writeln!(f, "\telement ({size}): {label}")?;
            }
        }
        Ok(())
    }
}
