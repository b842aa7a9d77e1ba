use std::marker::PhantomData;

use bbrs_ecc::curves::bn254::Fr;
use tracing::trace;

use crate::codec::{CodecError, Word, WordSerializable};
use crate::hashers::TranscriptHasher;
use crate::manifest::TranscriptManifest;

/// Fiat-Shamir transcript shared by prover and verifier.
///
/// The prover appends elements with [`send_to_verifier`](Self::send_to_verifier);
/// the verifier replays the same calls with
/// [`receive_from_prover`](Self::receive_from_prover) on a transcript built from the
/// proof. Each challenge hashes the previous challenge digest followed by every word
/// absorbed since, so both sides derive identical challenges.
pub struct BaseTranscript<H: TranscriptHasher> {
    proof_data: Vec<Word>,
    current_round_data: Vec<Word>,
    previous_challenge: Option<Word>,
    num_words_read: usize,
    proof_start: usize,
    round_number: usize,
    manifest: TranscriptManifest,
    _hasher: PhantomData<H>,
}

impl<H: TranscriptHasher> Default for BaseTranscript<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TranscriptHasher> BaseTranscript<H> {
    pub fn new() -> Self {
        Self {
            proof_data: Vec::new(),
            current_round_data: Vec::new(),
            previous_challenge: None,
            num_words_read: 0,
            proof_start: 0,
            round_number: 0,
            manifest: TranscriptManifest::new(),
            _hasher: PhantomData,
        }
    }

    /// Verifier-side transcript reading from an existing proof.
    pub fn from_proof(proof: &[Word]) -> Self {
        Self {
            proof_data: proof.to_vec(),
            ..Self::new()
        }
    }

    /// Absorb data known to both parties without adding it to the proof.
    pub fn add_to_hash_buffer<T: WordSerializable>(&mut self, label: &str, element: &T) {
        let words = element.serialize_to_words();
        self.manifest
            .add_entry(self.round_number, label, words.len());
        self.current_round_data.extend(words);
    }

    /// Append an element to the proof and absorb it.
    pub fn send_to_verifier<T: WordSerializable>(&mut self, label: &str, element: &T) {
        let words = element.serialize_to_words();
        self.manifest
            .add_entry(self.round_number, label, words.len());
        self.proof_data.extend_from_slice(&words);
        self.current_round_data.extend(words);
    }

    /// Read the next element from the proof and absorb it.
    pub fn receive_from_prover<T: WordSerializable>(
        &mut self,
        label: &str,
    ) -> Result<T, CodecError> {
        let remaining = self.remaining_words();
        if remaining < T::NUM_WORDS {
            return Err(CodecError::OutOfData {
                needed: T::NUM_WORDS,
                remaining,
            });
        }
        let start = self.num_words_read;
        let end = start + T::NUM_WORDS;
        let element = T::deserialize_from_words(&self.proof_data[start..end]).inspect_err(|e| {
            trace!(label, error = %e, "rejected transcript element");
        })?;
        self.num_words_read = end;
        self.manifest
            .add_entry(self.round_number, label, T::NUM_WORDS);
        self.current_round_data
            .extend_from_slice(&self.proof_data[start..end]);
        Ok(element)
    }

    /// Derive a challenge from everything absorbed so far and start a new round.
    pub fn get_challenge(&mut self, label: &str) -> Fr {
        self.manifest.add_challenge(self.round_number, label);

        let mut input = Vec::with_capacity(self.current_round_data.len() + 1);
        if let Some(previous) = self.previous_challenge {
            input.push(previous);
        }
        input.append(&mut self.current_round_data);

        let digest = H::hash(&input);
        self.previous_challenge = Some(digest);
        self.round_number += 1;
        trace!(label, round = self.round_number, "derived challenge");
        Fr::from_be_bytes(&digest)
    }

    pub fn get_challenges(&mut self, labels: &[&str]) -> Vec<Fr> {
        labels.iter().map(|label| self.get_challenge(label)).collect()
    }

    /// Words appended since the previous export.
    pub fn export_proof(&mut self) -> Vec<Word> {
        let proof = self.proof_data[self.proof_start..].to_vec();
        self.proof_start = self.proof_data.len();
        proof
    }

    pub fn remaining_words(&self) -> usize {
        self.proof_data.len() - self.num_words_read
    }

    /// Fails if the verifier has not consumed the whole proof.
    pub fn finish(&self) -> Result<(), CodecError> {
        match self.remaining_words() {
            0 => Ok(()),
            n => Err(CodecError::TrailingWords(n)),
        }
    }

    pub fn manifest(&self) -> &TranscriptManifest {
        &self.manifest
    }
}
