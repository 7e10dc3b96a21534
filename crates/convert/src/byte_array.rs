use starknet_types_core::felt::Felt;

use crate::ToFelt;

/// Number of bytes packed into one full word of a byte array.
const BYTES_PER_WORD: usize = 31;

/// Canonical chunked representation of an arbitrary-length byte string.
///
/// The bytes are split into 31-byte big-endian full words, each small enough
/// to fit a single field element; the trailing `0..=30` bytes form the
/// pending word together with its recorded length. The representation of a
/// given string is unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteArray {
    pub data: Vec<Felt>,
    pub pending_word: Felt,
    pub pending_word_len: usize,
}

impl ByteArray {
    pub fn from_string(s: &str) -> Self {
        let bytes = s.as_bytes();
        let chunks = bytes.chunks_exact(BYTES_PER_WORD);
        let pending = chunks.remainder();

        Self {
            data: chunks.map(Felt::from_bytes_be_slice).collect(),
            pending_word: Felt::from_bytes_be_slice(pending),
            pending_word_len: pending.len(),
        }
    }

    /// Serializes the byte array the way it crosses the calldata boundary:
    /// `[number_of_full_words, full_words..., pending_word, pending_word_len]`.
    pub fn to_calldata(&self) -> Vec<Felt> {
        let mut calldata = Vec::with_capacity(self.data.len() + 3);
        calldata.push((self.data.len() as u64).to_felt());
        calldata.extend_from_slice(&self.data);
        calldata.push(self.pending_word);
        calldata.push((self.pending_word_len as u64).to_felt());
        calldata
    }

    /// Reassembles the original byte string.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.data.len() * BYTES_PER_WORD + self.pending_word_len);
        for word in &self.data {
            bytes.extend_from_slice(&word.to_bytes_be()[32 - BYTES_PER_WORD..]);
        }
        bytes.extend_from_slice(&self.pending_word.to_bytes_be()[32 - self.pending_word_len..]);
        bytes
    }
}

impl From<&str> for ByteArray {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}
