//! Hash-adjacent algorithms built on the stark hash primitives.

mod merkle;

pub use merkle::{merkle_root, EmptyMerkleTree};

use starknet_core::utils::starknet_keccak;
use starknet_types_core::felt::Felt;

/// Derives the selector for a name: the Keccak-256 of its utf-8 bytes,
/// truncated to 250 bits so the result fits a field element. Selectors
/// identify entry points on-chain and seed type hashes off-chain.
pub fn selector_from_name(name: &str) -> Felt {
    Felt::from_bytes_be(&starknet_keccak(name.as_bytes()).to_bytes_be())
}
