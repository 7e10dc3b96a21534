use starknet_types_core::felt::Felt;
use starknet_types_core::hash::StarkHash;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot compute the merkle root of an empty leaf list")]
pub struct EmptyMerkleTree;

/// Computes the root of a binary Merkle tree over the given leaves.
///
/// Leaf order is significant and preserved; only the two operands of each
/// node are sorted before hashing, so sibling order cannot influence the
/// root. A trailing unpaired element is paired with zero.
pub fn merkle_root<H: StarkHash>(leaves: &[Felt]) -> Result<Felt, EmptyMerkleTree> {
    if leaves.is_empty() {
        return Err(EmptyMerkleTree);
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match *pair {
                [a, b] => hash_sorted_pair::<H>(a, b),
                [a] => hash_sorted_pair::<H>(a, Felt::ZERO),
                _ => unreachable!("chunks(2) yields one or two elements"),
            })
            .collect();
    }

    Ok(level[0])
}

fn hash_sorted_pair<H: StarkHash>(a: Felt, b: Felt) -> Felt {
    if a <= b {
        H::hash(&a, &b)
    } else {
        H::hash(&b, &a)
    }
}
