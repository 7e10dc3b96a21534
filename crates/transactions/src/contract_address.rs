use starknet_types_core::felt::Felt;
use starknet_types_core::hash::{Pedersen, StarkHash};

const CONTRACT_ADDRESS_PREFIX: Felt = Felt::from_hex_unchecked("0x535441524b4e45545f434f4e54524143545f41444452455353"); // b"STARKNET_CONTRACT_ADDRESS"

// 2^251, the upper bound of the L2 address space
const ADDRESS_BOUND: Felt = Felt::from_hex_unchecked("0x800000000000000000000000000000000000000000000000000000000000000");

/// Derives the deterministic address a contract deploys to from its class
/// hash, salt and constructor calldata.
pub fn calculate_contract_address(
    salt: Felt,
    class_hash: Felt,
    constructor_calldata: &[Felt],
    deployer_address: Felt,
) -> Felt {
    let constructor_calldata_hash = Pedersen::hash_array(constructor_calldata);
    let mut address = Pedersen::hash_array(&[
        CONTRACT_ADDRESS_PREFIX,
        deployer_address,
        salt,
        class_hash,
        constructor_calldata_hash,
    ]);

    // Reduce into the L2 address space
    while address >= ADDRESS_BOUND {
        address -= ADDRESS_BOUND;
    }
    address
}
