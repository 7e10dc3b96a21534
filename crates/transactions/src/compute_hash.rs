use snc_convert::ToFelt;
use starknet_types_core::felt::Felt;
use starknet_types_core::hash::{Pedersen, Poseidon, StarkHash};

use crate::{
    calculate_contract_address, DataAvailabilityMode, DeclareTransaction, DeclareTransactionV1, DeclareTransactionV2,
    DeclareTransactionV3, DeployAccountTransaction, DeployAccountTransactionV1, DeployAccountTransactionV3,
    InvokeTransaction, InvokeTransactionV1, InvokeTransactionV3, ResourceBounds, ResourceBoundsMapping, Transaction,
    Uint64, QUERY_VERSION_OFFSET,
};

// constants for transaction prefixes
const DECLARE_PREFIX: Felt = Felt::from_hex_unchecked("0x6465636c617265"); // b"declare"
const DEPLOY_ACCOUNT_PREFIX: Felt = Felt::from_hex_unchecked("0x6465706c6f795f6163636f756e74"); // b"deploy_account"
const INVOKE_PREFIX: Felt = Felt::from_hex_unchecked("0x696e766f6b65"); // b"invoke"

impl Transaction {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        match self {
            Transaction::Invoke(tx) => tx.compute_hash(chain_id, is_query),
            Transaction::Declare(tx) => tx.compute_hash(chain_id, is_query),
            Transaction::DeployAccount(tx) => tx.compute_hash(chain_id, is_query),
        }
    }
}

impl InvokeTransaction {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        match self {
            InvokeTransaction::V1(tx) => tx.compute_hash(chain_id, is_query),
            InvokeTransaction::V3(tx) => tx.compute_hash(chain_id, is_query),
        }
    }
}

impl InvokeTransactionV1 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::ONE } else { Felt::ONE };
        let calldata_hash = Pedersen::hash_array(&self.calldata);

        Pedersen::hash_array(&[
            INVOKE_PREFIX,
            version,
            self.sender_address,
            Felt::ZERO,
            calldata_hash,
            self.max_fee,
            chain_id,
            self.nonce,
        ])
    }
}

impl InvokeTransactionV3 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::THREE } else { Felt::THREE };
        let gas_hash = compute_gas_hash(self.tip, &self.resource_bounds);
        let paymaster_hash = Poseidon::hash_array(&self.paymaster_data);
        let data_availability_modes =
            prepare_data_availability_modes(self.nonce_data_availability_mode, self.fee_data_availability_mode);
        let account_deployment_data_hash = Poseidon::hash_array(&self.account_deployment_data);
        let calldata_hash = Poseidon::hash_array(&self.calldata);

        Poseidon::hash_array(&[
            INVOKE_PREFIX,
            version,
            self.sender_address,
            gas_hash,
            paymaster_hash,
            chain_id,
            self.nonce,
            data_availability_modes,
            account_deployment_data_hash,
            calldata_hash,
        ])
    }
}

impl DeclareTransaction {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        match self {
            DeclareTransaction::V1(tx) => tx.compute_hash(chain_id, is_query),
            DeclareTransaction::V2(tx) => tx.compute_hash(chain_id, is_query),
            DeclareTransaction::V3(tx) => tx.compute_hash(chain_id, is_query),
        }
    }
}

impl DeclareTransactionV1 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::ONE } else { Felt::ONE };
        let class_hash_calldata = Pedersen::hash_array(&[self.class_hash]);

        Pedersen::hash_array(&[
            DECLARE_PREFIX,
            version,
            self.sender_address,
            Felt::ZERO,
            class_hash_calldata,
            self.max_fee,
            chain_id,
            self.nonce,
        ])
    }
}

impl DeclareTransactionV2 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::TWO } else { Felt::TWO };
        let class_hash_calldata = Pedersen::hash_array(&[self.class_hash]);

        Pedersen::hash_array(&[
            DECLARE_PREFIX,
            version,
            self.sender_address,
            Felt::ZERO,
            class_hash_calldata,
            self.max_fee,
            chain_id,
            self.nonce,
            self.compiled_class_hash,
        ])
    }
}

impl DeclareTransactionV3 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::THREE } else { Felt::THREE };
        let gas_hash = compute_gas_hash(self.tip, &self.resource_bounds);
        let paymaster_hash = Poseidon::hash_array(&self.paymaster_data);
        let data_availability_modes =
            prepare_data_availability_modes(self.nonce_data_availability_mode, self.fee_data_availability_mode);
        let account_deployment_data_hash = Poseidon::hash_array(&self.account_deployment_data);

        Poseidon::hash_array(&[
            DECLARE_PREFIX,
            version,
            self.sender_address,
            gas_hash,
            paymaster_hash,
            chain_id,
            self.nonce,
            data_availability_modes,
            account_deployment_data_hash,
            self.class_hash,
            self.compiled_class_hash,
        ])
    }
}

impl DeployAccountTransaction {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        match self {
            DeployAccountTransaction::V1(tx) => tx.compute_hash(chain_id, is_query),
            DeployAccountTransaction::V3(tx) => tx.compute_hash(chain_id, is_query),
        }
    }

    pub fn contract_address(&self) -> Felt {
        match self {
            DeployAccountTransaction::V1(tx) => tx.contract_address(),
            DeployAccountTransaction::V3(tx) => tx.contract_address(),
        }
    }
}

impl DeployAccountTransactionV1 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let contract_address = self.contract_address();

        let version = if is_query { QUERY_VERSION_OFFSET + Felt::ONE } else { Felt::ONE };

        let mut calldata: Vec<Felt> = Vec::with_capacity(self.constructor_calldata.len() + 2);
        calldata.push(self.class_hash);
        calldata.push(self.contract_address_salt);
        calldata.extend_from_slice(&self.constructor_calldata);
        let calldata_hash = Pedersen::hash_array(calldata.as_slice());

        Pedersen::hash_array(&[
            DEPLOY_ACCOUNT_PREFIX,
            version,
            contract_address,
            Felt::ZERO,
            calldata_hash,
            self.max_fee,
            chain_id,
            self.nonce,
        ])
    }

    pub fn contract_address(&self) -> Felt {
        calculate_contract_address(
            self.contract_address_salt,
            self.class_hash,
            &self.constructor_calldata,
            Default::default(),
        )
    }
}

impl DeployAccountTransactionV3 {
    pub fn compute_hash(&self, chain_id: Felt, is_query: bool) -> Felt {
        let version = if is_query { QUERY_VERSION_OFFSET + Felt::THREE } else { Felt::THREE };

        let contract_address = self.contract_address();

        let gas_hash = compute_gas_hash(self.tip, &self.resource_bounds);
        let paymaster_hash = Poseidon::hash_array(&self.paymaster_data);

        let data_availability_modes =
            prepare_data_availability_modes(self.nonce_data_availability_mode, self.fee_data_availability_mode);

        let constructor_calldata_hash = Poseidon::hash_array(&self.constructor_calldata);
        Poseidon::hash_array(&[
            DEPLOY_ACCOUNT_PREFIX,
            version,
            contract_address,
            gas_hash,
            paymaster_hash,
            chain_id,
            self.nonce,
            data_availability_modes,
            constructor_calldata_hash,
            self.class_hash,
            self.contract_address_salt,
        ])
    }

    pub fn contract_address(&self) -> Felt {
        calculate_contract_address(
            self.contract_address_salt,
            self.class_hash,
            &self.constructor_calldata,
            Default::default(),
        )
    }
}

#[inline]
fn compute_gas_hash(tip: Uint64, resource_bounds: &ResourceBoundsMapping) -> Felt {
    let mut gas_elements = vec![
        tip.to_felt(),
        prepare_resource_bound_value(&resource_bounds.l1_gas, b"L1_GAS"),
        prepare_resource_bound_value(&resource_bounds.l2_gas, b"L2_GAS"),
    ];

    // The data gas slot is only hashed in the three-bound wire form.
    if let Some(l1_data_gas) = &resource_bounds.l1_data_gas {
        gas_elements.push(prepare_resource_bound_value(l1_data_gas, b"L1_DATA"));
    }

    Poseidon::hash_array(&gas_elements)
}

fn prepare_resource_bound_value(resource_bound: &ResourceBounds, name: &[u8]) -> Felt {
    let mut buffer = [0u8; 32];

    // Split buffer: [resource name (8) | max_amount (8) | max_price (16)]
    let (remainder, max_price) = buffer.split_at_mut(16);
    let (resource_name, max_amount) = remainder.split_at_mut(8);

    // Right-align the resource name in its slot
    let padding = resource_name.len() - name.len();
    resource_name[padding..].copy_from_slice(name);

    max_amount.copy_from_slice(&resource_bound.max_amount.value().to_be_bytes());
    max_price.copy_from_slice(&resource_bound.max_price_per_unit.value().to_be_bytes());

    Felt::from_bytes_be(&buffer)
}

fn prepare_data_availability_modes(
    nonce_data_availability_mode: DataAvailabilityMode,
    fee_data_availability_mode: DataAvailabilityMode,
) -> Felt {
    let packed = (nonce_data_availability_mode as u64) << 32 | fee_data_availability_mode as u64;
    packed.to_felt()
}

#[cfg(test)]
mod tests {
    use crate::tests::{
        dummy_tx_declare_v1, dummy_tx_declare_v2, dummy_tx_declare_v3, dummy_tx_deploy_account_v1,
        dummy_tx_deploy_account_v3, dummy_tx_invoke_v1, dummy_tx_invoke_v3,
    };
    use crate::SEPOLIA_CHAIN_ID;

    use super::*;

    const CHAIN_ID: Felt = Felt::from_hex_unchecked("0x434841494e5f4944"); // b"CHAIN_ID"

    // 2^128 and 2^192, the shift amounts of the resource bound layout
    const SHIFT_128: Felt = Felt::from_hex_unchecked("0x100000000000000000000000000000000");
    const SHIFT_192: Felt = Felt::from_hex_unchecked("0x1000000000000000000000000000000000000000000000000");

    #[test]
    fn test_prepare_resource_bound_value() {
        let bound = ResourceBounds::new(2, 3);
        let expected = Felt::from_hex_unchecked("0x4c315f474153") * SHIFT_192 // b"L1_GAS"
            + Felt::from(2u64) * SHIFT_128
            + Felt::from(3u64);
        assert_eq!(prepare_resource_bound_value(&bound, b"L1_GAS"), expected);

        let bound = ResourceBounds::new(4, 5);
        let expected = Felt::from_hex_unchecked("0x4c315f44415441") * SHIFT_192 // b"L1_DATA"
            + Felt::from(4u64) * SHIFT_128
            + Felt::from(5u64);
        assert_eq!(prepare_resource_bound_value(&bound, b"L1_DATA"), expected);
    }

    #[test]
    fn test_compute_gas_hash_element_order() {
        // expected slots built from the packing arithmetic alone, so a
        // reordering inside compute_gas_hash cannot cancel out
        let l1 = Felt::from_hex_unchecked("0x4c315f474153") * SHIFT_192 // b"L1_GAS"
            + Felt::from(2u64) * SHIFT_128
            + Felt::from(3u64);
        let l2 = Felt::from_hex_unchecked("0x4c325f474153") * SHIFT_192 // b"L2_GAS"
            + Felt::from(4u64) * SHIFT_128
            + Felt::from(5u64);
        let l1_data = Felt::from_hex_unchecked("0x4c315f44415441") * SHIFT_192 // b"L1_DATA"
            + Felt::from(6u64) * SHIFT_128
            + Felt::from(7u64);

        // tip first, then the L1_GAS and L2_GAS slots
        let two_bound = ResourceBoundsMapping::new(ResourceBounds::new(2, 3), ResourceBounds::new(4, 5));
        assert_eq!(compute_gas_hash(1u64.into(), &two_bound), Poseidon::hash_array(&[Felt::ONE, l1, l2]));
        assert_ne!(compute_gas_hash(1u64.into(), &two_bound), Poseidon::hash_array(&[Felt::ONE, l2, l1]));

        // the data-gas slot goes last
        let three_bound = ResourceBoundsMapping::with_data_gas(
            ResourceBounds::new(2, 3),
            ResourceBounds::new(4, 5),
            ResourceBounds::new(6, 7),
        );
        assert_eq!(
            compute_gas_hash(1u64.into(), &three_bound),
            Poseidon::hash_array(&[Felt::ONE, l1, l2, l1_data])
        );
    }

    #[test]
    fn test_compute_gas_hash_data_gas_presence() {
        let two_bound = ResourceBoundsMapping::new(ResourceBounds::new(2, 3), ResourceBounds::new(4, 5));
        let three_bound =
            ResourceBoundsMapping::with_data_gas(ResourceBounds::new(2, 3), ResourceBounds::new(4, 5), ResourceBounds::ZERO);

        // A zero data-gas bound still widens the hash input
        assert_ne!(compute_gas_hash(1u64.into(), &two_bound), compute_gas_hash(1u64.into(), &three_bound));

        let expected = Poseidon::hash_array(&[
            Felt::ONE,
            prepare_resource_bound_value(&three_bound.l1_gas, b"L1_GAS"),
            prepare_resource_bound_value(&three_bound.l2_gas, b"L2_GAS"),
            prepare_resource_bound_value(&ResourceBounds::ZERO, b"L1_DATA"),
        ]);
        assert_eq!(compute_gas_hash(1u64.into(), &three_bound), expected);
    }

    #[test]
    fn test_prepare_data_availability_modes() {
        assert_eq!(
            prepare_data_availability_modes(DataAvailabilityMode::L1, DataAvailabilityMode::L1),
            Felt::ZERO
        );
        assert_eq!(
            prepare_data_availability_modes(DataAvailabilityMode::L1, DataAvailabilityMode::L2),
            Felt::ONE
        );
        assert_eq!(
            prepare_data_availability_modes(DataAvailabilityMode::L2, DataAvailabilityMode::L1),
            Felt::from_hex_unchecked("0x100000000")
        );
        assert_eq!(
            prepare_data_availability_modes(DataAvailabilityMode::L2, DataAvailabilityMode::L2),
            Felt::from_hex_unchecked("0x100000001")
        );
    }

    #[test]
    fn test_invoke_v1_hash_layout() {
        let tx = InvokeTransactionV1 {
            sender_address: Felt::ONE,
            calldata: vec![Felt::TWO, Felt::THREE].into(),
            max_fee: Felt::from(4u64),
            signature: vec![].into(),
            nonce: Felt::from(5u64),
        };

        let expected = Pedersen::hash_array(&[
            INVOKE_PREFIX,
            Felt::ONE,
            Felt::ONE,
            Felt::ZERO,
            Pedersen::hash_array(&[Felt::TWO, Felt::THREE]),
            Felt::from(4u64),
            SEPOLIA_CHAIN_ID,
            Felt::from(5u64),
        ]);
        assert_eq!(tx.compute_hash(SEPOLIA_CHAIN_ID, false), expected);
    }

    #[test]
    fn test_invoke_v3_hash_layout() {
        let mut tx = dummy_tx_invoke_v3();
        tx.resource_bounds = ResourceBoundsMapping::new(ResourceBounds::new(100, 200), ResourceBounds::new(100, 200));
        tx.tip = Uint64::ZERO;
        tx.paymaster_data = vec![];
        tx.nonce_data_availability_mode = DataAvailabilityMode::L1;
        tx.fee_data_availability_mode = DataAvailabilityMode::L1;

        let expected = Poseidon::hash_array(&[
            INVOKE_PREFIX,
            Felt::THREE,
            tx.sender_address,
            compute_gas_hash(Uint64::ZERO, &tx.resource_bounds),
            Poseidon::hash_array(&[]),
            CHAIN_ID,
            tx.nonce,
            Felt::ZERO, // L1/L1 modes pack to zero
            Poseidon::hash_array(&tx.account_deployment_data),
            Poseidon::hash_array(&tx.calldata),
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_declare_v1_hash_layout() {
        let tx = dummy_tx_declare_v1();
        let expected = Pedersen::hash_array(&[
            DECLARE_PREFIX,
            Felt::ONE,
            tx.sender_address,
            Felt::ZERO,
            Pedersen::hash_array(&[tx.class_hash]),
            tx.max_fee,
            CHAIN_ID,
            tx.nonce,
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_declare_v2_appends_compiled_class_hash() {
        let tx = dummy_tx_declare_v2();
        let expected = Pedersen::hash_array(&[
            DECLARE_PREFIX,
            Felt::TWO,
            tx.sender_address,
            Felt::ZERO,
            Pedersen::hash_array(&[tx.class_hash]),
            tx.max_fee,
            CHAIN_ID,
            tx.nonce,
            tx.compiled_class_hash,
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_declare_v3_hash_layout() {
        let tx = dummy_tx_declare_v3();
        let expected = Poseidon::hash_array(&[
            DECLARE_PREFIX,
            Felt::THREE,
            tx.sender_address,
            compute_gas_hash(tx.tip, &tx.resource_bounds),
            Poseidon::hash_array(&tx.paymaster_data),
            CHAIN_ID,
            tx.nonce,
            prepare_data_availability_modes(tx.nonce_data_availability_mode, tx.fee_data_availability_mode),
            Poseidon::hash_array(&tx.account_deployment_data),
            tx.class_hash,
            tx.compiled_class_hash,
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_deploy_account_v1_hashes_derived_address() {
        let tx = dummy_tx_deploy_account_v1();
        let contract_address =
            calculate_contract_address(tx.contract_address_salt, tx.class_hash, &tx.constructor_calldata, Felt::ZERO);

        let mut calldata = vec![tx.class_hash, tx.contract_address_salt];
        calldata.extend_from_slice(&tx.constructor_calldata);

        let expected = Pedersen::hash_array(&[
            DEPLOY_ACCOUNT_PREFIX,
            Felt::ONE,
            contract_address,
            Felt::ZERO,
            Pedersen::hash_array(&calldata),
            tx.max_fee,
            CHAIN_ID,
            tx.nonce,
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_deploy_account_v3_hashes_derived_address() {
        let mut tx = dummy_tx_deploy_account_v3();
        tx.paymaster_data = vec![];

        let contract_address = tx.contract_address();
        assert_eq!(
            contract_address,
            calculate_contract_address(tx.contract_address_salt, tx.class_hash, &tx.constructor_calldata, Felt::ZERO)
        );

        let expected = Poseidon::hash_array(&[
            DEPLOY_ACCOUNT_PREFIX,
            Felt::THREE,
            contract_address,
            compute_gas_hash(tx.tip, &tx.resource_bounds),
            Poseidon::hash_array(&[]),
            CHAIN_ID,
            tx.nonce,
            prepare_data_availability_modes(tx.nonce_data_availability_mode, tx.fee_data_availability_mode),
            Poseidon::hash_array(&tx.constructor_calldata),
            tx.class_hash,
            tx.contract_address_salt,
        ]);
        assert_eq!(tx.compute_hash(CHAIN_ID, false), expected);
    }

    #[test]
    fn test_query_version_offset() {
        let tx = dummy_tx_invoke_v1();
        assert_ne!(tx.compute_hash(CHAIN_ID, false), tx.compute_hash(CHAIN_ID, true));

        let tx = dummy_tx_declare_v3();
        assert_ne!(tx.compute_hash(CHAIN_ID, false), tx.compute_hash(CHAIN_ID, true));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let tx: Transaction = dummy_tx_invoke_v3().into();
        assert_eq!(tx.compute_hash(CHAIN_ID, false), tx.compute_hash(CHAIN_ID, false));
        let tx: Transaction = dummy_tx_deploy_account_v1().into();
        assert_eq!(tx.compute_hash(CHAIN_ID, false), tx.compute_hash(CHAIN_ID, false));
    }
}
