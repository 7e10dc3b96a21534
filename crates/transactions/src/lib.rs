//! Account transaction envelopes and their hash calculation.

use std::sync::Arc;

pub use snc_convert::{Uint128, Uint64};
use starknet_types_core::felt::Felt;

pub mod compute_hash;
mod contract_address;

pub use contract_address::calculate_contract_address;

type Signature = Arc<Vec<Felt>>;
type Calldata = Arc<Vec<Felt>>;

/// Offset added to the version felt when hashing for a fee estimate, so the
/// resulting hash cannot be replayed as a real transaction.
pub const QUERY_VERSION_OFFSET: Felt = Felt::from_hex_unchecked("0x100000000000000000000000000000000");

pub const MAIN_CHAIN_ID: Felt = Felt::from_hex_unchecked("0x534e5f4d41494e"); // b"SN_MAIN"
pub const SEPOLIA_CHAIN_ID: Felt = Felt::from_hex_unchecked("0x534e5f5345504f4c4941"); // b"SN_SEPOLIA"

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransactionWithHash {
    pub transaction: Transaction,
    pub hash: Felt,
}

impl TransactionWithHash {
    pub fn new(transaction: Transaction, hash: Felt) -> Self {
        Self { transaction, hash }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Transaction {
    Invoke(InvokeTransaction),
    Declare(DeclareTransaction),
    DeployAccount(DeployAccountTransaction),
}

impl From<InvokeTransactionV1> for Transaction {
    fn from(tx: InvokeTransactionV1) -> Self {
        Transaction::Invoke(InvokeTransaction::V1(tx))
    }
}

impl From<InvokeTransactionV3> for Transaction {
    fn from(tx: InvokeTransactionV3) -> Self {
        Transaction::Invoke(InvokeTransaction::V3(tx))
    }
}

impl From<DeclareTransactionV1> for Transaction {
    fn from(tx: DeclareTransactionV1) -> Self {
        Transaction::Declare(DeclareTransaction::V1(tx))
    }
}

impl From<DeclareTransactionV2> for Transaction {
    fn from(tx: DeclareTransactionV2) -> Self {
        Transaction::Declare(DeclareTransaction::V2(tx))
    }
}

impl From<DeclareTransactionV3> for Transaction {
    fn from(tx: DeclareTransactionV3) -> Self {
        Transaction::Declare(DeclareTransaction::V3(tx))
    }
}

impl From<DeployAccountTransactionV1> for Transaction {
    fn from(tx: DeployAccountTransactionV1) -> Self {
        Transaction::DeployAccount(DeployAccountTransaction::V1(tx))
    }
}

impl From<DeployAccountTransactionV3> for Transaction {
    fn from(tx: DeployAccountTransactionV3) -> Self {
        Transaction::DeployAccount(DeployAccountTransaction::V3(tx))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("transaction type is not the expected one")]
pub struct UnexpectedTransactionType;

impl TryFrom<Transaction> for InvokeTransaction {
    type Error = UnexpectedTransactionType;

    fn try_from(tx: Transaction) -> Result<Self, Self::Error> {
        match tx {
            Transaction::Invoke(tx) => Ok(tx),
            _ => Err(UnexpectedTransactionType),
        }
    }
}

impl TryFrom<Transaction> for DeclareTransaction {
    type Error = UnexpectedTransactionType;

    fn try_from(tx: Transaction) -> Result<Self, Self::Error> {
        match tx {
            Transaction::Declare(tx) => Ok(tx),
            _ => Err(UnexpectedTransactionType),
        }
    }
}

impl TryFrom<Transaction> for DeployAccountTransaction {
    type Error = UnexpectedTransactionType;

    fn try_from(tx: Transaction) -> Result<Self, Self::Error> {
        match tx {
            Transaction::DeployAccount(tx) => Ok(tx),
            _ => Err(UnexpectedTransactionType),
        }
    }
}

impl Transaction {
    pub fn version(&self) -> Felt {
        match self {
            Transaction::Invoke(tx) => tx.version(),
            Transaction::Declare(tx) => tx.version(),
            Transaction::DeployAccount(tx) => tx.version(),
        }
    }

    pub fn nonce(&self) -> &Felt {
        match self {
            Transaction::Invoke(tx) => tx.nonce(),
            Transaction::Declare(tx) => tx.nonce(),
            Transaction::DeployAccount(tx) => tx.nonce(),
        }
    }

    pub fn signature(&self) -> &[Felt] {
        match self {
            Transaction::Invoke(tx) => tx.signature(),
            Transaction::Declare(tx) => tx.signature(),
            Transaction::DeployAccount(tx) => tx.signature(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InvokeTransaction {
    V1(InvokeTransactionV1),
    V3(InvokeTransactionV3),
}

impl From<InvokeTransactionV1> for InvokeTransaction {
    fn from(tx: InvokeTransactionV1) -> Self {
        InvokeTransaction::V1(tx)
    }
}

impl From<InvokeTransactionV3> for InvokeTransaction {
    fn from(tx: InvokeTransactionV3) -> Self {
        InvokeTransaction::V3(tx)
    }
}

impl InvokeTransaction {
    pub fn version(&self) -> Felt {
        match self {
            InvokeTransaction::V1(_) => Felt::ONE,
            InvokeTransaction::V3(_) => Felt::THREE,
        }
    }

    pub fn sender_address(&self) -> &Felt {
        match self {
            InvokeTransaction::V1(tx) => &tx.sender_address,
            InvokeTransaction::V3(tx) => &tx.sender_address,
        }
    }

    pub fn signature(&self) -> &[Felt] {
        match self {
            InvokeTransaction::V1(tx) => &tx.signature,
            InvokeTransaction::V3(tx) => &tx.signature,
        }
    }

    pub fn calldata(&self) -> &[Felt] {
        match self {
            InvokeTransaction::V1(tx) => &tx.calldata,
            InvokeTransaction::V3(tx) => &tx.calldata,
        }
    }

    pub fn nonce(&self) -> &Felt {
        match self {
            InvokeTransaction::V1(tx) => &tx.nonce,
            InvokeTransaction::V3(tx) => &tx.nonce,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvokeTransactionV1 {
    pub sender_address: Felt,
    pub calldata: Calldata,
    pub max_fee: Felt,
    pub signature: Signature,
    pub nonce: Felt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InvokeTransactionV3 {
    pub sender_address: Felt,
    pub calldata: Calldata,
    pub signature: Signature,
    pub nonce: Felt,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: Uint64,
    pub paymaster_data: Vec<Felt>,
    pub account_deployment_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeclareTransaction {
    V1(DeclareTransactionV1),
    V2(DeclareTransactionV2),
    V3(DeclareTransactionV3),
}

impl From<DeclareTransactionV1> for DeclareTransaction {
    fn from(tx: DeclareTransactionV1) -> Self {
        DeclareTransaction::V1(tx)
    }
}

impl From<DeclareTransactionV2> for DeclareTransaction {
    fn from(tx: DeclareTransactionV2) -> Self {
        DeclareTransaction::V2(tx)
    }
}

impl From<DeclareTransactionV3> for DeclareTransaction {
    fn from(tx: DeclareTransactionV3) -> Self {
        DeclareTransaction::V3(tx)
    }
}

impl DeclareTransaction {
    pub fn version(&self) -> Felt {
        match self {
            DeclareTransaction::V1(_) => Felt::ONE,
            DeclareTransaction::V2(_) => Felt::TWO,
            DeclareTransaction::V3(_) => Felt::THREE,
        }
    }

    pub fn sender_address(&self) -> &Felt {
        match self {
            DeclareTransaction::V1(tx) => &tx.sender_address,
            DeclareTransaction::V2(tx) => &tx.sender_address,
            DeclareTransaction::V3(tx) => &tx.sender_address,
        }
    }

    pub fn class_hash(&self) -> &Felt {
        match self {
            DeclareTransaction::V1(tx) => &tx.class_hash,
            DeclareTransaction::V2(tx) => &tx.class_hash,
            DeclareTransaction::V3(tx) => &tx.class_hash,
        }
    }

    pub fn signature(&self) -> &[Felt] {
        match self {
            DeclareTransaction::V1(tx) => &tx.signature,
            DeclareTransaction::V2(tx) => &tx.signature,
            DeclareTransaction::V3(tx) => &tx.signature,
        }
    }

    pub fn nonce(&self) -> &Felt {
        match self {
            DeclareTransaction::V1(tx) => &tx.nonce,
            DeclareTransaction::V2(tx) => &tx.nonce,
            DeclareTransaction::V3(tx) => &tx.nonce,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclareTransactionV1 {
    pub sender_address: Felt,
    pub max_fee: Felt,
    pub signature: Signature,
    pub nonce: Felt,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclareTransactionV2 {
    pub sender_address: Felt,
    pub compiled_class_hash: Felt,
    pub max_fee: Felt,
    pub signature: Signature,
    pub nonce: Felt,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeclareTransactionV3 {
    pub sender_address: Felt,
    pub compiled_class_hash: Felt,
    pub signature: Signature,
    pub nonce: Felt,
    pub class_hash: Felt,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: Uint64,
    pub paymaster_data: Vec<Felt>,
    pub account_deployment_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DeployAccountTransaction {
    V1(DeployAccountTransactionV1),
    V3(DeployAccountTransactionV3),
}

impl From<DeployAccountTransactionV1> for DeployAccountTransaction {
    fn from(tx: DeployAccountTransactionV1) -> Self {
        DeployAccountTransaction::V1(tx)
    }
}

impl From<DeployAccountTransactionV3> for DeployAccountTransaction {
    fn from(tx: DeployAccountTransactionV3) -> Self {
        DeployAccountTransaction::V3(tx)
    }
}

impl DeployAccountTransaction {
    pub fn version(&self) -> Felt {
        match self {
            DeployAccountTransaction::V1(_) => Felt::ONE,
            DeployAccountTransaction::V3(_) => Felt::THREE,
        }
    }

    pub fn signature(&self) -> &[Felt] {
        match self {
            DeployAccountTransaction::V1(tx) => &tx.signature,
            DeployAccountTransaction::V3(tx) => &tx.signature,
        }
    }

    pub fn constructor_calldata(&self) -> &[Felt] {
        match self {
            DeployAccountTransaction::V1(tx) => &tx.constructor_calldata,
            DeployAccountTransaction::V3(tx) => &tx.constructor_calldata,
        }
    }

    pub fn nonce(&self) -> &Felt {
        match self {
            DeployAccountTransaction::V1(tx) => &tx.nonce,
            DeployAccountTransaction::V3(tx) => &tx.nonce,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeployAccountTransactionV1 {
    pub max_fee: Felt,
    pub signature: Signature,
    pub nonce: Felt,
    pub contract_address_salt: Felt,
    pub constructor_calldata: Vec<Felt>,
    pub class_hash: Felt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeployAccountTransactionV3 {
    pub signature: Signature,
    pub nonce: Felt,
    pub contract_address_salt: Felt,
    pub constructor_calldata: Vec<Felt>,
    pub class_hash: Felt,
    pub resource_bounds: ResourceBoundsMapping,
    pub tip: Uint64,
    pub paymaster_data: Vec<Felt>,
    pub nonce_data_availability_mode: DataAvailabilityMode,
    pub fee_data_availability_mode: DataAvailabilityMode,
}

#[derive(Debug, Clone, Default, Copy, PartialEq, Eq)]
pub enum DataAvailabilityMode {
    #[default]
    L1 = 0,
    L2 = 1,
}

impl serde::Serialize for DataAvailabilityMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> serde::Deserialize<'de> for DataAvailabilityMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        match value {
            0 => Ok(DataAvailabilityMode::L1),
            1 => Ok(DataAvailabilityMode::L2),
            _ => Err(serde::de::Error::custom("invalid value for DataAvailabilityMode")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceBounds {
    pub max_amount: Uint64,
    pub max_price_per_unit: Uint128,
}

impl ResourceBounds {
    pub const ZERO: Self = Self { max_amount: Uint64::ZERO, max_price_per_unit: Uint128::ZERO };

    pub fn new(max_amount: u64, max_price_per_unit: u128) -> Self {
        Self { max_amount: max_amount.into(), max_price_per_unit: max_price_per_unit.into() }
    }
}

/// Per-resource fee bounds of a v3 transaction.
///
/// The two-bound form (L1 and L2 gas) and the three-bound form (plus L1 data
/// gas) hash differently on-chain; the data-gas slot is emitted iff the
/// mapping carries one, so callers choose the form by how they build the
/// mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ResourceBoundsMapping {
    pub l1_gas: ResourceBounds,
    pub l2_gas: ResourceBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_data_gas: Option<ResourceBounds>,
}

impl ResourceBoundsMapping {
    pub fn new(l1_gas: ResourceBounds, l2_gas: ResourceBounds) -> Self {
        Self { l1_gas, l2_gas, l1_data_gas: None }
    }

    pub fn with_data_gas(l1_gas: ResourceBounds, l2_gas: ResourceBounds, l1_data_gas: ResourceBounds) -> Self {
        Self { l1_gas, l2_gas, l1_data_gas: Some(l1_data_gas) }
    }

    /// Builds the common case where only the L1 bound is known; the L2 slot
    /// is filled with zeros.
    pub fn from_l1_gas(l1_gas: ResourceBounds) -> Self {
        Self { l1_gas, l2_gas: ResourceBounds::ZERO, l1_data_gas: None }
    }
}
