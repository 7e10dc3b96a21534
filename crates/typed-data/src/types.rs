use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TypedDataError;
use crate::Revision;

/// One field of a user-defined type.
///
/// The JSON form is `{"name": .., "type": ..}` with an extra `"contains"` key
/// for the merkle-tree and enum variants; which variant applies is decided by
/// the `type` value together with the presence of `contains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldType", into = "RawFieldType")]
pub enum FieldType {
    Standard { name: String, ty: String },
    MerkleTree { name: String, contains: String },
    Enum { name: String, contains: String },
}

impl FieldType {
    pub fn name(&self) -> &str {
        match self {
            FieldType::Standard { name, .. } | FieldType::MerkleTree { name, .. } | FieldType::Enum { name, .. } => name,
        }
    }

    /// The type string a value of this field is encoded under.
    pub fn value_type(&self) -> &str {
        match self {
            FieldType::Standard { ty, .. } => ty,
            FieldType::MerkleTree { .. } => "merkletree",
            FieldType::Enum { .. } => "enum",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFieldType {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contains: Option<String>,
}

impl TryFrom<RawFieldType> for FieldType {
    type Error = TypedDataError;

    fn try_from(raw: RawFieldType) -> Result<Self, Self::Error> {
        match (raw.ty.as_str(), raw.contains) {
            ("merkletree", Some(contains)) => Ok(FieldType::MerkleTree { name: raw.name, contains }),
            ("merkletree", None) => {
                Err(TypedDataError::invalid_types(format!("merkletree field `{}` requires `contains`", raw.name)))
            }
            ("enum", Some(contains)) => Ok(FieldType::Enum { name: raw.name, contains }),
            (_, Some(_)) => {
                Err(TypedDataError::invalid_types(format!("field `{}` does not accept `contains`", raw.name)))
            }
            (_, None) => Ok(FieldType::Standard { name: raw.name, ty: raw.ty }),
        }
    }
}

impl From<FieldType> for RawFieldType {
    fn from(field: FieldType) -> Self {
        match field {
            FieldType::Standard { name, ty } => RawFieldType { name, ty, contains: None },
            FieldType::MerkleTree { name, contains } => {
                RawFieldType { name, ty: "merkletree".to_string(), contains: Some(contains) }
            }
            FieldType::Enum { name, contains } => {
                RawFieldType { name, ty: "enum".to_string(), contains: Some(contains) }
            }
        }
    }
}

/// `(A,B,C)` tuple notation used by enum variant definitions.
pub(crate) fn is_enum_tuple(ty: &str) -> bool {
    ty.starts_with('(') && ty.ends_with(')')
}

pub(crate) fn extract_enum_types(ty: &str) -> Vec<&str> {
    let inner = &ty[1..ty.len() - 1];
    if inner.is_empty() {
        vec![]
    } else {
        inner.split(',').collect()
    }
}

pub(crate) fn strip_array_suffix(ty: &str) -> &str {
    ty.strip_suffix('*').unwrap_or(ty)
}

pub(crate) fn is_basic_type(name: &str, revision: Revision) -> bool {
    const V0_BASIC: [&str; 5] = ["felt", "bool", "string", "selector", "merkletree"];
    const V1_BASIC: [&str; 7] = ["enum", "i128", "u128", "ContractAddress", "ClassHash", "timestamp", "shortstring"];

    match revision {
        Revision::V0 => V0_BASIC.contains(&name),
        Revision::V1 => V0_BASIC.contains(&name) || V1_BASIC.contains(&name),
    }
}

/// The preset types merged into the type table under revision 1. Users may
/// reference them but never redefine them.
pub(crate) fn preset_types(revision: Revision) -> HashMap<String, Vec<FieldType>> {
    fn standard(name: &str, ty: &str) -> FieldType {
        FieldType::Standard { name: name.to_string(), ty: ty.to_string() }
    }

    match revision {
        Revision::V0 => HashMap::new(),
        Revision::V1 => HashMap::from([
            ("u256".to_string(), vec![standard("low", "u128"), standard("high", "u128")]),
            (
                "TokenAmount".to_string(),
                vec![standard("token_address", "ContractAddress"), standard("amount", "u256")],
            ),
            (
                "NftId".to_string(),
                vec![standard("collection_address", "ContractAddress"), standard("token_id", "u256")],
            ),
        ]),
    }
}
