//! Canonical hashing of structured off-chain messages.
//!
//! A [`TypedData`] document couples a user-defined type graph with a domain
//! separator and a message object; once validated it deterministically
//! reduces to a single felt that an account signs. Two incompatible
//! revisions exist: revision 0 hashes with Pedersen and leaves identifiers
//! bare, revision 1 hashes with Poseidon, double-quotes identifiers and adds
//! enums, presets and long strings.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use starknet_types_core::felt::Felt;

mod encode;
mod error;
mod types;

pub use error::TypedDataError;
pub use types::FieldType;

use types::{is_basic_type, is_enum_tuple, preset_types};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Revision {
    /// The pre-standardisation scheme: Pedersen hashing, bare identifiers.
    #[default]
    V0,
    /// The standardised scheme: Poseidon hashing, quoted identifiers, enums
    /// and presets.
    V1,
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Revision::V0 => write!(f, "0"),
            Revision::V1 => write!(f, "1"),
        }
    }
}

/// The domain separator of a typed-data document.
///
/// Field values stay as raw JSON primitives: they are hashed through the
/// type definition the document itself declares for the separator type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub name: Value,
    pub version: Value,
    #[serde(rename = "chainId")]
    pub chain_id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<Value>,
}

impl Domain {
    /// The revision the document is interpreted under. Documents that
    /// predate revisioning carry no `revision` field and resolve to V0.
    pub fn resolved_revision(&self) -> Result<Revision, TypedDataError> {
        match &self.revision {
            None => Ok(Revision::V0),
            Some(Value::String(s)) if s == "0" => Ok(Revision::V0),
            Some(Value::String(s)) if s == "1" => Ok(Revision::V1),
            Some(Value::Number(n)) if n.as_u64() == Some(0) => Ok(Revision::V0),
            Some(Value::Number(n)) if n.as_u64() == Some(1) => Ok(Revision::V1),
            Some(other) => Err(TypedDataError::schema(format!("unsupported domain revision `{other}`"))),
        }
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("name".to_string(), self.name.clone());
        object.insert("version".to_string(), self.version.clone());
        object.insert("chainId".to_string(), self.chain_id.clone());
        if let Some(revision) = &self.revision {
            object.insert("revision".to_string(), revision.clone());
        }
        object
    }
}

fn separator_name(revision: Revision) -> &'static str {
    // The two revisions hash different separator type names; the casing
    // difference is part of the scheme.
    match revision {
        Revision::V0 => "StarkNetDomain",
        Revision::V1 => "StarknetDomain",
    }
}

/// A validated typed-data document.
///
/// Validation happens once, at construction; hashing afterwards can only
/// fail on message values that do not fit the declared types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTypedData")]
pub struct TypedData {
    types: HashMap<String, Vec<FieldType>>,
    #[serde(rename = "primaryType")]
    primary_type: String,
    domain: Domain,
    message: Map<String, Value>,
    #[serde(skip)]
    revision: Revision,
    #[serde(skip)]
    presets: HashMap<String, Vec<FieldType>>,
}

#[derive(Deserialize)]
struct RawTypedData {
    types: HashMap<String, Vec<FieldType>>,
    #[serde(rename = "primaryType")]
    primary_type: String,
    domain: Domain,
    message: Map<String, Value>,
}

impl TryFrom<RawTypedData> for TypedData {
    type Error = TypedDataError;

    fn try_from(raw: RawTypedData) -> Result<Self, Self::Error> {
        TypedData::new(raw.types, raw.primary_type, raw.domain, raw.message)
    }
}

impl TypedData {
    pub fn new(
        types: HashMap<String, Vec<FieldType>>,
        primary_type: impl Into<String>,
        domain: Domain,
        message: Map<String, Value>,
    ) -> Result<Self, TypedDataError> {
        let primary_type = primary_type.into();
        let revision = domain.resolved_revision()?;
        let presets = preset_types(revision);

        validate_types(&types, &presets, &primary_type, revision)?;

        tracing::trace!(primary_type = %primary_type, revision = %revision, "validated typed data");

        Ok(Self { types, primary_type, domain, message, revision, presets })
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn message(&self) -> &Map<String, Value> {
        &self.message
    }

    fn separator_name(&self) -> &'static str {
        separator_name(self.revision)
    }

    /// Looks a type name up in the document's types or, under revision 1,
    /// the presets.
    fn type_definition(&self, name: &str) -> Option<&[FieldType]> {
        self.types.get(name).or_else(|| self.presets.get(name)).map(Vec::as_slice)
    }

    /// The felt an account signs to approve this document.
    pub fn message_hash(&self, account_address: Felt) -> Result<Felt, TypedDataError> {
        const STARKNET_MESSAGE_PREFIX: Felt = Felt::from_hex_unchecked("0x537461726b4e6574204d657373616765"); // b"StarkNet Message"

        let domain_object = self.domain.to_object();
        let elements = [
            STARKNET_MESSAGE_PREFIX,
            self.struct_hash(self.separator_name(), &domain_object)?,
            account_address,
            self.struct_hash(&self.primary_type, &self.message)?,
        ];
        Ok(self.hash_elements(&elements))
    }
}

fn validate_types(
    types: &HashMap<String, Vec<FieldType>>,
    presets: &HashMap<String, Vec<FieldType>>,
    primary_type: &str,
    revision: Revision,
) -> Result<(), TypedDataError> {
    let separator = separator_name(revision);
    if !types.contains_key(separator) {
        return Err(TypedDataError::invalid_types(format!("missing domain separator type `{separator}`")));
    }

    for (name, fields) in types {
        if name.is_empty() {
            return Err(TypedDataError::invalid_types("custom type names cannot be empty"));
        }
        if name.ends_with('*') || is_enum_tuple(name) || name.contains(',') {
            return Err(TypedDataError::invalid_types(format!("malformed custom type name `{name}`")));
        }
        if is_basic_type(name, revision) {
            return Err(TypedDataError::invalid_types(format!("custom type `{name}` redefines a basic type")));
        }
        if presets.contains_key(name) {
            return Err(TypedDataError::invalid_types(format!("custom type `{name}` redefines a preset type")));
        }

        for field in fields {
            match field {
                FieldType::Enum { .. } if revision == Revision::V0 => {
                    return Err(TypedDataError::RevisionMismatch("enum".to_string(), revision));
                }
                FieldType::Standard { ty, .. } if is_enum_tuple(ty) && revision == Revision::V0 => {
                    return Err(TypedDataError::RevisionMismatch(ty.clone(), revision));
                }
                FieldType::MerkleTree { name, contains } if contains.ends_with('*') => {
                    return Err(TypedDataError::invalid_types(format!(
                        "merkletree `{name}` cannot contain an array type"
                    )));
                }
                _ => {}
            }
        }
    }

    // Every defined type must be reachable from the primary type or the
    // domain separator; anything else is a dangling definition.
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut queue: Vec<&str> = vec![primary_type, separator];
    while let Some(current) = queue.pop() {
        if !reachable.insert(current) {
            continue;
        }
        let Some(fields) = types.get(current).or_else(|| presets.get(current)) else {
            continue;
        };
        for field in fields {
            queue.extend(referenced_type_names(field));
        }
    }

    if let Some(dangling) = types.keys().find(|name| !reachable.contains(name.as_str())) {
        return Err(TypedDataError::invalid_types(format!("dangling custom type `{dangling}`")));
    }

    Ok(())
}

/// Type names a field refers to, for reachability purposes. Array types
/// refer to their element type, variant tuples to each member.
fn referenced_type_names(field: &FieldType) -> Vec<&str> {
    match field {
        FieldType::Standard { ty, .. } if is_enum_tuple(ty) => {
            types::extract_enum_types(ty).into_iter().map(types::strip_array_suffix).collect()
        }
        FieldType::Standard { ty, .. } => vec![types::strip_array_suffix(ty)],
        FieldType::MerkleTree { contains, .. } | FieldType::Enum { contains, .. } => vec![contains.as_str()],
    }
}
