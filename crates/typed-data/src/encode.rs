//! Type canonicalisation and value encoding.

use serde_json::{Map, Value};
use snc_convert::{ByteArray, FeltExt, Uint128};
use snc_crypto::{merkle_root, selector_from_name};
use starknet_types_core::felt::Felt;
use starknet_types_core::hash::{Pedersen, Poseidon, StarkHash};

use crate::error::TypedDataError;
use crate::types::{extract_enum_types, is_enum_tuple, strip_array_suffix};
use crate::{FieldType, Revision, TypedData};

/// The enclosing struct field a value is being encoded for; merkle-tree and
/// enum values need it to find their `contains` type.
#[derive(Debug, Clone, Copy)]
struct Context<'a> {
    parent: &'a str,
    field: &'a str,
}

impl TypedData {
    pub(crate) fn hash_elements(&self, elements: &[Felt]) -> Felt {
        match self.revision() {
            Revision::V0 => Pedersen::hash_array(elements),
            Revision::V1 => Poseidon::hash_array(elements),
        }
    }

    fn escape(&self, name: &str) -> String {
        match self.revision() {
            Revision::V0 => name.to_string(),
            Revision::V1 => format!("\"{name}\""),
        }
    }

    /// Collects the type names `type_name` depends on, the root first,
    /// breadth-first and deduplicated. Only defined (custom or preset) types
    /// count; merkle-tree leaf types are resolved per-value and so do not
    /// participate.
    fn dependencies(&self, type_name: &str) -> Vec<String> {
        let mut dependencies = vec![type_name.to_string()];
        let mut cursor = 0;

        while cursor < dependencies.len() {
            let current = dependencies[cursor].clone();
            cursor += 1;
            let Some(fields) = self.type_definition(&current) else {
                continue;
            };

            for field in fields {
                let referenced: Vec<&str> = match field {
                    FieldType::Enum { contains, .. } => vec![contains.as_str()],
                    FieldType::Standard { ty, .. } if is_enum_tuple(ty) => {
                        extract_enum_types(ty).into_iter().map(strip_array_suffix).collect()
                    }
                    FieldType::Standard { ty, .. } => vec![strip_array_suffix(ty)],
                    FieldType::MerkleTree { .. } => vec![],
                };

                for name in referenced {
                    if self.type_definition(name).is_some() && !dependencies.iter().any(|d| d == name) {
                        dependencies.push(name.to_string());
                    }
                }
            }
        }

        dependencies
    }

    /// Canonical string form of a type: the type itself first, then its
    /// transitive dependencies sorted by name, each rendered with its field
    /// list. Type hashes are selectors of this string.
    pub fn encode_type(&self, type_name: &str) -> Result<String, TypedDataError> {
        let mut dependencies = self.dependencies(type_name);
        dependencies[1..].sort();

        dependencies.iter().map(|dependency| self.encode_dependency(dependency)).collect()
    }

    fn encode_dependency(&self, dependency: &str) -> Result<String, TypedDataError> {
        let fields = self
            .type_definition(dependency)
            .ok_or_else(|| TypedDataError::UnknownType(dependency.to_string()))?;

        let encoded_fields = fields
            .iter()
            .map(|field| {
                let target = match field {
                    FieldType::Enum { contains, .. } => contains,
                    FieldType::MerkleTree { .. } => "merkletree",
                    FieldType::Standard { ty, .. } => ty,
                };
                let type_string = if is_enum_tuple(target) {
                    let members: Vec<String> = extract_enum_types(target).into_iter().map(|t| self.escape(t)).collect();
                    format!("({})", members.join(","))
                } else {
                    self.escape(target)
                };
                format!("{}:{}", self.escape(field.name()), type_string)
            })
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!("{}({})", self.escape(dependency), encoded_fields))
    }

    pub fn type_hash(&self, type_name: &str) -> Result<Felt, TypedDataError> {
        Ok(selector_from_name(&self.encode_type(type_name)?))
    }

    /// Reduces a struct value to its hash: the type hash followed by each
    /// field value encoded in declaration order.
    pub fn struct_hash(&self, type_name: &str, object: &Map<String, Value>) -> Result<Felt, TypedDataError> {
        let fields = self
            .type_definition(type_name)
            .ok_or_else(|| TypedDataError::UnknownType(type_name.to_string()))?;

        let mut elements = Vec::with_capacity(fields.len() + 1);
        elements.push(self.type_hash(type_name)?);
        for field in fields {
            let value = object.get(field.name()).ok_or_else(|| {
                TypedDataError::schema(format!("missing value for field `{}` of `{type_name}`", field.name()))
            })?;
            let context = Context { parent: type_name, field: field.name() };
            let (_, encoded) = self.encode_value_with_context(field.value_type(), value, Some(context))?;
            elements.push(encoded);
        }

        Ok(self.hash_elements(&elements))
    }

    /// Encodes a single value under a type name, returning the resolved
    /// type name together with the felt the value reduces to.
    pub fn encode_value(&self, type_name: &str, value: &Value) -> Result<(String, Felt), TypedDataError> {
        self.encode_value_with_context(type_name, value, None)
    }

    fn encode_value_with_context(
        &self,
        type_name: &str,
        value: &Value,
        context: Option<Context<'_>>,
    ) -> Result<(String, Felt), TypedDataError> {
        if self.type_definition(type_name).is_some() {
            let object = value
                .as_object()
                .ok_or_else(|| TypedDataError::schema(format!("expected an object for `{type_name}`")))?;
            return Ok((type_name.to_string(), self.struct_hash(type_name, object)?));
        }

        if let Some(element_type) = type_name.strip_suffix('*') {
            let elements = value
                .as_array()
                .ok_or_else(|| TypedDataError::schema(format!("expected an array for `{type_name}`")))?;
            let hashes = elements
                .iter()
                .map(|element| Ok(self.encode_value_with_context(element_type, element, None)?.1))
                .collect::<Result<Vec<_>, TypedDataError>>()?;
            return Ok((type_name.to_string(), self.hash_elements(&hashes)));
        }

        let encoded = match (type_name, self.revision()) {
            ("felt", _) | ("bool", _) => felt_from_primitive(value)?,
            ("string", Revision::V0) => felt_from_primitive(value)?,
            ("string", Revision::V1) => self.encode_long_string(value)?,
            ("selector", _) => selector_from_primitive(value)?,
            ("merkletree", _) => return self.encode_merkletree(value, context),
            ("enum", Revision::V1) => return self.encode_enum(value, context),
            ("shortstring" | "ContractAddress" | "ClassHash", Revision::V1) => felt_from_primitive(value)?,
            ("u128" | "timestamp", Revision::V1) => {
                let felt = felt_from_primitive(value)?;
                Uint128::try_from(felt)?;
                felt
            }
            ("i128", Revision::V1) => signed_from_primitive(value)?,
            _ => return Err(TypedDataError::UnknownType(type_name.to_string())),
        };

        Ok((type_name.to_string(), encoded))
    }

    /// Revision-1 strings are arbitrary-length byte arrays hashed through
    /// their calldata form.
    fn encode_long_string(&self, value: &Value) -> Result<Felt, TypedDataError> {
        let s = value.as_str().ok_or_else(|| TypedDataError::schema("expected a string"))?;
        Ok(self.hash_elements(&ByteArray::from_string(s).to_calldata()))
    }

    fn encode_merkletree(
        &self,
        value: &Value,
        context: Option<Context<'_>>,
    ) -> Result<(String, Felt), TypedDataError> {
        let context = context.ok_or_else(|| TypedDataError::schema("merkletree values need an enclosing field"))?;
        let FieldType::MerkleTree { contains, .. } = self.context_field(context)? else {
            return Err(TypedDataError::schema(format!(
                "field `{}` of `{}` is not a merkletree",
                context.field, context.parent
            )));
        };

        let elements = value
            .as_array()
            .ok_or_else(|| TypedDataError::schema("expected an array for a merkletree value"))?;
        let leaves = elements
            .iter()
            .map(|element| Ok(self.encode_value_with_context(contains, element, None)?.1))
            .collect::<Result<Vec<_>, TypedDataError>>()?;

        let root = match self.revision() {
            Revision::V0 => merkle_root::<Pedersen>(&leaves)?,
            Revision::V1 => merkle_root::<Poseidon>(&leaves)?,
        };
        Ok((contains.clone(), root))
    }

    /// Enum values are single-entry objects `{variant: [args...]}`, encoded
    /// as the variant's declaration index followed by its encoded arguments.
    fn encode_enum(&self, value: &Value, context: Option<Context<'_>>) -> Result<(String, Felt), TypedDataError> {
        let context = context.ok_or_else(|| TypedDataError::schema("enum values need an enclosing field"))?;
        let FieldType::Enum { contains, .. } = self.context_field(context)? else {
            return Err(TypedDataError::schema(format!(
                "field `{}` of `{}` is not an enum",
                context.field, context.parent
            )));
        };
        let variants = self
            .type_definition(contains)
            .ok_or_else(|| TypedDataError::UnknownType(contains.clone()))?;

        let object = value
            .as_object()
            .ok_or_else(|| TypedDataError::schema("expected an object for an enum value"))?;
        if object.len() != 1 {
            return Err(TypedDataError::schema("enum values must have exactly one variant entry"));
        }
        let (variant_name, arguments) = object.iter().next().expect("len checked above");
        let arguments = arguments
            .as_array()
            .ok_or_else(|| TypedDataError::schema("enum variant arguments must be an array"))?;

        let mut matches = variants
            .iter()
            .enumerate()
            .filter(|(_, variant)| variant.name() == variant_name);
        let (index, variant) = matches
            .next()
            .ok_or_else(|| TypedDataError::schema(format!("unknown variant `{variant_name}` of `{contains}`")))?;
        if matches.next().is_some() {
            return Err(TypedDataError::schema(format!("variant `{variant_name}` of `{contains}` is ambiguous")));
        }

        let FieldType::Standard { ty, .. } = variant else {
            return Err(TypedDataError::schema(format!("variant `{variant_name}` of `{contains}` is malformed")));
        };
        if !is_enum_tuple(ty) {
            return Err(TypedDataError::schema(format!("variant `{variant_name}` of `{contains}` is malformed")));
        }
        let member_types = extract_enum_types(ty);
        if member_types.len() != arguments.len() {
            return Err(TypedDataError::schema(format!(
                "variant `{variant_name}` expects {} arguments, got {}",
                member_types.len(),
                arguments.len()
            )));
        }

        let mut elements = vec![Felt::from(index as u64)];
        for (member_type, argument) in member_types.into_iter().zip(arguments) {
            elements.push(self.encode_value_with_context(member_type, argument, None)?.1);
        }

        Ok(("enum".to_string(), self.hash_elements(&elements)))
    }

    fn context_field(&self, context: Context<'_>) -> Result<&FieldType, TypedDataError> {
        let fields = self
            .type_definition(context.parent)
            .ok_or_else(|| TypedDataError::UnknownType(context.parent.to_string()))?;
        fields
            .iter()
            .find(|field| field.name() == context.field)
            .ok_or_else(|| {
                TypedDataError::schema(format!("`{}` has no field named `{}`", context.parent, context.field))
            })
    }
}

/// Loose integer interpretation shared by most basic types: booleans map to
/// 0/1, numbers are taken as-is, strings try decimal, then hex, then fall
/// back to the short-string encoding. The empty string encodes to zero.
fn felt_from_primitive(value: &Value) -> Result<Felt, TypedDataError> {
    match value {
        Value::Bool(b) => Ok(if *b { Felt::ONE } else { Felt::ZERO }),
        Value::Number(n) => {
            let n = n
                .as_u64()
                .ok_or_else(|| TypedDataError::schema(format!("`{n}` is not a non-negative integer")))?;
            Ok(Felt::from(n))
        }
        Value::String(s) => {
            if s.is_empty() {
                return Ok(Felt::ZERO);
            }
            if s.bytes().all(|b| b.is_ascii_digit()) {
                return Ok(Felt::from_dec_checked(s)?);
            }
            if s.starts_with("0x") {
                if let Ok(felt) = Felt::from_hex_checked(s) {
                    return Ok(felt);
                }
            }
            Ok(Felt::from_short_string(s)?)
        }
        other => Err(TypedDataError::schema(format!("cannot interpret `{other}` as a field element"))),
    }
}

/// Selectors accept a ready-made hex felt, and otherwise hash the name.
fn selector_from_primitive(value: &Value) -> Result<Felt, TypedDataError> {
    let s = value
        .as_str()
        .ok_or_else(|| TypedDataError::schema("expected a string for a selector"))?;
    match Felt::from_hex_checked(s) {
        Ok(felt) => Ok(felt),
        Err(_) => Ok(selector_from_name(s)),
    }
}

/// Signed 128-bit interpretation: negatives wrap into the field as `P + x`.
fn signed_from_primitive(value: &Value) -> Result<Felt, TypedDataError> {
    match value {
        Value::Number(n) => {
            let n = n.as_i64().ok_or_else(|| TypedDataError::schema(format!("`{n}` is not an integer")))?;
            Ok(Felt::from_signed_i128(n.into()))
        }
        Value::String(s) => {
            let parsed: i128 = s
                .parse()
                .map_err(|_| TypedDataError::schema(format!("`{s}` is not a signed 128-bit integer")))?;
            Ok(Felt::from_signed_i128(parsed))
        }
        other => Err(TypedDataError::schema(format!("cannot interpret `{other}` as a signed integer"))),
    }
}
