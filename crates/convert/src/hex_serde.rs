//! Hex-string serde adapters for bounded integers.

use serde::{Deserialize, Deserializer, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

pub struct U64AsHex;

impl SerializeAs<u64> for U64AsHex {
    fn serialize_as<S>(source: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{source:#x}"))
    }
}

impl<'de> DeserializeAs<'de, u64> for U64AsHex {
    fn deserialize_as<D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").ok_or_else(|| serde::de::Error::custom("expected a 0x-prefixed hex string"))?;
        u64::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}

pub struct U128AsHex;

impl SerializeAs<u128> for U128AsHex {
    fn serialize_as<S>(source: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{source:#x}"))
    }
}

impl<'de> DeserializeAs<'de, u128> for U128AsHex {
    fn deserialize_as<D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("0x").ok_or_else(|| serde::de::Error::custom("expected a 0x-prefixed hex string"))?;
        u128::from_str_radix(digits, 16).map_err(serde::de::Error::custom)
    }
}
