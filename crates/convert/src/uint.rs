use serde_with::serde_as;
use starknet_types_core::felt::Felt;

use crate::hex_serde::{U128AsHex, U64AsHex};
use crate::ToFelt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("value is too large for a 64-bit unsigned integer")]
pub struct Uint64OutOfRange;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("value is too large for a 128-bit unsigned integer")]
pub struct Uint128OutOfRange;

/// A non-negative integer bounded to `[0, 2^64)`, kept losslessly convertible
/// to a field element.
#[serde_as]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Uint64(#[serde_as(as = "U64AsHex")] u64);

impl Uint64 {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u64::MAX);

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Uint64 {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<u128> for Uint64 {
    type Error = Uint64OutOfRange;

    fn try_from(value: u128) -> Result<Self, Self::Error> {
        u64::try_from(value).map(Self).map_err(|_| Uint64OutOfRange)
    }
}

impl TryFrom<Felt> for Uint64 {
    type Error = Uint64OutOfRange;

    fn try_from(felt: Felt) -> Result<Self, Self::Error> {
        let digits = felt.to_be_digits();
        match (digits[0], digits[1], digits[2], digits[3]) {
            (0, 0, 0, d) => Ok(Self(d)),
            _ => Err(Uint64OutOfRange),
        }
    }
}

impl ToFelt for Uint64 {
    fn to_felt(self) -> Felt {
        self.0.into()
    }
}

impl ToFelt for &Uint64 {
    fn to_felt(self) -> Felt {
        self.0.into()
    }
}

/// A non-negative integer bounded to `[0, 2^128)`.
#[serde_as]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Uint128(#[serde_as(as = "U128AsHex")] u128);

impl Uint128 {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub fn value(self) -> u128 {
        self.0
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl TryFrom<Felt> for Uint128 {
    type Error = Uint128OutOfRange;

    fn try_from(felt: Felt) -> Result<Self, Self::Error> {
        let digits = felt.to_be_digits();
        match (digits[0], digits[1], digits[2], digits[3]) {
            (0, 0, d1, d2) => Ok(Self((d1 as u128) << 64 | d2 as u128)),
            _ => Err(Uint128OutOfRange),
        }
    }
}

impl ToFelt for Uint128 {
    fn to_felt(self) -> Felt {
        self.0.into()
    }
}

impl ToFelt for &Uint128 {
    fn to_felt(self) -> Felt {
        self.0.into()
    }
}
