//! Felt conversions shared by the hashing crates.

mod byte_array;
mod felt;
mod uint;

pub mod hex_serde;

pub use byte_array::ByteArray;
pub use felt::{FeltConversionError, FeltExt};
pub use uint::{Uint128, Uint128OutOfRange, Uint64, Uint64OutOfRange};

use starknet_types_core::felt::Felt;

pub trait ToFelt {
    fn to_felt(self) -> Felt;
}

impl ToFelt for u64 {
    fn to_felt(self) -> Felt {
        self.into()
    }
}

impl ToFelt for u128 {
    fn to_felt(self) -> Felt {
        self.into()
    }
}
