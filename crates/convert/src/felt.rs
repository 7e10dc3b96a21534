use std::cmp::Ordering;

use num_bigint::BigUint;
use starknet_types_core::felt::Felt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeltConversionError {
    #[error("value does not fit in a field element")]
    OutOfRange,
    #[error("malformed hex value")]
    InvalidHex,
    #[error("malformed decimal value")]
    InvalidDecimal,
    #[error("short strings cannot exceed 31 bytes")]
    ShortStringTooLong,
    #[error("short strings must be ascii")]
    NonAsciiShortString,
}

pub trait FeltExt {
    fn from_slice_be_checked(slice: &[u8]) -> Result<Felt, FeltConversionError>;
    fn from_bytes_checked(bytes: &[u8; 32]) -> Result<Felt, FeltConversionError>;

    /// Parses a `0x`-prefixed, case-insensitive hex string. The value must be
    /// below the field modulus.
    fn from_hex_checked(hex: &str) -> Result<Felt, FeltConversionError>;

    /// Parses an unsigned decimal string below the field modulus.
    fn from_dec_checked(dec: &str) -> Result<Felt, FeltConversionError>;

    /// Encodes up to 31 ascii bytes as a big-endian integer. The empty string
    /// encodes to zero.
    fn from_short_string(s: &str) -> Result<Felt, FeltConversionError>;

    /// Maps a signed integer into the field, sending `x < 0` to `P + x`.
    fn from_signed_i128(value: i128) -> Felt;

    fn slice_be_len(&self) -> usize;
}

impl FeltExt for Felt {
    fn from_slice_be_checked(slice: &[u8]) -> Result<Felt, FeltConversionError> {
        if slice.len() > 32 {
            return Err(FeltConversionError::OutOfRange);
        }

        let mut unpacked = [0; 32];
        unpacked[32 - slice.len()..].copy_from_slice(slice);

        Felt::from_bytes_checked(&unpacked)
    }

    fn from_bytes_checked(b: &[u8; 32]) -> Result<Felt, FeltConversionError> {
        let limbs = [
            u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            u64::from_be_bytes([b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]),
            u64::from_be_bytes([b[16], b[17], b[18], b[19], b[20], b[21], b[22], b[23]]),
            u64::from_be_bytes([b[24], b[25], b[26], b[27], b[28], b[29], b[30], b[31]]),
        ];

        // p = 2^251 + 17 * 2^192 + 1
        const MODULUS_U64: [u64; 4] = [576460752303423505u64, 0, 0, 1];

        for i in 0..4 {
            match u64::cmp(&limbs[i], &MODULUS_U64[i]) {
                Ordering::Less => break,
                Ordering::Equal if i == 3 => return Err(FeltConversionError::OutOfRange),
                Ordering::Equal => continue,
                Ordering::Greater => return Err(FeltConversionError::OutOfRange),
            }
        }

        Ok(Felt::from_bytes_be(b))
    }

    fn from_hex_checked(hex: &str) -> Result<Felt, FeltConversionError> {
        let digits = hex.strip_prefix("0x").ok_or(FeltConversionError::InvalidHex)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FeltConversionError::InvalidHex);
        }

        let value = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(FeltConversionError::InvalidHex)?;
        Felt::from_slice_be_checked(&value.to_bytes_be())
    }

    fn from_dec_checked(dec: &str) -> Result<Felt, FeltConversionError> {
        if dec.is_empty() || !dec.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FeltConversionError::InvalidDecimal);
        }

        let value = BigUint::parse_bytes(dec.as_bytes(), 10).ok_or(FeltConversionError::InvalidDecimal)?;
        Felt::from_slice_be_checked(&value.to_bytes_be())
    }

    fn from_short_string(s: &str) -> Result<Felt, FeltConversionError> {
        if s.len() > 31 {
            return Err(FeltConversionError::ShortStringTooLong);
        }
        if !s.is_ascii() {
            return Err(FeltConversionError::NonAsciiShortString);
        }

        Ok(Felt::from_bytes_be_slice(s.as_bytes()))
    }

    fn from_signed_i128(value: i128) -> Felt {
        if value >= 0 {
            Felt::from(value as u128)
        } else {
            Felt::ZERO - Felt::from(value.unsigned_abs())
        }
    }

    fn slice_be_len(&self) -> usize {
        let bytes = self.to_bytes_be();
        let mut len = 32;
        while len > 0 && bytes[32 - len] == 0 {
            len -= 1;
        }
        len
    }
}
