use snc_convert::{FeltConversionError, Uint128OutOfRange};
use snc_crypto::EmptyMerkleTree;

#[derive(Debug, thiserror::Error)]
pub enum TypedDataError {
    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("invalid type definition: {0}")]
    InvalidTypeDefinition(String),

    #[error("`{0}` is not allowed in revision {1}")]
    RevisionMismatch(String, crate::Revision),

    #[error("malformed message: {0}")]
    Schema(String),

    #[error(transparent)]
    Conversion(#[from] FeltConversionError),

    #[error(transparent)]
    ValueOutOfRange(#[from] Uint128OutOfRange),

    #[error(transparent)]
    EmptyTree(#[from] EmptyMerkleTree),
}

impl TypedDataError {
    pub(crate) fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub(crate) fn invalid_types(message: impl Into<String>) -> Self {
        Self::InvalidTypeDefinition(message.into())
    }
}
