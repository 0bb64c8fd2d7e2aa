//! Common crate for ABI-encoded mint parameters.
//!
//! Parameters are described by a [`Schema`] (an ordered list of named, typed fields), bound to
//! raw values to form a [`ParameterList`], and then encoded exactly like Solidity's
//! `abi.encode(...)` so that the verifying contract reproduces the same bytes.

mod codec;
mod schema;
mod types;
mod value;

pub use codec::{decode, encode};
pub use schema::{Field, Preset, Schema};
pub use types::AbiType;
pub use value::{ParameterList, TypedValue};

/// Errors from building, encoding or decoding ABI parameters.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    /// type string is not one of the supported ABI types
    #[error("unsupported abi type: {0}")]
    UnknownType(String),
    /// integer width is not a multiple of 8 in 8..=256
    #[error("invalid integer width: {0}")]
    InvalidWidth(usize),
    /// integer does not fit in its declared width
    #[error("integer {value} does not fit in uint{width}")]
    IntegerOutOfRange {
        /// declared width in bits
        width: usize,
        /// the offending value, as given
        value: String,
    },
    /// integer literal could not be parsed
    #[error("invalid integer literal: {0:?}")]
    InvalidInteger(String),
    /// address is not 20 bytes of hex
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    /// mixed-case address with a bad EIP-55 checksum
    #[error("bad address checksum: {0}")]
    AddressChecksum(String),
    /// value shape does not match its declared type
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// the declared type
        expected: AbiType,
        /// description of what was supplied
        found: String,
    },
    /// schema field without a value
    #[error("missing value for field {0:?}")]
    MissingField(String),
    /// value supplied for a field the schema does not declare
    #[error("unknown field {0:?}")]
    UnknownField(String),
    /// two schema fields share a name
    #[error("duplicate field {0:?}")]
    DuplicateField(String),
    /// wrong number of positional values
    #[error("expected {expected} values, found {found}")]
    ArityMismatch {
        /// number of schema fields
        expected: usize,
        /// number of values supplied
        found: usize,
    },
    /// data is not a valid encoding of the requested types
    #[error("abi decode error: {0}")]
    Decode(String),
}

impl From<alloy::dyn_abi::Error> for EncodingError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
