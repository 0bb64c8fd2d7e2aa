use crate::EncodingError;
use alloy::dyn_abi::DynSolType;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{fmt, str::FromStr};

/// The ABI types a mint parameter can take.
#[derive(Clone, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum AbiType {
    /// `uint<N>`, N in bits
    Uint(usize),
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `T[]`
    Array(Box<AbiType>),
}

impl AbiType {
    /// `uint256`
    pub const UINT256: Self = Self::Uint(256);

    /// `uint8`
    pub const UINT8: Self = Self::Uint(8);

    /// Dynamic array with the given element type.
    pub fn array_of(element: Self) -> Self {
        Self::Array(Box::new(element))
    }

    /// Whether values of this type live in the tail section of an encoding.
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::String | Self::Array(_))
    }

    /// Checks integer widths, recursing into array elements.
    pub fn validate(&self) -> Result<(), EncodingError> {
        match self {
            Self::Uint(width) if !is_valid_width(*width) => Err(EncodingError::InvalidWidth(*width)),
            Self::Array(element) => element.validate(),
            _ => Ok(()),
        }
    }

    pub(crate) fn to_sol_type(&self) -> DynSolType {
        match self {
            Self::Uint(width) => DynSolType::Uint(*width),
            Self::Address => DynSolType::Address,
            Self::Bool => DynSolType::Bool,
            Self::String => DynSolType::String,
            Self::Array(element) => DynSolType::Array(Box::new(element.to_sol_type())),
        }
    }
}

const fn is_valid_width(width: usize) -> bool {
    width % 8 == 0 && width >= 8 && width <= 256
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(width) => write!(f, "uint{width}"),
            Self::Address => f.write_str("address"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

impl FromStr for AbiType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(element) = s.strip_suffix("[]") {
            return Ok(Self::array_of(element.parse()?));
        }

        let ty = match s {
            "address" => Self::Address,
            "bool" => Self::Bool,
            "string" => Self::String,
            "uint" => Self::UINT256,
            _ => {
                let width = s
                    .strip_prefix("uint")
                    .and_then(|bits| bits.parse::<usize>().ok())
                    .ok_or_else(|| EncodingError::UnknownType(s.to_string()))?;
                Self::Uint(width)
            }
        };
        ty.validate()?;

        Ok(ty)
    }
}
