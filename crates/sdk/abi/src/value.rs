use crate::{AbiType, EncodingError};
use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// A value paired with the ABI type it is encoded as.
///
/// The variants are public so callers can build values directly; [`TypedValue::validate`] is
/// run before every encoding to catch values whose shape does not match their type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedValue {
    /// `uint<width>`
    Uint {
        /// declared width in bits
        width: usize,
        /// the value, which must fit in `width` bits
        value: U256,
    },
    /// `address`
    Address(Address),
    /// `bool`
    Bool(bool),
    /// `string`
    String(String),
    /// `T[]`
    Array {
        /// type of every element
        element: AbiType,
        /// the elements, in order
        values: Vec<TypedValue>,
    },
}

impl TypedValue {
    /// `uint<width>` value. Fails if the width is invalid or the value does not fit.
    pub fn uint(width: usize, value: U256) -> Result<Self, EncodingError> {
        let value = Self::Uint { width, value };
        value.validate()?;
        Ok(value)
    }

    /// `uint256` value.
    pub const fn uint256(value: U256) -> Self {
        Self::Uint { width: 256, value }
    }

    /// `uint8` value.
    pub fn uint8(value: u8) -> Self {
        Self::Uint { width: 8, value: U256::from(value) }
    }

    /// `address` value.
    pub const fn address(address: Address) -> Self {
        Self::Address(address)
    }

    /// `bool` value.
    pub const fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    /// `string` value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// `T[]` value. Every element must be of type `element`.
    pub fn array(element: AbiType, values: Vec<Self>) -> Result<Self, EncodingError> {
        let value = Self::Array { element, values };
        value.validate()?;
        Ok(value)
    }

    /// The ABI type of this value.
    pub fn abi_type(&self) -> AbiType {
        match self {
            Self::Uint { width, .. } => AbiType::Uint(*width),
            Self::Address(_) => AbiType::Address,
            Self::Bool(_) => AbiType::Bool,
            Self::String(_) => AbiType::String,
            Self::Array { element, .. } => AbiType::array_of(element.clone()),
        }
    }

    /// Checks that the value's shape matches its declared type.
    pub fn validate(&self) -> Result<(), EncodingError> {
        match self {
            Self::Uint { width, value } => {
                AbiType::Uint(*width).validate()?;
                if value.bit_len() > *width {
                    return Err(EncodingError::IntegerOutOfRange {
                        width: *width,
                        value: value.to_string(),
                    });
                }
                Ok(())
            }
            Self::Array { element, values } => {
                element.validate()?;
                for value in values {
                    let found = value.abi_type();
                    if &found != element {
                        return Err(EncodingError::TypeMismatch {
                            expected: element.clone(),
                            found: found.to_string(),
                        });
                    }
                    value.validate()?;
                }
                Ok(())
            }
            Self::Address(_) | Self::Bool(_) | Self::String(_) => Ok(()),
        }
    }

    /// Coerces a raw JSON value to `ty`.
    ///
    /// Integers may be given as non-negative JSON numbers, decimal strings or `0x` hex strings.
    /// Addresses are 40 hex characters with an optional `0x` prefix; mixed-case input must
    /// carry a valid EIP-55 checksum.
    pub fn from_json(ty: &AbiType, raw: &Value) -> Result<Self, EncodingError> {
        let mismatch =
            || EncodingError::TypeMismatch { expected: ty.clone(), found: json_kind(raw).into() };

        let value = match (ty, raw) {
            (AbiType::Uint(width), Value::Number(n)) => {
                let n = n.as_u64().ok_or_else(|| EncodingError::InvalidInteger(n.to_string()))?;
                Self::Uint { width: *width, value: U256::from(n) }
            }
            (AbiType::Uint(width), Value::String(s)) => {
                Self::Uint { width: *width, value: parse_uint(*width, s)? }
            }
            (AbiType::Address, Value::String(s)) => Self::Address(parse_address(s)?),
            (AbiType::Bool, Value::Bool(b)) => Self::Bool(*b),
            (AbiType::Bool, Value::String(s)) => match s.as_str() {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => return Err(mismatch()),
            },
            (AbiType::String, Value::String(s)) => Self::String(s.clone()),
            (AbiType::Array(element), Value::Array(items)) => Self::Array {
                element: (**element).clone(),
                values: items
                    .iter()
                    .map(|item| Self::from_json(element, item))
                    .collect::<Result<_, _>>()?,
            },
            _ => return Err(mismatch()),
        };
        value.validate()?;

        Ok(value)
    }

    /// JSON rendering. Integers become decimal strings so no precision is lost and addresses
    /// are checksummed.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Uint { value, .. } => Value::String(value.to_string()),
            Self::Address(address) => Value::String(address.to_checksum(None)),
            Self::Bool(b) => Value::Bool(*b),
            Self::String(s) => Value::String(s.clone()),
            Self::Array { values, .. } => Value::Array(values.iter().map(Self::to_json).collect()),
        }
    }

    pub(crate) fn to_sol_value(&self) -> DynSolValue {
        match self {
            Self::Uint { width, value } => DynSolValue::Uint(*value, *width),
            Self::Address(address) => DynSolValue::Address(*address),
            Self::Bool(b) => DynSolValue::Bool(*b),
            Self::String(s) => DynSolValue::String(s.clone()),
            Self::Array { values, .. } => {
                DynSolValue::Array(values.iter().map(Self::to_sol_value).collect())
            }
        }
    }

    pub(crate) fn from_sol_value(ty: &AbiType, value: DynSolValue) -> Result<Self, EncodingError> {
        let value = match (ty, value) {
            (AbiType::Uint(width), DynSolValue::Uint(value, _)) => {
                Self::Uint { width: *width, value }
            }
            (AbiType::Address, DynSolValue::Address(address)) => Self::Address(address),
            (AbiType::Bool, DynSolValue::Bool(b)) => Self::Bool(b),
            (AbiType::String, DynSolValue::String(s)) => Self::String(s),
            (AbiType::Array(element), DynSolValue::Array(values)) => Self::Array {
                element: (**element).clone(),
                values: values
                    .into_iter()
                    .map(|value| Self::from_sol_value(element, value))
                    .collect::<Result<_, _>>()?,
            },
            (_, other) => {
                return Err(EncodingError::TypeMismatch {
                    expected: ty.clone(),
                    found: format!("{other:?}"),
                })
            }
        };
        value.validate()?;

        Ok(value)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint { width, value } => write!(f, "uint{width}({value})"),
            Self::Address(address) => write!(f, "address({address})"),
            Self::Bool(b) => write!(f, "bool({b})"),
            Self::String(s) => write!(f, "string({s:?})"),
            Self::Array { element, values } => {
                write!(f, "{element}[]([")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    value.fmt_inner(f)?;
                }
                f.write_str("])")
            }
        }
    }
}

impl TypedValue {
    // Array elements are printed without their type wrapper.
    fn fmt_inner(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint { value, .. } => write!(f, "{value}"),
            Self::Address(address) => write!(f, "{address}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Array { .. } => write!(f, "{self}"),
        }
    }
}

fn json_kind(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_uint(width: usize, s: &str) -> Result<U256, EncodingError> {
    let s = s.trim();
    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix as u32)) {
        return Err(EncodingError::InvalidInteger(s.to_string()));
    }

    // Every digit is valid, so the only way parsing fails is overflowing 256 bits.
    U256::from_str_radix(digits, radix)
        .map_err(|_| EncodingError::IntegerOutOfRange { width, value: s.to_string() })
}

fn parse_address(s: &str) -> Result<Address, EncodingError> {
    let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EncodingError::InvalidAddress(s.to_string()));
    }

    let address =
        Address::from_str(hex).map_err(|_| EncodingError::InvalidAddress(s.to_string()))?;

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *hex {
        return Err(EncodingError::AddressChecksum(s.to_string()));
    }

    Ok(address)
}

/// Ordered list of typed values. The order defines the encoding layout and must match the
/// argument order the verifying contract encodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterList(Vec<TypedValue>);

impl ParameterList {
    /// Empty parameter list.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a value.
    pub fn push(&mut self, value: TypedValue) {
        self.0.push(value);
    }

    /// Builder-style [`ParameterList::push`].
    pub fn with(mut self, value: TypedValue) -> Self {
        self.0.push(value);
        self
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the parameters in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TypedValue> {
        self.0.iter()
    }

    /// The parameters as a slice.
    pub fn as_slice(&self) -> &[TypedValue] {
        &self.0
    }

    /// The ABI types of the parameters, in order.
    pub fn types(&self) -> Vec<AbiType> {
        self.0.iter().map(TypedValue::abi_type).collect()
    }

    /// Solidity-style tuple signature, e.g. `(uint256,address,string[])`.
    pub fn signature(&self) -> String {
        tuple_signature(&self.types())
    }

    /// Validates every parameter.
    pub fn validate(&self) -> Result<(), EncodingError> {
        self.0.iter().try_for_each(TypedValue::validate)
    }
}

pub(crate) fn tuple_signature(types: &[AbiType]) -> String {
    let inner = types.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
    format!("({inner})")
}

impl From<Vec<TypedValue>> for ParameterList {
    fn from(values: Vec<TypedValue>) -> Self {
        Self(values)
    }
}

impl From<ParameterList> for Vec<TypedValue> {
    fn from(list: ParameterList) -> Self {
        list.0
    }
}

impl FromIterator<TypedValue> for ParameterList {
    fn from_iter<I: IntoIterator<Item = TypedValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a TypedValue;
    type IntoIter = std::slice::Iter<'a, TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
