use crate::{value::tuple_signature, AbiType, EncodingError, ParameterList, TypedValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// A named, typed schema field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// field name, used to look up the value when binding
    pub name: String,
    /// ABI type of the field
    #[serde(rename = "type")]
    pub ty: AbiType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Ordered list of typed fields describing the arguments a contract hashes and verifies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema. Field names must be unique and types valid.
    pub fn new(fields: Vec<Field>) -> Result<Self, EncodingError> {
        let mut seen = HashSet::new();
        for field in &fields {
            field.ty.validate()?;
            if !seen.insert(field.name.as_str()) {
                return Err(EncodingError::DuplicateField(field.name.clone()));
            }
        }

        Ok(Self { fields })
    }

    /// Create a schema from `(name, type)` pairs, e.g. `[("chain_id", "uint256")]`.
    pub fn parse(fields: &[(&str, &str)]) -> Result<Self, EncodingError> {
        let fields = fields
            .iter()
            .map(|(name, ty)| -> Result<Field, EncodingError> {
                Ok(Field::new(*name, ty.parse()?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(fields)
    }

    /// The fields, in encoding order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether the schema declares a field called `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// The field types, in encoding order.
    pub fn types(&self) -> Vec<AbiType> {
        self.fields.iter().map(|f| f.ty.clone()).collect()
    }

    /// Solidity-style tuple signature, e.g. `(uint256,address,string[])`.
    pub fn signature(&self) -> String {
        tuple_signature(&self.types())
    }

    /// Binds named raw values to the schema, producing parameters in schema order.
    ///
    /// Every field needs a value and every value needs a field.
    pub fn bind(&self, values: &BTreeMap<String, Value>) -> Result<ParameterList, EncodingError> {
        if let Some(unknown) = values.keys().find(|name| !self.contains(name)) {
            return Err(EncodingError::UnknownField(unknown.clone()));
        }

        self.fields
            .iter()
            .map(|field| {
                let raw = values
                    .get(&field.name)
                    .ok_or_else(|| EncodingError::MissingField(field.name.clone()))?;
                TypedValue::from_json(&field.ty, raw)
            })
            .collect()
    }

    /// Binds positional raw values to the schema.
    pub fn bind_ordered(&self, values: &[Value]) -> Result<ParameterList, EncodingError> {
        if values.len() != self.fields.len() {
            return Err(EncodingError::ArityMismatch {
                expected: self.fields.len(),
                found: values.len(),
            });
        }

        self.fields
            .iter()
            .zip(values)
            .map(|(field, raw)| TypedValue::from_json(&field.ty, raw))
            .collect()
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = EncodingError;

    fn try_from(fields: Vec<Field>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Built-in schemas for the minting calls.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Preset {
    /// Mint NFTs from IPFS CIDs with per-token types and rarities.
    ///
    /// `(chain_id, user, contract, discount, cids, types, rarities, deadline)`
    NftMint,
    /// Mint from an existing collection, optionally through the whitelist.
    ///
    /// `(chain_id, user, contract, nft_collection, discount, is_whitelist, nft_indexes,
    /// deadline)`
    CollectionMint,
    /// Mint boxes.
    ///
    /// `(chain_id, user, contract, collection, discount, amount, deadline)`
    BoxMint,
}

impl Preset {
    /// The schema for this preset.
    pub fn schema(self) -> Schema {
        let fields = match self {
            Self::NftMint => vec![
                Field::new("chain_id", AbiType::UINT256),
                Field::new("user", AbiType::Address),
                Field::new("contract", AbiType::Address),
                Field::new("discount", AbiType::UINT256),
                Field::new("cids", AbiType::array_of(AbiType::String)),
                Field::new("types", AbiType::array_of(AbiType::UINT8)),
                Field::new("rarities", AbiType::array_of(AbiType::UINT8)),
                Field::new("deadline", AbiType::UINT256),
            ],
            Self::CollectionMint => vec![
                Field::new("chain_id", AbiType::UINT256),
                Field::new("user", AbiType::Address),
                Field::new("contract", AbiType::Address),
                Field::new("nft_collection", AbiType::Address),
                Field::new("discount", AbiType::UINT256),
                Field::new("is_whitelist", AbiType::Bool),
                Field::new("nft_indexes", AbiType::array_of(AbiType::UINT256)),
                Field::new("deadline", AbiType::UINT256),
            ],
            Self::BoxMint => vec![
                Field::new("chain_id", AbiType::UINT256),
                Field::new("user", AbiType::Address),
                Field::new("contract", AbiType::Address),
                Field::new("collection", AbiType::Address),
                Field::new("discount", AbiType::UINT256),
                Field::new("amount", AbiType::UINT256),
                Field::new("deadline", AbiType::UINT256),
            ],
        };

        Schema { fields }
    }
}
