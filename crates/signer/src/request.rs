use crate::{DigestMode, Error, RecoveryConvention, Signature, SignatureGenerator};
use mintsig_abi::{Field, ParameterList, Preset, Schema};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use std::collections::BTreeMap;

/// Name of the schema field holding the chain id.
pub const CHAIN_ID_FIELD: &str = "chain_id";

/// A declarative signing request: which schema, which values, which conventions.
///
/// Exactly one of `preset` and `fields` selects the schema.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningRequest {
    /// built-in schema
    #[serde(default)]
    pub preset: Option<Preset>,
    /// explicit schema
    #[serde(default)]
    pub fields: Option<Schema>,
    /// values by field name
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    /// recovery id convention
    #[serde(default)]
    pub convention: RecoveryConvention,
    /// digest mode
    #[serde(default)]
    pub digest: DigestMode,
    /// when set, the produced signature must match
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub expected_signature: Option<Signature>,
}

impl SigningRequest {
    /// Request for a built-in schema.
    pub fn for_preset(preset: Preset, values: BTreeMap<String, Value>) -> Self {
        Self { preset: Some(preset), values, ..Default::default() }
    }

    /// Request for an explicit schema.
    pub fn for_schema(schema: Schema, values: BTreeMap<String, Value>) -> Self {
        Self { fields: Some(schema), values, ..Default::default() }
    }

    /// Overrides the chain id value. The schema must declare a `chain_id` field.
    pub fn with_chain_id(mut self, chain_id: u64) -> Result<Self, Error> {
        if !self.schema()?.contains(CHAIN_ID_FIELD) {
            return Err(Error::InvalidRequest("schema has no chain_id field"));
        }
        self.values.insert(CHAIN_ID_FIELD.to_string(), Value::from(chain_id));
        Ok(self)
    }

    /// The selected schema.
    pub fn schema(&self) -> Result<Schema, Error> {
        match (&self.preset, &self.fields) {
            (Some(preset), None) => Ok(preset.schema()),
            (None, Some(schema)) => Ok(schema.clone()),
            (Some(_), Some(_)) => Err(Error::InvalidRequest("both preset and fields are set")),
            (None, None) => Err(Error::InvalidRequest("one of preset or fields must be set")),
        }
    }

    /// The schema's fields.
    pub fn fields(&self) -> Result<Vec<Field>, Error> {
        Ok(self.schema()?.fields().to_vec())
    }

    /// Values bound to the schema.
    pub fn parameters(&self) -> Result<ParameterList, Error> {
        self.schema()?.bind(&self.values).map_err(Into::into)
    }

    /// Generator configured with the request's conventions.
    pub const fn generator(&self) -> SignatureGenerator {
        SignatureGenerator::new(self.convention, self.digest)
    }
}
