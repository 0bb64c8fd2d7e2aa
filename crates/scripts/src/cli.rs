//! CLI for the mint signer.

use alloy::primitives::{hex, B256};
use clap::{Parser, Subcommand};
use mintsig_signer::{
    decode, AbiType, DigestMode, EncodingError, KeyError, ParameterList, Preset, PrivateKey,
    RecoveryConvention, Signature, SignedPayload, SigningRequest,
};
use serde_json::{json, Map, Value};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

const ENV_SIGNER_PRIVATE_KEY: &str = "SIGNER_PRIVATE_KEY";

/// Errors from the signer CLI
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// private key was not set
    #[error("environment variable {0} must be set")]
    PrivKeyNotSet(String),
    /// private key could not be parsed
    #[error("{0}: {1}")]
    InvalidPrivateKey(String, KeyError),
    /// request file could not be read
    #[error("failed to read {path}: {source}")]
    ReadRequest {
        /// path of the request file
        path: PathBuf,
        /// underlying io error
        source: io::Error,
    },
    /// request file was not valid
    #[error("invalid request file: {0}")]
    ParseRequest(#[from] toml::de::Error),
    /// signing failed
    #[error(transparent)]
    Signer(#[from] mintsig_signer::Error),
    /// parameters could not be encoded or decoded
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// data was not valid hex
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// produced signature differs from the request's expected signature
    #[error("signature mismatch: expected {expected}, got {actual}")]
    SignatureMismatch {
        /// signature from the request
        expected: Signature,
        /// signature that was produced
        actual: Signature,
    },
    /// error rendering JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// error writing output
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Mint signature tooling.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode, hash and sign a request file.
    Sign {
        /// Path to the request TOML
        request: PathBuf,

        /// Environment variable holding the hex private key
        #[arg(long, default_value = ENV_SIGNER_PRIVATE_KEY)]
        key_env: String,

        #[command(flatten)]
        overrides: Overrides,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the encoding and digest of a request file without signing.
    Encode {
        /// Path to the request TOML
        request: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Decode an ABI encoding back into values.
    Decode {
        /// Hex encoded data
        data: String,

        /// Built-in schema to decode with
        #[arg(long, conflicts_with = "types", required_unless_present = "types")]
        preset: Option<Preset>,

        /// Comma separated types to decode with, e.g. `uint256,address,string[]`
        #[arg(long, value_delimiter = ',')]
        types: Vec<AbiType>,
    },

    /// Split a 65 byte signature into r, s and v.
    Split {
        /// Hex encoded `r ‖ s ‖ v`
        signature: Signature,

        /// Re-render `v` with this convention
        #[arg(long)]
        convention: Option<RecoveryConvention>,
    },

    /// Recover the signer of a digest.
    Recover {
        /// Hex encoded `r ‖ s ‖ v`
        signature: Signature,

        /// The digest that was signed
        #[arg(long)]
        digest: B256,
    },
}

/// Values that take precedence over the request file.
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Chain id to sign for, replacing the request's `chain_id` value
    #[arg(long)]
    chain_id: Option<u64>,

    /// Recovery id convention, `legacy` (27/28) or `parity` (0/1)
    #[arg(long)]
    convention: Option<RecoveryConvention>,

    /// Digest mode, `raw` or `eip191`
    #[arg(long)]
    digest: Option<DigestMode>,
}

impl Overrides {
    fn apply(&self, mut request: SigningRequest) -> Result<SigningRequest, Error> {
        if let Some(chain_id) = self.chain_id {
            request = request.with_chain_id(chain_id)?;
        }
        if let Some(convention) = self.convention {
            request.convention = convention;
        }
        if let Some(digest) = self.digest {
            request.digest = digest;
        }
        Ok(request)
    }
}

fn load_request(path: &Path) -> Result<SigningRequest, Error> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| Error::ReadRequest { path: path.to_path_buf(), source })?;
    toml::from_str(&raw).map_err(Into::into)
}

fn key_from_env(var: &str) -> Result<PrivateKey, Error> {
    let secret = std::env::var(var).map_err(|_| Error::PrivKeyNotSet(var.to_string()))?;
    secret.parse().map_err(|e| Error::InvalidPrivateKey(var.to_string(), e))
}

fn payload_json(payload: &SignedPayload) -> Value {
    json!({
        "encoded": hex::encode_prefixed(&payload.encoded),
        "digest": hex::encode_prefixed(payload.digest),
        "signer": payload.signer.to_checksum(None),
        "signature": payload.signature.to_string(),
        "r": hex::encode_prefixed(payload.signature.r()),
        "s": hex::encode_prefixed(payload.signature.s()),
        "v": payload.signature.v(),
    })
}

fn write_split(out: &mut impl Write, signature: &Signature) -> Result<(), Error> {
    writeln!(out, "r: {}", hex::encode_prefixed(signature.r()))?;
    writeln!(out, "s: {}", hex::encode_prefixed(signature.s()))?;
    writeln!(out, "v: {}", signature.v())?;
    Ok(())
}

fn decoded_json(params: &ParameterList, preset: Option<Preset>) -> Value {
    match preset {
        Some(preset) => {
            let schema = preset.schema();
            let object: Map<String, Value> = schema
                .fields()
                .iter()
                .zip(params)
                .map(|(field, value)| (field.name.clone(), value.to_json()))
                .collect();
            Value::Object(object)
        }
        None => Value::Array(params.iter().map(|v| v.to_json()).collect()),
    }
}

fn execute(opts: Opts, out: &mut impl Write) -> Result<(), Error> {
    match opts.command {
        Command::Sign { request, key_env, overrides, json } => {
            let request = overrides.apply(load_request(&request)?)?;
            let key = key_from_env(&key_env)?;

            let params = request.parameters()?;
            let payload = request.generator().sign_parameters(&params, &key)?;
            info!(signer = %payload.signer, digest = %payload.digest, "signed request");

            if let Some(expected) = request.expected_signature {
                if expected != payload.signature {
                    return Err(Error::SignatureMismatch { expected, actual: payload.signature });
                }
            }

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&payload_json(&payload))?)?;
            } else {
                writeln!(out, "encoded: {}", hex::encode_prefixed(&payload.encoded))?;
                writeln!(out, "digest: {}", hex::encode_prefixed(payload.digest))?;
                writeln!(out, "signer: {}", payload.signer.to_checksum(None))?;
                writeln!(out, "signature: {}", payload.signature)?;
                write_split(out, &payload.signature)?;
            }
        }
        Command::Encode { request, overrides, json } => {
            let request = overrides.apply(load_request(&request)?)?;
            let generator = request.generator();
            let encoded = generator.encode(&request.parameters()?)?;
            let digest = generator.digest(&encoded);

            if json {
                let value = json!({
                    "signature": request.schema()?.signature(),
                    "encoded": hex::encode_prefixed(&encoded),
                    "digest": hex::encode_prefixed(digest),
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
            } else {
                writeln!(out, "encoded: {}", hex::encode_prefixed(&encoded))?;
                writeln!(out, "digest: {}", hex::encode_prefixed(digest))?;
            }
        }
        Command::Decode { data, preset, types } => {
            let types = match preset {
                Some(preset) => preset.schema().types(),
                None => types,
            };
            let params = decode(&types, &hex::decode(data.trim())?)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&decoded_json(&params, preset))?)?;
        }
        Command::Split { signature, convention } => {
            let signature = match convention {
                Some(convention) => signature.with_convention(convention),
                None => signature,
            };
            write_split(out, &signature)?;
        }
        Command::Recover { signature, digest } => {
            let address = signature.recover_address(&digest)?;
            writeln!(out, "{}", address.to_checksum(None))?;
        }
    }

    Ok(())
}

/// Command line interface for the mint signer.
#[derive(Debug)]
pub struct Cli;

impl Cli {
    /// Run the CLI, writing results to stdout.
    #[instrument]
    pub fn run() -> Result<(), Error> {
        dotenvy::dotenv().ok();
        let opts = Opts::parse();
        execute(opts, &mut io::stdout().lock())
    }
}
