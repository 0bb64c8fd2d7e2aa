//! Utilities for setting up tests.

use alloy::primitives::{Address, B256};
use mintsig_signer::{PrivateKey, SigningRequest};
use rand::{Rng, RngCore};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

const GOLDEN: &str = include_str!("../fixtures/golden.toml");

/// Initialize a tracing subscriber for tests. Use `RUST_LOG` to set the filter level.
///
/// If the tracing subscriber has already been initialized in a previous test, this
/// function will silently fail due to `try_init()`, which does not reinitialize
/// the subscriber if one is already set.
pub fn test_tracing() {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    let _ =
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// A signing request with the digest, signer and signature it must produce.
///
/// The expected signature lives in `request.expected_signature`.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Name used in assertion messages
    pub name: String,
    /// Key to sign with
    #[serde_as(as = "DisplayFromStr")]
    pub private_key: PrivateKey,
    /// Digest the request must hash to
    #[serde_as(as = "DisplayFromStr")]
    pub expected_digest: B256,
    /// Address of `private_key`
    #[serde_as(as = "DisplayFromStr")]
    pub expected_signer: Address,
    /// The request itself
    pub request: SigningRequest,
}

#[derive(Deserialize)]
struct Fixtures {
    fixtures: Vec<Fixture>,
}

/// Signatures cross-checked against an independent secp256k1 and Keccak-256 implementation.
pub fn golden_fixtures() -> Vec<Fixture> {
    toml::from_str::<Fixtures>(GOLDEN).unwrap().fixtures
}

/// A usable random key.
pub fn random_key<R: RngCore>(rng: &mut R) -> PrivateKey {
    loop {
        let key = PrivateKey::from(rng.gen::<[u8; 32]>());
        if key.address().is_ok() {
            return key;
        }
    }
}

/// A random 20-byte address.
pub fn random_address<R: RngCore>(rng: &mut R) -> Address {
    Address::from(rng.gen::<[u8; 20]>())
}
