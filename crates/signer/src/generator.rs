use crate::{DigestMode, Error, PrivateKey, RecoveryConvention, Signature};
use alloy::{
    primitives::{Address, B256},
    signers::SignerSync,
};
use mintsig_abi::ParameterList;
use tracing::{debug, instrument};

/// Signs `digest` with `key`, rendering `v` per `convention`.
///
/// Nonces are deterministic (RFC 6979) and `s` is normalised to the lower half of the curve
/// order, so the same digest and key always give the same signature.
pub fn sign(
    digest: &B256,
    key: &PrivateKey,
    convention: RecoveryConvention,
) -> Result<Signature, Error> {
    let signer = key.signer()?;
    let signature = signer.sign_hash_sync(digest)?;

    Ok(Signature::from_primitive(&signature, convention))
}

/// The output of [`SignatureGenerator::sign_parameters`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedPayload {
    /// ABI encoding of the parameters
    pub encoded: Vec<u8>,
    /// what was signed
    pub digest: B256,
    /// the signature over `digest`
    pub signature: Signature,
    /// address of the signing key
    pub signer: Address,
}

/// Runs encode → hash → sign with the caller's digest and `v` conventions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureGenerator {
    convention: RecoveryConvention,
    digest_mode: DigestMode,
}

impl SignatureGenerator {
    /// Create a new generator.
    pub const fn new(convention: RecoveryConvention, digest_mode: DigestMode) -> Self {
        Self { convention, digest_mode }
    }

    /// Set the recovery id convention.
    pub const fn with_convention(mut self, convention: RecoveryConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the digest mode.
    pub const fn with_digest_mode(mut self, digest_mode: DigestMode) -> Self {
        self.digest_mode = digest_mode;
        self
    }

    /// The recovery id convention.
    pub const fn convention(&self) -> RecoveryConvention {
        self.convention
    }

    /// The digest mode.
    pub const fn digest_mode(&self) -> DigestMode {
        self.digest_mode
    }

    /// ABI-encodes the parameters.
    pub fn encode(&self, parameters: &ParameterList) -> Result<Vec<u8>, Error> {
        mintsig_abi::encode(parameters).map_err(Into::into)
    }

    /// Digest of an encoding.
    pub fn digest(&self, encoded: &[u8]) -> B256 {
        self.digest_mode.apply(encoded)
    }

    /// Signs a digest.
    pub fn sign(&self, digest: &B256, key: &PrivateKey) -> Result<Signature, Error> {
        sign(digest, key, self.convention)
    }

    /// Encodes, hashes and signs `parameters`.
    #[instrument(
        skip_all,
        fields(
            signature = %parameters.signature(),
            convention = %self.convention,
            digest_mode = %self.digest_mode,
        ),
        err
    )]
    pub fn sign_parameters(
        &self,
        parameters: &ParameterList,
        key: &PrivateKey,
    ) -> Result<SignedPayload, Error> {
        let encoded = self.encode(parameters)?;
        let digest = self.digest(&encoded);
        debug!(len = encoded.len(), %digest, "encoded parameters");

        let signer = key.address()?;
        let signature = self.sign(&digest, key)?;
        debug!(%signer, v = signature.v(), "signed digest");

        Ok(SignedPayload { encoded, digest, signature, signer })
    }
}
