use crate::Error;
use alloy::primitives::{hex, Address, PrimitiveSignature, B256};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the recovery id `v` is rendered.
///
/// Verifying contracts disagree: Solidity's `ecrecover` wants 27/28 while some libraries expect
/// the raw y-parity bit.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecoveryConvention {
    /// v ∈ {27, 28}
    #[default]
    Legacy,
    /// v ∈ {0, 1}
    Parity,
}

impl RecoveryConvention {
    /// `v` for the given y-parity.
    pub const fn v(self, y_parity: bool) -> u8 {
        let offset = match self {
            Self::Legacy => 27,
            Self::Parity => 0,
        };
        offset + y_parity as u8
    }
}

/// An ECDSA signature with `v` normalised to a [`RecoveryConvention`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    v: u8,
    r: B256,
    s: B256,
}

impl Signature {
    /// Signature from its scalars and y-parity.
    pub const fn new(r: B256, s: B256, y_parity: bool, convention: RecoveryConvention) -> Self {
        Self { v: convention.v(y_parity), r, s }
    }

    pub(crate) fn from_primitive(sig: &PrimitiveSignature, convention: RecoveryConvention) -> Self {
        let r = B256::from(sig.r().to_be_bytes::<32>());
        let s = B256::from(sig.s().to_be_bytes::<32>());
        Self::new(r, s, sig.v(), convention)
    }

    /// The recovery id.
    pub const fn v(&self) -> u8 {
        self.v
    }

    /// The `r` scalar.
    pub const fn r(&self) -> B256 {
        self.r
    }

    /// The `s` scalar.
    pub const fn s(&self) -> B256 {
        self.s
    }

    /// Parity of the `y` coordinate of the nonce point.
    pub const fn y_parity(&self) -> bool {
        matches!(self.v, 1 | 28)
    }

    /// The convention `v` is currently rendered in.
    pub const fn convention(&self) -> RecoveryConvention {
        if self.v >= 27 {
            RecoveryConvention::Legacy
        } else {
            RecoveryConvention::Parity
        }
    }

    /// The same signature with `v` rendered per `convention`.
    pub const fn with_convention(self, convention: RecoveryConvention) -> Self {
        Self::new(self.r, self.s, self.y_parity(), convention)
    }

    /// `r ‖ s ‖ v`
    pub fn as_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v;
        out
    }

    /// Recovers the signer's address, given the digest that was signed.
    pub fn recover_address(&self, digest: &B256) -> Result<Address, Error> {
        PrimitiveSignature::from_scalars_and_parity(self.r, self.s, self.y_parity())
            .recover_address_from_prehash(digest)
            .map_err(Into::into)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    /// Splits `r ‖ s ‖ v`. `v` may be 0, 1, 27 or 28 and keeps its convention.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 65 {
            return Err(Error::MalformedSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }

        let v = bytes[64];
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(Error::MalformedSignature(format!("invalid recovery id {v}")));
        }

        Ok(Self { v, r: B256::from_slice(&bytes[..32]), s: B256::from_slice(&bytes[32..64]) })
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| Error::MalformedSignature(e.to_string()))?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

#[cfg(test)]
mod test {
    use super::{RecoveryConvention, Signature};
    use alloy::primitives::{b256, B256};

    // r = 0x7029.., s = 0x6463.., v = 27
    const SPLIT: &str = "0x7029c1577e891510dc73cb8e1537e44ac1371ce000ffd1389fab78ebeab37bb56463767d5cd09b87bb1b4a8f1c64b171a6c10147589ba543bca9a07f1f50432e1b";

    #[test]
    fn split_signature() {
        let sig: Signature = SPLIT.parse().unwrap();
        assert_eq!(sig.v(), 27);
        assert!(!sig.y_parity());
        assert_eq!(
            sig.r(),
            b256!("7029c1577e891510dc73cb8e1537e44ac1371ce000ffd1389fab78ebeab37bb5")
        );
        assert_eq!(
            sig.s(),
            b256!("6463767d5cd09b87bb1b4a8f1c64b171a6c10147589ba543bca9a07f1f50432e")
        );
        assert_eq!(sig.convention(), RecoveryConvention::Legacy);
        assert_eq!(sig.to_string(), SPLIT);
    }

    #[test]
    fn convention_round_trip() {
        let sig = Signature::new(
            B256::repeat_byte(1),
            B256::repeat_byte(2),
            true,
            RecoveryConvention::Legacy,
        );
        assert_eq!(sig.v(), 28);

        let parity = sig.with_convention(RecoveryConvention::Parity);
        assert_eq!(parity.v(), 1);
        assert!(parity.y_parity());
        assert_eq!(parity.r(), sig.r());
        assert_eq!(parity.s(), sig.s());
        assert_eq!(parity.with_convention(RecoveryConvention::Legacy), sig);

        assert_eq!(RecoveryConvention::Parity.v(false), 0);
        assert_eq!(RecoveryConvention::Legacy.v(false), 27);
    }

    #[test]
    fn bytes_layout() {
        let sig = Signature::new(
            B256::repeat_byte(0xaa),
            B256::repeat_byte(0xbb),
            false,
            RecoveryConvention::Parity,
        );
        let bytes = sig.as_bytes();
        assert!(bytes[..32].iter().all(|b| *b == 0xaa));
        assert!(bytes[32..64].iter().all(|b| *b == 0xbb));
        assert_eq!(bytes[64], 0);
        assert_eq!(Signature::try_from(&bytes[..]).unwrap(), sig);
    }

    #[test]
    fn rejects_malformed() {
        assert!("0x1234".parse::<Signature>().is_err());
        assert!("not hex".parse::<Signature>().is_err());

        let mut bytes = [0u8; 65];
        bytes[64] = 29;
        assert!(Signature::try_from(&bytes[..]).is_err());
        assert!(Signature::try_from(&bytes[..64]).is_err());
    }

    #[test]
    fn convention_names() {
        assert_eq!("legacy".parse::<RecoveryConvention>().unwrap(), RecoveryConvention::Legacy);
        assert_eq!("parity".parse::<RecoveryConvention>().unwrap(), RecoveryConvention::Parity);
        assert_eq!(RecoveryConvention::default(), RecoveryConvention::Legacy);
        assert_eq!(RecoveryConvention::Parity.to_string(), "parity");
    }
}
