//! Function selectors
//!
//! A selector is the first 4 bytes of the Keccak-256 digest of a signature,
//! exactly as the EVM ABI derives them. Any other hash family would make every
//! "collision" meaningless on-chain.

use core::fmt;
use core::str::FromStr;

use sha3::{Digest, Keccak256};

use crate::error::SearchError;
use crate::params::SELECTOR_SIZE;

/// 4-byte Keccak-256 prefix of a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector([u8; SELECTOR_SIZE]);

impl Selector {
    pub const fn from_bytes(bytes: [u8; SELECTOR_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SELECTOR_SIZE] {
        &self.0
    }

    /// Lowercase hex without a `0x` prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Selector {
    type Err = SearchError;

    /// Accepts `a9059cbb` or `0xa9059cbb` (any case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let mut bytes = [0u8; SELECTOR_SIZE];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| SearchError::InvalidSelector(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; SELECTOR_SIZE]> for Selector {
    fn from(bytes: [u8; SELECTOR_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Compute the selector of an arbitrary byte string
///
/// # Example
///
/// ```rust
/// use collider_core::selector;
///
/// assert_eq!(selector(b"transfer(address,uint256)").to_hex(), "a9059cbb");
/// ```
#[inline]
pub fn selector(input: &[u8]) -> Selector {
    let digest = Keccak256::digest(input);
    let mut bytes = [0u8; SELECTOR_SIZE];
    bytes.copy_from_slice(&digest[..SELECTOR_SIZE]);
    Selector(bytes)
}

/// What the search is looking for
///
/// A target always has a selector. It usually also has the signature it came
/// from; that exact string is never reported as its own collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    signature: Option<String>,
    selector: Selector,
}

impl Target {
    /// Target the selector of a known signature
    pub fn from_signature(signature: impl Into<String>) -> Self {
        let signature = signature.into();
        let selector = selector(signature.as_bytes());
        Self {
            signature: Some(signature),
            selector,
        }
    }

    /// Target a raw selector with no known pre-image
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            signature: None,
            selector,
        }
    }

    /// Target a raw selector, excluding `signature` from the results
    ///
    /// The signature does not have to hash to `selector`.
    pub fn with_excluded(selector: Selector, signature: impl Into<String>) -> Self {
        Self {
            signature: Some(signature.into()),
            selector,
        }
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// True if `candidate` is the target signature itself
    #[inline]
    pub fn is_self(&self, candidate: &[u8]) -> bool {
        self.signature
            .as_deref()
            .is_some_and(|sig| sig.as_bytes() == candidate)
    }
}
