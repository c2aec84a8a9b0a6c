//! Account addresses
//!
//! Signers, wallets, tokens and the factory are all identified by a
//! 20-byte address, written as `0x` followed by 40 hex characters.

use crate::crypto::{sha256, sha256_concat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Address length in bytes
pub const ADDRESS_LEN: usize = 20;

/// Errors produced when parsing an address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected {} hex characters, got {0}", ADDRESS_LEN * 2)]
    InvalidLength(usize),
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The zero address, never a valid signer, recipient or wallet
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Wrap raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the zero address
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Deterministic address for a human-readable label
    ///
    /// Address = SHA256(label)[..20]
    pub fn from_seed(label: &str) -> Self {
        Self::truncate(&sha256(label.as_bytes()))
    }

    /// Address of the `nonce`-th object created by `deployer`
    ///
    /// Address = SHA256(deployer || nonce_be)[..20]
    pub fn derive(deployer: &Address, nonce: u64) -> Self {
        Self::truncate(&sha256_concat(&[deployer.as_bytes(), &nonce.to_be_bytes()]))
    }

    fn truncate(hash: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&hash[..ADDRESS_LEN]);
        Self(bytes)
    }

    /// Shortened form for log lines and CLI output, e.g. `0x1a2b3c…9f8e`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}…{}", &full[..8], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }

        let decoded = hex::decode(digits).map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let address = Address::from_seed("alice");
        let text = address.to_string();

        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(text.parse::<Address>().unwrap(), address);

        // Prefix and case are optional
        let upper = text[2..].to_uppercase();
        assert_eq!(upper.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(AddressError::InvalidLength(4))
        ));
        assert!(matches!(
            "0xzz00000000000000000000000000000000000000".parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        let zero: Address = "0x0000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(zero, Address::ZERO);
        assert!(zero.is_zero());
        assert!(!Address::from_seed("bob").is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn test_derivation_is_deterministic_and_distinct() {
        let deployer = Address::from_seed("factory");

        assert_eq!(Address::derive(&deployer, 1), Address::derive(&deployer, 1));
        assert_ne!(Address::derive(&deployer, 1), Address::derive(&deployer, 2));
        assert_ne!(
            Address::derive(&deployer, 1),
            Address::derive(&Address::from_seed("other"), 1)
        );
        assert_ne!(Address::from_seed("alice"), Address::from_seed("bob"));
    }

    #[test]
    fn test_serde_uses_text_form() {
        let address = Address::from_seed("carol");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);

        assert!(serde_json::from_str::<Address>("\"0x12\"").is_err());
    }
}
