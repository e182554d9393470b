//! Shared newtypes and utilities used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw format the backend and the wallet send, so they can be used directly
//! in wire types without conversion overhead.

pub mod serde_util;
pub mod units;

pub use units::{format_units, parse_decimal, to_base_units, UnitsError};

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── WalletAddress ───────────────────────────────────────────────────────────

/// A wallet account address as reported by the wallet provider.
///
/// Kept as the provider's string form (EVM `0x…` hex today). Serializes
/// transparently as a JSON string and can be used as a HashMap key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display: `0x1234...abcd`.
    pub fn to_display_address(&self) -> String {
        format_address(&self.0)
    }

    /// Parse as an EVM address.
    pub fn to_evm(&self) -> Result<Address, String> {
        Address::from_str(&self.0).map_err(|e| format!("invalid address '{}': {}", self.0, e))
    }

    pub fn from_evm(address: Address) -> Self {
        Self(address.to_checksum(None))
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self::from_evm(address)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(WalletAddress(s))
    }
}

// ─── Side ────────────────────────────────────────────────────────────────────

/// Order side: Bid (buy) or Ask (sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Bid => "bid",
            Side::Ask => "ask",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    /// Accepts both the wire form (`bid`/`ask`) and the form labels (`buy`/`sell`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bid" | "buy" => Ok(Side::Bid),
            "ask" | "sell" => Ok(Side::Ask),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

// ─── Utilities ───────────────────────────────────────────────────────────────

/// Shorten an address to `0x1234...abcd`.
pub fn format_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Parse a token contract address.
pub fn parse_token_address(s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|e| format!("invalid token address '{}': {}", s, e))
}

/// Orderbook symbol for a market: `{base_address}_{quote_address}`.
pub fn market_symbol(base: &Address, quote: &Address) -> String {
    format!("{}_{}", base.to_checksum(None), quote.to_checksum(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_address_is_shortened() {
        let addr = WalletAddress::new("0x2B8C9cd22eFd93e15ff4A7cB7A0ef0A16Eb435C3");
        assert_eq!(addr.to_display_address(), "0x2B8C...35C3");
    }

    #[test]
    fn test_short_address_is_untouched() {
        assert_eq!(format_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_wallet_address_serde() {
        let addr = WalletAddress::new("0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5\"");
        let back: WalletAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn test_wallet_address_to_evm() {
        let addr = WalletAddress::new("0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5");
        assert!(addr.to_evm().is_ok());
        assert!(WalletAddress::new("not-an-address").to_evm().is_err());
    }

    #[test]
    fn test_side_serde() {
        let bid: Side = serde_json::from_str("\"bid\"").unwrap();
        assert_eq!(bid, Side::Bid);
        let ask: Side = serde_json::from_str("\"ask\"").unwrap();
        assert_eq!(ask, Side::Ask);
        assert_eq!(serde_json::to_string(&Side::Bid).unwrap(), "\"bid\"");
    }

    #[test]
    fn test_side_from_form_labels() {
        assert_eq!("buy".parse::<Side>().unwrap(), Side::Bid);
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Ask);
        assert!("hold".parse::<Side>().is_err());
    }

    #[test]
    fn test_market_symbol() {
        let base = parse_token_address("0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5").unwrap();
        let quote = parse_token_address("0x2B8C9cd22eFd93e15ff4A7cB7A0ef0A16Eb435C3").unwrap();
        assert_eq!(
            market_symbol(&base, &quote).to_lowercase(),
            "0x8efcf5c2ddda6c1a63d8395965ca6c0609ce32d5_0x2b8c9cd22efd93e15ff4a7cb7a0ef0a16eb435c3"
        );
    }
}
