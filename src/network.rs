//! Network constants for the HyperFill SDK.

use crate::wallet::{ChainSpec, NativeCurrency};

/// Default orderbook REST API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:8001";

/// Default agent-control API base URL.
pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000";

/// Default chain JSON-RPC endpoint (SEI testnet EVM).
pub const DEFAULT_RPC_URL: &str = "https://evm-rpc-testnet.sei-apis.com";

/// HyperFill vault on SEI testnet.
pub const VAULT_ADDRESS: &str = "0x2B8C9cd22eFd93e15ff4A7cB7A0ef0A16Eb435C3";

/// Wrapped SEI (the vault's deposit asset) on SEI testnet.
pub const WSEI_ADDRESS: &str = "0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5";

pub const SEI_TESTNET_CHAIN_ID: u64 = 1328;

/// Chain definition handed to the wallet when it has to add SEI testnet.
pub fn sei_testnet() -> ChainSpec {
    ChainSpec {
        chain_id: SEI_TESTNET_CHAIN_ID,
        chain_name: "SEI Testnet".to_string(),
        native_currency: NativeCurrency {
            name: "SEI".to_string(),
            symbol: "SEI".to_string(),
            decimals: 18,
        },
        rpc_urls: vec![DEFAULT_RPC_URL.to_string()],
        block_explorer_urls: vec!["https://seitrace.com".to_string()],
    }
}
