//! [`WalletProvider`] over an EIP-1193 `request({ method, params })` transport.

use super::{ChainSpec, WalletEventStream, WalletProvider};
use crate::chain::TxRequest;
use crate::error::WalletError;
use crate::shared::WalletAddress;
use alloy_primitives::TxHash;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::str::FromStr;

/// User rejected the request.
pub const USER_REJECTED: i64 = 4001;
/// The requested chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// Error object returned by an EIP-1193 provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ProviderRpcError> for WalletError {
    fn from(e: ProviderRpcError) -> Self {
        match e.code {
            USER_REJECTED => WalletError::UserRejected,
            code => WalletError::Provider {
                code,
                message: e.message,
            },
        }
    }
}

/// The raw `request` entry point of an injected provider.
#[async_trait]
pub trait Eip1193Transport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// `accountsChanged` / `chainChanged` notifications, if the bridge forwards them.
    fn subscribe(&self) -> Option<WalletEventStream> {
        None
    }
}

/// EVM wallet adapter.
pub struct Eip1193Wallet<T> {
    transport: T,
}

impl<T: Eip1193Transport> Eip1193Wallet<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request_accounts(&self, method: &str) -> Result<Vec<WalletAddress>, WalletError> {
        let value = self.transport.request(method, json!([])).await?;
        parse_accounts(value)
    }

    async fn add_chain(&self, chain: &ChainSpec) -> Result<(), WalletError> {
        let params = json!([{
            "chainId": chain.chain_id_hex(),
            "chainName": chain.chain_name,
            "nativeCurrency": chain.native_currency,
            "rpcUrls": chain.rpc_urls,
            "blockExplorerUrls": chain.block_explorer_urls,
        }]);
        match self.transport.request("wallet_addEthereumChain", params).await {
            Ok(_) => Ok(()),
            Err(e) if e.code == USER_REJECTED => Err(WalletError::UserRejected),
            Err(e) => {
                tracing::warn!(code = e.code, message = %e.message, "wallet_addEthereumChain failed");
                Err(WalletError::UnsupportedChain(chain.chain_id))
            }
        }
    }
}

#[async_trait]
impl<T: Eip1193Transport> WalletProvider for Eip1193Wallet<T> {
    async fn connect(&self) -> Result<Vec<WalletAddress>, WalletError> {
        self.request_accounts("eth_requestAccounts").await
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, WalletError> {
        self.request_accounts("eth_accounts").await
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let value = self.transport.request("eth_chainId", json!([])).await?;
        parse_chain_id(&value)
    }

    async fn switch_network(&self, chain: &ChainSpec) -> Result<(), WalletError> {
        let params = json!([{ "chainId": chain.chain_id_hex() }]);
        match self
            .transport
            .request("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.code == UNRECOGNIZED_CHAIN => {
                tracing::info!(chain_id = chain.chain_id, "Chain unknown to wallet, adding it");
                self.add_chain(chain).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn sign_and_submit(
        &self,
        from: &WalletAddress,
        tx: TxRequest,
    ) -> Result<TxHash, WalletError> {
        let mut params = json!({
            "from": from.as_str(),
            "to": tx.to.to_checksum(None),
            "data": tx.data.to_string(),
        });
        if let Some(value) = tx.value {
            params["value"] = json!(format!("{:#x}", value));
        }
        if let Some(gas) = tx.gas_limit {
            params["gas"] = json!(format!("{:#x}", gas));
        }

        let value = self
            .transport
            .request("eth_sendTransaction", json!([params]))
            .await?;
        let hash = value.as_str().ok_or_else(|| WalletError::Provider {
            code: -32603,
            message: format!("unexpected transaction hash: {}", value),
        })?;
        TxHash::from_str(hash).map_err(|e| WalletError::Provider {
            code: -32603,
            message: format!("invalid transaction hash '{}': {}", hash, e),
        })
    }

    fn subscribe(&self) -> Option<WalletEventStream> {
        self.transport.subscribe()
    }
}

fn parse_accounts(value: Value) -> Result<Vec<WalletAddress>, WalletError> {
    let accounts: Vec<String> = serde_json::from_value(value).map_err(|e| WalletError::Provider {
        code: -32603,
        message: format!("unexpected accounts response: {}", e),
    })?;
    Ok(accounts.into_iter().map(WalletAddress::from).collect())
}

/// Chain ids arrive as `0x`-hex strings, occasionally as decimal numbers.
fn parse_chain_id(value: &Value) -> Result<u64, WalletError> {
    let parsed = match value {
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| WalletError::Provider {
        code: -32603,
        message: format!("unexpected chain id: {}", value),
    })
}
