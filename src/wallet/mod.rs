//! Wallet layer — the [`WalletProvider`] seam, account identity and the
//! connection lifecycle ([`WalletSession`]).
//!
//! The orchestration core never talks to a concrete wallet. Adapters implement
//! [`WalletProvider`]; [`Eip1193Wallet`] covers any EIP-1193 style provider
//! (browser extension bridge, embedded wallet, test double).

pub mod eip1193;
pub mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use eip1193::{Eip1193Transport, Eip1193Wallet, ProviderRpcError};
pub use session::{SessionUpdate, WalletSession};

use crate::chain::TxRequest;
use crate::error::WalletError;
use crate::shared::WalletAddress;
use alloy_primitives::TxHash;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// The connected account. Exists only while a wallet is connected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub address: WalletAddress,
    pub chain_id: u64,
}

impl Account {
    pub fn new(address: WalletAddress, chain_id: u64) -> Self {
        Self { address, chain_id }
    }

    /// `0x1234...abcd`
    pub fn to_display_address(&self) -> String {
        self.address.to_display_address()
    }
}

/// Native currency of a chain, as handed to `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to switch to (or add) a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl ChainSpec {
    /// Chain id in the `0x`-prefixed hex form wallets expect.
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

/// Notifications pushed by the wallet outside of any request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The authorized account list changed. Empty means the user disconnected.
    AccountsChanged(Vec<WalletAddress>),
    /// The wallet moved to another chain.
    ChainChanged(u64),
}

pub type WalletEventStream = BoxStream<'static, WalletEvent>;

/// Capability interface every wallet adapter implements.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is actually present behind this adapter.
    fn is_available(&self) -> bool {
        true
    }

    /// Ask the user to authorize accounts (may prompt).
    async fn connect(&self) -> Result<Vec<WalletAddress>, WalletError>;

    /// Accounts already authorized for this origin, without prompting.
    async fn accounts(&self) -> Result<Vec<WalletAddress>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Switch to `chain`, adding it to the wallet when unknown.
    async fn switch_network(&self, chain: &ChainSpec) -> Result<(), WalletError>;

    /// Release the connection on the wallet side, when the wallet supports it.
    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    /// Sign `tx` with `from` and broadcast it. Resolves once the wallet has
    /// submitted the transaction, not when it is mined.
    async fn sign_and_submit(
        &self,
        from: &WalletAddress,
        tx: TxRequest,
    ) -> Result<TxHash, WalletError>;

    /// Provider event stream, if the wallet emits events.
    fn subscribe(&self) -> Option<WalletEventStream> {
        None
    }
}
