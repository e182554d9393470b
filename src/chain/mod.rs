//! On-chain access: contract reads, transaction requests and receipts.
//!
//! Reads go through the [`ChainReader`] seam so the orchestration layer can be
//! driven by the JSON-RPC client in production and by in-memory fakes in tests.
//! Writes are signed and broadcast by the wallet (see [`crate::wallet`]); this
//! module only describes them ([`TxRequest`]) and waits for their receipts.

pub mod abi;
pub mod erc20;
#[cfg(feature = "http")]
pub mod rpc;

pub use erc20::Erc20;
#[cfg(feature = "http")]
pub use rpc::RpcClient;

use crate::error::ContractError;
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only access to the chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Execute a read-only call (`eth_call` at `latest`).
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ContractError>;

    /// Fetch a transaction receipt; `None` while the transaction is pending.
    async fn transaction_receipt(&self, hash: TxHash)
        -> Result<Option<TxReceipt>, ContractError>;
}

/// A contract write for the wallet to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub to: Address,
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
}

impl TxRequest {
    pub fn new<C: SolCall>(to: Address, call: C) -> Self {
        Self {
            to,
            data: Bytes::from(call.abi_encode()),
            value: None,
            gas_limit: None,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

/// A mined transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    /// `true` when the transaction succeeded, `false` when it reverted.
    pub status: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<ReceiptLog>,
}

impl TxReceipt {
    /// Logs emitted by `address` whose first topic is `signature`.
    pub fn logs_matching<'a>(
        &'a self,
        address: Address,
        signature: B256,
    ) -> impl Iterator<Item = &'a ReceiptLog> + 'a {
        self.logs
            .iter()
            .filter(move |log| log.address == address && log.topics.first() == Some(&signature))
    }
}

/// A single event log from a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl ReceiptLog {
    /// Read the `index`-th 32-byte word of the log data as a `U256`.
    pub fn word(&self, index: usize) -> Option<U256> {
        let start = index * 32;
        self.data
            .get(start..start + 32)
            .map(U256::from_be_slice)
    }
}

/// How long and how often to poll for a transaction receipt.
#[derive(Debug, Clone)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ReceiptPolling {
    fn attempts(&self) -> u128 {
        let interval = self.interval.as_millis().max(1);
        (self.timeout.as_millis() / interval).max(1)
    }
}

/// Encode `call`, run it against `to`, and decode the typed return.
pub async fn call_contract<C: SolCall>(
    chain: &dyn ChainReader,
    to: Address,
    call: C,
) -> Result<C::Return, ContractError> {
    let data = Bytes::from(call.abi_encode());
    let raw = chain.call(to, data).await?;
    C::abi_decode_returns(&raw, true).map_err(|e| ContractError::Decode(e.to_string()))
}

/// Poll until `hash` is mined. A reverted transaction is an error.
pub async fn wait_for_receipt(
    chain: &dyn ChainReader,
    hash: TxHash,
    polling: &ReceiptPolling,
) -> Result<TxReceipt, ContractError> {
    let attempts = polling.attempts();
    for attempt in 0..attempts {
        if let Some(receipt) = chain.transaction_receipt(hash).await? {
            if !receipt.status {
                return Err(ContractError::Reverted(hash.to_string()));
            }
            return Ok(receipt);
        }
        if attempt + 1 < attempts {
            tracing::debug!(attempt = attempt + 1, max = attempts, "Waiting for receipt of {}", hash);
            futures_timer::Delay::new(polling.interval).await;
        }
    }
    Err(ContractError::Timeout)
}
