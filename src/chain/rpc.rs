//! JSON-RPC [`ChainReader`] over the shared HTTP client.

use super::{ChainReader, ReceiptLog, TxReceipt};
use crate::error::{ContractError, HttpError};
use crate::http::{HyperFillHttp, RetryPolicy};
use alloy_primitives::{Address, Bytes, TxHash, B256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReceipt {
    transaction_hash: TxHash,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    logs: Vec<WireLog>,
}

#[derive(Debug, Deserialize)]
struct WireLog {
    address: Address,
    #[serde(default)]
    topics: Vec<B256>,
    #[serde(default)]
    data: Bytes,
}

impl From<WireReceipt> for TxReceipt {
    fn from(r: WireReceipt) -> Self {
        TxReceipt {
            transaction_hash: r.transaction_hash,
            // Pre-Byzantium receipts carry no status; treat them as success.
            status: r.status.as_deref().and_then(parse_quantity).map_or(true, |s| s == 1),
            block_number: r.block_number.as_deref().and_then(parse_quantity),
            logs: r
                .logs
                .into_iter()
                .map(|l| ReceiptLog {
                    address: l.address,
                    topics: l.topics,
                    data: l.data,
                })
                .collect(),
        }
    }
}

fn parse_quantity(hex: &str) -> Option<u64> {
    u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok()
}

/// Chain reads against an Ethereum JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcClient {
    http: HyperFillHttp,
    url: String,
    next_id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(http: HyperFillHttp, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, ContractError> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let resp: RpcResponse<T> = self
            .http
            .post_json(&self.url, &body, RetryPolicy::Idempotent)
            .await
            .map_err(|e| match e {
                HttpError::Timeout => ContractError::Timeout,
                other => ContractError::Call(other.to_string()),
            })?;

        if let Some(err) = resp.error {
            tracing::debug!(method, code = err.code, message = %err.message, "JSON-RPC error");
            return Err(ContractError::Call(err.message));
        }
        Ok(resp.result)
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ContractError> {
        let params = json!([{ "to": to, "data": data }, "latest"]);
        self.request::<Bytes>("eth_call", params)
            .await?
            .ok_or_else(|| ContractError::Call("eth_call returned no result".to_string()))
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TxReceipt>, ContractError> {
        let receipt = self
            .request::<WireReceipt>("eth_getTransactionReceipt", json!([hash]))
            .await?;
        Ok(receipt.map(TxReceipt::from))
    }
}
