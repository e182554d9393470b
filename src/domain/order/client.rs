//! Orders sub-client — register, cancel, query.

use super::wire::{
    AvailableFundsPayload, BestOrderPayload, CancelOrderPayload, RegisterOrderPayload,
};
use super::{OrderReceipt, OrderRequest};
use crate::client::HyperFillClient;
use crate::domain::STATUS_OK;
use crate::error::SdkError;
use crate::shared::{Side, WalletAddress};
use alloy_primitives::Address;
use serde_json::Value;

pub struct Orders<'a> {
    pub(crate) client: &'a HyperFillClient,
}

impl<'a> Orders<'a> {
    /// Register a limit order. A non-success `status_code` becomes
    /// [`SdkError::OrderRejected`]; nothing is retried.
    pub async fn register(
        &self,
        account: &WalletAddress,
        order: &OrderRequest,
    ) -> Result<OrderReceipt, SdkError> {
        let payload = RegisterOrderPayload::from((account, order));
        let resp = self.client.http.register_order(&payload).await?;
        OrderReceipt::try_from(resp)
    }

    pub async fn get(&self, order_id: &str) -> Result<Value, SdkError> {
        ensure_success(self.client.http.get_order(order_id).await?)
    }

    pub async fn cancel(
        &self,
        order_id: &str,
        side: Side,
        base_asset: &Address,
        quote_asset: &Address,
    ) -> Result<Value, SdkError> {
        let payload = CancelOrderPayload {
            order_id: order_id.to_string(),
            side,
            base_asset: base_asset.to_checksum(None),
            quote_asset: quote_asset.to_checksum(None),
        };
        ensure_success(self.client.http.cancel_order(&payload).await?)
    }

    /// Best resting order on `side` of the market.
    pub async fn best_order(
        &self,
        base_asset: &Address,
        quote_asset: &Address,
        side: Side,
    ) -> Result<Value, SdkError> {
        let payload = BestOrderPayload {
            base_asset: base_asset.to_checksum(None),
            quote_asset: quote_asset.to_checksum(None),
            side,
        };
        ensure_success(self.client.http.get_best_order(&payload).await?)
    }

    pub async fn check_available_funds(
        &self,
        account: &WalletAddress,
        asset: &Address,
    ) -> Result<Value, SdkError> {
        let payload = AvailableFundsPayload {
            account: account.clone(),
            asset: asset.to_checksum(None),
        };
        ensure_success(self.client.http.check_available_funds(&payload).await?)
    }

    pub async fn settlement_health(&self) -> Result<Value, SdkError> {
        Ok(self.client.http.settlement_health().await?)
    }
}

/// Map a `{status_code != 1, message}` envelope to [`SdkError::Api`].
fn ensure_success(value: Value) -> Result<Value, SdkError> {
    match value.get("status_code").and_then(Value::as_i64) {
        Some(code) if code != STATUS_OK => Err(SdkError::Api {
            status_code: code,
            message: value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string(),
        }),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ensure_success() {
        assert!(ensure_success(json!({"status_code": 1, "order": {}})).is_ok());
        assert!(ensure_success(json!({"healthy": true})).is_ok());
        match ensure_success(json!({"status_code": 0, "message": "order not found"})) {
            Err(SdkError::Api {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 0);
                assert_eq!(message, "order not found");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
