//! Conversions: order wire types ↔ order domain types.

use super::wire::{RegisterOrderPayload, RegisterOrderResponse};
use super::{OrderReceipt, OrderRequest};
use crate::domain::STATUS_OK;
use crate::error::SdkError;
use crate::shared::WalletAddress;

impl From<(&WalletAddress, &OrderRequest)> for RegisterOrderPayload {
    fn from((account, order): (&WalletAddress, &OrderRequest)) -> Self {
        Self {
            account: account.clone(),
            base_asset: order.base_asset.to_checksum(None),
            quote_asset: order.quote_asset.to_checksum(None),
            price: order.price,
            quantity: order.quantity,
            side: order.side,
        }
    }
}

impl TryFrom<RegisterOrderResponse> for OrderReceipt {
    type Error = SdkError;

    fn try_from(resp: RegisterOrderResponse) -> Result<Self, Self::Error> {
        if resp.status_code != STATUS_OK {
            return Err(SdkError::OrderRejected {
                message: resp
                    .message
                    .unwrap_or_else(|| format!("status_code {}", resp.status_code)),
                errors: resp.errors,
            });
        }
        let order = resp.order.ok_or_else(|| {
            SdkError::Other("register_order succeeded without an order".to_string())
        })?;
        Ok(OrderReceipt {
            order_id: order.order_id,
            trades: order.trades,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_carries_server_message() {
        let resp: RegisterOrderResponse =
            serde_json::from_str(r#"{"status_code":0,"message":"insufficient size"}"#).unwrap();
        match OrderReceipt::try_from(resp) {
            Err(SdkError::OrderRejected { message, errors }) => {
                assert_eq!(message, "insufficient size");
                assert!(errors.is_none());
            }
            other => panic!("expected OrderRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_success_becomes_receipt() {
        let resp: RegisterOrderResponse =
            serde_json::from_str(r#"{"status_code":1,"order":{"orderId":"X","trades":[]}}"#)
                .unwrap();
        let receipt = OrderReceipt::try_from(resp).unwrap();
        assert_eq!(receipt.order_id, "X");
        assert!(!receipt.is_matched());
    }
}
