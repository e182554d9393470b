//! Which token an order needs approved, and whether the allowance covers it.

use super::{ApprovalCheck, TokenApproval};
use crate::chain::{ChainReader, Erc20};
use crate::domain::order::OrderRequest;
use crate::error::{SdkError, WalletError};
use crate::shared::units::{format_units, to_base_units_ceil};
use crate::wallet::Account;
use alloy_primitives::Address;
use async_lock::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Decimals and symbols of the tokens seen so far. Neither changes for a
/// deployed token.
#[derive(Debug, Default)]
pub struct TokenInfoCache {
    decimals: RwLock<HashMap<Address, u8>>,
    symbols: RwLock<HashMap<Address, String>>,
}

impl TokenInfoCache {
    pub async fn clear(&self) {
        self.decimals.write().await.clear();
        self.symbols.write().await.clear();
    }
}

/// Reads ERC20 allowances of the order's owner towards the settlement contract.
///
/// Token decimals and symbols are read once per token and cached.
#[derive(Clone)]
pub struct AllowanceChecker {
    chain: Arc<dyn ChainReader>,
    spender: Address,
    cache: Arc<TokenInfoCache>,
}

impl AllowanceChecker {
    pub fn new(chain: Arc<dyn ChainReader>, spender: Address) -> Self {
        Self::with_cache(chain, spender, Arc::default())
    }

    /// Share token metadata with other checkers.
    pub fn with_cache(
        chain: Arc<dyn ChainReader>,
        spender: Address,
        cache: Arc<TokenInfoCache>,
    ) -> Self {
        Self {
            chain,
            spender,
            cache,
        }
    }

    pub fn spender(&self) -> Address {
        self.spender
    }

    /// Approval status of the token `order` spends: the quote asset for
    /// `quantity × price` on a bid, the base asset for `quantity` on an ask.
    pub async fn check_order_approvals(
        &self,
        account: Option<&Account>,
        order: &OrderRequest,
    ) -> Result<ApprovalCheck, SdkError> {
        let account = account.ok_or(WalletError::NotConnected)?;
        let owner = account.address.to_evm().map_err(SdkError::Validation)?;
        let spend = order
            .spend()
            .map_err(|e| SdkError::Validation(e.to_string()))?;

        let approval = self.check_token(owner, spend.token, spend.amount).await?;
        tracing::debug!(
            token = %approval.token_address,
            allowance = %approval.current_allowance,
            required = %approval.required_amount,
            approved = approval.is_approved,
            "Allowance checked"
        );
        Ok(ApprovalCheck::new(vec![approval]))
    }

    /// Compare `owner`'s allowance of `token` with `amount` (display units).
    ///
    /// The comparison is done in integer base units; an amount with more
    /// fractional digits than the token supports is rounded up.
    pub async fn check_token(
        &self,
        owner: Address,
        token: Address,
        amount: Decimal,
    ) -> Result<TokenApproval, SdkError> {
        let erc20 = Erc20::new(self.chain.as_ref(), token);
        let decimals = self.token_decimals(&erc20).await?;
        let allowance = erc20.allowance(owner, self.spender).await?;
        let required =
            to_base_units_ceil(amount, decimals).map_err(|e| SdkError::Validation(e.to_string()))?;
        let symbol = self.token_symbol(&erc20).await;

        Ok(TokenApproval {
            token_address: token,
            symbol,
            decimals,
            current_allowance: format_units(allowance, decimals),
            required_amount: amount.normalize().to_string(),
            allowance_units: allowance,
            required_units: required,
            is_approved: allowance >= required,
        })
    }

    async fn token_decimals(&self, erc20: &Erc20<'_>) -> Result<u8, SdkError> {
        if let Some(d) = self.cache.decimals.read().await.get(&erc20.address()) {
            return Ok(*d);
        }
        let decimals = erc20.decimals().await?;
        self.cache
            .decimals
            .write()
            .await
            .insert(erc20.address(), decimals);
        Ok(decimals)
    }

    /// Token symbol, or the first six address characters plus `...` when the
    /// token does not expose one.
    async fn token_symbol(&self, erc20: &Erc20<'_>) -> String {
        if let Some(s) = self.cache.symbols.read().await.get(&erc20.address()) {
            return s.clone();
        }
        match erc20.symbol().await {
            Ok(symbol) => {
                self.cache
                    .symbols
                    .write()
                    .await
                    .insert(erc20.address(), symbol.clone());
                symbol
            }
            Err(e) => {
                tracing::debug!(token = %erc20.address(), error = %e, "symbol() failed");
                let address = erc20.address().to_checksum(None);
                format!("{}...", &address[..6])
            }
        }
    }
}
