//! Vault domain — liquidity deposits, profit withdrawals and share accounting.

#[cfg(feature = "http")]
pub mod client;

use alloy_primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};

/// Gas limit for `depositLiquidity` and `withdrawProfits`.
pub const VAULT_TX_GAS_LIMIT: u64 = 300_000;

/// Vault and per-user figures, in display units of the vault asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStats {
    pub user_shares: String,
    pub user_balance: String,
    pub total_assets: String,
    pub total_supply: String,
    pub share_price: String,
    pub available_assets: String,
    pub min_deposit: String,
    pub is_paused: bool,
    /// The user's wallet balance of the deposit asset.
    pub asset_balance: String,
    /// The user's allowance of the deposit asset towards the vault.
    pub asset_allowance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositResult {
    pub tx_hash: TxHash,
    /// Shares minted, from the `LiquidityAdded` event; `"0"` when absent.
    pub shares: String,
    pub shares_units: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawResult {
    pub tx_hash: TxHash,
    /// Assets paid out, from the `LiquidityRemoved` event; `"0"` when absent.
    pub assets: String,
    pub assets_units: U256,
}
