//! Vault sub-client — stats, previews, deposit and withdraw.

use super::{DepositResult, VaultStats, WithdrawResult, VAULT_TX_GAS_LIMIT};
use crate::chain::abi::IHyperFillVault;
use crate::chain::{call_contract, wait_for_receipt, Erc20, TxReceipt, TxRequest};
use crate::client::HyperFillClient;
use crate::domain::activity::LogKind;
use crate::domain::approval::{execute_approval, ApprovalContext, PreparedApproval};
use crate::error::{SdkError, WalletError};
use crate::shared::units::{format_units, to_base_units};
use crate::wallet::{Account, WalletSession};
use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolEvent;
use rust_decimal::Decimal;

pub struct Vault<'a> {
    pub(crate) client: &'a HyperFillClient,
}

impl<'a> Vault<'a> {
    fn address(&self) -> Address {
        self.client.config.vault_address
    }

    fn decimals(&self) -> u8 {
        self.client.config.vault_decimals
    }

    fn format(&self, value: U256) -> String {
        format_units(value, self.decimals())
    }

    /// Read every vault view plus the user's asset balance and allowance.
    pub async fn stats(&self, account: &Account) -> Result<VaultStats, SdkError> {
        let result = self.read_stats(account).await;
        self.log_failure("Failed to load vault stats", result).await
    }

    async fn read_stats(&self, account: &Account) -> Result<VaultStats, SdkError> {
        let user = account.address.to_evm().map_err(SdkError::Validation)?;
        let chain = self.client.chain.as_ref();
        let vault = self.address();
        let asset = Erc20::new(chain, self.client.config.vault_asset);

        let (
            user_shares,
            user_balance,
            total_assets,
            total_supply,
            share_price,
            available_assets,
            min_deposit,
            paused,
            asset_balance,
            asset_allowance,
        ) = futures_util::try_join!(
            call_contract(chain, vault, IHyperFillVault::getUserShareBalanceCall { user }),
            call_contract(chain, vault, IHyperFillVault::getBalanceUserCall { user }),
            call_contract(chain, vault, IHyperFillVault::totalAssetsCall {}),
            call_contract(chain, vault, IHyperFillVault::totalSupplyCall {}),
            call_contract(chain, vault, IHyperFillVault::getSharePriceCall {}),
            call_contract(chain, vault, IHyperFillVault::getAvailableAssetsCall {}),
            call_contract(chain, vault, IHyperFillVault::minDepositCall {}),
            call_contract(chain, vault, IHyperFillVault::pausedCall {}),
            asset.balance_of(user),
            asset.allowance(user, vault),
        )?;

        Ok(VaultStats {
            user_shares: self.format(user_shares._0),
            user_balance: self.format(user_balance._0),
            total_assets: self.format(total_assets._0),
            total_supply: self.format(total_supply._0),
            share_price: self.format(share_price._0),
            available_assets: self.format(available_assets._0),
            min_deposit: self.format(min_deposit._0),
            is_paused: paused._0,
            asset_balance: self.format(asset_balance),
            asset_allowance: self.format(asset_allowance),
        })
    }

    /// Shares `amount` of the asset would mint.
    pub async fn preview_deposit(&self, amount: Decimal) -> Result<String, SdkError> {
        let assets = self.to_units(amount)?;
        let ret = call_contract(
            self.client.chain.as_ref(),
            self.address(),
            IHyperFillVault::previewDepositCall { assets },
        )
        .await?;
        Ok(self.format(ret._0))
    }

    /// Assets `shares` would redeem for.
    pub async fn preview_redeem(&self, shares: Decimal) -> Result<String, SdkError> {
        let shares = self.to_units(shares)?;
        let ret = call_contract(
            self.client.chain.as_ref(),
            self.address(),
            IHyperFillVault::previewRedeemCall { shares },
        )
        .await?;
        Ok(self.format(ret._0))
    }

    /// Deposit `amount` of the vault asset.
    ///
    /// Checks amount, pause state and minimum deposit before anything is
    /// signed. When the vault's allowance is below `amount` an approval for
    /// exactly `amount` is sent and mined first. Every failure is logged.
    pub async fn deposit(
        &self,
        session: &WalletSession,
        amount: Decimal,
    ) -> Result<DepositResult, SdkError> {
        let result = self.run_deposit(session, amount).await;
        self.log_failure("Deposit failed", result).await
    }

    async fn run_deposit(
        &self,
        session: &WalletSession,
        amount: Decimal,
    ) -> Result<DepositResult, SdkError> {
        let (account, owner) = connected(session)?;
        let chain = self.client.chain.as_ref();
        let vault = self.address();

        if amount <= Decimal::ZERO {
            return Err(SdkError::Validation(
                "Deposit amount must be greater than zero".to_string(),
            ));
        }
        let assets = self.to_units(amount)?;

        let paused = call_contract(chain, vault, IHyperFillVault::pausedCall {}).await?;
        if paused._0 {
            return Err(SdkError::Validation("Vault is paused".to_string()));
        }
        let min = call_contract(chain, vault, IHyperFillVault::minDepositCall {}).await?;
        if assets < min._0 {
            return Err(SdkError::Validation(format!(
                "Minimum deposit is {}",
                self.format(min._0)
            )));
        }

        let asset = Erc20::new(chain, self.client.config.vault_asset);
        if asset.allowance(owner, vault).await? < assets {
            self.approve_asset(session, assets).await?;
        }

        self.client
            .log(format!("Depositing {} into the vault...", amount), LogKind::Info)
            .await;
        let tx = TxRequest::new(vault, IHyperFillVault::depositLiquidityCall { assets })
            .with_gas_limit(VAULT_TX_GAS_LIMIT);
        let receipt = self.send(session, &account, tx).await?;

        // LiquidityAdded(user indexed, assets, shares)
        let shares = event_word(&receipt, vault, IHyperFillVault::LiquidityAdded::SIGNATURE_HASH, 1);
        let result = DepositResult {
            tx_hash: receipt.transaction_hash,
            shares: self.format(shares),
            shares_units: shares,
        };
        self.client
            .log(
                format!("Deposit confirmed: received {} shares", result.shares),
                LogKind::Success,
            )
            .await;
        Ok(result)
    }

    /// Withdraw the caller's position through `withdrawProfits`.
    pub async fn withdraw(&self, session: &WalletSession) -> Result<WithdrawResult, SdkError> {
        let result = self.run_withdraw(session).await;
        self.log_failure("Withdraw failed", result).await
    }

    async fn run_withdraw(&self, session: &WalletSession) -> Result<WithdrawResult, SdkError> {
        let (account, _) = connected(session)?;
        let vault = self.address();

        self.client
            .log("Withdrawing from the vault...", LogKind::Info)
            .await;
        let tx = TxRequest::new(vault, IHyperFillVault::withdrawProfitsCall {})
            .with_gas_limit(VAULT_TX_GAS_LIMIT);
        let receipt = self.send(session, &account, tx).await?;

        // LiquidityRemoved(user indexed, assets, shares)
        let assets = event_word(&receipt, vault, IHyperFillVault::LiquidityRemoved::SIGNATURE_HASH, 0);
        let result = WithdrawResult {
            tx_hash: receipt.transaction_hash,
            assets: self.format(assets),
            assets_units: assets,
        };
        self.client
            .log(
                format!("Withdraw confirmed: received {}", result.assets),
                LogKind::Success,
            )
            .await;
        Ok(result)
    }

    /// Approve the vault to pull `amount` base units of the vault asset.
    pub async fn approve_asset(
        &self,
        session: &WalletSession,
        amount: U256,
    ) -> Result<TxReceipt, SdkError> {
        let (account, _) = connected(session)?;
        let wallet = session.provider()?;
        let prepared = PreparedApproval {
            attempt: 0,
            token: self.client.config.vault_asset,
            symbol: String::new(),
            amount,
        };
        let ctx = ApprovalContext {
            wallet: wallet.as_ref(),
            owner: &account.address,
            chain: self.client.chain.as_ref(),
            spender: self.address(),
            polling: &self.client.config.receipt_polling,
        };

        self.client
            .log("Approving vault deposit...", LogKind::Info)
            .await;
        match execute_approval(&ctx, &prepared).await {
            Ok(receipt) => {
                self.client
                    .log("Vault deposit approved", LogKind::Success)
                    .await;
                Ok(receipt)
            }
            Err(e) => {
                self.client
                    .log(format!("Approval failed: {}", e), LogKind::Error)
                    .await;
                Err(e.into())
            }
        }
    }

    async fn log_failure<T>(
        &self,
        context: &str,
        result: Result<T, SdkError>,
    ) -> Result<T, SdkError> {
        if let Err(e) = &result {
            self.client
                .log(format!("{}: {}", context, e), LogKind::Error)
                .await;
        }
        result
    }

    async fn send(
        &self,
        session: &WalletSession,
        account: &Account,
        tx: TxRequest,
    ) -> Result<TxReceipt, SdkError> {
        let wallet = session.provider()?;
        let hash = wallet.sign_and_submit(&account.address, tx).await?;
        tracing::info!(tx_hash = %hash, "Vault transaction submitted");
        let receipt = wait_for_receipt(
            self.client.chain.as_ref(),
            hash,
            &self.client.config.receipt_polling,
        )
        .await?;
        Ok(receipt)
    }

    fn to_units(&self, amount: Decimal) -> Result<U256, SdkError> {
        to_base_units(amount, self.decimals()).map_err(|e| SdkError::Validation(e.to_string()))
    }
}

fn connected(session: &WalletSession) -> Result<(Account, Address), SdkError> {
    let account = session.account().cloned().ok_or(WalletError::NotConnected)?;
    let owner = account.address.to_evm().map_err(SdkError::Validation)?;
    Ok((account, owner))
}

/// `index`-th data word of the first matching event, zero when absent.
fn event_word(receipt: &TxReceipt, address: Address, signature: B256, index: usize) -> U256 {
    receipt
        .logs_matching(address, signature)
        .next()
        .and_then(|log| log.word(index))
        .unwrap_or(U256::ZERO)
}
