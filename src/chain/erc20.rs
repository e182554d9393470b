//! Typed reads and approval requests for an ERC20 token.

use super::abi::IERC20;
use super::{call_contract, ChainReader, TxRequest};
use crate::error::ContractError;
use alloy_primitives::{Address, U256};

/// A token contract viewed through a [`ChainReader`].
pub struct Erc20<'a> {
    chain: &'a dyn ChainReader,
    token: Address,
}

impl<'a> Erc20<'a> {
    pub fn new(chain: &'a dyn ChainReader, token: Address) -> Self {
        Self { chain, token }
    }

    pub fn address(&self) -> Address {
        self.token
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ContractError> {
        let ret = call_contract(self.chain, self.token, IERC20::allowanceCall { owner, spender })
            .await?;
        Ok(ret._0)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ContractError> {
        let ret = call_contract(self.chain, self.token, IERC20::balanceOfCall { account }).await?;
        Ok(ret._0)
    }

    pub async fn decimals(&self) -> Result<u8, ContractError> {
        let ret = call_contract(self.chain, self.token, IERC20::decimalsCall {}).await?;
        Ok(ret._0)
    }

    pub async fn symbol(&self) -> Result<String, ContractError> {
        let ret = call_contract(self.chain, self.token, IERC20::symbolCall {}).await?;
        Ok(ret._0)
    }

    /// `approve(spender, amount)` for the wallet to sign.
    pub fn approve_request(&self, spender: Address, amount: U256) -> TxRequest {
        TxRequest::new(self.token, IERC20::approveCall { spender, amount })
    }
}
