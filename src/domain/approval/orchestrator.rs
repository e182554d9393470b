//! Per-attempt approval state machine.
//!
//! One [`ApprovalOrchestrator`] tracks one order attempt at a time:
//!
//! ```text
//! Idle ─begin─▶ CheckingApprovals ─present─▶ AwaitingUserApprovals ─(all approved)─▶ AllApproved
//!                     │                              │                                   │
//!                     └──────────── cancel ──────────┴────────────── cancel ─────────────┤
//!                                                                                        ▼
//!                          Completed ◀─complete─ Submitting ◀─begin_submit─────── (AllApproved)
//! ```
//!
//! Approving a token is split in three so a caller holding the orchestrator
//! behind a lock does not keep it locked while the wallet prompts:
//! [`prepare_approval`](ApprovalOrchestrator::prepare_approval) (under the lock),
//! [`execute_approval`] (no lock), [`record_approval`](ApprovalOrchestrator::record_approval)
//! (under the lock, ignored when the attempt moved on meanwhile).

use super::{ApprovalCheck, ApprovalPhase, TokenApproval};
use crate::chain::{wait_for_receipt, ChainReader, Erc20, ReceiptPolling, TxReceipt};
use crate::error::{ContractError, SdkError, WalletError};
use crate::shared::WalletAddress;
use crate::wallet::WalletProvider;
use alloy_primitives::{Address, U256};
use std::collections::HashSet;

/// What an approval transaction needs from the outside world.
pub struct ApprovalContext<'a> {
    pub wallet: &'a dyn WalletProvider,
    pub owner: &'a WalletAddress,
    pub chain: &'a dyn ChainReader,
    pub spender: Address,
    pub polling: &'a ReceiptPolling,
}

/// An approval about to be sent, tied to the attempt that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedApproval {
    pub attempt: u64,
    pub token: Address,
    pub symbol: String,
    /// Base units to approve: exactly what the order needs.
    pub amount: U256,
}

#[derive(Debug, Default)]
pub struct ApprovalOrchestrator {
    phase: ApprovalPhase,
    attempt: u64,
    approvals: Vec<TokenApproval>,
    approved: HashSet<Address>,
}

impl ApprovalOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ApprovalPhase {
        self.phase
    }

    /// Id of the current attempt; bumps on every [`begin`](Self::begin).
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Start a new attempt. Approvals recorded for a previous attempt are
    /// dropped.
    pub fn begin(&mut self) -> u64 {
        self.attempt += 1;
        self.approvals.clear();
        self.approved.clear();
        self.phase = ApprovalPhase::CheckingApprovals;
        self.attempt
    }

    /// The allowance check failed; nothing is pending.
    pub fn fail_check(&mut self) {
        if self.phase == ApprovalPhase::CheckingApprovals {
            self.phase = ApprovalPhase::Idle;
        }
    }

    /// Record the check result. Returns `false` (and changes nothing) when the
    /// attempt is no longer checking, e.g. it was cancelled meanwhile.
    pub fn present(&mut self, check: ApprovalCheck) -> bool {
        if self.phase != ApprovalPhase::CheckingApprovals {
            return false;
        }
        self.approvals = check.approvals;
        self.phase = if self.all_approved() {
            ApprovalPhase::AllApproved
        } else {
            ApprovalPhase::AwaitingUserApprovals
        };
        true
    }

    /// Approvals of the current attempt, with tokens approved since the check
    /// marked as approved.
    pub fn approvals(&self) -> Vec<TokenApproval> {
        self.approvals
            .iter()
            .map(|a| {
                let mut a = a.clone();
                a.is_approved = self.is_token_approved(&a);
                a
            })
            .collect()
    }

    fn is_token_approved(&self, approval: &TokenApproval) -> bool {
        approval.is_approved || self.approved.contains(&approval.token_address)
    }

    pub fn all_approved(&self) -> bool {
        self.approvals.iter().all(|a| self.is_token_approved(a))
    }

    /// Validate that `token` can be approved now and capture what to send.
    pub fn prepare_approval(&self, token: Address) -> Result<PreparedApproval, SdkError> {
        if self.phase != ApprovalPhase::AwaitingUserApprovals {
            return Err(SdkError::Validation(
                "No order is awaiting approvals".to_string(),
            ));
        }
        let approval = self
            .approvals
            .iter()
            .find(|a| a.token_address == token)
            .ok_or_else(|| {
                SdkError::Validation(format!("Token {} is not part of this order", token))
            })?;
        Ok(PreparedApproval {
            attempt: self.attempt,
            token,
            symbol: approval.symbol.clone(),
            amount: approval.required_units,
        })
    }

    /// Mark a prepared approval as mined. Returns `false` when the attempt it
    /// belongs to was cancelled or replaced.
    pub fn record_approval(&mut self, prepared: &PreparedApproval) -> bool {
        if prepared.attempt != self.attempt || self.phase != ApprovalPhase::AwaitingUserApprovals {
            return false;
        }
        self.mark_approved(prepared.token);
        true
    }

    /// Mark `token` approved; moves to `AllApproved` once every token is.
    pub fn mark_approved(&mut self, token: Address) {
        self.approved.insert(token);
        if self.phase == ApprovalPhase::AwaitingUserApprovals && self.all_approved() {
            self.phase = ApprovalPhase::AllApproved;
        }
    }

    /// Approve `token` end to end: prepare, send, wait, record. For callers
    /// that own the orchestrator outright.
    pub async fn approve_token(
        &mut self,
        ctx: &ApprovalContext<'_>,
        token: Address,
    ) -> Result<TxReceipt, SdkError> {
        let prepared = self.prepare_approval(token)?;
        let receipt = execute_approval(ctx, &prepared).await?;
        self.record_approval(&prepared);
        Ok(receipt)
    }

    pub fn begin_submit(&mut self) -> Result<(), SdkError> {
        if self.phase != ApprovalPhase::AllApproved {
            return Err(SdkError::Validation(
                "Token approvals are still required".to_string(),
            ));
        }
        self.phase = ApprovalPhase::Submitting;
        Ok(())
    }

    pub fn complete(&mut self) {
        if self.phase == ApprovalPhase::Submitting {
            self.phase = ApprovalPhase::Completed;
        }
    }

    /// The submission failed; the attempt is over and nothing is pending.
    pub fn abort_submit(&mut self) {
        if self.phase == ApprovalPhase::Submitting {
            self.phase = ApprovalPhase::Idle;
        }
    }

    /// Cancel the attempt before submission. Returns `false` when there is
    /// nothing to cancel. Approvals already mined stay on chain.
    pub fn cancel(&mut self) -> bool {
        if !self.phase.is_cancellable() {
            return false;
        }
        self.phase = ApprovalPhase::Cancelled;
        self.approvals.clear();
        self.approved.clear();
        true
    }

    /// Drop the attempt whatever its phase, e.g. when the wallet that
    /// started it is gone. Late approvals of the attempt are ignored.
    pub fn reset(&mut self) {
        self.phase = ApprovalPhase::Idle;
        self.approvals.clear();
        self.approved.clear();
    }
}

/// Send `approve(spender, amount)` through the wallet and wait for it to be
/// mined.
pub async fn execute_approval(
    ctx: &ApprovalContext<'_>,
    prepared: &PreparedApproval,
) -> Result<TxReceipt, ContractError> {
    let tx = Erc20::new(ctx.chain, prepared.token).approve_request(ctx.spender, prepared.amount);
    tracing::info!(
        token = %prepared.token,
        spender = %ctx.spender,
        amount = %prepared.amount,
        "Requesting token approval"
    );

    let hash = ctx
        .wallet
        .sign_and_submit(ctx.owner, tx)
        .await
        .map_err(|e| match e {
            WalletError::UserRejected => ContractError::ApprovalRejected,
            other => ContractError::ApprovalTransactionFailed(other.to_string()),
        })?;

    wait_for_receipt(ctx.chain, hash, ctx.polling)
        .await
        .map_err(|e| ContractError::ApprovalTransactionFailed(e.to_string()))
}
