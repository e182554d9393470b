//! Approval domain — allowance checks and the per-attempt approval state machine.

pub mod checker;
pub mod orchestrator;

pub use checker::{AllowanceChecker, TokenInfoCache};
pub use orchestrator::{execute_approval, ApprovalContext, ApprovalOrchestrator, PreparedApproval};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Allowance status of one token for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenApproval {
    pub token_address: Address,
    pub symbol: String,
    pub decimals: u8,
    /// Current allowance in display units.
    pub current_allowance: String,
    /// Amount the order needs, in display units.
    pub required_amount: String,
    pub allowance_units: U256,
    pub required_units: U256,
    /// `allowance_units >= required_units`
    pub is_approved: bool,
}

/// Result of checking an order's approvals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCheck {
    pub needs_approval: bool,
    pub approvals: Vec<TokenApproval>,
}

impl ApprovalCheck {
    pub fn new(approvals: Vec<TokenApproval>) -> Self {
        Self {
            needs_approval: approvals.iter().any(|a| !a.is_approved),
            approvals,
        }
    }
}

/// Where one order attempt is in the approval / submission lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalPhase {
    #[default]
    Idle,
    CheckingApprovals,
    AwaitingUserApprovals,
    AllApproved,
    Submitting,
    Completed,
    Cancelled,
}

impl ApprovalPhase {
    /// Whether the attempt can still be cancelled.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            ApprovalPhase::CheckingApprovals
                | ApprovalPhase::AwaitingUserApprovals
                | ApprovalPhase::AllApproved
        )
    }
}
