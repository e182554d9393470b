//! # HyperFill SDK
//!
//! Orchestration core for the HyperFill orderbook and liquidity vault on SEI
//! EVM: wallet session, ERC20 allowance checks, the approval state machine,
//! order submission and an activity log.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Shared types, domain models, unit conversion (always available)
//! 2. **Chain** — ABI bindings, the `ChainReader` seam, receipt polling
//! 3. **Wallet** — The `WalletProvider` seam, EIP-1193 adapter, `WalletSession`
//! 4. **HTTP API** — `HyperFillHttp` with per-endpoint retry policies
//! 5. **High-Level Client** — `HyperFillClient` with nested sub-clients, and
//!    the `OrderSubmissionFlow` built on top of it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hyperfill_sdk::prelude::*;
//!
//! let client = HyperFillClient::builder()
//!     .api_url("http://localhost:8001")
//!     .build()?;
//!
//! let mut session = WalletSession::new(Some(wallet), client.config().chain.clone());
//! client.connect_wallet(&mut session).await?;
//!
//! let flow = client.submission_flow();
//! let form = OrderForm::new(base, quote, "2", "10", "buy");
//! match flow.submit(&session, &form).await? {
//!     SubmitOutcome::AwaitingApprovals(tokens) => {
//!         for t in tokens.iter().filter(|t| !t.is_approved) {
//!             flow.approve_token(&session, t.token_address).await?;
//!         }
//!         flow.continue_submission(&session).await?;
//!     }
//!     SubmitOutcome::Submitted(receipt) => println!("order {}", receipt.order_id),
//!     SubmitOutcome::Cancelled => {}
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and unit conversion used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network constants: endpoints, contract addresses, the SEI testnet chain.
pub mod network;

// ── Layer 2: Chain ───────────────────────────────────────────────────────────

/// Contract bindings, read seam and receipt polling.
pub mod chain;

// ── Layer 3: Wallet ──────────────────────────────────────────────────────────

/// Wallet provider seam and connection lifecycle.
pub mod wallet;

// ── Layer 4: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `HyperFillClient` — the primary entry point.
#[cfg(feature = "http")]
pub mod client;

/// Order submission with the approval round-trip.
#[cfg(feature = "http")]
pub mod flow;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{market_symbol, Side, WalletAddress};

    // Domain types — activity
    pub use crate::domain::activity::{ActivityLog, LogEntry, LogKind};

    // Domain types — approvals
    pub use crate::domain::approval::{
        AllowanceChecker, ApprovalCheck, ApprovalOrchestrator, ApprovalPhase, TokenApproval,
    };

    // Domain types — orders
    pub use crate::domain::order::{
        OrderForm, OrderReceipt, OrderRequest, OrderValidationError, PendingOrder,
    };

    // Domain types — orderbook
    pub use crate::domain::orderbook::{BookLevel, OrderbookSnapshot};

    // Domain types — vault, agent
    pub use crate::domain::agent::AgentStatus;
    pub use crate::domain::vault::{DepositResult, VaultStats, WithdrawResult};

    // Chain
    pub use crate::chain::{ChainReader, ReceiptPolling, TxReceipt, TxRequest};

    // Wallet
    pub use crate::wallet::{
        Account, ChainSpec, Eip1193Transport, Eip1193Wallet, SessionUpdate, WalletEvent,
        WalletProvider, WalletSession,
    };

    // Errors
    pub use crate::error::{ContractError, HttpError, SdkError, WalletError};

    // Network
    pub use crate::network::{sei_testnet, DEFAULT_AGENT_URL, DEFAULT_API_URL, DEFAULT_RPC_URL};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AgentClient, ClientConfig, HyperFillClient, HyperFillClientBuilder, OrderbooksClient,
        OrdersClient, VaultClient,
    };
    #[cfg(feature = "http")]
    pub use crate::domain::orderbook::OrderbookPoller;
    #[cfg(feature = "http")]
    pub use crate::flow::{OrderSubmissionFlow, SubmitOutcome};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
