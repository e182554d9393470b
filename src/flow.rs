//! Order submission flow — validate, check approvals, suspend for user
//! approvals, register, refresh the book.
//!
//! One [`OrderSubmissionFlow`] serves one UI session. Methods take `&self` so
//! the UI can call [`cancel`](OrderSubmissionFlow::cancel) or read the phase
//! while a submission or an approval is awaiting the wallet; no lock is held
//! across a wallet, chain or HTTP call.

use crate::chain::TxReceipt;
use crate::client::HyperFillClient;
use crate::domain::activity::LogKind;
use crate::domain::approval::{
    execute_approval, ApprovalContext, ApprovalOrchestrator, ApprovalPhase, TokenApproval,
};
use crate::domain::order::{OrderForm, OrderReceipt, OrderRequest, PendingOrder};
use crate::error::{SdkError, WalletError};
use crate::shared::market_symbol;
use crate::wallet::{Account, WalletSession};
use alloy_primitives::Address;
use async_lock::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// What [`OrderSubmissionFlow::submit`] ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Allowances are short. The order is held until every listed token is
    /// approved and [`continue_submission`](OrderSubmissionFlow::continue_submission)
    /// is called, or the user cancels.
    AwaitingApprovals(Vec<TokenApproval>),
    /// The order was registered.
    Submitted(OrderReceipt),
    /// The user cancelled while approvals were being checked.
    Cancelled,
}

#[derive(Default)]
struct FlowState {
    orchestrator: ApprovalOrchestrator,
    pending: Option<PendingOrder>,
}

/// Clears the in-flight flag when a submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct OrderSubmissionFlow {
    client: HyperFillClient,
    state: Mutex<FlowState>,
    in_flight: AtomicBool,
}

impl OrderSubmissionFlow {
    pub fn new(client: HyperFillClient) -> Self {
        Self {
            client,
            state: Mutex::new(FlowState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn phase(&self) -> ApprovalPhase {
        self.state.lock().await.orchestrator.phase()
    }

    /// The order held back for approvals, if any.
    pub async fn pending_order(&self) -> Option<PendingOrder> {
        self.state.lock().await.pending.clone()
    }

    /// Approvals of the current attempt, including tokens approved since.
    pub async fn approvals(&self) -> Vec<TokenApproval> {
        self.state.lock().await.orchestrator.approvals()
    }

    /// Whether a submission is running right now.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate and submit the order typed into `form`.
    pub async fn submit(
        &self,
        session: &WalletSession,
        form: &OrderForm,
    ) -> Result<SubmitOutcome, SdkError> {
        let _guard = self.acquire(session).await?;
        let account = self.require_account(session).await?;
        let request = match form.parse() {
            Ok(request) => request,
            Err(e) => return Err(self.fail_validation(e.to_string()).await),
        };
        self.run(account, request).await
    }

    /// Submit an already-validated order.
    pub async fn submit_request(
        &self,
        session: &WalletSession,
        request: OrderRequest,
    ) -> Result<SubmitOutcome, SdkError> {
        let _guard = self.acquire(session).await?;
        let account = self.require_account(session).await?;
        if let Err(e) = request.validate() {
            return Err(self.fail_validation(e.to_string()).await);
        }
        self.run(account, request).await
    }

    /// Approve one token of the pending order for exactly the amount the
    /// order needs. On failure the attempt stays in `AwaitingUserApprovals`
    /// and the token can be approved again.
    ///
    /// Fails with [`WalletError::NotConnected`] and discards the pending order
    /// when the account that placed it is no longer connected.
    pub async fn approve_token(
        &self,
        session: &WalletSession,
        token: Address,
    ) -> Result<TxReceipt, SdkError> {
        if self.discard_orphaned(session).await {
            return Err(WalletError::NotConnected.into());
        }
        let account = session.account().ok_or(WalletError::NotConnected)?;
        let wallet = session.provider()?;
        let prepared = self.state.lock().await.orchestrator.prepare_approval(token)?;

        self.client
            .log(format!("Approving {}...", prepared.symbol), LogKind::Info)
            .await;
        let ctx = ApprovalContext {
            wallet: wallet.as_ref(),
            owner: &account.address,
            chain: self.client.chain.as_ref(),
            spender: self.client.config.settlement_address,
            polling: &self.client.config.receipt_polling,
        };
        match execute_approval(&ctx, &prepared).await {
            Ok(receipt) => {
                let recorded = self.state.lock().await.orchestrator.record_approval(&prepared);
                if recorded {
                    self.client
                        .log(format!("{} approved", prepared.symbol), LogKind::Success)
                        .await;
                } else {
                    tracing::debug!(token = %token, "Approval mined after the attempt ended");
                }
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

    /// Register the pending order once every token is approved.
    ///
    /// The order is only registered for the account that placed it. When
    /// `session` is disconnected or moved to another account, the pending
    /// order is discarded, the flow returns to `Idle` and this fails with
    /// [`WalletError::NotConnected`].
    pub async fn continue_submission(
        &self,
        session: &WalletSession,
    ) -> Result<OrderReceipt, SdkError> {
        let _guard = self.acquire_in_flight()?;
        if self.discard_orphaned(session).await {
            return Err(WalletError::NotConnected.into());
        }
        let pending = {
            let mut state = self.state.lock().await;
            let Some(pending) = state.pending.clone() else {
                return Err(SdkError::Validation(
                    "No order is awaiting approvals".to_string(),
                ));
            };
            state.orchestrator.begin_submit()?;
            state.pending = None;
            pending
        };

        self.client
            .log("Approvals completed, submitting order...", LogKind::Success)
            .await;
        self.register(&pending.account, &pending.request).await
    }

    /// Abandon the pending order before submission. Approvals already granted
    /// stay on chain. Returns `false` when there was nothing to cancel.
    pub async fn cancel(&self) -> bool {
        let cancelled = {
            let mut state = self.state.lock().await;
            let cancelled = state.orchestrator.cancel();
            if cancelled {
                state.pending = None;
            }
            cancelled
        };
        if cancelled {
            self.client
                .log("Order cancelled by user", LogKind::Info)
                .await;
        }
        cancelled
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn acquire_in_flight(&self) -> Result<InFlightGuard<'_>, SdkError> {
        InFlightGuard::acquire(&self.in_flight).ok_or(SdkError::SubmissionInProgress)
    }

    /// In-flight guard, refusing while an order is held for approvals by the
    /// connected account.
    async fn acquire(&self, session: &WalletSession) -> Result<InFlightGuard<'_>, SdkError> {
        let guard = self.acquire_in_flight()?;
        self.discard_orphaned(session).await;
        if self.state.lock().await.pending.is_some() {
            return Err(SdkError::SubmissionInProgress);
        }
        Ok(guard)
    }

    /// Drop the pending order if the account that placed it is no longer the
    /// connected one. Returns whether an order was dropped.
    async fn discard_orphaned(&self, session: &WalletSession) -> bool {
        {
            let mut state = self.state.lock().await;
            let Some(pending) = &state.pending else {
                return false;
            };
            let current = session.account().map(|a| &a.address);
            if current == Some(&pending.account.address) {
                return false;
            }
            state.pending = None;
            state.orchestrator.reset();
        }

        let message = if session.is_connected() {
            "Wallet account changed, pending order discarded"
        } else {
            "Wallet disconnected, pending order discarded"
        };
        self.client.log(message, LogKind::Error).await;
        true
    }

    async fn require_account(&self, session: &WalletSession) -> Result<Account, SdkError> {
        match session.account() {
            Some(account) => Ok(account.clone()),
            None => Err(self
                .fail_validation("Please connect your wallet first".to_string())
                .await),
        }
    }

    async fn fail_validation(&self, message: String) -> SdkError {
        self.client.log(message.clone(), LogKind::Error).await;
        SdkError::Validation(message)
    }

    async fn run(&self, account: Account, request: OrderRequest) -> Result<SubmitOutcome, SdkError> {
        let attempt = self.state.lock().await.orchestrator.begin();
        self.client
            .log("Checking token approvals...", LogKind::Info)
            .await;

        let check = match self
            .client
            .allowance_checker()
            .check_order_approvals(Some(&account), &request)
            .await
        {
            Ok(check) => check,
            Err(e) => {
                self.state.lock().await.orchestrator.fail_check();
                self.client
                    .log(format!("Approval check failed: {}", e), LogKind::Error)
                    .await;
                return Err(match e {
                    SdkError::Contract(c) => SdkError::ApprovalCheckFailed(c),
                    other => other,
                });
            }
        };

        let needs_approval = check.needs_approval;
        {
            let mut state = self.state.lock().await;
            if state.orchestrator.attempt() != attempt || !state.orchestrator.present(check) {
                return Ok(SubmitOutcome::Cancelled);
            }
            if needs_approval {
                state.pending = Some(PendingOrder::new(account.clone(), request.clone()));
            } else {
                // Same critical section as `present`, so a cancel cannot land
                // between the check and the submission.
                state.orchestrator.begin_submit()?;
            }
        }

        if needs_approval {
            self.client
                .log("Token approval required", LogKind::Info)
                .await;
            return Ok(SubmitOutcome::AwaitingApprovals(self.approvals().await));
        }

        self.client
            .log("Token approvals verified", LogKind::Success)
            .await;
        self.register(&account, &request)
            .await
            .map(SubmitOutcome::Submitted)
    }

    /// Register `request`. The orchestrator must already be `Submitting`.
    async fn register(
        &self,
        account: &Account,
        request: &OrderRequest,
    ) -> Result<OrderReceipt, SdkError> {
        self.client
            .log(
                format!(
                    "Submitting {} order: {} tokens @ {}",
                    request.side,
                    request.quantity,
                    request.price
                ),
                LogKind::Info,
            )
            .await;

        let result = self.client.orders().register(&account.address, request).await;
        match &result {
            Ok(receipt) => {
                self.state.lock().await.orchestrator.complete();
                self.client
                    .log(
                        format!("Order submitted successfully. ID: {}", receipt.order_id),
                        LogKind::Success,
                    )
                    .await;
                if receipt.is_matched() {
                    self.client
                        .log(
                            format!("Order matched! {} trades executed", receipt.trade_count()),
                            LogKind::Success,
                        )
                        .await;
                }
            }
            Err(e) => {
                self.state.lock().await.orchestrator.abort_submit();
                match e {
                    SdkError::OrderRejected { message, errors } => {
                        self.client
                            .log(format!("Order failed: {}", message), LogKind::Error)
                            .await;
                        if let Some(errors) = errors {
                            self.client
                                .log(format!("Validation errors: {}", errors), LogKind::Error)
                                .await;
                        }
                    }
                    other => {
                        self.client
                            .log(format!("Order error: {}", other), LogKind::Error)
                            .await;
                    }
                }
            }
        }

        // The book may have changed whatever the outcome; refresh logs its own errors.
        let symbol = market_symbol(&request.base_asset, &request.quote_asset);
        if let Err(e) = self.client.orderbooks().refresh(&symbol).await {
            tracing::debug!(symbol = %symbol, error = %e, "Post-submission orderbook refresh failed");
        }

        result
    }
}
