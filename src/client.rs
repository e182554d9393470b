//! High-level client — `HyperFillClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, shared state, and accessor methods.

use crate::chain::{ChainReader, ReceiptPolling, RpcClient};
use crate::domain::activity::{ActivityLog, LogEntry, LogKind, DEFAULT_LOG_CAPACITY};
use crate::domain::agent::client::Agent;
use crate::domain::approval::{AllowanceChecker, TokenInfoCache};
use crate::domain::order::client::Orders;
use crate::domain::orderbook::client::Orderbooks;
use crate::domain::orderbook::{OrderbookPoller, OrderbookState};
use crate::domain::vault::client::Vault;
use crate::error::{SdkError, WalletError};
use crate::flow::OrderSubmissionFlow;
use crate::http::{HyperFillHttp, DEFAULT_REQUEST_TIMEOUT};
use crate::network;
use crate::shared::parse_token_address;
use crate::wallet::{Account, ChainSpec, SessionUpdate, WalletEvent, WalletSession};

use alloy_primitives::Address;
use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::agent::client::Agent as AgentClient;
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::orderbook::client::Orderbooks as OrderbooksClient;
pub use crate::domain::vault::client::Vault as VaultClient;

/// Default orderbook polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Resolved client configuration. Passed explicitly, never global.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub agent_url: String,
    pub rpc_url: String,
    /// Chain the wallet must be on.
    pub chain: ChainSpec,
    /// Spender whose allowance orders need (the settlement contract).
    pub settlement_address: Address,
    pub vault_address: Address,
    /// The vault's deposit asset (WSEI).
    pub vault_asset: Address,
    /// Decimals of the vault shares and deposit asset.
    pub vault_decimals: u8,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub receipt_polling: ReceiptPolling,
    pub log_capacity: usize,
}

/// The primary entry point for the HyperFill SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.orders()`, `client.orderbooks()`, `client.vault()`, `client.agent()`.
/// Cloning is cheap and clones share all state.
#[derive(Clone)]
pub struct HyperFillClient {
    pub(crate) http: HyperFillHttp,
    pub(crate) chain: Arc<dyn ChainReader>,
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) activity: Arc<RwLock<ActivityLog>>,
    /// symbol → latest applied snapshot
    pub(crate) orderbooks: Arc<RwLock<HashMap<String, OrderbookState>>>,
    /// Issue order of orderbook fetches, shared by polls and explicit refreshes.
    pub(crate) orderbook_seq: Arc<AtomicU64>,
    /// Token decimals and symbols, shared by every allowance checker.
    pub(crate) token_cache: Arc<TokenInfoCache>,
    pub(crate) agent_running: Arc<AtomicBool>,
}

impl HyperFillClient {
    pub fn builder() -> HyperFillClientBuilder {
        HyperFillClientBuilder::default()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &HyperFillHttp {
        &self.http
    }

    pub fn chain(&self) -> Arc<dyn ChainReader> {
        self.chain.clone()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    pub fn orderbooks(&self) -> Orderbooks<'_> {
        Orderbooks { client: self }
    }

    pub fn vault(&self) -> Vault<'_> {
        Vault { client: self }
    }

    pub fn agent(&self) -> Agent<'_> {
        Agent { client: self }
    }

    /// Allowance checker against the configured settlement contract.
    pub fn allowance_checker(&self) -> AllowanceChecker {
        AllowanceChecker::with_cache(
            self.chain.clone(),
            self.config.settlement_address,
            self.token_cache.clone(),
        )
    }

    /// A fresh submission flow for one UI session.
    pub fn submission_flow(&self) -> OrderSubmissionFlow {
        OrderSubmissionFlow::new(self.clone())
    }

    /// Poll `symbol` at the configured interval.
    pub fn orderbook_poller(&self, symbol: &str) -> OrderbookPoller {
        OrderbookPoller::new(self.clone(), symbol, self.config.poll_interval)
    }

    // ── Wallet session ───────────────────────────────────────────────────
    //
    // `WalletSession` only traces; these wrappers also record each outcome in
    // the activity log.

    /// Connect `session`, switching networks when needed.
    pub async fn connect_wallet(&self, session: &mut WalletSession) -> Result<Account, WalletError> {
        match session.connect().await {
            Ok(account) => {
                let account = account.clone();
                self.log(
                    format!("Wallet connected: {}", account.to_display_address()),
                    LogKind::Success,
                )
                .await;
                Ok(account)
            }
            Err(e) => {
                self.log(format!("Wallet connection failed: {}", e), LogKind::Error)
                    .await;
                Err(e)
            }
        }
    }

    /// Restore an already-authorized session without prompting.
    pub async fn restore_wallet(
        &self,
        session: &mut WalletSession,
    ) -> Result<Option<Account>, WalletError> {
        match session.restore().await {
            Ok(Some(account)) => {
                let account = account.clone();
                self.log(
                    format!("Wallet connected: {}", account.to_display_address()),
                    LogKind::Success,
                )
                .await;
                Ok(Some(account))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.log(format!("Wallet connection check failed: {}", e), LogKind::Error)
                    .await;
                Err(e)
            }
        }
    }

    pub async fn switch_network(&self, session: &mut WalletSession) -> Result<u64, WalletError> {
        match session.switch_network().await {
            Ok(chain_id) => {
                self.log(
                    format!("Switched to {}", session.required_chain().chain_name),
                    LogKind::Success,
                )
                .await;
                Ok(chain_id)
            }
            Err(e) => {
                self.log(format!("Network switch failed: {}", e), LogKind::Error)
                    .await;
                Err(e)
            }
        }
    }

    pub async fn disconnect_wallet(&self, session: &mut WalletSession) {
        if !session.is_connected() {
            return;
        }
        session.disconnect().await;
        self.log("Wallet disconnected", LogKind::Info).await;
    }

    /// Apply a provider event to `session` and log what it changed.
    pub async fn apply_wallet_event(
        &self,
        session: &mut WalletSession,
        event: WalletEvent,
    ) -> SessionUpdate {
        let update = session.apply_event(event);
        self.log_session_update(session, &update).await;
        update
    }

    /// Apply every pending provider event to `session`.
    pub async fn sync_wallet_events(&self, session: &mut WalletSession) -> Vec<SessionUpdate> {
        let updates = session.poll_events();
        for update in &updates {
            self.log_session_update(session, update).await;
        }
        updates
    }

    async fn log_session_update(&self, session: &WalletSession, update: &SessionUpdate) {
        match update {
            SessionUpdate::Disconnected => self.log("Wallet disconnected", LogKind::Info).await,
            SessionUpdate::AccountChanged(account) => {
                self.log(
                    format!("Wallet account changed: {}", account.to_display_address()),
                    LogKind::Info,
                )
                .await
            }
            SessionUpdate::ChainChanged {
                on_required_chain: false,
                ..
            } => {
                self.log(
                    format!(
                        "Wrong network: please switch to {}",
                        session.required_chain().chain_name
                    ),
                    LogKind::Error,
                )
                .await
            }
            SessionUpdate::ChainChanged { .. } => {}
        }
    }

    // ── Activity log ─────────────────────────────────────────────────────

    pub async fn log(&self, message: impl Into<String>, kind: LogKind) {
        self.activity.write().await.append(message, kind);
    }

    /// All activity entries, oldest first.
    pub async fn activity(&self) -> Vec<LogEntry> {
        self.activity.read().await.snapshot()
    }

    pub(crate) fn next_orderbook_seq(&self) -> u64 {
        self.orderbook_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Clear cached token metadata and orderbook snapshots.
    pub async fn clear_all_caches(&self) {
        self.token_cache.clear().await;
        self.orderbooks.write().await.clear();
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct HyperFillClientBuilder {
    api_url: String,
    agent_url: String,
    rpc_url: String,
    chain: ChainSpec,
    settlement_address: Option<String>,
    vault_address: String,
    vault_asset: String,
    vault_decimals: u8,
    poll_interval: Duration,
    request_timeout: Duration,
    receipt_polling: ReceiptPolling,
    log_capacity: usize,
    chain_reader: Option<Arc<dyn ChainReader>>,
}

impl Default for HyperFillClientBuilder {
    fn default() -> Self {
        Self {
            api_url: network::DEFAULT_API_URL.to_string(),
            agent_url: network::DEFAULT_AGENT_URL.to_string(),
            rpc_url: network::DEFAULT_RPC_URL.to_string(),
            chain: network::sei_testnet(),
            settlement_address: None,
            vault_address: network::VAULT_ADDRESS.to_string(),
            vault_asset: network::WSEI_ADDRESS.to_string(),
            vault_decimals: 18,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            receipt_polling: ReceiptPolling::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            chain_reader: None,
        }
    }
}

impl HyperFillClientBuilder {
    pub fn api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }

    pub fn agent_url(mut self, url: &str) -> Self {
        self.agent_url = url.to_string();
        self
    }

    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = url.to_string();
        self
    }

    pub fn chain(mut self, chain: ChainSpec) -> Self {
        self.chain = chain;
        self
    }

    /// Settlement contract address. Defaults to the vault.
    pub fn settlement_address(mut self, address: &str) -> Self {
        self.settlement_address = Some(address.to_string());
        self
    }

    pub fn vault_address(mut self, address: &str) -> Self {
        self.vault_address = address.to_string();
        self
    }

    pub fn vault_asset(mut self, address: &str) -> Self {
        self.vault_asset = address.to_string();
        self
    }

    pub fn vault_decimals(mut self, decimals: u8) -> Self {
        self.vault_decimals = decimals;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn receipt_polling(mut self, polling: ReceiptPolling) -> Self {
        self.receipt_polling = polling;
        self
    }

    pub fn log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    /// Use `reader` for chain reads instead of JSON-RPC against `rpc_url`.
    pub fn chain_reader(mut self, reader: Arc<dyn ChainReader>) -> Self {
        self.chain_reader = Some(reader);
        self
    }

    pub fn build(self) -> Result<HyperFillClient, SdkError> {
        let address = |s: &str| parse_token_address(s).map_err(SdkError::Validation);
        let vault_address = address(&self.vault_address)?;
        let settlement_address = match &self.settlement_address {
            Some(s) => address(s)?,
            None => vault_address,
        };

        let config = ClientConfig {
            api_url: self.api_url,
            agent_url: self.agent_url,
            rpc_url: self.rpc_url,
            chain: self.chain,
            settlement_address,
            vault_address,
            vault_asset: address(&self.vault_asset)?,
            vault_decimals: self.vault_decimals,
            poll_interval: self.poll_interval,
            request_timeout: self.request_timeout,
            receipt_polling: self.receipt_polling,
            log_capacity: self.log_capacity,
        };

        let http = HyperFillHttp::new(&config.api_url, &config.agent_url, config.request_timeout)?;
        let chain: Arc<dyn ChainReader> = match self.chain_reader {
            Some(reader) => reader,
            None => Arc::new(RpcClient::new(http.clone(), &config.rpc_url)),
        };

        let mut activity = ActivityLog::new(config.log_capacity);
        activity.info("System initialized");
        activity.info("Waiting for wallet connection...");

        tracing::debug!(
            api_url = %config.api_url,
            rpc_url = %config.rpc_url,
            chain_id = config.chain.chain_id,
            "HyperFill client built"
        );

        Ok(HyperFillClient {
            http,
            chain,
            config: Arc::new(config),
            activity: Arc::new(RwLock::new(activity)),
            orderbooks: Arc::new(RwLock::new(HashMap::new())),
            orderbook_seq: Arc::new(AtomicU64::new(0)),
            token_cache: Arc::new(TokenInfoCache::default()),
            agent_running: Arc::new(AtomicBool::new(false)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_defaults() {
        let client = HyperFillClient::builder().build().unwrap();
        let config = client.config();
        assert_eq!(config.api_url, network::DEFAULT_API_URL);
        assert_eq!(config.chain.chain_id, network::SEI_TESTNET_CHAIN_ID);
        assert_eq!(config.settlement_address, config.vault_address);
        assert_eq!(config.poll_interval, Duration::from_secs(5));

        let messages: Vec<_> = client.activity().await.into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["System initialized", "Waiting for wallet connection..."]);
    }

    #[test]
    fn test_builder_rejects_bad_address() {
        let result = HyperFillClient::builder().settlement_address("nope").build();
        assert!(matches!(result, Err(SdkError::Validation(_))));
    }

    #[tokio::test]
    async fn test_checkers_share_token_metadata() {
        use crate::chain::abi::IERC20;
        use crate::chain::testing::FakeChain;
        use alloy_primitives::U256;
        use alloy_sol_types::SolValue;
        use rust_decimal::Decimal;

        let chain = Arc::new(FakeChain::default());
        let client = HyperFillClient::builder()
            .chain_reader(chain.clone())
            .build()
            .unwrap();
        let token = Address::repeat_byte(0xc0);
        let owner = Address::repeat_byte(0x11);
        chain
            .respond(token, IERC20::decimalsCall {}, <alloy_sol_types::sol_data::Uint<8> as alloy_sol_types::SolType>::abi_encode(&6u8))
            .await;
        chain
            .respond(token, IERC20::symbolCall {}, "USDT".to_string().abi_encode())
            .await;
        chain
            .respond(
                token,
                IERC20::allowanceCall {
                    owner,
                    spender: client.config().settlement_address,
                },
                U256::ZERO.abi_encode(),
            )
            .await;

        for _ in 0..2 {
            let approval = client
                .allowance_checker()
                .check_token(owner, token, Decimal::ONE)
                .await
                .unwrap();
            assert_eq!(approval.symbol, "USDT");
        }
        // decimals and symbol once, allowance every time
        assert_eq!(chain.calls.lock().await.len(), 4);
    }

    #[test]
    fn test_orderbook_seq_is_monotonic() {
        let client = HyperFillClient::builder().build().unwrap();
        let a = client.next_orderbook_seq();
        let b = client.clone().next_orderbook_seq();
        assert!(b > a);
    }
}
