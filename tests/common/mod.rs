//! Shared fixtures for the integration tests: a scripted wallet, an in-memory
//! chain and a client wired to a wiremock backend.

#![allow(dead_code)]

use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use hyperfill_sdk::chain::abi::IERC20;
use hyperfill_sdk::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::MockServer;

pub const OWNER: &str = "0x1111111111111111111111111111111111111111";
pub const SETTLEMENT: &str = "0x5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e5e";
pub const BASE: &str = "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0";
pub const QUOTE: &str = "0xc0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0";

pub fn addr(s: &str) -> Address {
    Address::from_str(s).unwrap()
}

pub fn tx_hash(n: u8) -> TxHash {
    B256::repeat_byte(n)
}

// ─── Wallet ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct WalletState {
    reject_submit: bool,
    submitted: Vec<TxRequest>,
}

/// Always-connected wallet on the required chain. The n-th submitted
/// transaction gets hash `tx_hash(n)`.
pub struct TestWallet {
    address: WalletAddress,
    chain_id: u64,
    state: Mutex<WalletState>,
}

impl TestWallet {
    pub fn new() -> Self {
        Self {
            address: WalletAddress::new(OWNER),
            chain_id: hyperfill_sdk::network::SEI_TESTNET_CHAIN_ID,
            state: Mutex::new(WalletState::default()),
        }
    }

    pub fn reject_submit(&self, reject: bool) {
        self.state.lock().unwrap().reject_submit = reject;
    }

    pub fn submitted(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().submitted.clone()
    }
}

#[async_trait]
impl WalletProvider for TestWallet {
    async fn connect(&self) -> Result<Vec<WalletAddress>, WalletError> {
        Ok(vec![self.address.clone()])
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, WalletError> {
        Ok(vec![self.address.clone()])
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.chain_id)
    }

    async fn switch_network(&self, _chain: &ChainSpec) -> Result<(), WalletError> {
        Ok(())
    }

    async fn sign_and_submit(
        &self,
        _from: &WalletAddress,
        tx: TxRequest,
    ) -> Result<TxHash, WalletError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_submit {
            return Err(WalletError::UserRejected);
        }
        state.submitted.push(tx);
        Ok(tx_hash(state.submitted.len() as u8))
    }
}

// ─── Chain ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct TestChain {
    responses: Mutex<HashMap<(Address, Bytes), Bytes>>,
    receipts: Mutex<HashMap<TxHash, TxReceipt>>,
    calls: Mutex<usize>,
}

impl TestChain {
    pub fn respond<C: SolCall>(&self, to: Address, call: C, ret: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .insert((to, Bytes::from(call.abi_encode())), Bytes::from(ret));
    }

    /// Token with `decimals`, `symbol`, and `allowance` from OWNER to SETTLEMENT.
    pub fn token(&self, token: &str, decimals: u8, symbol: &str, allowance: U256) {
        let token = addr(token);
        self.respond(token, IERC20::decimalsCall {}, <alloy_sol_types::sol_data::Uint<8> as alloy_sol_types::SolType>::abi_encode(&decimals));
        self.respond(token, IERC20::symbolCall {}, symbol.to_string().abi_encode());
        self.set_allowance(token, allowance);
    }

    pub fn set_allowance(&self, token: Address, allowance: U256) {
        self.respond(
            token,
            IERC20::allowanceCall {
                owner: addr(OWNER),
                spender: addr(SETTLEMENT),
            },
            allowance.abi_encode(),
        );
    }

    pub fn mine(&self, hash: TxHash, status: bool) {
        self.receipts.lock().unwrap().insert(
            hash,
            TxReceipt {
                transaction_hash: hash,
                status,
                block_number: Some(1),
                logs: vec![],
            },
        );
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ChainReader for TestChain {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ContractError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .get(&(to, data))
            .cloned()
            .ok_or_else(|| ContractError::Call("execution reverted".to_string()))
    }

    async fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TxReceipt>, ContractError> {
        Ok(self.receipts.lock().unwrap().get(&hash).cloned())
    }
}

// ─── Client ──────────────────────────────────────────────────────────────────

pub struct Harness {
    pub server: MockServer,
    pub chain: Arc<TestChain>,
    pub wallet: Arc<TestWallet>,
    pub client: HyperFillClient,
    pub session: WalletSession,
}

/// Route SDK tracing to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn harness() -> Harness {
    init_tracing();
    let server = MockServer::start().await;
    let chain = Arc::new(TestChain::default());
    let wallet = Arc::new(TestWallet::new());

    let client = HyperFillClient::builder()
        .api_url(&server.uri())
        .agent_url(&server.uri())
        .settlement_address(SETTLEMENT)
        .chain_reader(chain.clone())
        .receipt_polling(ReceiptPolling {
            interval: Duration::from_millis(1),
            timeout: Duration::from_millis(10),
        })
        .build()
        .unwrap();

    let provider: Arc<dyn WalletProvider> = wallet.clone();
    let mut session = WalletSession::new(Some(provider), sei_testnet());
    session.connect().await.unwrap();

    Harness {
        server,
        chain,
        wallet,
        client,
        session,
    }
}

pub fn bid_form(price: &str, quantity: &str) -> OrderForm {
    OrderForm::new(BASE, QUOTE, price, quantity, "buy")
}

pub fn ask_form(price: &str, quantity: &str) -> OrderForm {
    OrderForm::new(BASE, QUOTE, price, quantity, "sell")
}

/// Activity messages after the two seeded startup entries.
pub async fn messages(client: &HyperFillClient) -> Vec<(LogKind, String)> {
    client
        .activity()
        .await
        .into_iter()
        .skip(2)
        .map(|e| (e.kind, e.message))
        .collect()
}
