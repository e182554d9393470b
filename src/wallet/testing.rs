//! Scriptable in-memory wallet used by unit tests across the crate.

use super::{ChainSpec, WalletEvent, WalletEventStream, WalletProvider};
use crate::chain::TxRequest;
use crate::error::WalletError;
use crate::shared::WalletAddress;
use alloy_primitives::{TxHash, B256};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::sync::Mutex;
use tokio::sync::mpsc;

pub struct FakeWallet {
    address: WalletAddress,
    state: Mutex<State>,
    events_tx: mpsc::UnboundedSender<WalletEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<WalletEvent>>>,
}

#[derive(Default)]
struct State {
    chain_id: u64,
    authorized: bool,
    reject_connect: bool,
    switch_error: Option<WalletError>,
    submit_error: Option<WalletError>,
    connect_requests: usize,
    switch_requests: usize,
    submitted: Vec<TxRequest>,
}

impl FakeWallet {
    pub fn new(address: &str, chain_id: u64) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            address: WalletAddress::new(address),
            state: Mutex::new(State {
                chain_id,
                authorized: true,
                ..State::default()
            }),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    pub fn reject_connect(&self) {
        self.state.lock().unwrap().reject_connect = true;
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.state.lock().unwrap().authorized = authorized;
    }

    pub fn fail_switch(&self, error: WalletError) {
        self.state.lock().unwrap().switch_error = Some(error);
    }

    pub fn fail_submit(&self, error: Option<WalletError>) {
        self.state.lock().unwrap().submit_error = error;
    }

    pub fn emit(&self, event: WalletEvent) {
        let _ = self.events_tx.send(event);
    }

    pub fn connect_requests(&self) -> usize {
        self.state.lock().unwrap().connect_requests
    }

    pub fn switch_requests(&self) -> usize {
        self.state.lock().unwrap().switch_requests
    }

    pub fn submitted(&self) -> Vec<TxRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Hash the n-th (1-based) submitted transaction will get.
    pub fn tx_hash(n: u8) -> TxHash {
        B256::repeat_byte(n)
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn connect(&self) -> Result<Vec<WalletAddress>, WalletError> {
        let mut state = self.state.lock().unwrap();
        state.connect_requests += 1;
        if state.reject_connect {
            return Err(WalletError::UserRejected);
        }
        state.authorized = true;
        Ok(vec![self.address.clone()])
    }

    async fn accounts(&self) -> Result<Vec<WalletAddress>, WalletError> {
        let state = self.state.lock().unwrap();
        Ok(if state.authorized {
            vec![self.address.clone()]
        } else {
            vec![]
        })
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(self.state.lock().unwrap().chain_id)
    }

    async fn switch_network(&self, chain: &ChainSpec) -> Result<(), WalletError> {
        let mut state = self.state.lock().unwrap();
        state.switch_requests += 1;
        if let Some(e) = state.switch_error.clone() {
            return Err(e);
        }
        state.chain_id = chain.chain_id;
        Ok(())
    }

    async fn sign_and_submit(
        &self,
        _from: &WalletAddress,
        tx: TxRequest,
    ) -> Result<TxHash, WalletError> {
        let mut state = self.state.lock().unwrap();
        if let Some(e) = state.submit_error.clone() {
            return Err(e);
        }
        state.submitted.push(tx);
        Ok(Self::tx_hash(state.submitted.len() as u8))
    }

    fn subscribe(&self) -> Option<WalletEventStream> {
        let rx = self.events_rx.lock().unwrap().take()?;
        Some(
            futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|event| (event, rx))
            })
            .boxed(),
        )
    }
}
