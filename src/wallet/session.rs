//! Wallet connection lifecycle.

use super::{Account, ChainSpec, WalletEvent, WalletEventStream, WalletProvider};
use crate::error::WalletError;
use crate::shared::WalletAddress;
use futures_util::{FutureExt, StreamExt};
use std::sync::Arc;

/// What a provider event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The wallet reported no accounts; the session is now disconnected.
    Disconnected,
    /// The active account was replaced.
    AccountChanged(Account),
    /// The wallet moved to `chain_id`.
    ChainChanged { chain_id: u64, on_required_chain: bool },
}

/// Current account, chain identity and connection lifecycle for one UI session.
///
/// `account` is `Some` only while connected. Provider events are applied with
/// [`apply_event`](Self::apply_event), or pulled from the provider's stream by
/// [`poll_events`](Self::poll_events) / [`next_event`](Self::next_event).
pub struct WalletSession {
    provider: Option<Arc<dyn WalletProvider>>,
    required_chain: ChainSpec,
    account: Option<Account>,
    chain_id: Option<u64>,
    events: Option<WalletEventStream>,
}

impl WalletSession {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, required_chain: ChainSpec) -> Self {
        Self {
            provider,
            required_chain,
            account: None,
            chain_id: None,
            events: None,
        }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// Last chain id reported by the wallet.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn required_chain(&self) -> &ChainSpec {
        &self.required_chain
    }

    pub fn is_on_required_chain(&self) -> bool {
        self.chain_id == Some(self.required_chain.chain_id)
    }

    /// The wallet provider, if one is installed and available.
    pub fn provider(&self) -> Result<&Arc<dyn WalletProvider>, WalletError> {
        match &self.provider {
            Some(p) if p.is_available() => Ok(p),
            _ => Err(WalletError::ProviderUnavailable),
        }
    }

    /// Request accounts from the wallet and make sure it is on the required
    /// chain, switching automatically when it is not.
    pub async fn connect(&mut self) -> Result<&Account, WalletError> {
        let provider = self.provider()?.clone();

        let accounts = provider.connect().await?;
        let address = accounts.into_iter().next().ok_or(WalletError::NotConnected)?;

        let mut chain_id = provider.chain_id().await?;
        self.chain_id = Some(chain_id);
        let expected = self.required_chain.chain_id;

        if chain_id != expected {
            tracing::warn!(
                expected,
                actual = chain_id,
                "Wallet is on the wrong network, requesting a switch"
            );
            if let Err(e) = provider.switch_network(&self.required_chain).await {
                tracing::warn!(error = %e, "Automatic network switch failed");
                return Err(WalletError::NetworkMismatch {
                    expected,
                    actual: chain_id,
                });
            }
            chain_id = provider.chain_id().await?;
            self.chain_id = Some(chain_id);
            if chain_id != expected {
                return Err(WalletError::NetworkMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        if self.events.is_none() {
            self.events = provider.subscribe();
        }

        tracing::info!(address = %address, chain_id, "Wallet connected");
        Ok(&*self.account.insert(Account::new(address, chain_id)))
    }

    /// Re-hydrate the session from accounts the wallet already authorized,
    /// without prompting. Returns `None` when nothing is authorized.
    pub async fn restore(&mut self) -> Result<Option<&Account>, WalletError> {
        let provider = self.provider()?.clone();

        let Some(address) = provider.accounts().await?.into_iter().next() else {
            return Ok(None);
        };
        let chain_id = provider.chain_id().await?;
        self.chain_id = Some(chain_id);
        if chain_id != self.required_chain.chain_id {
            tracing::warn!(
                expected = self.required_chain.chain_id,
                actual = chain_id,
                "Restored wallet session is on the wrong network"
            );
        }
        if self.events.is_none() {
            self.events = provider.subscribe();
        }

        tracing::debug!(address = %address, chain_id, "Wallet session restored");
        Ok(Some(&*self.account.insert(Account::new(address, chain_id))))
    }

    /// Clear the account and derived state. Calling it again is a no-op.
    pub async fn disconnect(&mut self) {
        let Some(account) = self.account.take() else {
            return;
        };
        self.chain_id = None;
        self.events = None;
        if let Some(provider) = &self.provider {
            if let Err(e) = provider.disconnect().await {
                tracing::warn!(error = %e, "Wallet-side disconnect failed");
            }
        }
        tracing::info!(address = %account.address, "Wallet disconnected");
    }

    /// Ask the wallet to move to the required chain.
    pub async fn switch_network(&mut self) -> Result<u64, WalletError> {
        let provider = self.provider()?.clone();
        provider.switch_network(&self.required_chain).await?;
        let chain_id = provider.chain_id().await?;
        self.set_chain(chain_id);
        if chain_id != self.required_chain.chain_id {
            return Err(WalletError::NetworkMismatch {
                expected: self.required_chain.chain_id,
                actual: chain_id,
            });
        }
        Ok(chain_id)
    }

    /// Apply one provider event.
    pub fn apply_event(&mut self, event: WalletEvent) -> SessionUpdate {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => {
                    if let Some(account) = self.account.take() {
                        tracing::info!(address = %account.address, "Wallet disconnected by provider");
                    }
                    self.chain_id = None;
                    SessionUpdate::Disconnected
                }
                Some(address) => self.replace_account(address),
            },
            WalletEvent::ChainChanged(chain_id) => {
                self.set_chain(chain_id);
                SessionUpdate::ChainChanged {
                    chain_id,
                    on_required_chain: self.is_on_required_chain(),
                }
            }
        }
    }

    /// Apply every event that is ready right now, without waiting.
    pub fn poll_events(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        loop {
            let Some(stream) = self.events.as_mut() else {
                break;
            };
            match stream.next().now_or_never() {
                Some(Some(event)) => updates.push(self.apply_event(event)),
                Some(None) => {
                    self.events = None;
                    break;
                }
                None => break,
            }
        }
        updates
    }

    /// Wait for the next provider event and apply it. `None` once the
    /// provider has no (more) events.
    pub async fn next_event(&mut self) -> Option<SessionUpdate> {
        let stream = self.events.as_mut()?;
        match stream.next().await {
            Some(event) => Some(self.apply_event(event)),
            None => {
                self.events = None;
                None
            }
        }
    }

    fn replace_account(&mut self, address: WalletAddress) -> SessionUpdate {
        let chain_id = self
            .chain_id
            .or_else(|| self.account.as_ref().map(|a| a.chain_id))
            .unwrap_or(self.required_chain.chain_id);
        let account = Account::new(address, chain_id);
        tracing::info!(address = %account.address, "Wallet account changed");
        self.account = Some(account.clone());
        SessionUpdate::AccountChanged(account)
    }

    fn set_chain(&mut self, chain_id: u64) {
        self.chain_id = Some(chain_id);
        if let Some(account) = self.account.as_mut() {
            account.chain_id = chain_id;
        }
        if chain_id != self.required_chain.chain_id {
            tracing::warn!(
                expected = self.required_chain.chain_id,
                actual = chain_id,
                "Wallet switched to an unsupported network"
            );
        }
    }
}
