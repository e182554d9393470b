//! Agent sub-client — start/stop the trading agents.

use super::wire::AgentResponse;
use super::AgentStatus;
use crate::client::HyperFillClient;
use crate::domain::activity::LogKind;
use crate::error::SdkError;
use std::sync::atomic::Ordering;

pub struct Agent<'a> {
    pub(crate) client: &'a HyperFillClient,
}

impl<'a> Agent<'a> {
    pub fn status(&self) -> AgentStatus {
        if self.client.agent_running.load(Ordering::SeqCst) {
            AgentStatus::Running
        } else {
            AgentStatus::Stopped
        }
    }

    /// Ask the agent service to start. A response without
    /// `status == "success"` is an [`SdkError::Api`].
    pub async fn start(&self) -> Result<AgentResponse, SdkError> {
        self.client.log("Starting AI agents...", LogKind::Info).await;
        let resp = match self.client.http.start_agent().await {
            Ok(resp) => resp,
            Err(e) => {
                self.client
                    .log(format!("Agent error: {}", e), LogKind::Error)
                    .await;
                return Err(e.into());
            }
        };

        if resp.is_success() {
            self.client.agent_running.store(true, Ordering::SeqCst);
            self.client.log("AI agents activated", LogKind::Success).await;
            Ok(resp)
        } else {
            let message = resp
                .message
                .clone()
                .unwrap_or_else(|| "No response".to_string());
            self.client
                .log(format!("Agent start failed: {}", message), LogKind::Error)
                .await;
            Err(SdkError::Api {
                status_code: 0,
                message,
            })
        }
    }

    /// Mark the agents stopped. The agent service has no stop endpoint, so
    /// this only changes what this client reports.
    pub async fn stop(&self) {
        if self.client.agent_running.swap(false, Ordering::SeqCst) {
            self.client.log("AI agents stopped", LogKind::Info).await;
        }
    }

    /// Start when stopped, stop when running.
    pub async fn toggle(&self) -> Result<AgentStatus, SdkError> {
        if self.status().is_running() {
            self.stop().await;
        } else {
            self.start().await?;
        }
        Ok(self.status())
    }
}
