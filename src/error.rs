//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The allowance query failed, so approval status is unknown.
    #[error("Approval check failed: {0}")]
    ApprovalCheckFailed(ContractError),

    #[error("Order rejected: {message}")]
    OrderRejected {
        message: String,
        errors: Option<serde_json::Value>,
    },

    #[error("An order submission is already in progress")]
    SubmissionInProgress,

    /// The backend answered with a non-success `status_code`.
    #[error("API error (status_code={status_code}): {message}")]
    Api { status_code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// Whether the failure is transient and the user may simply retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::Http(e) => e.is_retryable(),
            SdkError::Contract(ContractError::Timeout) => true,
            SdkError::ApprovalCheckFailed(ContractError::Timeout) => true,
            _ => false,
        }
    }
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Failed to encode request body: {0}")]
    Encode(String),

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl HttpError {
    pub fn is_retryable(&self) -> bool {
        match self {
            HttpError::Timeout | HttpError::RateLimited { .. } => true,
            HttpError::ServerError { status, .. } => matches!(status, 502..=504),
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Wallet provider and session errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No compatible wallet provider found")]
    ProviderUnavailable,

    #[error("User rejected the request")]
    UserRejected,

    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("Wallet cannot add or switch to chain {0}")]
    UnsupportedChain(u64),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },
}

/// On-chain read and transaction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Contract call failed: {0}")]
    Call(String),

    #[error("Approval rejected by user")]
    ApprovalRejected,

    #[error("Approval transaction failed: {0}")]
    ApprovalTransactionFailed(String),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Timed out waiting for the chain")]
    Timeout,

    #[error("Failed to decode contract response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_retryable() {
        assert!(SdkError::Http(HttpError::Timeout).is_retryable());
        assert!(SdkError::Contract(ContractError::Timeout).is_retryable());
        assert!(SdkError::ApprovalCheckFailed(ContractError::Timeout).is_retryable());
    }

    #[test]
    fn test_rejections_are_not_retryable() {
        let rejected = SdkError::OrderRejected {
            message: "insufficient size".to_string(),
            errors: None,
        };
        assert!(!rejected.is_retryable());
        assert!(!SdkError::SubmissionInProgress.is_retryable());
        assert!(!SdkError::Wallet(WalletError::UserRejected).is_retryable());
    }

    #[test]
    fn test_order_rejected_display_carries_message() {
        let err = SdkError::OrderRejected {
            message: "insufficient size".to_string(),
            errors: None,
        };
        assert_eq!(err.to_string(), "Order rejected: insufficient size");
    }
}
