//! HTTP client layer — `HyperFillHttp` with per-endpoint retry policies.

pub mod client;
pub mod retry;

pub use client::{HyperFillHttp, DEFAULT_REQUEST_TIMEOUT};
pub use retry::{RetryConfig, RetryPolicy};
