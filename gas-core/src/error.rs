//! # Core Error Types
//!
//! Centralized error definitions for the gas-core crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.

use thiserror::Error;

/// Unified error type for gas-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Feed(FeedError),

    #[error(transparent)]
    Price(PriceError),
}

impl From<ConfigError> for CoreError {
    fn from(e: ConfigError) -> Self {
        CoreError::Config(e)
    }
}

impl From<FeedError> for CoreError {
    fn from(e: FeedError) -> Self {
        CoreError::Feed(e)
    }
}

impl From<PriceError> for CoreError {
    fn from(e: PriceError) -> Self {
        CoreError::Price(e)
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid WebSocket URL for chain '{chain}': '{url}'")]
    InvalidWsUrl { chain: String, url: String },

    #[error("No chains configured")]
    NoChains,
}

/// Block feed errors
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    #[error("Failed to connect to '{chain}' at {endpoint}: {reason}")]
    Connect {
        chain: String,
        endpoint: String,
        reason: String,
    },

    #[error("Block subscription failed for '{chain}': {reason}")]
    Subscribe { chain: String, reason: String },

    #[error("Failed to fetch block {number} on '{chain}': {reason}")]
    BlockFetch {
        chain: String,
        number: u64,
        reason: String,
    },
}

/// Fiat price source errors
#[derive(Error, Debug, Clone)]
pub enum PriceError {
    #[error("HTTP error {status_code} from {endpoint}")]
    Http { status_code: u16, endpoint: String },

    #[error("Request to {endpoint} failed: {reason}")]
    Request { endpoint: String, reason: String },

    #[error("Malformed price body from {endpoint}: {reason}")]
    MalformedBody { endpoint: String, reason: String },
}
