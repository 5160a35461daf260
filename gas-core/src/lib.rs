//! # Gas Core - Shared State and Arithmetic for the Gas Dashboard
//!
//! This crate provides everything the dashboard binary needs that is not
//! tied to a specific transport: the fee store, gas arithmetic, candle data,
//! configuration structures and error types.
//!
//! ## Modules
//!
//! - [`candle`] - OHLC candle model and the demo series
//! - [`config`] - Configuration structures for chains and the price source
//! - [`error`] - Typed error handling with thiserror
//! - [`gas`] - Pure fee arithmetic (gwei conversions, fiat estimates)
//! - [`store`] - The fee store: mode, per-chain fees, USD price
//! - [`utils`] - Utility modules (logging setup)

pub mod candle;
pub mod config;
pub mod error;
pub mod gas;
pub mod store;
pub(crate) mod utils;

// Selective exports - only public API types
pub use candle::{demo_series, CandlePoint};
pub use config::{ChainConfig, PriceConfig, TrackerConfig};
pub use error::{ConfigError, CoreError, FeedError, PriceError};
pub use gas::{
    estimate_fiat_cost, gas_cost_eth, gwei_to_wei, remaining_balance_eth, total_deducted_eth,
    DEMO_WALLET_BALANCE_ETH, FALLBACK_BASE_FEE_GWEI, PLACEHOLDER_PRIORITY_FEE_GWEI,
    TRANSFER_GAS_UNITS,
};
pub use store::{ChainFeeState, FeeStore, Mode, StoreSnapshot};

// Utils are pub(crate) - only export specific public utilities
pub use utils::setup_logger;
