//! # Utilities Module
//!
//! Internal utility modules for the gas-core crate.

pub(crate) mod logger;

pub use logger::setup_logger;
