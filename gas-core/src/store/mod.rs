//! # Gas Core - Fee Store
//!
//! The single holder of mutable dashboard state: the operating mode, one
//! fee record per tracked chain and the current USD price. The store is
//! constructed once at startup and passed around behind an `Arc`; nothing
//! else in the workspace holds mutable state.
//!
//! Mutation goes through three setters. Every successful mutation bumps a
//! version counter on a watch channel so observers can re-read a fresh
//! snapshot; the snapshot is a plain copy, so readers never see a torn
//! update.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tokio::sync::watch;
use tracing::warn;

use crate::gas::PLACEHOLDER_PRIORITY_FEE_GWEI;

/// Live subscribes to real network data; Simulation keeps whatever the
/// store already holds and opens no connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Simulation,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Live => Mode::Simulation,
            Mode::Simulation => Mode::Live,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Live => "live",
            Mode::Simulation => "simulation",
        }
    }
}

/// Latest known fees for one chain, in gwei. Replaced wholesale on every
/// update; no field-level merging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainFeeState {
    pub base_fee_gwei: f64,
    pub priority_fee_gwei: f64,
}

impl Default for ChainFeeState {
    fn default() -> Self {
        Self {
            base_fee_gwei: 0.0,
            priority_fee_gwei: PLACEHOLDER_PRIORITY_FEE_GWEI,
        }
    }
}

/// Consistent copy of the full store state.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub mode: Mode,
    pub chains: BTreeMap<String, ChainFeeState>,
    /// 0.0 means "not yet loaded"; consumers must render it as unknown.
    pub usd_price: f64,
}

#[derive(Debug)]
pub struct FeeStore {
    state: RwLock<StoreSnapshot>,
    version: watch::Sender<u64>,
}

impl FeeStore {
    /// Create a store tracking exactly the given chains. The key set is
    /// fixed for the lifetime of the store.
    pub fn new<I, S>(chains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chains: BTreeMap<String, ChainFeeState> = chains
            .into_iter()
            .map(|name| (name.into(), ChainFeeState::default()))
            .collect();

        let (version, _) = watch::channel(0);

        Self {
            state: RwLock::new(StoreSnapshot {
                mode: Mode::Live,
                chains,
                usd_price: 0.0,
            }),
            version,
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().expect("fee store lock poisoned").clone()
    }

    pub fn mode(&self) -> Mode {
        self.state.read().expect("fee store lock poisoned").mode
    }

    /// Replace the named chain's fee state. Updates for chains that were
    /// not registered at construction are logged and dropped; the key set
    /// never grows. Values are stored as supplied, without validation.
    pub fn set_gas_data(&self, chain: &str, fees: ChainFeeState) {
        {
            let mut state = self.state.write().expect("fee store lock poisoned");
            match state.chains.get_mut(chain) {
                Some(slot) => *slot = fees,
                None => {
                    warn!("Dropping fee update for untracked chain '{}'", chain);
                    return;
                }
            }
        }
        self.bump();
    }

    /// Scalar replace; last write wins.
    pub fn set_usd_price(&self, price: f64) {
        self.state.write().expect("fee store lock poisoned").usd_price = price;
        self.bump();
    }

    pub fn set_mode(&self, mode: Mode) {
        self.state.write().expect("fee store lock poisoned").mode = mode;
        self.bump();
    }

    /// Change notification. The receiver carries a version counter; on each
    /// observed change the consumer re-reads [`FeeStore::snapshot`].
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump(&self) {
        // send_modify notifies even when there are no receivers yet.
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let store = FeeStore::new(["ethereum", "polygon"]);
        let snap = store.snapshot();

        assert_eq!(snap.mode, Mode::Live);
        assert_eq!(snap.usd_price, 0.0);
        assert_eq!(snap.chains.len(), 2);
        assert_eq!(snap.chains["ethereum"].base_fee_gwei, 0.0);
        assert_eq!(
            snap.chains["ethereum"].priority_fee_gwei,
            PLACEHOLDER_PRIORITY_FEE_GWEI
        );
    }

    #[test]
    fn test_untracked_chain_is_ignored() {
        let store = FeeStore::new(["ethereum"]);
        store.set_gas_data(
            "dogechain",
            ChainFeeState {
                base_fee_gwei: 9.0,
                priority_fee_gwei: 9.0,
            },
        );

        let snap = store.snapshot();
        assert_eq!(snap.chains.len(), 1);
        assert!(!snap.chains.contains_key("dogechain"));
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::Live.toggled(), Mode::Simulation);
        assert_eq!(Mode::Simulation.toggled(), Mode::Live);
    }
}
