//! Live feed controller.
//!
//! One [`BlockFeed`] per tracked chain delivers new-block numbers and
//! answers follow-up base-fee queries. [`drive_feed`] turns a feed into
//! store writes; [`FeedSupervisor`] opens and closes the whole set of feeds
//! as the store's mode flips between live and simulation.
//!
//! There is no reconnect logic: a dropped stream leaves the chain's figures
//! frozen until the mode is toggled off and on again.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::prelude::{Middleware, Provider, Ws};
use ethers::types::{U256, U64};
use ethers::utils::format_units;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use gas_core::{
    gwei_to_wei, ChainConfig, ChainFeeState, FeeStore, FeedError, Mode,
    FALLBACK_BASE_FEE_GWEI, PLACEHOLDER_PRIORITY_FEE_GWEI,
};

/// New-block notification source for a single chain.
#[async_trait]
pub trait BlockFeed: Send {
    /// Next block number, or `None` once the underlying stream is closed.
    async fn next_block_number(&mut self) -> Option<u64>;

    /// Base fee per gas of the given block, in wei. `None` when the block
    /// (or its base fee field) is missing.
    async fn block_base_fee(&self, number: u64) -> Result<Option<U256>, FeedError>;
}

/// Opens a fresh feed for a chain. Seam for tests; the real implementation
/// dials the chain's WebSocket endpoint.
#[async_trait]
pub trait FeedOpener: Send + Sync + 'static {
    async fn open(&self, chain: &ChainConfig) -> Result<Box<dyn BlockFeed>, FeedError>;
}

/// ethers WebSocket implementation of [`BlockFeed`].
///
/// The subscription stream borrows the provider, so an inner pump task owns
/// both and forwards block numbers over a channel; base-fee fetches go
/// through a shared handle to the same connection. Dropping the feed aborts
/// the pump, which unsubscribes and releases the socket.
pub struct WsBlockFeed {
    chain: String,
    provider: Arc<Provider<Ws>>,
    blocks: mpsc::Receiver<u64>,
    pump: JoinHandle<()>,
}

impl WsBlockFeed {
    pub async fn connect(cfg: &ChainConfig) -> Result<Self, FeedError> {
        let provider = Provider::<Ws>::connect(&cfg.ws_url)
            .await
            .map_err(|e| FeedError::Connect {
                chain: cfg.name.clone(),
                endpoint: cfg.ws_url.clone(),
                reason: e.to_string(),
            })?;
        let provider = Arc::new(provider);
        info!("Connected to '{}' at {}", cfg.name, cfg.ws_url);

        let (tx, blocks) = mpsc::channel(16);
        let pump_provider = provider.clone();
        let chain = cfg.name.clone();
        let pump_chain = chain.clone();

        let pump = tokio::spawn(async move {
            let mut stream = match pump_provider.subscribe_blocks().await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(
                        "{}",
                        FeedError::Subscribe {
                            chain: pump_chain.clone(),
                            reason: e.to_string(),
                        }
                    );
                    return;
                }
            };
            info!("Subscribed to new blocks on '{}'", pump_chain);

            while let Some(block) = stream.next().await {
                let Some(number) = block.number else { continue };
                if tx.send(number.as_u64()).await.is_err() {
                    break;
                }
            }
            debug!("Block stream ended for '{}'", pump_chain);
        });

        Ok(Self {
            chain,
            provider,
            blocks,
            pump,
        })
    }
}

impl Drop for WsBlockFeed {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[async_trait]
impl BlockFeed for WsBlockFeed {
    async fn next_block_number(&mut self) -> Option<u64> {
        self.blocks.recv().await
    }

    async fn block_base_fee(&self, number: u64) -> Result<Option<U256>, FeedError> {
        let block = self
            .provider
            .get_block(U64::from(number))
            .await
            .map_err(|e| FeedError::BlockFetch {
                chain: self.chain.clone(),
                number,
                reason: e.to_string(),
            })?;
        Ok(block.and_then(|b| b.base_fee_per_gas))
    }
}

pub struct WsFeedOpener;

#[async_trait]
impl FeedOpener for WsFeedOpener {
    async fn open(&self, chain: &ChainConfig) -> Result<Box<dyn BlockFeed>, FeedError> {
        Ok(Box::new(WsBlockFeed::connect(chain).await?))
    }
}

/// Convert a raw base-fee-per-gas value into gwei, substituting the
/// fallback when the value is absent or exactly zero.
pub fn base_fee_gwei_from(raw: Option<U256>) -> f64 {
    let wei = match raw {
        Some(v) if !v.is_zero() => v,
        _ => U256::from(gwei_to_wei(FALLBACK_BASE_FEE_GWEI)),
    };
    format_units(wei, "gwei")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(FALLBACK_BASE_FEE_GWEI)
}

/// Per-chain loop: each delivered block number triggers a base-fee fetch
/// and a store write. Fetch errors are logged and skipped. Block numbers
/// are taken in delivery order; an out-of-order notification overwrites a
/// newer value (last write wins, no monotonicity guard).
pub async fn drive_feed(
    chain: String,
    mut feed: Box<dyn BlockFeed>,
    store: Arc<FeeStore>,
    token: CancellationToken,
) {
    loop {
        let number = tokio::select! {
            _ = token.cancelled() => {
                debug!("Feed for '{}' stopping (cancelled)", chain);
                break;
            }
            next = feed.next_block_number() => match next {
                Some(n) => n,
                None => {
                    warn!(
                        "Block stream for '{}' closed; figures frozen until mode is toggled",
                        chain
                    );
                    break;
                }
            }
        };

        let base_fee_gwei = match feed.block_base_fee(number).await {
            Ok(raw) => base_fee_gwei_from(raw),
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        debug!("'{}' block {}: base fee {} gwei", chain, number, base_fee_gwei);
        store.set_gas_data(
            &chain,
            ChainFeeState {
                base_fee_gwei,
                priority_fee_gwei: PLACEHOLDER_PRIORITY_FEE_GWEI,
            },
        );
    }
}

/// Owns the live/simulation lifecycle of all per-chain feeds.
///
/// While the store is in live mode there is exactly one feed task per
/// configured chain, all sharing a child cancellation token. Leaving live
/// mode cancels the token and awaits every task before the session counts
/// as closed, so a rapid double toggle can never stack two subscriptions
/// on one chain.
pub struct FeedSupervisor<O: FeedOpener> {
    opener: O,
    chains: Vec<ChainConfig>,
    store: Arc<FeeStore>,
}

impl<O: FeedOpener> FeedSupervisor<O> {
    pub fn new(opener: O, chains: Vec<ChainConfig>, store: Arc<FeeStore>) -> Self {
        Self {
            opener,
            chains,
            store,
        }
    }

    /// Runs until `shutdown` is cancelled, tracking the store's mode.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut store_rx = self.store.subscribe();
        let mut session: Option<(CancellationToken, JoinSet<()>)> = None;
        // Treat the starting state as inactive so an initial live mode
        // opens a session on the first pass.
        let mut active = false;

        loop {
            let live = self.store.mode() == Mode::Live;
            if live != active {
                if let Some((token, set)) = session.take() {
                    close_session(token, set).await;
                }
                if live {
                    session = Some(self.open_session(&shutdown).await);
                }
                active = live;
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                changed = store_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if let Some((token, set)) = session.take() {
            close_session(token, set).await;
        }
    }

    async fn open_session(&self, shutdown: &CancellationToken) -> (CancellationToken, JoinSet<()>) {
        let token = shutdown.child_token();
        let mut set = JoinSet::new();

        for chain in &self.chains {
            match self.opener.open(chain).await {
                Ok(feed) => {
                    set.spawn(drive_feed(
                        chain.name.clone(),
                        feed,
                        self.store.clone(),
                        token.clone(),
                    ));
                }
                Err(e) => warn!("{}", e),
            }
        }

        info!("Feed session open: {} chain(s) live", set.len());
        (token, set)
    }
}

async fn close_session(token: CancellationToken, mut set: JoinSet<()>) {
    token.cancel();
    while set.join_next().await.is_some() {}
    info!("Feed session closed");
}
