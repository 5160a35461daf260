//! Fiat price poller.
//!
//! Fetches the asset's USD rate once immediately, then on a fixed period
//! until cancelled. A failed fetch is logged and skipped; the previous
//! price stays in the store and the next tick still fires. No backoff, no
//! jitter.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use gas_core::{FeeStore, PriceConfig, PriceError};

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_usd(&self) -> Result<f64, PriceError>;
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    usd: f64,
}

/// CoinGecko-shaped simple-price endpoint:
/// `{ "<asset_id>": { "usd": <number> } }`.
pub struct CoinGeckoSource {
    client: reqwest::Client,
    url: String,
    asset_id: String,
}

impl CoinGeckoSource {
    pub fn new(cfg: &PriceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let url = format!(
            "{}?ids={}&vs_currencies={}",
            cfg.endpoint, cfg.asset_id, cfg.vs_currency
        );
        Ok(Self {
            client,
            url,
            asset_id: cfg.asset_id.clone(),
        })
    }
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    async fn fetch_usd(&self) -> Result<f64, PriceError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| PriceError::Request {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PriceError::Http {
                status_code: status.as_u16(),
                endpoint: self.url.clone(),
            });
        }

        let body: HashMap<String, PriceQuote> =
            resp.json().await.map_err(|e| PriceError::MalformedBody {
                endpoint: self.url.clone(),
                reason: e.to_string(),
            })?;

        body.get(&self.asset_id)
            .map(|quote| quote.usd)
            .ok_or_else(|| PriceError::MalformedBody {
                endpoint: self.url.clone(),
                reason: format!("no '{}' entry in body", self.asset_id),
            })
    }
}

/// Poll the source forever: the first tick fires immediately, then every
/// `period`. Cancellation stops the schedule; cancelling twice is harmless.
pub async fn run_price_poller<S: PriceSource>(
    source: S,
    store: Arc<FeeStore>,
    period: Duration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Price poller stopping (cancelled)");
                break;
            }
            _ = ticker.tick() => {}
        }

        match source.fetch_usd().await {
            Ok(price) => {
                debug!("USD price refreshed: {}", price);
                store.set_usd_price(price);
            }
            // Previous price retained; next tick still fires.
            Err(e) => warn!("USD price fetch failed: {}", e),
        }
    }
}
