use serde::{Deserialize, Serialize};

/// One tracked chain. `ws_url` must be a WebSocket endpoint; block
/// subscriptions do not work over plain HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub ws_url: String,
    pub chain_id: u64,
}

/// Fiat price source (CoinGecko-shaped simple-price endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    pub endpoint: String,
    pub asset_id: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_poll_secs() -> u64 {
    30
}

/// Full tracker configuration as consumed by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub chains: Vec<ChainConfig>,
    pub price: PriceConfig,
}

impl TrackerConfig {
    pub fn chain_names(&self) -> Vec<String> {
        self.chains.iter().map(|c| c.name.clone()).collect()
    }
}
