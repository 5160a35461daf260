use anyhow::Result;
use config::{Config, File};
use gas_core::{ConfigError, TrackerConfig};

/// Load and validate the tracker configuration from a TOML file.
///
/// `${VAR}` placeholders in WebSocket URLs are resolved from the
/// environment after `dotenv`, so API keys stay out of the config file.
pub fn load_config(path: &str) -> Result<TrackerConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(path))
        .build()?;

    let mut cfg: TrackerConfig = settings.try_deserialize().map_err(|e| anyhow::anyhow!(e))?;

    if cfg.chains.is_empty() {
        return Err(ConfigError::NoChains.into());
    }

    for chain in &mut cfg.chains {
        chain.ws_url = expand_env(&chain.ws_url);
        if !chain.ws_url.starts_with("ws://") && !chain.ws_url.starts_with("wss://") {
            return Err(ConfigError::InvalidWsUrl {
                chain: chain.name.clone(),
                url: chain.ws_url.clone(),
            }
            .into());
        }
    }

    Ok(cfg)
}

/// Replace every `${NAME}` with the value of the environment variable NAME.
/// Unset variables expand to the empty string.
fn expand_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                out.push_str(&std::env::var(name).unwrap_or_default());
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder; keep it verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
