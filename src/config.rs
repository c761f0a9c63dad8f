use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Response timeout for cross-site backup sends.
pub const DEFAULT_BACKUP_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// This cluster's site name in the cross-site topology.
    pub site_name: String,
    #[serde(default = "default_backup_timeout_ms")]
    pub backup_timeout_ms: u64,
}

fn default_backup_timeout_ms() -> u64 {
    DEFAULT_BACKUP_TIMEOUT_MS
}

impl RelayConfig {
    /// Strict load from an explicit path: a missing, unreadable, or
    /// unparseable file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| RelayError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Load relay configuration from {data_dir}/relay.json or return defaults.
    pub fn load_or_default(data_dir: &Path) -> Self {
        let relay_json = data_dir.join("relay.json");

        if relay_json.exists() {
            match Self::load(&relay_json) {
                Ok(config) => {
                    tracing::info!(
                        "Loaded relay config: site_name={}, backup_timeout_ms={}",
                        config.site_name,
                        config.backup_timeout_ms
                    );
                    return config;
                }
                Err(e) => {
                    tracing::error!("{}, using defaults", e);
                }
            }
        }

        let site_name = std::env::var("GRIDDLE_SITE_NAME").unwrap_or_else(|_| {
            hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "unknown".to_string())
        });

        tracing::info!("No relay.json found, using site_name={}", site_name);

        RelayConfig {
            site_name,
            backup_timeout_ms: DEFAULT_BACKUP_TIMEOUT_MS,
        }
    }
}
