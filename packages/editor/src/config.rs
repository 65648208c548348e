use msdesc_schema::Profile;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "msdesc.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Rule table applied to the document
    #[serde(default)]
    pub profile: Profile,

    /// Document name identities are seeded from
    #[serde(default = "default_id_seed")]
    pub id_seed: String,

    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_id_seed() -> String {
    "document".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            id_seed: default_id_seed(),
            log_filter: default_log_filter(),
        }
    }
}
