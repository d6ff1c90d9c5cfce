//! Settings for the CLI.
//!
//! Sources, lowest priority first: built-in defaults, the TOML file
//! (`config/tripsplit.toml` unless `--config` says otherwise), `TRIPSPLIT_*`
//! environment variables, then command-line flags.

use clap::ValueEnum;
use engine::{Currency, InputPolicy};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/tripsplit";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level for the `tripsplit` and `engine` targets.
    pub level: String,
    pub policy: InputPolicy,
    pub format: OutputFormat,
    /// Used when the ledger does not name a currency.
    pub currency: Currency,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            policy: InputPolicy::Permissive,
            format: OutputFormat::Text,
            currency: Currency::Krw,
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TRIPSPLIT"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load(Some("does/not/exist/tripsplit")).unwrap();
        assert_eq!(settings.policy, InputPolicy::Permissive);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.currency, Currency::Krw);
    }
}
