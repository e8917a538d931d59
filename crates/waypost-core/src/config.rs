//! Navigator configuration

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report cross-origin page loads instead of performing them
    pub testing_env: bool,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Reroute on native `hashchange` as well as `popstate`
    pub reroute_on_hashchange: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            testing_env: false,
            log_filter: "info".to_string(),
            reroute_on_hashchange: true,
        }
    }

    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        EnvFilter::try_new(&self.log_filter).map_err(|e| {
            CoreError::Config(format!("invalid log filter {:?}: {}", self.log_filter, e))
        })?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.reroute_on_hashchange);
        assert!(!config.testing_env);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(r#"{"testing_env": true, "log_filter": "waypost=debug"}"#)
            .unwrap();
        assert!(config.testing_env);
        assert_eq!(config.log_filter, "waypost=debug");
        assert!(config.reroute_on_hashchange);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            Config::from_json_str("[1, 2]"),
            Err(CoreError::Serialization(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"log_filter": "waypost=verbose"}"#),
            Err(CoreError::Config(_))
        ));
    }
}
