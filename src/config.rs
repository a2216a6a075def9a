//! Configuration for cqlwrap connections
//!
//! Settings are serializable so they can live next to the rest of an
//! application's configuration in JSON or (with the `toml` feature) TOML.
use crate::types::BatchKind;
use serde::de::Error;

/// Connection configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Kind used by [`Connection::default_batch`](crate::Connection::default_batch)
    #[serde(default)]
    pub default_batch_kind: BatchKind,

    /// Batches with more statements than this are logged at warn level on
    /// submission
    #[serde(default = "Config::default_batch_size_warn_threshold")]
    pub batch_size_warn_threshold: usize,

    /// Log statement text at debug level on execution
    #[serde(default)]
    pub log_statements: bool,
}

impl Config {
    const fn default_batch_size_warn_threshold() -> usize {
        50
    }

    pub fn with_default_batch_kind(mut self, kind: BatchKind) -> Self {
        self.default_batch_kind = kind;
        self
    }

    pub fn with_batch_size_warn_threshold(mut self, threshold: usize) -> Self {
        assert!(threshold > 0, "Batch size warn threshold must be greater than zero");
        self.batch_size_warn_threshold = threshold;
        self
    }

    pub fn with_log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size_warn_threshold == 0 {
            return Err("Batch size warn threshold must be greater than zero".to_string());
        }

        if self.default_batch_kind == BatchKind::Counter {
            log::warn!("Default batch kind is counter; only counter updates can be batched");
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_batch_kind: BatchKind::default(),
            batch_size_warn_threshold: Self::default_batch_size_warn_threshold(),
            log_statements: false,
        }
    }
}
