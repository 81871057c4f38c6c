//! Engine configuration.
//!
//! Scan confidence constants and the cache TTL are empirically chosen
//! values, kept configurable rather than hard-coded.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::cache::DEFAULT_TTL_SECS;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    /// Result cache entry lifetime, in seconds.
    pub cache_ttl_secs: i64,
    /// Minimum token length retained by the scan tokenizer.
    pub scan_min_token_len: usize,
    pub scan: ScanConfidence,
}

/// Confidence assigned to each scan-mode match class.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfidence {
    /// A bare gazetteer substring match.
    pub bare: f64,
    /// A state/province-suffix match without a street-type token.
    pub state_suffix: f64,
    /// A full `number street city, ST` match.
    pub street_address: f64,
    /// A three-token window that resolves end-to-end.
    pub resolved_window: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_TTL_SECS,
            scan_min_token_len: 2,
            scan: ScanConfidence::default(),
        }
    }
}

impl Default for ScanConfidence {
    fn default() -> Self {
        Self {
            bare: 0.1,
            state_suffix: 0.6,
            street_address: 0.8,
            resolved_window: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: EngineConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_ttl_secs, 7 * 24 * 60 * 60);
        assert_eq!(config.scan.state_suffix, 0.6);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: EngineConfig = toml::from_str(
            r#"
            cache_ttl_secs = 3600

            [scan]
            bare = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_ttl_secs, 3600);
        assert_eq!(config.scan.bare, 0.2);
        // Unset fields keep their defaults.
        assert_eq!(config.scan.street_address, 0.8);
    }
}
