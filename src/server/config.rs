use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use ringzone::DEFAULT_STEPS;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub zone: ZoneConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ZoneConfig {
    /// Operational radius bounds enforced at the API boundary; the geometry
    /// core itself only requires a positive radius.
    pub min_radius_km: f64,
    pub max_radius_km: f64,
    pub default_radius_km: f64,
    /// Arc resolution for the buffer outline.
    pub steps: u32,
    /// Optional map URL to decode the centerline from (its `rl` parameter)
    /// instead of the built-in encoding.
    pub ring_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            zone: ZoneConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            min_radius_km: 1.0,
            max_radius_km: 100.0,
            default_radius_km: 25.0,
            steps: DEFAULT_STEPS,
            ring_url: None,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.zone.min_radius_km, 1.0);
        assert_eq!(config.zone.max_radius_km, 100.0);
        assert_eq!(config.zone.default_radius_km, 25.0);
        assert_eq!(config.zone.steps, DEFAULT_STEPS);
        assert!(config.zone.ring_url.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [zone]
            max_radius_km = 60.0
            "#,
        )
        .unwrap();
        assert_eq!(config.zone.max_radius_km, 60.0);
        assert_eq!(config.zone.min_radius_km, 1.0);
        assert_eq!(config.server.listen, "0.0.0.0:3000");
    }
}
