use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::select::DEFAULT_TOP_N;

pub const DEFAULT_SAMPLES_URL: &str =
    "https://static.bc-edx.com/data/dl-1-2/m14/lms/starter/samples.json";
pub const DEFAULT_EARTHQUAKES_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "RUSTY_ATLAS_CONFIG";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Where the dashboards get their data. Every source may be an `http(s)`
/// URL or a local path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub samples_url: String,
    pub earthquakes_url: String,
    pub plates_url: String,
    /// Bars in the top-OTU chart.
    pub top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            samples_url: DEFAULT_SAMPLES_URL.to_string(),
            earthquakes_url: DEFAULT_EARTHQUAKES_URL.to_string(),
            plates_url: DEFAULT_PLATES_URL.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    /// Defaults, then the file named by `RUSTY_ATLAS_CONFIG` (if set), then
    /// the per-source `RUSTY_ATLAS_*_URL` variables.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV);
        Self::resolve(path.as_deref().map(Path::new), |key| std::env::var(key).ok())
    }

    /// Layer the optional config file and the `lookup` overrides over the
    /// defaults. An unreadable or invalid file is logged and replaced by
    /// the defaults; the overrides apply either way.
    pub fn resolve<F>(path: Option<&Path>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_json_file(path).unwrap_or_else(|e| {
                log::error!("Invalid configuration, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        config
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Replace sources with values returned by `lookup` for the
    /// `RUSTY_ATLAS_*_URL` keys.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets: [(&str, &mut String); 3] = [
            ("RUSTY_ATLAS_SAMPLES_URL", &mut self.samples_url),
            ("RUSTY_ATLAS_EARTHQUAKES_URL", &mut self.earthquakes_url),
            ("RUSTY_ATLAS_PLATES_URL", &mut self.plates_url),
        ];
        for (key, slot) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                log::debug!("{key} overrides {slot} with {value}");
                *slot = value;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        for (name, source) in [
            ("samples_url", &self.samples_url),
            ("earthquakes_url", &self.earthquakes_url),
            ("plates_url", &self.plates_url),
        ] {
            if source.trim().is_empty() {
                bail!("{name} must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config = AppConfig::from_json_str(r#"{"samples_url": "data/samples.json"}"#).unwrap();
        assert_eq!(config.samples_url, "data/samples.json");
        assert_eq!(config.earthquakes_url, DEFAULT_EARTHQUAKES_URL);
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        assert!(AppConfig::from_json_str(r#"{"top_n": 0}"#).is_err());
    }

    #[test]
    fn test_overrides_replace_only_set_keys() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "RUSTY_ATLAS_PLATES_URL" => Some("plates.json".to_string()),
            "RUSTY_ATLAS_SAMPLES_URL" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.plates_url, "plates.json");
        assert_eq!(config.samples_url, DEFAULT_SAMPLES_URL);
    }

    #[test]
    fn test_invalid_file_keeps_url_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        std::fs::write(&path, r#"{"top_n": 0}"#).unwrap();

        let config = AppConfig::resolve(Some(&path), |key| match key {
            "RUSTY_ATLAS_EARTHQUAKES_URL" => Some("quakes.geojson".to_string()),
            _ => None,
        });
        assert_eq!(config.earthquakes_url, "quakes.geojson");
        assert_eq!(config.top_n, DEFAULT_TOP_N);
        assert_eq!(config.samples_url, DEFAULT_SAMPLES_URL);
    }

    #[test]
    fn test_resolve_layers_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        std::fs::write(&path, r#"{"top_n": 5, "plates_url": "from_file.json"}"#).unwrap();

        let config = AppConfig::resolve(Some(&path), |key| {
            (key == "RUSTY_ATLAS_PLATES_URL").then(|| "from_env.json".to_string())
        });
        assert_eq!(config.top_n, 5);
        assert_eq!(config.plates_url, "from_env.json");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        std::fs::write(&path, r#"{"top_n": 5}"#).unwrap();
        assert_eq!(AppConfig::from_json_file(&path).unwrap().top_n, 5);
        assert!(AppConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
