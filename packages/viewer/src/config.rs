//! Viewer configuration.
//!
//! Defaults are embedded at compile time from `config/default.toml`. A user
//! file only needs the keys it wants to change; anything it omits keeps the
//! embedded value.

use std::path::{Path, PathBuf};

use mine_map_filter::RenderBudget;
use mine_map_mine_models::color::ColorScheme;
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML, or a value is invalid (including
    /// render budget tiers that are unordered or decreasing).
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Resolved viewer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewerConfig {
    /// Location of the `GeoJSON` dataset.
    pub dataset_path: PathBuf,
    /// Length of each top-N ranking in the statistics.
    pub top_n: usize,
    /// Color scheme used when the viewer starts.
    pub color_scheme: ColorScheme,
    /// Detail (zoom) level used when the viewer starts.
    pub initial_detail: f64,
    /// Zoom-dependent render caps.
    pub render_budget: RenderBudget,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    dataset_path: Option<PathBuf>,
    top_n: Option<usize>,
    color_scheme: Option<ColorScheme>,
    initial_detail: Option<f64>,
    render_budget: Option<RenderBudget>,
}

impl Default for ViewerConfig {
    /// The embedded defaults.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which is fixed at compile
    /// time.
    fn default() -> Self {
        toml::de::from_str(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }
}

impl ViewerConfig {
    /// Parses `toml_str` and applies it over the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the TOML is malformed, has unknown
    /// keys, or carries an invalid render budget.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = toml::de::from_str(toml_str)?;
        Ok(Self::default().with_overrides(overrides))
    }

    /// Loads configuration from `path`, or returns the embedded defaults
    /// when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        log::info!("Loading config from {}", path.display());
        let toml_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&toml_str)
    }

    fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dataset_path) = overrides.dataset_path {
            self.dataset_path = dataset_path;
        }
        if let Some(top_n) = overrides.top_n {
            self.top_n = top_n;
        }
        if let Some(color_scheme) = overrides.color_scheme {
            self.color_scheme = color_scheme;
        }
        if let Some(initial_detail) = overrides.initial_detail {
            self.initial_detail = initial_detail;
        }
        if let Some(render_budget) = overrides.render_budget {
            self.render_budget = render_budget;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let config = ViewerConfig::default();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.color_scheme, ColorScheme::Commodity);
        assert_eq!(config.render_budget, RenderBudget::default());
        assert_eq!(config.dataset_path, PathBuf::from("data/mines.geojson"));
    }

    #[test]
    fn overrides_replace_only_given_keys() {
        let config = ViewerConfig::from_toml_str(
            r#"
            top_n = 10
            color_scheme = "assetType"
            "#,
        )
        .unwrap();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.color_scheme, ColorScheme::AssetType);
        assert_eq!(config.render_budget, RenderBudget::default());
    }

    #[test]
    fn overrides_render_budget() {
        let config = ViewerConfig::from_toml_str(
            r"
            [[render_budget]]
            below = 10.0
            limit = 50
            ",
        )
        .unwrap();
        assert_eq!(config.render_budget.limit(9.0), Some(50));
        assert_eq!(config.render_budget.limit(10.0), None);
    }

    #[test]
    fn rejects_invalid_budget() {
        let result = ViewerConfig::from_toml_str(
            r"
            [[render_budget]]
            below = 4.0
            limit = 50

            [[render_budget]]
            below = 2.0
            limit = 60
            ",
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(ViewerConfig::from_toml_str("zoom = 3").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("mine_map_viewer_missing_config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            ViewerConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn no_path_uses_defaults() {
        assert_eq!(ViewerConfig::load(None).unwrap(), ViewerConfig::default());
    }
}
