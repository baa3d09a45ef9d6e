use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::formula::ParserConfig;
use crate::plot::PlotOptions;

/// Default capacity of the series cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Draw a grid behind the curves in rendered images.
    pub grid: bool,
    /// Number of formulas whose samples are memoized. 0 disables the cache.
    pub cache_capacity: usize,
    pub parser: ParserConfig,
    pub plot: PlotOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            grid: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            parser: ParserConfig::default(),
            plot: PlotOptions::default(),
        }
    }
}

/// Path to the config file.
pub fn config_path() -> Option<PathBuf> {
    Some(super::config_dir()?.join("config.toml"))
}

/// Load config from `path`, or from the default location when `None`.
///
/// A missing file yields defaults; at the default location a commented
/// default file is written as well. An unreadable or invalid file yields
/// defaults with a warning.
pub fn load_config(path: Option<&Path>) -> AppConfig {
    let (path, is_default) = match path {
        Some(p) => (p.to_path_buf(), false),
        None => match config_path() {
            Some(p) => (p, true),
            None => return AppConfig::default(),
        },
    };
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                debug!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("ignoring invalid config {}: {}", path.display(), e);
                AppConfig::default()
            }
        },
        Err(_) => {
            let config = AppConfig::default();
            if is_default {
                // Create default config file on first run
                if let Err(e) = write_default_config(&path, &config) {
                    warn!("{}", e);
                }
            }
            config
        }
    }
}

/// Write a default config file with comments.
pub fn write_default_config(path: &Path, config: &AppConfig) -> Result<(), String> {
    let body = toml::to_string(config).map_err(|e| format!("serialize error: {}", e))?;
    let content = format!(
        "# formplot configuration\n\
         #\n\
         # [parser] nan_aliases, thousands_separator, default_range, max_samples\n\
         # [plot] draw_width, draw_height, margin, axis_scale_x/y (\"linear\" or \"log\")\n\
         # cache_capacity = 0 disables sample memoization\n\
         \n\
         {}",
        body
    );
    std::fs::write(path, content.as_bytes()).map_err(|e| format!("write error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::RangeOverride;
    use crate::mapping::AxisScale;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("formplot-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.grid = true;
        config.plot.axis_scale_y = AxisScale::Log;
        config.parser = config.parser.with_default_range(RangeOverride {
            min: Some(-2.0),
            max: Some(2.0),
            step: None,
        });
        let text = toml::to_string(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("grid = true\n[plot]\ndraw_width = 320\n").unwrap();
        assert!(config.grid);
        assert_eq!(config.plot.draw_width, 320);
        assert_eq!(config.plot.draw_height, PlotOptions::default().draw_height);
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn test_written_default_loads_back() {
        let path = scratch("default.toml");
        write_default_config(&path, &AppConfig::default()).unwrap();
        assert_eq!(load_config(Some(&path)), AppConfig::default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let path = scratch("broken.toml");
        std::fs::write(&path, "grid = \"sometimes\"").unwrap();
        assert_eq!(load_config(Some(&path)), AppConfig::default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_explicit_file_is_not_created() {
        let path = scratch("absent.toml");
        assert_eq!(load_config(Some(&path)), AppConfig::default());
        assert!(!path.exists());
    }
}
