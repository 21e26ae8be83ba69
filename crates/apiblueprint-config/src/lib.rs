//! Parser settings kept in `~/.config/apiblueprint/config.toml`.
//!
//! ```toml
//! [parser]
//! export_source_maps = false
//! max_nesting_depth = 16
//! ```
//!
//! Keys that are left out keep the defaults of [`ParseOptions`].

use apiblueprint_engine::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the location of the config file.
pub const CONFIG_ENV: &str = "APIBLUEPRINT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read parser config at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse parser config at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid parser config at {config_path}: {reason}")]
    InvalidOption {
        config_path: PathBuf,
        reason: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParseOptions,
}

impl Config {
    /// Reads the config at `config_path`; `~` and `$VARS` in the path are
    /// expanded first. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = Self::expand_path(config_path.as_ref())
            .unwrap_or_else(|| config_path.as_ref().to_path_buf());
        if !config_path.exists() {
            log::debug!("no parser config at {}, using defaults", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.clone(),
                source,
            }
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.clone(),
                source,
            })?;
        config.validate(&config_path)?;

        log::debug!(
            "parser config from {}: source maps {}, nesting limit {}",
            config_path.display(),
            config.parser.export_source_maps,
            config.parser.max_nesting_depth
        );
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Options for [`apiblueprint_engine::parse_blueprint`], from the config
    /// file when there is one.
    pub fn parse_options() -> Result<ParseOptions, ConfigError> {
        Ok(Self::load()?.unwrap_or_default().parser)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        self.validate(config_path)?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    /// `$APIBLUEPRINT_CONFIG` when set, else the per-user config file.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        let config_dir = shellexpand::tilde("~/.config/apiblueprint");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// A zero nesting limit would abort every parse at the document itself.
    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        if self.parser.max_nesting_depth == 0 {
            return Err(ConfigError::InvalidOption {
                config_path: config_path.to_path_buf(),
                reason: "parser.max_nesting_depth must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        shellexpand::full(&path.to_string_lossy())
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiblueprint_engine::parse_blueprint;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_path_is_per_user() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        if env::var(CONFIG_ENV).is_err() {
            assert!(!path_str.starts_with('~'));
            assert!(path_str.ends_with(".config/apiblueprint/config.toml"));
        }
    }

    #[test]
    fn test_parser_table_round_trips_through_toml() {
        let config = Config {
            parser: ParseOptions {
                export_source_maps: false,
                max_nesting_depth: 8,
            },
        };

        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("[parser]"), "{text}");
        assert!(text.contains("export_source_maps = false"), "{text}");
        assert!(text.contains("max_nesting_depth = 8"), "{text}");

        let read_back: Config = toml::from_str(&text).unwrap();
        assert_eq!(read_back, config);
    }

    #[test]
    fn test_partial_parser_table_keeps_defaults() {
        let config: Config = toml::from_str("[parser]\nmax_nesting_depth = 4\n").unwrap();
        assert!(config.parser.export_source_maps);
        assert_eq!(config.parser.max_nesting_depth, 4);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty.parser, ParseOptions::default());
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("absent.toml")).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_zero_nesting_limit_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[parser]\nmax_nesting_depth = 0\n");

        let result = Config::load_from_path(&path);
        assert!(matches!(result, Err(ConfigError::InvalidOption { .. })));

        let config = Config {
            parser: ParseOptions {
                max_nesting_depth: 0,
                ..ParseOptions::default()
            },
        };
        assert!(config.save_to_path(temp_dir.path().join("out.toml")).is_err());
    }

    #[test]
    fn test_mistyped_option_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[parser]\nmax_nesting_depth = \"deep\"\n");

        let result = Config::load_from_path(&path);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_saved_options_drive_the_parser() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        Config {
            parser: ParseOptions {
                export_source_maps: false,
                ..ParseOptions::default()
            },
        }
        .save_to_path(&config_file)
        .unwrap();

        let options = Config::load_from_path(&config_file).unwrap().unwrap().parser;
        let result = parse_blueprint("# Notes API\n\nNotes.\n", &options);
        assert_eq!(result.node.name, "Notes API");
        assert!(result.node.source_map.is_empty());
    }

    #[test]
    fn test_config_location_expands_env_var() {
        let temp_dir = TempDir::new().unwrap();
        write_config(&temp_dir, "[parser]\nmax_nesting_depth = 3\n");
        unsafe {
            env::set_var("APIBLUEPRINT_TEST_DIR", temp_dir.path());
        }

        let loaded = Config::load_from_path("$APIBLUEPRINT_TEST_DIR/config.toml")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.parser.max_nesting_depth, 3);

        unsafe {
            env::remove_var("APIBLUEPRINT_TEST_DIR");
        }
    }

    #[test]
    fn test_expand_path_leaves_absolute_paths() {
        let path = PathBuf::from("/etc/apiblueprint/config.toml");
        assert_eq!(Config::expand_path(&path), Some(path));
    }
}
