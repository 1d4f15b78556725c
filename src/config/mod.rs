//! Configuration management for jsgettext
//!
//! This module handles loading, parsing, and managing configuration from:
//! 1. Embedded default_config.toml (compile-time defaults)
//! 2. User config at ~/.config/jsgettext/config.toml (or platform-specific location)
//! 3. Project-local config at ./.jsgettext/config.toml

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::paths::ConfiguredPackages;

/// Default configuration embedded in binary
const DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub i18n: I18nConfig,
    /// Package name -> installation directory
    #[serde(default)]
    pub packages: HashMap<String, PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Translation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Language of the untranslated site (`en-us`, `de`, `pt-br`, ...)
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Extra catalog directories; later entries have lower precedence
    #[serde(default)]
    pub locale_paths: Vec<PathBuf>,
    /// Gettext domains merged into the script, in precedence order
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,
    /// Packages searched when a request names none
    #[serde(default)]
    pub packages: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            locale_paths: Vec::new(),
            domains: default_domains(),
            packages: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub timestamps: bool,
    #[serde(default = "default_false")]
    pub file_line: bool,
    #[serde(default = "default_false")]
    pub file_output: bool,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            timestamps: true,
            file_line: false,
            file_output: false,
            file_path: None,
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_language_code() -> String {
    "en-us".to_string()
}

fn default_domains() -> Vec<String> {
    vec!["messages".to_string(), "javascript".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn parse_table(contents: &str) -> ConfigResult<toml::Table> {
    toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn read_table(path: &Path) -> ConfigResult<toml::Table> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_table(&contents).map_err(|e| match e {
        ConfigError::ParseError(msg) => {
            ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), msg))
        }
        other => other,
    })
}

/// Overlays `overlay` onto `base`: nested tables merge key by key, every
/// other value replaces the base value
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match value {
            toml::Value::Table(nested) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, nested),
                _ => {
                    base.insert(key, toml::Value::Table(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// Configuration loading
// ============================================================================

impl AppConfig {
    /// Load configuration with fallback chain:
    /// 1. Project-local .jsgettext/config.toml
    /// 2. User config ~/.config/jsgettext/config.toml
    /// 3. Embedded default_config.toml
    pub fn load() -> ConfigResult<Self> {
        let layers: Vec<PathBuf> = [Self::user_config_path(), Self::project_config_path()]
            .into_iter()
            .flatten()
            .collect();
        Self::load_layers(&layers)
    }

    /// Layers the given files over the embedded defaults, in order
    ///
    /// Each file only replaces the keys it declares. Missing files are
    /// skipped; a file that fails to parse or validate is skipped with a
    /// warning.
    pub fn load_layers(paths: &[PathBuf]) -> ConfigResult<Self> {
        let mut table = parse_table(DEFAULT_CONFIG).map_err(|e| {
            ConfigError::ParseError(format!("Failed to parse default config: {}", e))
        })?;

        for path in paths.iter().filter(|path| path.exists()) {
            let overlay = match read_table(path) {
                Ok(overlay) => overlay,
                Err(e) => {
                    tracing::warn!("Failed to load config {:?}: {}", path, e);
                    continue;
                }
            };

            let mut layered = table.clone();
            merge_tables(&mut layered, overlay);
            match Self::from_table(layered.clone()) {
                Ok(_) => {
                    table = layered;
                    tracing::info!("Loaded config from {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Ignoring config {:?}: {}", path, e);
                }
            }
        }

        Self::from_table(table)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        Self::from_table(read_table(path)?).map_err(|e| match e {
            ConfigError::ParseError(msg) => {
                ConfigError::ParseError(format!("Failed to parse {}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Self::from_table(parse_table(contents)?)
    }

    fn from_table(table: toml::Table) -> ConfigResult<Self> {
        let mut config: AppConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        config.expand_paths();
        Ok(config)
    }

    /// Expands a leading `~` in every configured directory
    fn expand_paths(&mut self) {
        for path in &mut self.i18n.locale_paths {
            *path = expand_tilde(path);
        }
        for dir in self.packages.values_mut() {
            *dir = expand_tilde(dir);
        }
        if let Some(path) = &mut self.logging.file_path {
            *path = expand_tilde(path);
        }
    }

    /// Get the user config path (~/.config/jsgettext/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config_dir| config_dir.join("jsgettext").join("config.toml"))
    }

    /// Get the project-local config path (./.jsgettext/config.toml)
    pub fn project_config_path() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(".jsgettext").join("config.toml"))
    }

    /// Package locations as a locator for path resolution
    pub fn package_locator(&self) -> ConfiguredPackages {
        ConfiguredPackages::new(self.packages.clone())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.i18n.language_code.trim().is_empty() {
            return Err(ConfigError::Invalid("i18n.language_code is empty".to_string()));
        }
        if self.i18n.domains.iter().any(|d| d.trim().is_empty()) {
            return Err(ConfigError::Invalid("i18n.domains contains an empty name".to_string()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            i18n: I18nConfig::default(),
            packages: HashMap::new(),
            logging: LoggingConfig::default(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
