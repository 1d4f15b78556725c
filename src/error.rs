//! `jsgettext` Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for `jsgettext`
#[derive(Error, Debug)]
pub enum JsGettextError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors
///
/// These abort the whole request; nothing is emitted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read configuration '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Package '{package}' is not installed (no entry in [packages])")]
    UnknownPackage { package: String },

    #[error("Package '{package}' points at missing directory '{path}'")]
    MissingPackageDir { package: String, path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Catalog loading errors
///
/// Absence of a catalog (including an unreadable or damaged file) is never
/// an error; these cover catalogs whose contents cannot be represented in
/// the message model.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid message key in '{path}': {reason}")]
    InvalidKey { path: PathBuf, reason: String },
}

/// Result type alias for `jsgettext` operations
pub type Result<T> = std::result::Result<T, JsGettextError>;

/// Result type alias for Config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
