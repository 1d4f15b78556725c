//! jsgettext Library
//!
//! This library serves gettext translation catalogs to browsers:
//! - Search path resolution for package and project catalogs
//! - MO catalog loading with locale fallback merging
//! - Plural-Forms extraction and evaluation
//! - Serialization into a self-contained JavaScript module

pub mod catalog;
pub mod config;
pub mod error;
pub mod js;
pub mod locale;
pub mod logging;
pub mod paths;
pub mod plural;
pub mod render;

pub use catalog::{CatalogLoader, MergedCatalog, MessageKey, MoFileLoader, RawCatalog};
pub use config::AppConfig;
pub use error::{CatalogError, ConfigError, JsGettextError, Result};
pub use paths::{ConfiguredPackages, PackageLocator};
pub use plural::PluralRule;
pub use render::{render, render_with_config, CatalogRequest, RenderedCatalog};
