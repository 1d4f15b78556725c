//! Request entry point
//!
//! One call resolves the search paths, merges the applicable catalogs,
//! extracts the plural rule and serializes the script. Everything is built
//! fresh per call; nothing is shared between requests.

use std::path::PathBuf;

use crate::catalog::{CatalogLoader, FallbackMerger, MoFileLoader};
use crate::config::AppConfig;
use crate::error::Result;
use crate::js::{render_script, CONTENT_TYPE};
use crate::locale::to_locale;
use crate::paths::{resolve_search_paths, PackageLocator};
use crate::plural::{extract_plural_rule, PluralRule};

/// Inputs of one catalog request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    /// Locale the client asked for (`pt-br` or `pt_BR`)
    pub requested_locale: String,
    /// Site default locale
    pub default_locale: String,
    /// Domains in precedence order (later wins)
    pub domains: Vec<String>,
    /// Packages whose catalogs are searched; empty means the built-in one
    pub packages: Vec<String>,
    /// Extra catalog directories (earlier entries take precedence)
    pub locale_paths: Vec<PathBuf>,
}

/// Identity of a rendered catalog for hosts that cache responses
///
/// Two requests with equal keys produce identical output as long as the
/// catalogs on disk do not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub domains: Vec<String>,
    pub packages: Vec<String>,
    pub locale_paths: Vec<PathBuf>,
    pub requested_locale: String,
    pub default_locale: String,
}

impl CatalogRequest {
    /// A request for `requested_locale` using the configured defaults
    pub fn from_config(requested_locale: impl Into<String>, config: &AppConfig) -> Self {
        Self {
            requested_locale: requested_locale.into(),
            default_locale: config.i18n.language_code.clone(),
            domains: config.i18n.domains.clone(),
            packages: config.i18n.packages.clone(),
            locale_paths: config.i18n.locale_paths.clone(),
        }
    }

    /// Restricts the request to the given packages
    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            domains: self.domains.clone(),
            packages: self.packages.clone(),
            locale_paths: self.locale_paths.clone(),
            requested_locale: to_locale(&self.requested_locale),
            default_locale: to_locale(&self.default_locale),
        }
    }
}

/// The generated script and how to serve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCatalog {
    pub body: String,
    pub content_type: &'static str,
    /// Plural rule embedded in the script
    pub plural_rule: PluralRule,
    /// Number of merged entries, metadata included
    pub entries: usize,
}

/// Renders the catalog script for one request
pub fn render(
    request: &CatalogRequest,
    locator: &dyn PackageLocator,
    loader: &dyn CatalogLoader,
) -> Result<RenderedCatalog> {
    let requested_locale = to_locale(&request.requested_locale);
    let default_locale = to_locale(&request.default_locale);

    let paths = resolve_search_paths(&request.packages, &request.locale_paths, locator)?;
    let merged = FallbackMerger::new(loader, &paths).merge(
        &request.domains,
        &requested_locale,
        &default_locale,
    )?;

    let plural_rule = extract_plural_rule(&merged);
    let body = render_script(&merged, &plural_rule);

    tracing::info!(
        requested_locale = %requested_locale,
        default_locale = %default_locale,
        entries = merged.len(),
        plural = %plural_rule,
        bytes = body.len(),
        "Rendered catalog"
    );

    Ok(RenderedCatalog {
        body,
        content_type: CONTENT_TYPE,
        plural_rule,
        entries: merged.len(),
    })
}

/// Renders the catalog for `requested_locale` from MO files, using the
/// configured defaults and package locations
pub fn render_with_config(config: &AppConfig, requested_locale: &str) -> Result<RenderedCatalog> {
    let request = CatalogRequest::from_config(requested_locale, config);
    render(&request, &config.package_locator(), &MoFileLoader::new())
}
