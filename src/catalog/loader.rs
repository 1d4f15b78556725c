//! Catalog loading
//!
//! A loader answers one question: does `domain` have a catalog under
//! `path` for any of the candidate locales? The first candidate that does
//! wins. "No" is an ordinary answer, not an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::mo::parse_mo;
use super::RawCatalog;
use crate::error::{CatalogError, CatalogResult};

/// Source of compiled catalogs
pub trait CatalogLoader {
    /// Loads the catalog of `domain` under `path` for the first candidate
    /// locale that has one
    fn load(&self, domain: &str, path: &Path, candidates: &[String])
        -> CatalogResult<Option<RawCatalog>>;
}

/// Reads `<path>/<locale>/LC_MESSAGES/<domain>.mo` files
#[derive(Debug, Clone, Copy, Default)]
pub struct MoFileLoader;

impl MoFileLoader {
    pub fn new() -> Self {
        Self
    }

    /// Location of the catalog file for one candidate
    pub fn catalog_path(domain: &str, path: &Path, locale: &str) -> PathBuf {
        path.join(locale)
            .join("LC_MESSAGES")
            .join(format!("{}.mo", domain))
    }
}

impl CatalogLoader for MoFileLoader {
    fn load(
        &self,
        domain: &str,
        path: &Path,
        candidates: &[String],
    ) -> CatalogResult<Option<RawCatalog>> {
        let Some(file) = candidates
            .iter()
            .map(|locale| Self::catalog_path(domain, path, locale))
            .find(|file| file.is_file())
        else {
            tracing::trace!(domain, path = %path.display(), ?candidates, "No catalog");
            return Ok(None);
        };

        let bytes = match std::fs::read(&file) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Unreadable catalog skipped");
                return Ok(None);
            }
        };

        match parse_mo(&bytes) {
            Ok(catalog) => {
                tracing::debug!(
                    domain,
                    file = %file.display(),
                    entries = catalog.len(),
                    "Loaded catalog"
                );
                Ok(Some(catalog))
            }
            Err(e) if e.is_invariant_violation() => Err(CatalogError::InvalidKey {
                path: file,
                reason: e.to_string(),
            }),
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "Malformed catalog skipped");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_catalog_path() {
        let file = MoFileLoader::catalog_path("javascript", Path::new("/srv/locale"), "de_AT");
        assert_eq!(file, PathBuf::from("/srv/locale/de_AT/LC_MESSAGES/javascript.mo"));
    }

    #[test]
    fn test_missing_catalog_is_none() {
        let dir = tempdir().unwrap();
        let loader = MoFileLoader::new();
        let result = loader
            .load("javascript", dir.path(), &["fr".to_string()])
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_catalog_is_none() {
        let dir = tempdir().unwrap();
        let file = MoFileLoader::catalog_path("javascript", dir.path(), "fr");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"not a catalog at all, just text").unwrap();

        let loader = MoFileLoader::new();
        let result = loader
            .load("javascript", dir.path(), &["fr".to_string()])
            .unwrap();
        assert!(result.is_none());
    }
}
