//! Locale fallback merging
//!
//! Builds the single catalog a request is served from. For every domain,
//! in declared order:
//!
//! 1. catalogs of the default locale are collected from all search paths,
//!    unless the default locale is English (ids are English already);
//! 2. catalogs of the requested locale are collected the same way and
//!    layered over them, unless both locales are the same.
//!
//! Within a pass, paths probed later override earlier ones. Across
//! domains, later domains override earlier ones.
//!
//! English gets one special case: when the requested locale is English
//! and no English catalog exists anywhere, the default-locale strings are
//! dropped instead of being served in place of the English ids.

use std::path::PathBuf;

use super::loader::CatalogLoader;
use super::{MergedCatalog, RawCatalog};
use crate::error::CatalogResult;
use crate::locale::{is_english, locale_candidates};

const ENGLISH: &str = "en";

/// Merges the catalogs of several domains and search paths under the
/// locale fallback policy
pub struct FallbackMerger<'a> {
    loader: &'a dyn CatalogLoader,
    paths: &'a [PathBuf],
}

impl<'a> FallbackMerger<'a> {
    pub fn new(loader: &'a dyn CatalogLoader, paths: &'a [PathBuf]) -> Self {
        Self { loader, paths }
    }

    /// Produces the merged catalog for one request
    pub fn merge<S: AsRef<str>>(
        &self,
        domains: &[S],
        requested_locale: &str,
        default_locale: &str,
    ) -> CatalogResult<MergedCatalog> {
        let en_selected = is_english(requested_locale);
        let mut en_catalog_missing = true;
        let mut merged = MergedCatalog::new();

        for domain in domains {
            let domain = domain.as_ref();

            if en_selected
                && en_catalog_missing
                && self.exists(domain, &[requested_locale, ENGLISH])?
            {
                en_catalog_missing = false;
            }

            let mut domain_catalog = RawCatalog::new();
            if default_locale != ENGLISH {
                domain_catalog.update(self.collect(domain, default_locale)?);
            }

            if requested_locale != default_locale {
                if en_selected && en_catalog_missing {
                    tracing::debug!(
                        domain,
                        requested_locale,
                        "No English catalog; falling back to message ids"
                    );
                    domain_catalog.clear();
                } else {
                    let requested = self.collect(domain, requested_locale)?;
                    if !requested.is_empty() {
                        domain_catalog.update(requested);
                    }
                }
            }

            tracing::debug!(domain, entries = domain_catalog.len(), "Merged domain");
            merged.update(domain_catalog);
        }

        Ok(merged)
    }

    /// Whether any search path has a catalog of `domain` for one of
    /// `locales` or their less specific forms
    fn exists(&self, domain: &str, locales: &[&str]) -> CatalogResult<bool> {
        let candidates = locale_candidates(locales);
        for path in self.paths {
            if self.loader.load(domain, path, &candidates)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Collects the catalogs of `domain` for `locale` from every search path
    fn collect(&self, domain: &str, locale: &str) -> CatalogResult<RawCatalog> {
        let candidates = locale_candidates(&[locale]);
        let mut collected = RawCatalog::new();
        for path in self.paths {
            if let Some(catalog) = self.loader.load(domain, path, &candidates)? {
                collected.update(catalog);
            }
        }
        Ok(collected)
    }
}

/// Convenience wrapper around [`FallbackMerger::merge`]
pub fn merge_catalogs<S: AsRef<str>>(
    loader: &dyn CatalogLoader,
    paths: &[PathBuf],
    domains: &[S],
    requested_locale: &str,
    default_locale: &str,
) -> CatalogResult<MergedCatalog> {
    FallbackMerger::new(loader, paths).merge(domains, requested_locale, default_locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MessageKey;
    use std::collections::HashMap;
    use std::path::Path;

    /// Catalogs keyed by (domain, path, locale)
    #[derive(Default)]
    struct StaticLoader {
        catalogs: HashMap<(String, PathBuf, String), RawCatalog>,
    }

    impl StaticLoader {
        fn with(mut self, domain: &str, path: &str, locale: &str, entries: &[(&str, &str)]) -> Self {
            let catalog = entries
                .iter()
                .map(|(k, v)| (MessageKey::scalar(*k), v.to_string()))
                .collect();
            self.catalogs
                .insert((domain.into(), PathBuf::from(path), locale.into()), catalog);
            self
        }
    }

    impl CatalogLoader for StaticLoader {
        fn load(
            &self,
            domain: &str,
            path: &Path,
            candidates: &[String],
        ) -> CatalogResult<Option<RawCatalog>> {
            Ok(candidates.iter().find_map(|locale| {
                self.catalogs
                    .get(&(domain.to_string(), path.to_path_buf(), locale.clone()))
                    .cloned()
            }))
        }
    }

    fn paths() -> Vec<PathBuf> {
        vec![PathBuf::from("/p1"), PathBuf::from("/p2")]
    }

    #[test]
    fn test_same_locale_skips_requested_pass() {
        let loader = StaticLoader::default().with("javascript", "/p1", "de", &[("Yes", "Ja")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "de", "de").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Ja"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_later_path_wins() {
        let loader = StaticLoader::default()
            .with("javascript", "/p1", "fr", &[("Yes", "Oui (p1)"), ("No", "Non")])
            .with("javascript", "/p2", "fr", &[("Yes", "Oui (p2)")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "fr", "en").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Oui (p2)"));
        assert_eq!(merged.get_scalar("No"), Some("Non"));
    }

    #[test]
    fn test_requested_locale_overrides_default() {
        let loader = StaticLoader::default()
            .with("javascript", "/p1", "de", &[("Yes", "Ja"), ("No", "Nein")])
            .with("javascript", "/p2", "fr", &[("Yes", "Oui")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "fr", "de").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Oui"));
        // untranslated in French, served in the default locale
        assert_eq!(merged.get_scalar("No"), Some("Nein"));
    }

    #[test]
    fn test_english_without_catalog_is_empty() {
        let loader = StaticLoader::default().with("javascript", "/p1", "de", &[("Yes", "Ja")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "en", "de").unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_english_with_catalog_keeps_default_fallback() {
        let loader = StaticLoader::default()
            .with("javascript", "/p1", "de", &[("Yes", "Ja"), ("No", "Nein")])
            .with("javascript", "/p2", "en", &[("Yes", "Yes!")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "en_GB", "de").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Yes!"));
        assert_eq!(merged.get_scalar("No"), Some("Nein"));
    }

    #[test]
    fn test_regional_english_catalog_counts_as_english() {
        let loader = StaticLoader::default()
            .with("javascript", "/p1", "de", &[("Hello", "Hallo"), ("Bye", "Tschüss")])
            .with("javascript", "/p2", "en_US", &[("Hello", "Howdy")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "en_US", "de").unwrap();
        assert_eq!(merged.get_scalar("Hello"), Some("Howdy"));
        assert_eq!(merged.get_scalar("Bye"), Some("Tschüss"));
    }

    #[test]
    fn test_other_regional_english_catalog_is_not_probed() {
        let loader = StaticLoader::default()
            .with("javascript", "/p1", "de", &[("Hello", "Hallo")])
            .with("javascript", "/p1", "en_GB", &[("Hello", "Hiya")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "en_US", "de").unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_english_default_skips_default_pass() {
        let loader = StaticLoader::default().with("javascript", "/p1", "en", &[("Yes", "Yep")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "es", "en").unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_later_domain_wins() {
        let loader = StaticLoader::default()
            .with("messages", "/p1", "it", &[("Yes", "Sì (base)"), ("Save", "Salva")])
            .with("javascript", "/p1", "it", &[("Yes", "Sì")]);
        let paths = paths();
        let merged =
            merge_catalogs(&loader, &paths, &["messages", "javascript"], "it", "en").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Sì"));
        assert_eq!(merged.get_scalar("Save"), Some("Salva"));
    }

    #[test]
    fn test_absent_domain_contributes_nothing() {
        let loader = StaticLoader::default().with("javascript", "/p1", "nl", &[("Yes", "Ja")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["unknown", "javascript"], "nl", "en").unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_locale_candidates_fall_back_to_language() {
        let loader = StaticLoader::default().with("javascript", "/p1", "pt", &[("Yes", "Sim")]);
        let paths = paths();
        let merged = merge_catalogs(&loader, &paths, &["javascript"], "pt_BR", "en").unwrap();
        assert_eq!(merged.get_scalar("Yes"), Some("Sim"));
    }
}
