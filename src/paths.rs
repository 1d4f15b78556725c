//! Catalog search path resolution
//!
//! Packages ship their catalogs in a `locale/` directory next to their
//! code; the configuration may add project-wide directories on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Package searched when a request names none
pub const DEFAULT_PACKAGE: &str = "jsgettext";

/// Name of the catalog directory inside a package
const LOCALE_DIR: &str = "locale";

/// Installation directory of the built-in package
///
/// Used when the configuration does not relocate it. The directory need
/// not exist; a missing one simply holds no catalogs.
pub fn builtin_package_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_PACKAGE)
}

/// Maps a package identifier to the directory it is installed in
pub trait PackageLocator {
    fn locate(&self, package: &str) -> ConfigResult<PathBuf>;
}

/// Package locations declared in the `[packages]` configuration table
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPackages {
    packages: HashMap<String, PathBuf>,
}

impl ConfiguredPackages {
    pub fn new(packages: HashMap<String, PathBuf>) -> Self {
        Self { packages }
    }

    /// Registers (or replaces) the location of `package`
    pub fn with_package(mut self, package: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.packages.insert(package.into(), dir.into());
        self
    }
}

impl PackageLocator for ConfiguredPackages {
    fn locate(&self, package: &str) -> ConfigResult<PathBuf> {
        let Some(dir) = self.packages.get(package) else {
            if package == DEFAULT_PACKAGE {
                return Ok(builtin_package_dir());
            }
            return Err(ConfigError::UnknownPackage {
                package: package.to_string(),
            });
        };

        if !dir.is_dir() {
            return Err(ConfigError::MissingPackageDir {
                package: package.to_string(),
                path: dir.clone(),
            });
        }
        Ok(dir.clone())
    }
}

/// Builds the ordered list of directories to probe for catalogs
///
/// Package catalog directories come first, in the order given (the
/// default package when `packages` is empty), followed by `locale_paths`
/// in reverse of their declared order. Catalogs found in later entries
/// override those found in earlier ones.
pub fn resolve_search_paths<S: AsRef<str>>(
    packages: &[S],
    locale_paths: &[PathBuf],
    locator: &dyn PackageLocator,
) -> ConfigResult<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(packages.len().max(1) + locale_paths.len());

    if packages.is_empty() {
        paths.push(package_locale_dir(locator, DEFAULT_PACKAGE)?);
    } else {
        for package in packages {
            paths.push(package_locale_dir(locator, package.as_ref())?);
        }
    }

    paths.extend(locale_paths.iter().rev().cloned());

    tracing::debug!(?paths, "Resolved catalog search paths");
    Ok(paths)
}

fn package_locale_dir(locator: &dyn PackageLocator, package: &str) -> ConfigResult<PathBuf> {
    locator.locate(package).map(|dir| locale_dir(&dir))
}

fn locale_dir(package_dir: &Path) -> PathBuf {
    package_dir.join(LOCALE_DIR)
}
