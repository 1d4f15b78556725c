//! Translation catalog data model
//!
//! A catalog maps [`MessageKey`]s to translated strings. Simple messages are
//! keyed by their id; plural messages contribute one entry per grammatical
//! form, keyed by the singular id and the form index. Context-qualified ids
//! carry the context in front of the id, separated by [`CONTEXT_SEPARATOR`].
//!
//! The entry keyed by the empty id holds the catalog header (`Project-Id-Version`,
//! `Plural-Forms`, ...).

pub mod loader;
pub mod merger;
pub mod mo;

pub use loader::{CatalogLoader, MoFileLoader};
pub use merger::{merge_catalogs, FallbackMerger};

use std::collections::HashMap;
use std::fmt;

/// Separator between a message context and its id
pub const CONTEXT_SEPARATOR: char = '\x04';

/// Key of a single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKey {
    /// A simple message id (possibly context-qualified)
    Scalar(String),
    /// One plural form of the message whose singular id is `base_id`
    Plural { base_id: String, index: usize },
}

impl MessageKey {
    /// Key of the metadata entry
    pub fn metadata() -> Self {
        MessageKey::Scalar(String::new())
    }

    pub fn scalar(id: impl Into<String>) -> Self {
        MessageKey::Scalar(id.into())
    }

    pub fn plural(base_id: impl Into<String>, index: usize) -> Self {
        MessageKey::Plural {
            base_id: base_id.into(),
            index,
        }
    }

    /// Builds a context-qualified id (`context\x04id`)
    pub fn with_context(context: &str, id: &str) -> String {
        let mut key = String::with_capacity(context.len() + id.len() + 1);
        key.push_str(context);
        key.push(CONTEXT_SEPARATOR);
        key.push_str(id);
        key
    }

    /// The message id this key belongs to
    pub fn id(&self) -> &str {
        match self {
            MessageKey::Scalar(id) => id,
            MessageKey::Plural { base_id, .. } => base_id,
        }
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, MessageKey::Scalar(id) if id.is_empty())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKey::Scalar(id) => write!(f, "{:?}", id),
            MessageKey::Plural { base_id, index } => write!(f, "{:?}[{}]", base_id, index),
        }
    }
}

/// Translations of one domain for one locale, or an accumulation of several
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCatalog {
    entries: HashMap<MessageKey, String>,
}

/// The accumulation of every catalog applicable to one request
pub type MergedCatalog = RawCatalog;

impl RawCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any previous value for the key
    pub fn insert(&mut self, key: MessageKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    pub fn get(&self, key: &MessageKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Looks up a simple message by id
    pub fn get_scalar(&self, id: &str) -> Option<&str> {
        self.get(&MessageKey::scalar(id))
    }

    /// The header block stored under the empty id
    pub fn metadata(&self) -> Option<&str> {
        self.get(&MessageKey::metadata())
    }

    /// Merges another catalog into this one
    ///
    /// Entries from `other` override existing entries with the same key.
    pub fn update(&mut self, other: RawCatalog) {
        self.entries.extend(other.entries);
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MessageKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl FromIterator<(MessageKey, String)> for RawCatalog {
    fn from_iter<I: IntoIterator<Item = (MessageKey, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(MessageKey, String)> for RawCatalog {
    fn extend<I: IntoIterator<Item = (MessageKey, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for RawCatalog {
    type Item = (MessageKey, String);
    type IntoIter = std::collections::hash_map::IntoIter<MessageKey, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
