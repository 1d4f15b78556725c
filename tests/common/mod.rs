//! Shared fixtures: MO files written into temporary locale trees

#![allow(dead_code)]

use std::path::{Path, PathBuf};

const MAGIC: u32 = 0x9504_12de;

/// Encodes `(msgid, msgstr)` pairs as a little-endian MO file
///
/// Plural messages use `"singular\0plural"` ids and NUL-separated forms.
pub fn mo_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut entries = entries.to_vec();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let n = entries.len() as u32;
    let originals = 20u32;
    let translations = originals + n * 8;
    let mut offset = translations + n * 8;

    let mut table = Vec::new();
    let mut data = Vec::new();
    for text in entries
        .iter()
        .map(|(id, _)| *id)
        .chain(entries.iter().map(|(_, s)| *s))
    {
        table.push((text.len() as u32, offset));
        data.extend_from_slice(text.as_bytes());
        data.push(0);
        offset += text.len() as u32 + 1;
    }

    let mut out = Vec::new();
    for word in [MAGIC, 0, n, originals, translations] {
        out.extend_from_slice(&word.to_le_bytes());
    }
    for (len, off) in table {
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&off.to_le_bytes());
    }
    out.extend_from_slice(&data);
    out
}

/// Writes `<root>/<locale>/LC_MESSAGES/<domain>.mo`
pub fn write_catalog(root: &Path, locale: &str, domain: &str, entries: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(locale).join("LC_MESSAGES");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join(format!("{}.mo", domain));
    std::fs::write(&file, mo_bytes(entries)).unwrap();
    file
}

/// Header declaring a two-form plural rule
pub const TWO_FORMS_HEADER: &str =
    "Content-Type: text/plain; charset=UTF-8\nPlural-Forms: nplurals=2; plural=(n != 1);\n";
