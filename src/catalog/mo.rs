//! GNU MO file reader
//!
//! Layout (all integers 32-bit, byte order given by the magic number):
//!
//! | offset | field                               |
//! |--------|-------------------------------------|
//! | 0      | magic `0x950412de`                  |
//! | 4      | revision (major in the high 16 bits)|
//! | 8      | number of strings `N`               |
//! | 12     | offset of original strings table   |
//! | 16     | offset of translated strings table  |
//!
//! Each table holds `N` `(length, offset)` pairs. A msgid containing a NUL
//! is a plural message `singular\0plural` whose translation holds one
//! NUL-separated string per form.

use thiserror::Error;

use super::{MessageKey, RawCatalog};

const MAGIC: u32 = 0x9504_12de;
const MAGIC_SWAPPED: u32 = 0xde12_0495;
const HEADER_LEN: usize = 20;

/// Errors from MO parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoError {
    #[error("bad magic number 0x{0:08x}")]
    BadMagic(u32),

    #[error("unsupported revision {major}.{minor}")]
    UnsupportedRevision { major: u32, minor: u32 },

    #[error("file truncated while reading {what}")]
    Truncated { what: &'static str },

    #[error("string {index} is not valid UTF-8")]
    InvalidUtf8 { index: usize },

    /// The entry cannot be expressed as a [`MessageKey`]
    #[error("message {index}: {reason}")]
    InvalidKey { index: usize, reason: String },
}

impl MoError {
    /// Whether the error describes data that violates the message model
    /// rather than a damaged file
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, MoError::InvalidKey { .. })
    }
}

#[derive(Clone, Copy)]
enum ByteOrder {
    Little,
    Big,
}

struct Reader<'a> {
    bytes: &'a [u8],
    order: ByteOrder,
}

impl<'a> Reader<'a> {
    fn u32_at(&self, offset: usize, what: &'static str) -> Result<u32, MoError> {
        let end = offset.checked_add(4).ok_or(MoError::Truncated { what })?;
        let raw: [u8; 4] = self
            .bytes
            .get(offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(MoError::Truncated { what })?;
        Ok(match self.order {
            ByteOrder::Little => u32::from_le_bytes(raw),
            ByteOrder::Big => u32::from_be_bytes(raw),
        })
    }

    /// Reads the `index`-th string of the table starting at `table`
    fn string(&self, table: usize, index: usize, what: &'static str) -> Result<&'a str, MoError> {
        let slot = index
            .checked_mul(8)
            .and_then(|o| o.checked_add(table))
            .ok_or(MoError::Truncated { what })?;
        let len = self.u32_at(slot, what)? as usize;
        let offset = self.u32_at(slot + 4, what)? as usize;
        let end = offset.checked_add(len).ok_or(MoError::Truncated { what })?;
        let raw = self
            .bytes
            .get(offset..end)
            .ok_or(MoError::Truncated { what })?;
        std::str::from_utf8(raw).map_err(|_| MoError::InvalidUtf8 { index })
    }
}

/// Parses a compiled MO catalog
pub fn parse_mo(bytes: &[u8]) -> Result<RawCatalog, MoError> {
    if bytes.len() < HEADER_LEN {
        return Err(MoError::Truncated { what: "header" });
    }

    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let order = match magic {
        MAGIC => ByteOrder::Little,
        MAGIC_SWAPPED => ByteOrder::Big,
        other => return Err(MoError::BadMagic(other)),
    };
    let reader = Reader { bytes, order };

    let revision = reader.u32_at(4, "revision")?;
    let (major, minor) = (revision >> 16, revision & 0xffff);
    if major > 1 {
        return Err(MoError::UnsupportedRevision { major, minor });
    }

    let count = reader.u32_at(8, "string count")? as usize;
    let originals = reader.u32_at(12, "original table offset")? as usize;
    let translations = reader.u32_at(16, "translation table offset")? as usize;

    let mut catalog = RawCatalog::new();
    for index in 0..count {
        let msgid = reader.string(originals, index, "original string")?;
        let msgstr = reader.string(translations, index, "translated string")?;

        match msgid.split_once('\0') {
            None => catalog.insert(MessageKey::scalar(msgid), msgstr),
            Some((singular, plural)) => {
                if plural.contains('\0') {
                    return Err(MoError::InvalidKey {
                        index,
                        reason: format!(
                            "plural msgid for {:?} has more than two NUL-separated parts",
                            singular
                        ),
                    });
                }
                for (form, text) in msgstr.split('\0').enumerate() {
                    catalog.insert(MessageKey::plural(singular, form), text);
                }
            }
        }
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// MO image for `entries`, in the given order
    fn build_mo(entries: &[(&str, &str)], big_endian: bool) -> Vec<u8> {
        let put = |buf: &mut Vec<u8>, v: u32| {
            if big_endian {
                buf.extend_from_slice(&v.to_be_bytes());
            } else {
                buf.extend_from_slice(&v.to_le_bytes());
            }
        };
        let n = entries.len() as u32;
        let originals = HEADER_LEN as u32;
        let translations = originals + n * 8;
        let mut data_offset = translations + n * 8;

        let mut out = Vec::new();
        put(&mut out, MAGIC);
        put(&mut out, 0);
        put(&mut out, n);
        put(&mut out, originals);
        put(&mut out, translations);

        let mut data = Vec::new();
        let mut tables = (Vec::new(), Vec::new());
        for (id, _) in entries {
            tables.0.push((id.len() as u32, data_offset));
            data.extend_from_slice(id.as_bytes());
            data.push(0);
            data_offset += id.len() as u32 + 1;
        }
        for (_, text) in entries {
            tables.1.push((text.len() as u32, data_offset));
            data.extend_from_slice(text.as_bytes());
            data.push(0);
            data_offset += text.len() as u32 + 1;
        }
        for (len, off) in tables.0.into_iter().chain(tables.1) {
            put(&mut out, len);
            put(&mut out, off);
        }
        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn test_parse_scalar_and_plural() {
        let bytes = build_mo(
            &[
                ("", "Language: es\nPlural-Forms: nplurals=2; plural=(n != 1);\n"),
                ("Hello", "Hola"),
                ("item\0items", "1 elemento\0%d elementos"),
            ],
            false,
        );
        let catalog = parse_mo(&bytes).unwrap();

        assert_eq!(catalog.get_scalar("Hello"), Some("Hola"));
        assert_eq!(catalog.get(&MessageKey::plural("item", 0)), Some("1 elemento"));
        assert_eq!(catalog.get(&MessageKey::plural("item", 1)), Some("%d elementos"));
        assert!(catalog.metadata().unwrap().contains("Plural-Forms"));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_parse_big_endian() {
        let bytes = build_mo(&[("File", "Datei")], true);
        let catalog = parse_mo(&bytes).unwrap();
        assert_eq!(catalog.get_scalar("File"), Some("Datei"));
    }

    #[test]
    fn test_context_is_kept_in_id() {
        let bytes = build_mo(&[("menu\x04Open", "Öffnen")], false);
        let catalog = parse_mo(&bytes).unwrap();
        assert_eq!(catalog.get_scalar("menu\x04Open"), Some("Öffnen"));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_mo(&[], false);
        bytes[0] = 0;
        assert!(matches!(parse_mo(&bytes), Err(MoError::BadMagic(_))));
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            parse_mo(&[0xde, 0x12, 0x04]),
            Err(MoError::Truncated { what: "header" })
        );

        let bytes = build_mo(&[("Hello", "Hola")], false);
        let cut = &bytes[..bytes.len() - 4];
        assert!(matches!(parse_mo(cut), Err(MoError::Truncated { .. })));
    }

    #[test]
    fn test_unsupported_revision() {
        let mut bytes = build_mo(&[], false);
        bytes[4..8].copy_from_slice(&(2u32 << 16).to_le_bytes());
        assert_eq!(
            parse_mo(&bytes),
            Err(MoError::UnsupportedRevision { major: 2, minor: 0 })
        );
    }

    #[test]
    fn test_invalid_plural_key() {
        let bytes = build_mo(&[("a\0b\0c", "x\0y")], false);
        let err = parse_mo(&bytes).unwrap_err();
        assert!(err.is_invariant_violation());
    }
}
