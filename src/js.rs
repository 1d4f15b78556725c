//! JavaScript catalog serialization
//!
//! Turns a merged catalog into a self-executing script that defines
//! `gettext`, `ngettext`, `pgettext`, `npgettext` and `interpolate` on the
//! global object. Only the catalog table and the plural function vary per
//! request; the runtime around them is fixed text.
//!
//! Output is deterministic: assignment lines are sorted, so the same
//! catalog always serializes to the same bytes.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use crate::catalog::{MergedCatalog, MessageKey};
use crate::plural::PluralRule;

/// Media type of the generated script
pub const CONTENT_TYPE: &str = "text/javascript";

const TEMPLATE_HEAD: &str = "(function() {
    var catalog = {};
";

const TEMPLATE_BODY: &str = r#"
    var gettext = function(msgid) {
        var value = catalog[msgid];
        if (typeof(value) == 'undefined') {
            return msgid;
        } else {
            return (typeof(value) == 'string') ? value : value[0];
        }
    };

    var ngettext = function(singular, plural, count) {
        var value = catalog[singular];
        if (typeof(value) == 'undefined') {
            return (count == 1) ? singular : plural;
        } else {
            return value[pluralidx(count)];
        }
    };

    var pgettext = function(context, msgid) {
        var value = gettext(context + '\x04' + msgid);
        if (value.indexOf('\x04') != -1) {
            value = msgid;
        }
        return value;
    };

    var npgettext = function(context, singular, plural, count) {
        var value = ngettext(context + '\x04' + singular, context + '\x04' + plural, count);
        if (value.indexOf('\x04') != -1) {
            value = ngettext(singular, plural, count);
        }
        return value;
    };

    var interpolate = function(fmt, obj, named) {
        if (named) {
            return fmt.replace(/%\(\w+\)s/g, function(match){return String(obj[match.slice(2,-2)])});
        } else {
            return fmt.replace(/%s/g, function(match){return String(obj.shift())});
        }
    };
"#;

const PLURAL_DEFAULT: &str = "
    var pluralidx = function(count) { return (count == 1) ? 0 : 1; };
";

const TEMPLATE_FOOTER: &str = "
    this.gettext = gettext;
    this.ngettext = ngettext;
    this.pgettext = pgettext;
    this.npgettext = npgettext;
    this.interpolate = interpolate;
}).call(this);
";

/// Plural function evaluating a catalog-provided expression
fn plural_function(expression: &str) -> String {
    format!(
        "
    var pluralidx = function(n) {{
        var v={};
        if (typeof(v) == 'boolean') {{
            return v ? 1 : 0;
        }} else {{
            return v;
        }}
    }};
",
        expression
    )
}

/// Escapes `s` for use inside a single- or double-quoted JavaScript string
///
/// Quotes, backslashes and control characters are escaped, `</` is broken
/// up so the text can sit inside a `<script>` element, and everything
/// outside printable ASCII becomes a `\uXXXX` escape.
pub fn escape_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    let mut prev = '\0';
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '/' if prev == '<' => out.push_str("\\/"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
        }
        prev = ch;
    }
    out
}

/// The per-request parts of the script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogBuffers {
    /// `catalog['id'] = ['', ...];` lines sizing each plural array
    pub declarations: Vec<String>,
    /// Scalar and indexed plural assignments
    pub entries: Vec<String>,
}

impl CatalogBuffers {
    /// Splits `catalog` into sorted declaration and assignment lines
    ///
    /// The metadata entry is skipped. When an id has both a scalar entry and
    /// plural forms, the plural forms win.
    pub fn from_catalog(catalog: &MergedCatalog) -> Self {
        let mut max_index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut scalars = Vec::new();
        let mut entries = Vec::with_capacity(catalog.len());

        for (key, value) in catalog.iter() {
            match key {
                MessageKey::Scalar(id) if id.is_empty() => {}
                MessageKey::Scalar(id) => scalars.push((id.as_str(), value)),
                MessageKey::Plural { base_id, index } => {
                    let max = max_index.entry(base_id.as_str()).or_insert(*index);
                    *max = (*max).max(*index);
                    entries.push(format!(
                        "    catalog['{}'][{}] = '{}';\n",
                        escape_js(base_id),
                        index,
                        escape_js(value)
                    ));
                }
            }
        }

        let plural_ids: HashSet<&str> = max_index.keys().copied().collect();
        for (id, value) in scalars {
            if plural_ids.contains(id) {
                tracing::debug!(id, "Scalar entry shadowed by plural forms");
                continue;
            }
            entries.push(format!(
                "    catalog['{}'] = '{}';\n",
                escape_js(id),
                escape_js(value)
            ));
        }

        let mut declarations: Vec<String> = max_index
            .into_iter()
            .map(|(id, max)| {
                format!(
                    "    catalog['{}'] = [{}];\n",
                    escape_js(id),
                    vec!["''"; max + 1].join(",")
                )
            })
            .collect();

        declarations.sort();
        entries.sort();
        Self {
            declarations,
            entries,
        }
    }
}

/// Serializes a merged catalog into the client script
pub fn render_script(catalog: &MergedCatalog, rule: &PluralRule) -> String {
    let buffers = CatalogBuffers::from_catalog(catalog);
    let plural = match rule {
        PluralRule::Default => PLURAL_DEFAULT.to_string(),
        PluralRule::Expression(expr) => plural_function(expr),
    };

    let mut script = String::with_capacity(
        TEMPLATE_HEAD.len()
            + TEMPLATE_BODY.len()
            + TEMPLATE_FOOTER.len()
            + plural.len()
            + buffers
                .declarations
                .iter()
                .chain(&buffers.entries)
                .map(String::len)
                .sum::<usize>(),
    );
    script.push_str(TEMPLATE_HEAD);
    buffers
        .declarations
        .iter()
        .for_each(|line| script.push_str(line));
    buffers.entries.iter().for_each(|line| script.push_str(line));
    script.push_str(TEMPLATE_BODY);
    script.push_str(&plural);
    script.push_str(TEMPLATE_FOOTER);
    script
}
