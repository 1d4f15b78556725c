//! Locale name handling
//!
//! Two conventions meet here: language codes as configured or negotiated
//! (`pt-br`, `sr-latn`) and POSIX locale names used for catalog directories
//! (`pt_BR`, `sr_Latn`, `de_DE.UTF-8@euro`).

/// Converts a language code (`en-us`) into a locale name (`en_US`)
///
/// Territories of two letters are upper-cased; longer subtags (scripts)
/// are title-cased. Names that are already locale names pass through with
/// only the language part lower-cased.
///
/// # Examples
///
/// ```
/// use jsgettext::locale::to_locale;
/// assert_eq!(to_locale("en-us"), "en_US");
/// assert_eq!(to_locale("sr-latn"), "sr_Latn");
/// assert_eq!(to_locale("DE"), "de");
/// ```
pub fn to_locale(language: &str) -> String {
    let Some((lang, rest)) = language.split_once('-') else {
        return match language.split_once('_') {
            Some((lang, rest)) => format!("{}_{}", lang.to_lowercase(), rest),
            None => language.to_lowercase(),
        };
    };

    let lang = lang.to_lowercase();
    if rest.chars().count() > 2 {
        let mut chars = rest.chars();
        let first: String = chars.next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
        format!("{}_{}{}", lang, first, chars.as_str().to_lowercase())
    } else {
        format!("{}_{}", lang, rest.to_uppercase())
    }
}

/// Whether `locale` names a variant of English
pub fn is_english(locale: &str) -> bool {
    locale.starts_with("en")
}

const COMPONENT_CODESET: u8 = 1 << 0;
const COMPONENT_TERRITORY: u8 = 1 << 1;
const COMPONENT_MODIFIER: u8 = 1 << 2;

/// Expands a locale name into the lookup candidates gettext tries, most
/// specific first
///
/// `language[_territory][.codeset][@modifier]` yields every combination of
/// the optional parts that are present.
///
/// # Examples
///
/// ```
/// use jsgettext::locale::expand_locale;
/// assert_eq!(expand_locale("pt_BR"), vec!["pt_BR", "pt"]);
/// assert_eq!(expand_locale("de"), vec!["de"]);
/// ```
pub fn expand_locale(locale: &str) -> Vec<String> {
    let mut rest = locale;
    let mut mask = 0u8;

    let modifier = match rest.find('@') {
        Some(pos) => {
            mask |= COMPONENT_MODIFIER;
            let (head, tail) = rest.split_at(pos);
            rest = head;
            tail
        }
        None => "",
    };
    let codeset = match rest.find('.') {
        Some(pos) => {
            mask |= COMPONENT_CODESET;
            let (head, tail) = rest.split_at(pos);
            rest = head;
            tail
        }
        None => "",
    };
    let territory = match rest.find('_') {
        Some(pos) => {
            mask |= COMPONENT_TERRITORY;
            let (head, tail) = rest.split_at(pos);
            rest = head;
            tail
        }
        None => "",
    };
    let language = rest;

    let mut candidates = Vec::new();
    for combo in (0..=mask).rev() {
        if combo & !mask != 0 {
            continue;
        }
        let mut value = language.to_string();
        if combo & COMPONENT_TERRITORY != 0 {
            value.push_str(territory);
        }
        if combo & COMPONENT_CODESET != 0 {
            value.push_str(codeset);
        }
        if combo & COMPONENT_MODIFIER != 0 {
            value.push_str(modifier);
        }
        candidates.push(value);
    }
    candidates
}

/// Lookup candidates for a list of requested locales
///
/// Duplicates are dropped; the `C` locale ends the list.
pub fn locale_candidates<S: AsRef<str>>(locales: &[S]) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for locale in locales {
        let locale = locale.as_ref();
        if locale == "C" {
            break;
        }
        for candidate in expand_locale(locale) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }
    candidates
}
