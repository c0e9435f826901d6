//! Cell normalization and name classification
//!
//! Every parser runs raw display values through [`trim`] before looking at
//! them, and decides whether a cell holds a player name with
//! [`looks_like_name`]. A name is a single token of Latin letters (Latin-1
//! diacritics included), apostrophes and hyphens. Labels such as "Tanks" or
//! "TBD" are rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Labels that show up in roster sheets but are never player names
const STOPWORDS: &[&str] = &[
    "raid", "raids", "tanks", "tank", "healers", "heals", "dps", "melee", "ranged", "everyone",
    "all", "none", "tbd", "na", "n/a", "group", "groups",
];

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿ'\-]+$").expect("valid name pattern"));

// Byte order marks leak in from pasted CSV data. NEL (U+0085) is not a
// separator in sheet text and stays part of the cell.
fn is_cell_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Normalize a display value.
///
/// Absent input becomes the empty string. Non-breaking spaces count as
/// ordinary spaces, inner whitespace runs collapse to a single space and the
/// ends are stripped.
///
/// ```
/// use raid_roster::normalize::trim;
///
/// assert_eq!(trim("  Jaina\u{a0}\u{a0}Proudmoore "), "Jaina Proudmoore");
/// assert_eq!(trim(None), "");
/// ```
pub fn trim<'a>(s: impl Into<Option<&'a str>>) -> String {
    match s.into() {
        Some(s) => s
            .split(is_cell_space)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    }
}

pub fn is_blank<'a>(s: impl Into<Option<&'a str>>) -> bool {
    trim(s).is_empty()
}

/// Trimmed and lowercased, for comparisons
pub fn lowercase<'a>(s: impl Into<Option<&'a str>>) -> String {
    trim(s).to_lowercase()
}

pub fn is_stopword<'a>(s: impl Into<Option<&'a str>>) -> bool {
    let lc = lowercase(s);
    STOPWORDS.contains(&lc.as_str())
}

/// True when the cell plausibly holds one player name.
///
/// Multi-word values are rejected.
pub fn looks_like_name<'a>(s: impl Into<Option<&'a str>>) -> bool {
    let t = trim(s);
    if t.is_empty() || is_stopword(t.as_str()) {
        return false;
    }
    NAME_PATTERN.is_match(&t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_collapses_whitespace() {
        assert_eq!(trim("  a \t\n b  "), "a b");
        assert_eq!(trim("\u{a0}Thrall\u{a0}"), "Thrall");
        assert_eq!(trim("\u{feff}Rexxar"), "Rexxar");
    }

    #[test]
    fn test_trim_keeps_next_line_char() {
        assert_eq!(trim("Bob\u{85}"), "Bob\u{85}");
        assert!(!looks_like_name("Bob\u{85}"));
        assert!(!looks_like_name("\u{85}Bob"));
    }

    #[test]
    fn test_trim_absent_is_empty() {
        assert_eq!(trim(None), "");
        assert!(is_blank(None));
        assert!(is_blank(" \u{a0} "));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_trim_idempotent() {
        for s in ["", " a  b ", "\u{a0}\u{a0}x\ty\u{a0}", "Anduin", "\n\n"] {
            let once = trim(s);
            assert_eq!(trim(once.as_str()), once);
        }
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(lowercase("  ÉLISE  "), "élise");
    }

    #[test]
    fn test_stopwords_any_case() {
        for word in STOPWORDS {
            assert!(is_stopword(*word));
            assert!(is_stopword(word.to_uppercase().as_str()));
            assert!(!looks_like_name(word.to_uppercase().as_str()));
        }
        assert!(!looks_like_name("RAID"));
        assert!(!looks_like_name(" Tanks "));
    }

    #[test]
    fn test_looks_like_name() {
        assert!(looks_like_name("D'Arcy"));
        assert!(looks_like_name("Anne-Marie"));
        assert!(looks_like_name("Zoë"));
        assert!(looks_like_name("  Bob  "));
        assert!(!looks_like_name("Jon Snow"));
        assert!(!looks_like_name("Bob2"));
        assert!(!looks_like_name("G1"));
        assert!(!looks_like_name(""));
        assert!(!looks_like_name(None));
        assert!(!looks_like_name("Ana, Bo"));
    }
}
