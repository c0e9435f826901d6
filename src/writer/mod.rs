//! Lua table literal writer
//!
//! Renders the parsed roster fields as Lua table constructors. Output is
//! deterministic: lists keep their order, numeric maps are sorted by key and
//! string maps keep insertion order. Collections are always written as
//! `{ ` + entries joined by `, ` + ` }`, so an empty collection is `{  }`.

use crate::types::{HealAssignRow, SlotMap};
use once_cell::sync::Lazy;
use regex::Regex;

static LUA_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier pattern"));

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

/// True when `name` can be assigned as a Lua global (`name = { ... }`)
pub fn is_lua_identifier(name: &str) -> bool {
    LUA_IDENTIFIER.is_match(name) && !LUA_KEYWORDS.contains(&name)
}

/// Quote a string as a Lua literal, escaping backslashes before quotes.
///
/// ```
/// use raid_roster::writer::escape_string;
///
/// assert_eq!(escape_string(Some(r#"a"b\c"#)), r#""a\"b\\c""#);
/// assert_eq!(escape_string(None), r#""""#);
/// ```
pub fn escape_string(s: Option<&str>) -> String {
    let s = s.unwrap_or_default();
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn table<I>(entries: I) -> String
where
    I: IntoIterator<Item = String>,
{
    format!("{{ {} }}", entries.into_iter().collect::<Vec<_>>().join(", "))
}

/// `{ "a", "b" }`
pub fn render_list<S: AsRef<str>>(items: &[S]) -> String {
    table(items.iter().map(|item| escape_string(Some(item.as_ref()))))
}

/// `{ [1] = "a", [3] = "b" }`, keys ascending
pub fn render_numeric_map(map: &SlotMap) -> String {
    table(
        map.iter()
            .map(|(key, value)| format!("[{}] = {}", key, escape_string(Some(value.as_str())))),
    )
}

/// `{ key = "value", ... }` in the given order
pub fn render_string_map<K, V>(entries: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    table(entries.iter().map(|(key, value)| {
        format!("{} = {}", key.as_ref(), escape_string(Some(value.as_ref())))
    }))
}

/// `{ { "a", "b", "c" }, ... }`
pub fn render_row_table<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    table(rows.iter().map(|row| render_list(row)))
}

/// HealAssign rows, always three fields each
pub fn render_heal_assign(rows: &[HealAssignRow]) -> String {
    let rows: Vec<Vec<&str>> = rows.iter().map(|row| row.fields().to_vec()).collect();
    render_row_table(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash_before_quote() {
        // A pre-escaped quote must not collapse into a bare one
        assert_eq!(escape_string(Some(r#"\""#)), r#""\\\"""#);
        assert_eq!(escape_string(Some("plain")), "\"plain\"");
        assert_eq!(escape_string(Some("")), "\"\"");
    }

    #[test]
    fn test_is_lua_identifier() {
        assert!(is_lua_identifier("MyRaidData"));
        assert!(is_lua_identifier("_raid2"));
        assert!(!is_lua_identifier("2raid"));
        assert!(!is_lua_identifier("My Raid"));
        assert!(!is_lua_identifier("return"));
        assert!(!is_lua_identifier(""));
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render_list(&["Ana", "Bo"]), r#"{ "Ana", "Bo" }"#);
        assert_eq!(render_list::<&str>(&[]), "{  }");
    }

    #[test]
    fn test_render_numeric_map_sorted() {
        let mut map = SlotMap::new();
        map.insert(3, "Finn".to_string());
        map.insert(1, "Gia".to_string());
        assert_eq!(render_numeric_map(&map), r#"{ [1] = "Gia", [3] = "Finn" }"#);
        assert_eq!(render_numeric_map(&SlotMap::new()), "{  }");
    }

    #[test]
    fn test_render_string_map_keeps_order() {
        let entries = [("zeta", "Z"), ("alpha", "")];
        assert_eq!(
            render_string_map(&entries),
            r#"{ zeta = "Z", alpha = "" }"#
        );
    }

    #[test]
    fn test_render_row_table() {
        let rows = vec![vec!["Tank", "", ""], vec!["Bear", "Ana", "Bo"]];
        assert_eq!(
            render_row_table(&rows),
            r#"{ { "Tank", "", "" }, { "Bear", "Ana", "Bo" } }"#
        );
        assert_eq!(render_row_table::<&str>(&[]), "{  }");
    }

    #[test]
    fn test_render_heal_assign() {
        let rows = vec![HealAssignRow::new("Tank", "", "")];
        assert_eq!(render_heal_assign(&rows), r#"{ { "Tank", "", "" } }"#);
    }
}
