use crate::grammer::ast::Location;
use indexmap::IndexMap;
use serde::Serialize;

/// `#loc3` -> `"model.py":12:4`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AliasTable(IndexMap<String, String>);

impl AliasTable {
    pub fn new() -> Self {
        AliasTable(IndexMap::new())
    }

    /// Record every `#name = loc(...)` line of `text`.
    pub fn collect(text: &str) -> Self {
        let mut table = AliasTable::new();
        for line in text.lines() {
            if let Some((alias, target)) = parse_alias_line(line) {
                table.insert(alias, target);
            }
        }
        table
    }

    /// Returns the previous target when the alias was already defined.
    pub fn insert(&mut self, alias: String, target: String) -> Option<String> {
        self.0.insert(alias, target)
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text to show for a location. Undefined aliases fall back to the token.
    pub fn resolve<'a>(&'a self, location: &'a Location) -> &'a str {
        match location {
            Location::Literal(text) => text.as_str(),
            Location::Alias(alias) => self.get(alias).unwrap_or(alias.as_str()),
        }
    }

    pub fn resolve_str<'a>(&'a self, text: &'a str) -> &'a str {
        if text.starts_with('#') {
            self.get(text).unwrap_or(text)
        } else {
            text
        }
    }
}

/// `#<word> = loc(<anything>)`, the whole trimmed line.
pub fn parse_alias_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let rest = line.strip_prefix('#')?;
    let name_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }
    let (name, rest) = rest.split_at(name_len);
    let target = rest
        .trim_start()
        .strip_prefix('=')?
        .trim_start()
        .strip_prefix("loc(")?
        .strip_suffix(')')?;
    if target.is_empty() {
        return None;
    }
    Some((format!("#{name}"), target.to_string()))
}
