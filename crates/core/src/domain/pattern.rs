// Key Pattern & Table Name (validated inputs for the state store)

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Keyword removed by default
pub const DEFAULT_KEYWORD: &str = "augment";

/// Key/value table the editor keeps its global state in
pub const DEFAULT_TABLE: &str = "ItemTable";

/// Escape character used in the generated LIKE clause
pub const LIKE_ESCAPE: char = '\\';

/// Substring to look for in the `key` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPattern(String);

impl KeyPattern {
    pub fn new(keyword: impl Into<String>) -> Result<Self> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(DomainError::EmptyKeyword);
        }
        Ok(Self(keyword))
    }

    pub fn keyword(&self) -> &str {
        &self.0
    }

    /// LIKE pattern matching the keyword as a literal substring.
    ///
    /// Must be paired with `ESCAPE '\'` in the statement.
    pub fn like_pattern(&self) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        out.push('%');
        for c in self.0.chars() {
            if c == '%' || c == '_' || c == LIKE_ESCAPE {
                out.push(LIKE_ESCAPE);
            }
            out.push(c);
        }
        out.push('%');
        out
    }

    /// Same semantics as SQLite LIKE: ASCII case-insensitive substring
    pub fn matches(&self, key: &str) -> bool {
        key.to_ascii_lowercase()
            .contains(&self.0.to_ascii_lowercase())
    }
}

impl Default for KeyPattern {
    fn default() -> Self {
        Self(DEFAULT_KEYWORD.to_string())
    }
}

impl std::fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Table name, safe to splice into SQL (identifiers cannot be bound)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        };

        if !valid {
            return Err(DomainError::InvalidTableName(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(DEFAULT_TABLE.to_string())
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
