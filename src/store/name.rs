use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Validated table identifier: `name` or `schema.name`, each part made of
/// ASCII letters, digits and underscores and not starting with a digit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(EngineError::InvalidTableName(name));
        }
        Ok(Self(name))
    }

    /// Built-in names known to be valid identifiers
    pub(crate) fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::new(name).is_ok(), "invalid built-in table name {name}");
        Self(name.to_string())
    }

    /// Scenario-qualified table: `<scenario>__<base>`
    pub fn for_scenario(scenario: &str, base: &str) -> Result<Self> {
        Self::new(format!("{}__{}", scenario, base))
    }

    /// Place this table under `schema`, replacing any existing schema part
    pub fn in_schema(&self, schema: &str) -> Result<Self> {
        Self::new(format!("{}.{}", schema, self.table()))
    }

    pub fn schema(&self) -> Option<&str> {
        self.0.split_once('.').map(|(s, _)| s)
    }

    /// Name without the schema part
    pub fn table(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, t)| t)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TableName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
