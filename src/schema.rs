//! Column specifications and the semantic types that drive value formatting.
//!
//! Output columns come from a comma-separated list; their types come from
//! `col:type` pairs on the command line and, optionally, a YAML schema file:
//!
//! ```yaml
//! columns:
//!   - name: amount
//!     type: decimal
//!   - name: active
//!     type: boolean
//! ```
//!
//! Column names are matching keys and compare case-insensitively. Any column
//! without a declared type, or with a type name that is not recognised, is
//! formatted as text.

use std::{collections::HashMap, fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SqlType {
    #[default]
    Text,
    Integer,
    Decimal,
    Date,
    Boolean,
}

impl SqlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Text => "text",
            SqlType::Integer => "integer",
            SqlType::Decimal => "decimal",
            SqlType::Date => "date",
            SqlType::Boolean => "boolean",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["text", "integer", "decimal", "date", "boolean"]
    }

    /// Resolves a declared type name for `column`, falling back to text with
    /// a warning when the name is not recognised.
    pub fn parse_lenient(column: &str, name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(
                "Column '{column}' declares unknown type '{}'; formatting it as text",
                name.trim()
            );
            SqlType::Text
        })
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "text" | "string" => Ok(SqlType::Text),
            "integer" | "int" => Ok(SqlType::Integer),
            "decimal" | "numeric" => Ok(SqlType::Decimal),
            "date" => Ok(SqlType::Date),
            "boolean" | "bool" => Ok(SqlType::Boolean),
            _ => Err(anyhow!(
                "Unknown column type '{value}'. Supported types: {}",
                SqlType::variants().join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub sql_type: SqlType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, SqlType::Text)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Case-insensitive column name to type lookup. Later inserts win.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    types: HashMap<String, SqlType>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn parse(spec: &str) -> Result<Self> {
        let mut map = TypeMap::new();
        map.extend_from_spec(spec)?;
        Ok(map)
    }

    /// Adds `col:type` pairs joined by commas. Entries without a `:` are
    /// skipped and unrecognised type names resolve to text.
    pub fn extend_from_spec(&mut self, spec: &str) -> Result<()> {
        for entry in spec.split(',') {
            let Some((column, ty)) = entry.split_once(':') else {
                if !entry.trim().is_empty() {
                    debug!("Ignoring type entry without ':' separator: '{entry}'");
                }
                continue;
            };
            let column = column.trim();
            if column.is_empty() {
                bail!("Type entry '{entry}' is missing a column name");
            }
            self.insert(column, SqlType::parse_lenient(column, ty));
        }
        Ok(())
    }

    pub fn insert(&mut self, column: &str, sql_type: SqlType) {
        self.types.insert(column.trim().to_lowercase(), sql_type);
    }

    pub fn get(&self, column: &str) -> Option<SqlType> {
        self.types.get(&column.trim().to_lowercase()).copied()
    }

    pub fn type_of(&self, column: &str) -> SqlType {
        self.get(column).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type", default)]
    pub sql_type: Option<String>,
}

impl SchemaColumn {
    pub fn resolved_type(&self) -> SqlType {
        self.sql_type
            .as_deref()
            .map(|name| SqlType::parse_lenient(&self.name, name))
            .unwrap_or_default()
    }
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Reading schema file {path:?}"))?;
        Self::from_yaml_str(&contents).with_context(|| format!("Loading schema from {path:?}"))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).context("Parsing schema YAML")
    }

    pub fn type_map(&self) -> TypeMap {
        let mut map = TypeMap::new();
        for column in &self.columns {
            map.insert(&column.name, column.resolved_type());
        }
        map
    }
}

/// Splits a comma-separated name list, trimming entries and dropping empties.
pub fn parse_name_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

pub fn column_specs(columns: &str, types: &TypeMap) -> Result<Vec<ColumnSpec>> {
    let names = parse_name_list(columns);
    if names.is_empty() {
        bail!("At least one output column is required");
    }
    Ok(names
        .into_iter()
        .map(|name| {
            let sql_type = types.type_of(&name);
            ColumnSpec::new(name, sql_type)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_type_accepts_aliases_case_insensitively() {
        assert_eq!("INT".parse::<SqlType>().unwrap(), SqlType::Integer);
        assert_eq!("numeric".parse::<SqlType>().unwrap(), SqlType::Decimal);
        assert_eq!(" Boolean ".parse::<SqlType>().unwrap(), SqlType::Boolean);
        assert_eq!("string".parse::<SqlType>().unwrap(), SqlType::Text);
    }

    #[test]
    fn sql_type_rejects_unknown_names() {
        let err = "varchar".parse::<SqlType>().unwrap_err();
        assert!(err.to_string().contains("Supported types"));
    }

    #[test]
    fn type_map_skips_entries_without_separator() {
        let map = TypeMap::parse("amount:decimal,orphan,qty:integer").unwrap();
        assert_eq!(map.get("orphan"), None);
        assert_eq!(map.type_of("amount"), SqlType::Decimal);
        assert_eq!(map.type_of("qty"), SqlType::Integer);
        assert_eq!(map.type_of("orphan"), SqlType::Text);
    }

    #[test]
    fn unknown_type_names_fall_back_to_text() {
        assert_eq!(SqlType::parse_lenient("created", "timestamp"), SqlType::Text);
        let map = TypeMap::parse("created:timestamp,qty:int").unwrap();
        assert_eq!(map.get("created"), Some(SqlType::Text));
        assert_eq!(map.type_of("qty"), SqlType::Integer);
    }

    #[test]
    fn type_map_lookup_ignores_case() {
        let map = TypeMap::parse("Amount : decimal").unwrap();
        assert_eq!(map.get("AMOUNT"), Some(SqlType::Decimal));
    }

    #[test]
    fn later_type_entries_override_earlier_ones() {
        let mut map = SchemaFile::from_yaml_str("columns:\n  - name: qty\n    type: decimal\n")
            .unwrap()
            .type_map();
        map.extend_from_spec("qty:integer").unwrap();
        assert_eq!(map.type_of("qty"), SqlType::Integer);
    }

    #[test]
    fn schema_file_defaults_missing_type_to_text() {
        let schema =
            SchemaFile::from_yaml_str("columns:\n  - name: note\n  - name: active\n    type: bool\n")
                .unwrap();
        let map = schema.type_map();
        assert_eq!(map.type_of("note"), SqlType::Text);
        assert_eq!(map.type_of("active"), SqlType::Boolean);
    }

    #[test]
    fn schema_file_treats_unknown_type_as_text() {
        let map = SchemaFile::from_yaml_str("columns:\n  - name: x\n    type: blob\n")
            .unwrap()
            .type_map();
        assert_eq!(map.get("x"), Some(SqlType::Text));
    }

    #[test]
    fn schema_file_must_be_valid_yaml() {
        assert!(SchemaFile::from_yaml_str("columns: [unterminated").is_err());
    }

    #[test]
    fn column_specs_trim_and_drop_empty_names() {
        let types = TypeMap::parse("amount:decimal").unwrap();
        let specs = column_specs(" name , amount,,", &types).unwrap();
        assert_eq!(
            specs,
            vec![
                ColumnSpec::text("name"),
                ColumnSpec::new("amount", SqlType::Decimal)
            ]
        );
    }

    #[test]
    fn column_specs_require_at_least_one_name() {
        assert!(column_specs(" , ", &TypeMap::new()).is_err());
    }
}
