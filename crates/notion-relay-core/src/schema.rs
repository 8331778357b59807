//! Column types and the working schema of the target database.

use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a database column.
///
/// Only the types the relay writes are named; everything else the remote
/// system reports lands in [`ColumnType::Other`] with its raw type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Title,
    Text,
    Number,
    Boolean,
    Date,
    Select,
    MultiSelect,
    Other(String),
}

impl ColumnType {
    /// Parse a Notion property type name.
    pub fn from_notion(name: &str) -> Self {
        match name {
            "title" => Self::Title,
            "rich_text" => Self::Text,
            "number" => Self::Number,
            "checkbox" => Self::Boolean,
            "date" => Self::Date,
            "select" => Self::Select,
            "multi_select" => Self::MultiSelect,
            other => Self::Other(other.to_string()),
        }
    }

    /// The Notion property type name.
    pub fn notion_name(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Text => "rich_text",
            Self::Number => "number",
            Self::Boolean => "checkbox",
            Self::Date => "date",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notion_name())
    }
}

/// Column name → declared type for one database, as seen during one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: BTreeMap<String, ColumnType>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, ty: ColumnType) -> Self {
        self.columns.insert(name.into(), ty);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, ty: ColumnType) {
        self.columns.insert(name.into(), ty);
    }

    pub fn get(&self, name: &str) -> Option<&ColumnType> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Name of the first column whose type is `title`.
    ///
    /// Notion databases carry exactly one.
    pub fn title_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, ty)| **ty == ColumnType::Title)
            .map(|(name, _)| name.as_str())
    }

    /// Overlay `other` onto this schema. Columns present in both take `other`'s type.
    pub fn merge(&mut self, other: TableSchema) {
        self.columns.extend(other.columns);
    }
}

impl FromIterator<(String, ColumnType)> for TableSchema {
    fn from_iter<I: IntoIterator<Item = (String, ColumnType)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
