//! Table schema declarations.
//!
//! A connector declares the tables it delivers as a fixed list of
//! [`TableSchema`] descriptors: table name, primary key columns, and an
//! ordered column name → type mapping. Schema declaration is a pure function
//! of configuration with no side effects.

use crate::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Destination column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    String,
    Int,
    Long,
    Float,
    Boolean,
    UtcDatetime,
    Json,
}

impl ColumnType {
    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Int => "INT",
            ColumnType::Long => "LONG",
            ColumnType::Float => "FLOAT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::UtcDatetime => "UTC_DATETIME",
            ColumnType::Json => "JSON",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of one destination table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Primary key column names (fixed per table)
    pub primary_key: Vec<String>,
    /// Ordered column name → type mapping
    pub columns: Vec<(String, ColumnType)>,
}

impl TableSchema {
    /// Start a table descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Set the primary key columns
    pub fn with_primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a column
    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push((name.into(), column_type));
        self
    }

    /// Look up the declared type of a column
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, ty)| *ty)
    }

    /// Validate the descriptor
    ///
    /// The table needs a name, at least one column, and a non-empty primary
    /// key whose columns are all declared.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.name.is_empty() {
            return Err(ConnectorError::config("table name cannot be empty"));
        }

        if self.columns.is_empty() {
            return Err(ConnectorError::config(format!(
                "table '{}' declares no columns",
                self.name
            )));
        }

        if self.primary_key.is_empty() {
            return Err(ConnectorError::config(format!(
                "table '{}' declares no primary key",
                self.name
            )));
        }

        for key in &self.primary_key {
            if self.column_type(key).is_none() {
                return Err(ConnectorError::config(format!(
                    "table '{}' primary key column '{}' is not declared",
                    self.name, key
                )));
            }
        }

        Ok(())
    }
}
