//! Schema catalog: table, column, and index metadata for analysis.
//!
//! The catalog is produced by an external schema loader (information-schema
//! dump, migration tooling, a config file) and handed to the advisor as
//! structured data. It is immutable for the duration of an analysis session.
//!
//! # Example
//!
//! ```
//! use query_plan_advisor::catalog::{ColumnInfo, IndexInfo, SchemaCatalog, TableInfo};
//!
//! let catalog = SchemaCatalog::from_tables(vec![TableInfo {
//!     name:    "users".into(),
//!     columns: vec![
//!         ColumnInfo::new("id", "INT", false),
//!         ColumnInfo::new("email", "VARCHAR(255)", true),
//!     ],
//!     indexes: vec![IndexInfo {
//!         name:    "users_pkey".into(),
//!         columns: vec!["id".into()],
//!         unique:  true
//!     }]
//! }])
//! .unwrap();
//!
//! assert!(catalog.index_exists("users", &["id"]).unwrap());
//! assert!(!catalog.index_exists("users", &["email"]).unwrap());
//! ```

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, CatalogError, catalog_load_error};

/// Complete information about a database table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name
    pub name:    String,
    /// Ordered list of columns
    pub columns: Vec<ColumnInfo>,
    /// Indexes defined on this table
    #[serde(default)]
    pub indexes: Vec<IndexInfo>
}

impl TableInfo {
    /// Look up a column by name (ASCII case-insensitive)
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name:      CompactString,
    /// Declared data type (e.g., "INT", "VARCHAR(255)")
    pub data_type: CompactString,
    /// Whether NULL values are allowed
    #[serde(default)]
    pub nullable:  bool
}

impl ColumnInfo {
    pub fn new(name: &str, data_type: &str, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable
        }
    }
}

/// Index metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Index name (may be empty for anonymous indexes)
    #[serde(default)]
    pub name:    String,
    /// Ordered list of indexed columns
    pub columns: Vec<CompactString>,
    /// Whether this is a unique index
    #[serde(default)]
    pub unique:  bool
}

/// Schema catalog containing all tables and their metadata.
///
/// Tables are stored in a `BTreeMap` for deterministic iteration order.
/// Lookups that reference absent names fail with [`CatalogError`]; rules
/// treat that as "cannot evaluate, skip" rather than aborting the analysis.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Map of table name to table information
    pub tables: BTreeMap<String, TableInfo>
}

impl SchemaCatalog {
    /// Build a catalog from table metadata, validating index references.
    ///
    /// # Errors
    ///
    /// Returns error if any index references a column that does not exist
    /// in its table.
    pub fn from_tables(tables: Vec<TableInfo>) -> AppResult<Self> {
        let catalog = Self {
            tables: tables.into_iter().map(|t| (t.name.clone(), t)).collect()
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Deserialize a catalog from JSON produced by an external schema loader.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is invalid or index validation fails.
    pub fn from_json(json: &str) -> AppResult<Self> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|e| catalog_load_error(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> AppResult<()> {
        for table in self.tables.values() {
            if table.name.is_empty() {
                return Err(catalog_load_error("table with empty name"));
            }
            for index in &table.indexes {
                if index.columns.is_empty() {
                    return Err(catalog_load_error(format!(
                        "index '{}' on table '{}' has no columns",
                        index.name, table.name
                    )));
                }
                for col in &index.columns {
                    if table.column(col).is_none() {
                        return Err(catalog_load_error(format!(
                            "index '{}' references unknown column '{}.{}'",
                            index.name, table.name, col
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Look up a table by name (ASCII case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTable`] if the table is absent.
    pub fn table(&self, name: &str) -> Result<&TableInfo, CatalogError> {
        self.tables
            .values()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CatalogError::unknown_table(name))
    }

    /// Declared type of a column.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the table or column is absent.
    pub fn column_type(&self, table: &str, column: &str) -> Result<&str, CatalogError> {
        let table_info = self.table(table)?;
        table_info
            .column(column)
            .map(|c| c.data_type.as_str())
            .ok_or_else(|| CatalogError::unknown_column(table, column))
    }

    /// Whether a column admits NULL values.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the table or column is absent.
    pub fn is_nullable(&self, table: &str, column: &str) -> Result<bool, CatalogError> {
        let table_info = self.table(table)?;
        table_info
            .column(column)
            .map(|c| c.nullable)
            .ok_or_else(|| CatalogError::unknown_column(table, column))
    }

    /// Whether some index on `table` can serve a lookup on `columns`, using
    /// leftmost-prefix semantics: an index on `(a, b, c)` satisfies `(a)` or
    /// `(a, b)` but not `(b)` alone, and still serves `(a, b, c, d)`.
    ///
    /// Column names referenced by the lookup must exist in the table so that
    /// a typo surfaces as a skip instead of a silent "no index".
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the table or any lookup column is absent.
    pub fn index_exists(&self, table: &str, columns: &[&str]) -> Result<bool, CatalogError> {
        let table_info = self.table(table)?;
        for col in columns {
            if table_info.column(col).is_none() {
                return Err(CatalogError::unknown_column(table, *col));
            }
        }
        if columns.is_empty() {
            return Ok(false);
        }
        Ok(table_info.indexes.iter().any(|index| {
            let shared = index.columns.len().min(columns.len());
            index.columns[..shared]
                .iter()
                .zip(&columns[..shared])
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
        }))
    }

    /// Shorthand for a single-column index lookup
    pub fn has_index_on(&self, table: &str, column: &str) -> Result<bool, CatalogError> {
        self.index_exists(table, &[column])
    }
}
