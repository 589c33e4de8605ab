//! Table creation from entity mappings.

use crate::{ColumnMapping, ColumnType, EntityMapping, Generation};
use productsearch_core::{ProductSearchError, ProductSearchResult};
use std::fmt;

/// SQL dialect of the connected database.
///
/// DDL and generated-key lookup differ between dialects; queries use
/// common syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Detects the dialect from a connection URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unsupported schemes.
    pub fn from_url(url: &str) -> ProductSearchResult<Self> {
        let scheme = url.split(':').next().unwrap_or_default().to_lowercase();
        match scheme.as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" | "mariadb" => Ok(Self::MySql),
            other => Err(ProductSearchError::Configuration(format!(
                "Unsupported database scheme: {other}"
            ))),
        }
    }

    fn column_type(self, column_type: ColumnType) -> String {
        match (self, column_type) {
            (_, ColumnType::BigInt) => "BIGINT".to_string(),
            (Self::Sqlite, ColumnType::Integer) => "INTEGER".to_string(),
            (Self::MySql, ColumnType::Integer) => "INT".to_string(),
            (_, ColumnType::Varchar(length)) => format!("VARCHAR({length})"),
            (_, ColumnType::Text) => "TEXT".to_string(),
            (_, ColumnType::Boolean) => "BOOLEAN".to_string(),
            (_, ColumnType::Double) => "DOUBLE".to_string(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::MySql => f.write_str("mysql"),
        }
    }
}

fn column_definition(dialect: Dialect, column: &ColumnMapping) -> String {
    let null = if column.nullable { "" } else { " NOT NULL" };
    format!("{} {}{null}", column.column, dialect.column_type(column.column_type))
}

/// Builds `CREATE TABLE IF NOT EXISTS` for a mapping.
#[must_use]
pub fn create_table_sql(mapping: &EntityMapping, dialect: Dialect) -> String {
    let mut definitions = Vec::new();
    let mut primary_key = None;

    match (mapping.identifier(), mapping.generation, dialect) {
        // SQLite only autoincrements an INTEGER PRIMARY KEY column.
        (Some(id), Generation::Identity, Dialect::Sqlite) => {
            definitions.push(format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", id.column));
        }
        (Some(id), Generation::Identity, Dialect::MySql) => {
            definitions.push(format!(
                "{} AUTO_INCREMENT",
                column_definition(dialect, &ColumnMapping { nullable: false, ..*id })
            ));
            primary_key = Some(id.column.to_string());
        }
        _ => {
            definitions.extend(mapping.key.iter().map(|key| {
                column_definition(dialect, &ColumnMapping { nullable: false, ..*key })
            }));
            primary_key = Some(
                mapping
                    .key
                    .iter()
                    .map(|key| key.column)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
    }

    definitions.extend(
        mapping
            .columns
            .iter()
            .map(|column| column_definition(dialect, column)),
    );
    if let Some(primary_key) = primary_key.filter(|key| !key.is_empty()) {
        definitions.push(format!("PRIMARY KEY ({primary_key})"));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        mapping.table,
        definitions.join(", ")
    )
}
