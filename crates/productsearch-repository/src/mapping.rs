//! Entity-to-table mapping metadata.
//!
//! Each persistent type describes its table once, in a static
//! [`EntityMapping`]. The mapping drives schema creation, statement building
//! and validation of property names used in queries.

use crate::Value;
use productsearch_core::{ProductSearchError, ProductSearchResult};
use sqlx::any::AnyRow;
use std::fmt::Debug;
use std::hash::Hash;

/// SQL column type of a mapped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Integer,
    Varchar(u32),
    Text,
    Boolean,
    Double,
}

/// How the primary key of new rows is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// The database generates the key on insert.
    Identity,
    /// The caller supplies the key.
    Assigned,
}

/// A property mapped to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub property: &'static str,
    pub column: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

impl ColumnMapping {
    /// Creates a non-nullable column mapping.
    #[must_use]
    pub const fn required(property: &'static str, column: &'static str, column_type: ColumnType) -> Self {
        Self {
            property,
            column,
            column_type,
            nullable: false,
        }
    }

    /// Creates a nullable column mapping.
    #[must_use]
    pub const fn optional(property: &'static str, column: &'static str, column_type: ColumnType) -> Self {
        Self {
            property,
            column,
            column_type,
            nullable: true,
        }
    }
}

/// A query declared alongside an entity and looked up by name.
///
/// Parameters are written `:name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedQuery {
    pub name: &'static str,
    pub query: &'static str,
}

/// Table metadata for one persistent type.
#[derive(Debug, PartialEq, Eq)]
pub struct EntityMapping {
    /// Entity name used in logs and errors.
    pub entity: &'static str,
    pub table: &'static str,
    /// Primary key columns, in key order.
    pub key: &'static [ColumnMapping],
    pub generation: Generation,
    /// Non-key columns.
    pub columns: &'static [ColumnMapping],
    pub named_queries: &'static [NamedQuery],
}

impl EntityMapping {
    /// Returns the single identifier column, or `None` for composite keys.
    #[must_use]
    pub fn identifier(&self) -> Option<&ColumnMapping> {
        match self.key {
            [single] => Some(single),
            _ => None,
        }
    }

    /// Key columns followed by attribute columns.
    pub fn all_columns(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.key.iter().chain(self.columns.iter())
    }

    /// Resolves a property name to its column.
    ///
    /// # Errors
    ///
    /// Returns a validation error for properties the entity does not map.
    pub fn column_for(&self, property: &str) -> ProductSearchResult<&ColumnMapping> {
        self.all_columns()
            .find(|column| column.property == property)
            .ok_or_else(|| {
                ProductSearchError::validation(format!(
                    "{} has no property named '{property}'",
                    self.entity
                ))
            })
    }

    /// Looks up a named query.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no query of that name is declared.
    pub fn named_query(&self, name: &str) -> ProductSearchResult<&NamedQuery> {
        self.named_queries
            .iter()
            .find(|query| query.name == name)
            .ok_or_else(|| ProductSearchError::not_found("NamedQuery", name))
    }

    /// Rejects nulls in non-nullable attribute columns.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending property.
    pub fn check_nullability(&self, values: &[(&'static str, Value)]) -> ProductSearchResult<()> {
        for (property, value) in values {
            let column = self.column_for(property)?;
            if value.is_null() && !column.nullable {
                return Err(ProductSearchError::validation(format!(
                    "{}.{property} must not be null",
                    self.entity
                )));
            }
        }
        Ok(())
    }
}

/// A primary key value, single or composite.
pub trait PrimaryKey: Clone + Debug + Send + Sync + 'static {
    /// Key values in the order of [`EntityMapping::key`].
    fn values(&self) -> Vec<Value>;

    /// Builds a key from a database-generated identity value.
    fn from_generated(_raw: i64) -> Option<Self> {
        None
    }

    /// Human-readable rendering used in errors.
    fn describe(&self) -> String {
        self.values()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PrimaryKey for i64 {
    fn values(&self) -> Vec<Value> {
        vec![Value::Int(*self)]
    }

    fn from_generated(raw: i64) -> Option<Self> {
        Some(raw)
    }
}

impl PrimaryKey for i32 {
    fn values(&self) -> Vec<Value> {
        vec![Value::from(*self)]
    }

    fn from_generated(raw: i64) -> Option<Self> {
        i32::try_from(raw).ok()
    }
}

impl PrimaryKey for String {
    fn values(&self) -> Vec<Value> {
        vec![Value::Text(self.clone())]
    }
}

impl<A: PrimaryKey, B: PrimaryKey> PrimaryKey for (A, B) {
    fn values(&self) -> Vec<Value> {
        let mut values = self.0.values();
        values.extend(self.1.values());
        values
    }
}

/// A type persisted through the generic data-access layer.
///
/// Equality and hashing are value-based; distinct and by-example queries
/// compare whole entities.
pub trait Persistent: Clone + Eq + Hash + Debug + Send + Sync + Unpin + 'static {
    /// Primary key type.
    type Key: PrimaryKey;

    /// Table metadata.
    fn mapping() -> &'static EntityMapping;

    /// Returns the key, or `None` for a transient instance.
    fn key(&self) -> Option<Self::Key>;

    /// Non-key attribute values keyed by property name.
    fn column_values(&self) -> Vec<(&'static str, Value)>;

    /// Decodes an entity from a row selecting every mapped column.
    ///
    /// # Errors
    ///
    /// Fails when a column is missing or has an unexpected type.
    fn from_row(row: &AnyRow) -> ProductSearchResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    static ORDER_LINE: EntityMapping = EntityMapping {
        entity: "OrderLine",
        table: "order_line",
        key: &[
            ColumnMapping::required("orderId", "order_id", ColumnType::BigInt),
            ColumnMapping::required("line", "line_no", ColumnType::Integer),
        ],
        generation: Generation::Assigned,
        columns: &[
            ColumnMapping::required("sku", "sku", ColumnType::Varchar(64)),
            ColumnMapping::optional("note", "note", ColumnType::Text),
        ],
        named_queries: &[NamedQuery {
            name: "OrderLine.bySku",
            query: "SELECT order_id, line_no, sku, note FROM order_line WHERE sku = :sku",
        }],
    };

    #[test]
    fn test_composite_key_has_no_identifier() {
        assert!(ORDER_LINE.identifier().is_none());
        assert_eq!(ORDER_LINE.all_columns().count(), 4);
    }

    #[test]
    fn test_column_for_resolves_key_and_attributes() {
        assert_eq!(ORDER_LINE.column_for("line").unwrap().column, "line_no");
        assert_eq!(ORDER_LINE.column_for("sku").unwrap().column, "sku");

        let err = ORDER_LINE.column_for("price").unwrap_err();
        assert!(matches!(err, ProductSearchError::Validation(_)));
    }

    #[test]
    fn test_named_query_lookup() {
        assert!(ORDER_LINE.named_query("OrderLine.bySku").is_ok());
        assert!(ORDER_LINE.named_query("OrderLine.missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_check_nullability() {
        assert!(ORDER_LINE
            .check_nullability(&[("sku", Value::from("a")), ("note", Value::Null)])
            .is_ok());
        assert!(ORDER_LINE.check_nullability(&[("sku", Value::Null)]).is_err());
    }

    #[test]
    fn test_key_values() {
        assert_eq!((7_i64, 2_i32).values(), vec![Value::Int(7), Value::Int(2)]);
        assert_eq!((7_i64, "b".to_string()).describe(), "7, b");
        assert_eq!(i64::from_generated(5), Some(5));
        assert_eq!(String::from_generated(5), None);
    }
}
