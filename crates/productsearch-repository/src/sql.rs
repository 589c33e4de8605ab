//! SQL statement building.
//!
//! Statements use `?` placeholders, which SQLite and MySQL share, and carry
//! their bind values alongside the text. Nulls are written as literals.

use crate::criteria::Criteria;
use crate::value::bind_values;
use crate::{Dialect, EntityMapping, Value};
use productsearch_core::{ProductSearchError, ProductSearchResult};
use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::Any;
use std::collections::{HashMap, HashSet};

/// SQL text with its positional bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl Statement {
    /// Creates a statement from SQL text with no values.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a placeholder for `value`, or `NULL` for a null.
    pub(crate) fn push_value(&mut self, value: Value) {
        if value.is_null() {
            self.sql.push_str("NULL");
        } else {
            self.sql.push('?');
            self.values.push(value);
        }
    }

    /// Builds a query with every value bound.
    pub fn query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        bind_values(sqlx::query(&self.sql), &self.values)
    }
}

fn column_list(mapping: &EntityMapping) -> String {
    mapping
        .all_columns()
        .map(|column| column.column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn key_list(mapping: &EntityMapping) -> String {
    mapping
        .key
        .iter()
        .map(|column| column.column)
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_key_predicate(
    mapping: &EntityMapping,
    statement: &mut Statement,
    key: Vec<Value>,
) -> ProductSearchResult<()> {
    if key.len() != mapping.key.len() {
        return Err(ProductSearchError::internal(format!(
            "{} key has {} columns, got {} values",
            mapping.entity,
            mapping.key.len(),
            key.len()
        )));
    }
    statement.push(" WHERE ");
    for (i, (column, value)) in mapping.key.iter().zip(key).enumerate() {
        if i > 0 {
            statement.push(" AND ");
        }
        if value.is_null() {
            return Err(ProductSearchError::validation(format!(
                "{}.{} must not be null",
                mapping.entity, column.property
            )));
        }
        statement.push(&format!("{} = ", column.column));
        statement.push_value(value);
    }
    Ok(())
}

fn push_limit(statement: &mut Statement, offset: Option<u64>, limit: Option<u64>) {
    match (offset, limit) {
        (None, None) => {}
        (None, Some(limit)) => statement.push(&format!(" LIMIT {limit}")),
        (Some(offset), limit) => statement.push(&format!(
            " LIMIT {} OFFSET {offset}",
            limit.unwrap_or(i64::MAX.unsigned_abs())
        )),
    }
}

/// `SELECT <all columns> FROM t ORDER BY <key>`.
#[must_use]
pub fn select_all(mapping: &EntityMapping) -> Statement {
    Statement::new(format!(
        "SELECT {} FROM {} ORDER BY {}",
        column_list(mapping),
        mapping.table,
        key_list(mapping)
    ))
}

/// Reads the key generated by the last insert on the same connection.
///
/// Used when the driver reports no insert id, as the SQLite `Any` driver
/// does.
#[must_use]
pub fn generated_key(dialect: Dialect) -> Statement {
    match dialect {
        Dialect::Sqlite => Statement::new("SELECT last_insert_rowid()"),
        Dialect::MySql => Statement::new("SELECT CAST(LAST_INSERT_ID() AS SIGNED)"),
    }
}

/// Selects the row with the given key.
///
/// # Errors
///
/// Fails when the key arity does not match the mapping.
pub fn select_by_key(mapping: &EntityMapping, key: Vec<Value>) -> ProductSearchResult<Statement> {
    let mut statement = Statement::new(format!(
        "SELECT {} FROM {}",
        column_list(mapping),
        mapping.table
    ));
    push_key_predicate(mapping, &mut statement, key)?;
    Ok(statement)
}

/// Projects only the identifier column of the row with the given id.
///
/// # Errors
///
/// Fails for composite keys.
pub fn select_identifier(mapping: &EntityMapping, id: Value) -> ProductSearchResult<Statement> {
    let identifier = mapping.identifier().ok_or_else(|| {
        ProductSearchError::internal(format!("{} has a composite key", mapping.entity))
    })?;
    let mut statement = Statement::new(format!(
        "SELECT {} FROM {}",
        identifier.column, mapping.table
    ));
    push_key_predicate(mapping, &mut statement, vec![id])?;
    statement.push(" LIMIT 1");
    Ok(statement)
}

/// Inserts a row; key columns are included only when `key` is given.
///
/// # Errors
///
/// Fails on unknown properties or a key arity mismatch.
pub fn insert(
    mapping: &EntityMapping,
    key: Option<Vec<Value>>,
    attributes: Vec<(&'static str, Value)>,
) -> ProductSearchResult<Statement> {
    let mut columns = Vec::new();
    let mut values = Vec::new();

    if let Some(key) = key {
        if key.len() != mapping.key.len() {
            return Err(ProductSearchError::internal(format!(
                "{} key has {} columns, got {} values",
                mapping.entity,
                mapping.key.len(),
                key.len()
            )));
        }
        for (column, value) in mapping.key.iter().zip(key) {
            columns.push(column.column);
            values.push(value);
        }
    }
    for (property, value) in attributes {
        columns.push(mapping.column_for(property)?.column);
        values.push(value);
    }

    let mut statement = Statement::new(format!("INSERT INTO {} (", mapping.table));
    statement.push(&columns.join(", "));
    statement.push(") VALUES (");
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            statement.push(", ");
        }
        statement.push_value(value);
    }
    statement.push(")");
    Ok(statement)
}

/// Updates every attribute column of the row with the given key.
///
/// Returns `None` when the mapping has no attribute columns.
///
/// # Errors
///
/// Fails on unknown properties or a key arity mismatch.
pub fn update(
    mapping: &EntityMapping,
    key: Vec<Value>,
    attributes: Vec<(&'static str, Value)>,
) -> ProductSearchResult<Option<Statement>> {
    if attributes.is_empty() {
        return Ok(None);
    }
    let mut statement = Statement::new(format!("UPDATE {} SET ", mapping.table));
    for (i, (property, value)) in attributes.into_iter().enumerate() {
        if i > 0 {
            statement.push(", ");
        }
        statement.push(&format!("{} = ", mapping.column_for(property)?.column));
        statement.push_value(value);
    }
    push_key_predicate(mapping, &mut statement, key)?;
    Ok(Some(statement))
}

/// Deletes the row with the given key.
///
/// # Errors
///
/// Fails when the key arity does not match the mapping.
pub fn delete(mapping: &EntityMapping, key: Vec<Value>) -> ProductSearchResult<Statement> {
    let mut statement = Statement::new(format!("DELETE FROM {}", mapping.table));
    push_key_predicate(mapping, &mut statement, key)?;
    Ok(statement)
}

/// Selects the entities matching `criteria`, optionally paged.
///
/// With distinct-by-id, the matching identifiers are selected first and the
/// full rows fetched for them.
///
/// # Errors
///
/// Fails on unknown properties or null ordering comparisons.
pub fn select_by_criteria(
    mapping: &EntityMapping,
    criteria: &Criteria,
    offset: Option<u64>,
    limit: Option<u64>,
) -> ProductSearchResult<Statement> {
    let mut statement = Statement::new(format!(
        "SELECT {} FROM {}",
        column_list(mapping),
        mapping.table
    ));

    if criteria.is_distinct_by_id() && !criteria.restrictions().is_empty() {
        let keys = key_list(mapping);
        let projection = if mapping.key.len() == 1 {
            keys.clone()
        } else {
            format!("({keys})")
        };
        statement.push(&format!(
            " WHERE {projection} IN (SELECT DISTINCT {keys} FROM {}",
            mapping.table
        ));
        criteria.render_where(mapping, &mut statement)?;
        statement.push(")");
    } else {
        criteria.render_where(mapping, &mut statement)?;
    }

    criteria.render_order(mapping, &mut statement)?;
    push_limit(&mut statement, offset, limit);
    Ok(statement)
}

/// Compiles a named query, replacing `:name` parameters with bind values.
///
/// Text inside single-quoted literals is left untouched and `::` is kept as
/// written.
///
/// # Errors
///
/// `NotFound` for an undeclared query; `Validation` when a placeholder has no
/// parameter, a parameter has no placeholder, or a parameter is null.
pub fn named_query(
    mapping: &EntityMapping,
    name: &str,
    params: &HashMap<String, Value>,
) -> ProductSearchResult<Statement> {
    let query = mapping.named_query(name)?;
    let mut statement = Statement::default();
    let mut used = HashSet::new();

    let mut chars = query.query.char_indices().peekable();
    let mut in_literal = false;
    while let Some((start, c)) = chars.next() {
        if c == '\'' {
            in_literal = !in_literal;
            statement.sql.push(c);
            continue;
        }
        if in_literal || c != ':' {
            statement.sql.push(c);
            continue;
        }
        match chars.peek() {
            Some((_, ':')) => {
                statement.sql.push_str("::");
                chars.next();
            }
            Some((_, next)) if next.is_ascii_alphabetic() || *next == '_' => {
                let mut end = start + 1;
                while let Some((i, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || *next == '_' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let parameter = &query.query[start + 1..end];
                let value = params.get(parameter).ok_or_else(|| {
                    ProductSearchError::validation(format!(
                        "Named query '{name}' requires parameter '{parameter}'"
                    ))
                })?;
                if value.is_null() {
                    return Err(ProductSearchError::validation(format!(
                        "Named query '{name}' parameter '{parameter}' is null; write IS NULL in the query instead"
                    )));
                }
                used.insert(parameter.to_string());
                statement.push_value(value.clone());
            }
            _ => statement.sql.push(c),
        }
    }

    let mut unused: Vec<&str> = params
        .keys()
        .filter(|key| !used.contains(*key))
        .map(String::as_str)
        .collect();
    if !unused.is_empty() {
        unused.sort_unstable();
        return Err(ProductSearchError::validation(format!(
            "Named query '{name}' has no parameter named {}",
            unused.join(", ")
        )));
    }

    Ok(statement)
}
