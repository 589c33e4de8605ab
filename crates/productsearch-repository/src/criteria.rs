//! Detached, session-independent query criteria.
//!
//! A [`Criteria`] names properties rather than columns; it is resolved against
//! an [`EntityMapping`] only when a statement is built, so the same criteria
//! can be reused across sessions.

use crate::sql::Statement;
use crate::{EntityMapping, Value};
use productsearch_core::{ProductSearchError, ProductSearchResult};

/// A predicate over entity properties.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    Eq(String, Value),
    Ne(String, Value),
    Gt(String, Value),
    Ge(String, Value),
    Lt(String, Value),
    Le(String, Value),
    Like(String, String),
    IsNull(String),
    IsNotNull(String),
    In(String, Vec<Value>),
    And(Vec<Restriction>),
    Or(Vec<Restriction>),
}

impl Restriction {
    pub fn eq(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(property.into(), value.into())
    }

    pub fn ne(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(property.into(), value.into())
    }

    pub fn gt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt(property.into(), value.into())
    }

    pub fn ge(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ge(property.into(), value.into())
    }

    pub fn lt(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(property.into(), value.into())
    }

    pub fn le(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Le(property.into(), value.into())
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like(property.into(), pattern.into())
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        Self::IsNull(property.into())
    }

    pub fn is_not_null(property: impl Into<String>) -> Self {
        Self::IsNotNull(property.into())
    }

    pub fn in_values<V: Into<Value>>(
        property: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(property.into(), values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn and(restrictions: Vec<Restriction>) -> Self {
        Self::And(restrictions)
    }

    #[must_use]
    pub fn or(restrictions: Vec<Restriction>) -> Self {
        Self::Or(restrictions)
    }

    pub(crate) fn render(
        &self,
        mapping: &EntityMapping,
        statement: &mut Statement,
    ) -> ProductSearchResult<()> {
        match self {
            Self::Eq(property, Value::Null) => {
                statement.push(&format!("{} IS NULL", column(mapping, property)?));
            }
            Self::Ne(property, Value::Null) => {
                statement.push(&format!("{} IS NOT NULL", column(mapping, property)?));
            }
            Self::Eq(property, value) => comparison(mapping, statement, property, "=", value)?,
            Self::Ne(property, value) => comparison(mapping, statement, property, "<>", value)?,
            Self::Gt(property, value) => comparison(mapping, statement, property, ">", value)?,
            Self::Ge(property, value) => comparison(mapping, statement, property, ">=", value)?,
            Self::Lt(property, value) => comparison(mapping, statement, property, "<", value)?,
            Self::Le(property, value) => comparison(mapping, statement, property, "<=", value)?,
            Self::Like(property, pattern) => {
                statement.push(&format!("{} LIKE ", column(mapping, property)?));
                statement.push_value(Value::Text(pattern.clone()));
            }
            Self::IsNull(property) => {
                statement.push(&format!("{} IS NULL", column(mapping, property)?));
            }
            Self::IsNotNull(property) => {
                statement.push(&format!("{} IS NOT NULL", column(mapping, property)?));
            }
            Self::In(property, values) => {
                let column = column(mapping, property)?;
                if values.is_empty() {
                    statement.push("1 = 0");
                    return Ok(());
                }
                statement.push(&format!("{column} IN ("));
                for (i, value) in values.iter().enumerate() {
                    if value.is_null() {
                        return Err(null_comparison(property));
                    }
                    if i > 0 {
                        statement.push(", ");
                    }
                    statement.push_value(value.clone());
                }
                statement.push(")");
            }
            Self::And(restrictions) => junction(mapping, statement, restrictions, " AND ", "1 = 1")?,
            Self::Or(restrictions) => junction(mapping, statement, restrictions, " OR ", "1 = 0")?,
        }
        Ok(())
    }
}

fn column<'m>(mapping: &'m EntityMapping, property: &str) -> ProductSearchResult<&'m str> {
    Ok(mapping.column_for(property)?.column)
}

fn null_comparison(property: &str) -> ProductSearchError {
    ProductSearchError::validation(format!("'{property}' cannot be compared with null"))
}

fn comparison(
    mapping: &EntityMapping,
    statement: &mut Statement,
    property: &str,
    operator: &str,
    value: &Value,
) -> ProductSearchResult<()> {
    if value.is_null() {
        return Err(null_comparison(property));
    }
    statement.push(&format!("{} {operator} ", column(mapping, property)?));
    statement.push_value(value.clone());
    Ok(())
}

fn junction(
    mapping: &EntityMapping,
    statement: &mut Statement,
    restrictions: &[Restriction],
    separator: &str,
    empty: &str,
) -> ProductSearchResult<()> {
    if restrictions.is_empty() {
        statement.push(empty);
        return Ok(());
    }
    statement.push("(");
    for (i, restriction) in restrictions.iter().enumerate() {
        if i > 0 {
            statement.push(separator);
        }
        restriction.render(mapping, statement)?;
    }
    statement.push(")");
    Ok(())
}

/// Sort order on a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub property: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: true,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ascending: false,
        }
    }
}

/// A reusable query over one entity type.
///
/// Restrictions are combined with `AND`. Without explicit orders, results are
/// ordered by primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    restrictions: Vec<Restriction>,
    orders: Vec<Order>,
    distinct_by_id: bool,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a restriction.
    #[must_use]
    pub fn add(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    /// Adds a sort order.
    #[must_use]
    pub fn order_by(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Selects the distinct identifiers that match, then fetches the full
    /// entities for them.
    #[must_use]
    pub fn distinct_by_id(mut self) -> Self {
        self.distinct_by_id = true;
        self
    }

    #[must_use]
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    #[must_use]
    pub fn is_distinct_by_id(&self) -> bool {
        self.distinct_by_id
    }

    /// Appends ` WHERE ...` when there are restrictions.
    pub(crate) fn render_where(
        &self,
        mapping: &EntityMapping,
        statement: &mut Statement,
    ) -> ProductSearchResult<()> {
        if self.restrictions.is_empty() {
            return Ok(());
        }
        statement.push(" WHERE ");
        for (i, restriction) in self.restrictions.iter().enumerate() {
            if i > 0 {
                statement.push(" AND ");
            }
            restriction.render(mapping, statement)?;
        }
        Ok(())
    }

    /// Appends ` ORDER BY ...`, defaulting to the key columns.
    pub(crate) fn render_order(
        &self,
        mapping: &EntityMapping,
        statement: &mut Statement,
    ) -> ProductSearchResult<()> {
        let clauses = if self.orders.is_empty() {
            mapping.key.iter().map(|key| key.column.to_string()).collect()
        } else {
            self.orders
                .iter()
                .map(|order| {
                    let direction = if order.ascending { "ASC" } else { "DESC" };
                    Ok(format!("{} {direction}", column(mapping, &order.property)?))
                })
                .collect::<ProductSearchResult<Vec<_>>>()?
        };
        if !clauses.is_empty() {
            statement.push(" ORDER BY ");
            statement.push(&clauses.join(", "));
        }
        Ok(())
    }
}
