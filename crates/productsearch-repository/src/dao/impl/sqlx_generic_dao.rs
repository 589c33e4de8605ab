//! SQLx implementation of [`GenericDao`].

use crate::criteria::{Criteria, Restriction};
use crate::dao::GenericDao;
use crate::session::{Session, SessionContext, SessionFactory};
use crate::sql::{self, Statement};
use crate::{DatabasePoolInterface, Dialect, Generation, Persistent, PrimaryKey, Value};
use async_trait::async_trait;
use productsearch_core::{ProductSearchError, ProductSearchResult};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// A mutating operation, named in persistence failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Merge,
    Save,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Save => "save",
            Self::Delete => "delete",
        }
    }
}

/// Generic DAO over the shared pool.
///
/// Holds no per-request state; sessions come from the [`SessionContext`] of
/// each call or are opened for the duration of one mutating operation.
pub struct SqlxGenericDao<T> {
    pool: Arc<dyn DatabasePoolInterface>,
    sessions: SessionFactory,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Persistent> SqlxGenericDao<T> {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self {
            sessions: SessionFactory::new(Arc::clone(&pool)),
            pool,
            _entity: PhantomData,
        }
    }

    /// Runs a mutating operation and translates any failure.
    ///
    /// Joins the session bound to `cx`; otherwise the operation runs in a new
    /// session that is committed on success and rolled back on failure.
    ///
    /// # Errors
    ///
    /// Every failure surfaces as [`ProductSearchError::Persistence`].
    pub async fn execute_update_operation(
        &self,
        cx: &mut SessionContext,
        object: &T,
        operation: Operation,
    ) -> ProductSearchResult<Option<T>> {
        let dialect = self.pool.dialect();
        let result = match cx.session_mut() {
            Some(session) => Self::apply(session, dialect, object, operation).await,
            None => self.apply_standalone(object, operation).await,
        };

        result.map_err(|e| {
            warn!(
                operation = operation.as_str(),
                entity = ?object,
                error = %e,
                "Unable to perform {} on {}",
                operation.as_str(),
                T::mapping().entity
            );
            ProductSearchError::persistence(operation.as_str(), T::mapping().entity, &e)
        })
    }

    async fn apply_standalone(&self, object: &T, operation: Operation) -> ProductSearchResult<Option<T>> {
        let mut session = self.sessions.open_session().await?;
        match Self::apply(&mut session, self.pool.dialect(), object, operation).await {
            Ok(outcome) => {
                session.close().await?;
                Ok(outcome)
            }
            Err(e) => {
                session.discard().await;
                Err(e)
            }
        }
    }

    async fn apply(
        session: &mut Session,
        dialect: Dialect,
        object: &T,
        operation: Operation,
    ) -> ProductSearchResult<Option<T>> {
        let conn = session.connection()?;
        match operation {
            Operation::Merge => Self::merge_on(conn, dialect, object).await.map(Some),
            Operation::Save => Self::insert_on(conn, dialect, object).await.map(Some),
            Operation::Delete => Self::delete_on(conn, object).await.map(|()| None),
        }
    }

    async fn fetch_by_key_on(conn: &mut AnyConnection, key: &T::Key) -> ProductSearchResult<Option<T>> {
        let statement = sql::select_by_key(T::mapping(), key.values())?;
        let row = statement.query().fetch_optional(&mut *conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    async fn exists_on(conn: &mut AnyConnection, key: &T::Key) -> ProductSearchResult<bool> {
        match identifier_value(key) {
            Some(id) => {
                let statement = sql::select_identifier(T::mapping(), id)?;
                Ok(statement.query().fetch_optional(&mut *conn).await?.is_some())
            }
            None => Ok(Self::fetch_by_key_on(conn, key).await?.is_some()),
        }
    }

    /// Key generated by the insert just executed on `conn`.
    async fn generated_key_on(
        conn: &mut AnyConnection,
        dialect: Dialect,
        reported: Option<i64>,
    ) -> ProductSearchResult<i64> {
        if let Some(id) = reported {
            return Ok(id);
        }
        let row = sql::generated_key(dialect)
            .query()
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    async fn insert_on(
        conn: &mut AnyConnection,
        dialect: Dialect,
        object: &T,
    ) -> ProductSearchResult<T> {
        let mapping = T::mapping();
        let attributes = object.column_values();
        mapping.check_nullability(&attributes)?;

        let key = object.key();
        if key.is_none() && mapping.generation == Generation::Assigned {
            return Err(ProductSearchError::validation(format!(
                "{} requires an assigned key",
                mapping.entity
            )));
        }

        let statement = sql::insert(mapping, key.as_ref().map(PrimaryKey::values), attributes)?;
        let result = statement.query().execute(&mut *conn).await?;

        let key = match key {
            Some(key) => key,
            None => {
                let generated =
                    Self::generated_key_on(conn, dialect, result.last_insert_id()).await?;
                <T::Key as PrimaryKey>::from_generated(generated).ok_or_else(|| {
                    ProductSearchError::internal(format!(
                        "{} has no generated key type",
                        mapping.entity
                    ))
                })?
            }
        };

        Self::fetch_by_key_on(conn, &key)
            .await?
            .ok_or_else(|| missing_after_write(mapping.entity, &key))
    }

    async fn merge_on(
        conn: &mut AnyConnection,
        dialect: Dialect,
        object: &T,
    ) -> ProductSearchResult<T> {
        let Some(key) = object.key() else {
            return Self::insert_on(conn, dialect, object).await;
        };
        if !Self::exists_on(conn, &key).await? {
            return Self::insert_on(conn, dialect, object).await;
        }

        let mapping = T::mapping();
        let attributes = object.column_values();
        mapping.check_nullability(&attributes)?;
        if let Some(statement) = sql::update(mapping, key.values(), attributes)? {
            statement.query().execute(&mut *conn).await?;
        }

        Self::fetch_by_key_on(conn, &key)
            .await?
            .ok_or_else(|| missing_after_write(mapping.entity, &key))
    }

    async fn delete_on(conn: &mut AnyConnection, object: &T) -> ProductSearchResult<()> {
        let mapping = T::mapping();
        let key = object.key().ok_or_else(|| {
            ProductSearchError::validation(format!(
                "Cannot delete a transient {} instance",
                mapping.entity
            ))
        })?;

        let statement = sql::delete(mapping, key.values())?;
        let result = statement.query().execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(ProductSearchError::not_found(mapping.entity, key.describe()));
        }
        Ok(())
    }

    async fn fetch_rows(
        &self,
        cx: &mut SessionContext,
        statement: &Statement,
    ) -> ProductSearchResult<Vec<AnyRow>> {
        debug!(entity = T::mapping().entity, sql = %statement.sql, "Executing query");
        let rows = match cx.session_mut() {
            Some(session) => statement.query().fetch_all(session.connection()?).await?,
            None => statement.query().fetch_all(self.pool.inner()).await?,
        };
        Ok(rows)
    }

    async fn fetch(&self, cx: &mut SessionContext, statement: &Statement) -> ProductSearchResult<Vec<T>> {
        self.fetch_rows(cx, statement)
            .await?
            .iter()
            .map(T::from_row)
            .collect()
    }

    async fn find_by_key(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<Option<T>> {
        let statement = sql::select_by_key(T::mapping(), id.values())?;
        Ok(self.fetch(cx, &statement).await?.into_iter().next())
    }
}

/// The single identifier value, or `None` for composite keys.
fn identifier_value<K: PrimaryKey>(key: &K) -> Option<Value> {
    let mut values = key.values();
    if values.len() == 1 {
        values.pop()
    } else {
        None
    }
}

fn missing_after_write<K: PrimaryKey>(entity: &'static str, key: &K) -> ProductSearchError {
    ProductSearchError::internal(format!(
        "{entity} with id {} not found after write",
        key.describe()
    ))
}

fn example_criteria<T: Persistent>(template: &T, exclude: &[&str]) -> Criteria {
    template
        .column_values()
        .into_iter()
        .filter(|(property, value)| !value.is_unset() && !exclude.contains(property))
        .fold(Criteria::new(), |criteria, (property, value)| {
            criteria.add(Restriction::Eq(property.to_string(), value))
        })
}

#[async_trait]
impl<T: Persistent> GenericDao<T> for SqlxGenericDao<T> {
    async fn get_all(&self, cx: &mut SessionContext) -> ProductSearchResult<Vec<T>> {
        debug!("Finding all {}", T::mapping().entity);
        self.fetch(cx, &sql::select_all(T::mapping())).await
    }

    async fn get_all_distinct(&self, cx: &mut SessionContext) -> ProductSearchResult<Vec<T>> {
        let mut seen = HashSet::new();
        Ok(self
            .get_all(cx)
            .await?
            .into_iter()
            .filter(|entity| seen.insert(entity.clone()))
            .collect())
    }

    async fn get(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<T> {
        let entity = T::mapping().entity;
        debug!("Finding {} by id: {}", entity, id.describe());

        self.find_by_key(cx, id).await?.ok_or_else(|| {
            warn!("{} not found for id {}", entity, id.describe());
            ProductSearchError::not_found(entity, id.describe())
        })
    }

    async fn exists(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<bool> {
        let Some(identifier) = identifier_value(id) else {
            return Ok(self.find_by_key(cx, id).await?.is_some());
        };
        let statement = sql::select_identifier(T::mapping(), identifier)?;
        Ok(!self.fetch_rows(cx, &statement).await?.is_empty())
    }

    async fn save(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<T> {
        debug!("Saving {}: {:?}", T::mapping().entity, object);
        self.execute_update_operation(cx, object, Operation::Merge)
            .await?
            .ok_or_else(|| ProductSearchError::internal("merge returned no entity"))
    }

    async fn insert(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<T> {
        debug!("Inserting {}: {:?}", T::mapping().entity, object);
        self.execute_update_operation(cx, object, Operation::Save)
            .await?
            .ok_or_else(|| ProductSearchError::internal("save returned no entity"))
    }

    async fn remove_by_id(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<()> {
        let object = self.get(cx, id).await?;
        self.remove(cx, &object).await
    }

    async fn remove(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<()> {
        debug!("Removing {}: {:?}", T::mapping().entity, object);
        self.execute_update_operation(cx, object, Operation::Delete)
            .await
            .map(|_| ())
    }

    async fn find_by_named_query(
        &self,
        cx: &mut SessionContext,
        name: &str,
        params: &HashMap<String, Value>,
    ) -> ProductSearchResult<Vec<T>> {
        debug!("Running named query {}", name);
        let statement = sql::named_query(T::mapping(), name, params)?;
        self.fetch(cx, &statement).await
    }

    async fn find_by_example(
        &self,
        cx: &mut SessionContext,
        template: &T,
        exclude: &[&str],
    ) -> ProductSearchResult<Vec<T>> {
        debug!("Finding {} by example: {:?}", T::mapping().entity, template);
        let criteria = example_criteria(template, exclude);
        self.find_by_criteria(cx, &criteria, None, None).await
    }

    async fn find_by_example_paged(
        &self,
        cx: &mut SessionContext,
        template: &T,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> ProductSearchResult<Vec<T>> {
        let criteria = example_criteria(template, &[]);
        self.find_by_criteria(cx, &criteria, offset, limit).await
    }

    async fn find_by_criteria(
        &self,
        cx: &mut SessionContext,
        criteria: &Criteria,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> ProductSearchResult<Vec<T>> {
        let statement = sql::select_by_criteria(T::mapping(), criteria, offset, limit)?;
        self.fetch(cx, &statement).await
    }

    async fn flush(&self, cx: &mut SessionContext) -> ProductSearchResult<()> {
        match cx.session_mut() {
            Some(session) => session.flush().await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use productsearch_core::Person;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Merge.as_str(), "merge");
        assert_eq!(Operation::Save.as_str(), "save");
        assert_eq!(Operation::Delete.as_str(), "delete");
    }

    #[test]
    fn test_example_criteria_skips_unset_and_excluded() {
        let template = Person::new("", "a@x.com", "555");
        let criteria = example_criteria(&template, &["phone", "unknown"]);
        assert_eq!(
            criteria.restrictions(),
            &[Restriction::eq("email", "a@x.com")]
        );

        let criteria = example_criteria(&Person::new("", "", ""), &[]);
        assert!(criteria.restrictions().is_empty());
    }

    #[test]
    fn test_identifier_value() {
        assert_eq!(identifier_value(&5_i64), Some(Value::Int(5)));
        assert_eq!(identifier_value(&(5_i64, 6_i64)), None);
    }
}
