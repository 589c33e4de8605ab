//! Entity-agnostic data access.

use crate::criteria::Criteria;
use crate::session::SessionContext;
use crate::{EntityMapping, Persistent, Value};
use async_trait::async_trait;
use productsearch_core::ProductSearchResult;
use std::collections::HashMap;

/// CRUD, example, criteria and named-query access for one entity type.
///
/// Every call takes the [`SessionContext`] it runs in. With a bound context
/// the call joins that session's transaction; with a standalone context each
/// mutating call commits on its own.
#[async_trait]
pub trait GenericDao<T: Persistent>: Send + Sync {
    /// Returns every row, ordered by key.
    async fn get_all(&self, cx: &mut SessionContext) -> ProductSearchResult<Vec<T>>;

    /// Returns every row with value-equal duplicates removed, keeping the
    /// first occurrence.
    async fn get_all_distinct(&self, cx: &mut SessionContext) -> ProductSearchResult<Vec<T>>;

    /// Loads the row with the given key.
    ///
    /// Fails with `NotFound` when no such row exists.
    async fn get(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<T>;

    /// Checks whether a row with the given key exists.
    async fn exists(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<bool>;

    /// Inserts or updates, returning the persisted state.
    async fn save(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<T>;

    /// Inserts only; an existing key is a persistence failure.
    async fn insert(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<T>;

    /// Deletes the row with the given key.
    ///
    /// Fails with `NotFound` when no such row exists.
    async fn remove_by_id(&self, cx: &mut SessionContext, id: &T::Key) -> ProductSearchResult<()>;

    /// Deletes the row corresponding to a persistent instance.
    async fn remove(&self, cx: &mut SessionContext, object: &T) -> ProductSearchResult<()>;

    /// Runs a query declared on the entity mapping.
    ///
    /// Parameters must be non-null; a null comparison belongs in the query
    /// text as `IS NULL`.
    async fn find_by_named_query(
        &self,
        cx: &mut SessionContext,
        name: &str,
        params: &HashMap<String, Value>,
    ) -> ProductSearchResult<Vec<T>>;

    /// Matches every populated, non-excluded attribute of `template`.
    async fn find_by_example(
        &self,
        cx: &mut SessionContext,
        template: &T,
        exclude: &[&str],
    ) -> ProductSearchResult<Vec<T>>;

    /// Paged variant of [`GenericDao::find_by_example`].
    async fn find_by_example_paged(
        &self,
        cx: &mut SessionContext,
        template: &T,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> ProductSearchResult<Vec<T>>;

    async fn find_by_criteria(
        &self,
        cx: &mut SessionContext,
        criteria: &Criteria,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> ProductSearchResult<Vec<T>>;

    /// Checks that the writes of a bound session reached the database.
    ///
    /// The transaction stays open, so a later rollback still undoes them.
    async fn flush(&self, cx: &mut SessionContext) -> ProductSearchResult<()>;

    /// Returns the mapping of the managed entity.
    fn mapping(&self) -> &'static EntityMapping {
        T::mapping()
    }
}
