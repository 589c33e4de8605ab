//! Integration tests for SqlxGenericDao.
//!
//! These tests run against an in-memory SQLite database through the same
//! `Any` driver path used for MySQL.

mod common;

use common::TestDatabase;
use productsearch_core::{Person, ProductSearchError, ProductSearchResult};
use productsearch_repository::{
    mappings, ColumnMapping, ColumnType, Criteria, DatabasePoolInterface, Dialect, EntityMapping, GenericDao, Generation,
    NamedQuery, Order, Persistent, Restriction, SessionContext, SqlxGenericDao, Value,
};
use sqlx::any::AnyRow;
use sqlx::Row;
use std::collections::HashMap;

/// Group membership keyed by `(group_id, member)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Membership {
    group_id: i64,
    member: String,
    role: String,
    note: Option<String>,
}

static MEMBERSHIP_MAPPING: EntityMapping = EntityMapping {
    entity: "Membership",
    table: "membership",
    key: &[
        ColumnMapping::required("groupId", "group_id", ColumnType::BigInt),
        ColumnMapping::required("member", "member", ColumnType::Varchar(64)),
    ],
    generation: Generation::Assigned,
    columns: &[
        ColumnMapping::required("role", "role", ColumnType::Varchar(32)),
        ColumnMapping::optional("note", "note", ColumnType::Text),
    ],
    named_queries: &[NamedQuery {
        name: "Membership.byRole",
        query: "SELECT group_id, member, role, note FROM membership WHERE role = :role ORDER BY group_id, member",
    }],
};

impl Persistent for Membership {
    type Key = (i64, String);

    fn mapping() -> &'static EntityMapping {
        &MEMBERSHIP_MAPPING
    }

    fn key(&self) -> Option<Self::Key> {
        Some((self.group_id, self.member.clone()))
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("role", Value::from(&self.role)),
            ("note", Value::from(self.note.clone())),
        ]
    }

    fn from_row(row: &AnyRow) -> ProductSearchResult<Self> {
        Ok(Self {
            group_id: row.try_get("group_id")?,
            member: row.try_get("member")?,
            role: row.try_get("role")?,
            note: row.try_get("note")?,
        })
    }
}

fn membership(group_id: i64, member: &str, role: &str) -> Membership {
    Membership {
        group_id,
        member: member.to_string(),
        role: role.to_string(),
        note: None,
    }
}

async fn person_fixture() -> (TestDatabase, SqlxGenericDao<Person>) {
    let db = TestDatabase::new().await;
    let dao = SqlxGenericDao::new(db.pool());
    (db, dao)
}

async fn membership_fixture() -> (TestDatabase, SqlxGenericDao<Membership>) {
    let db = TestDatabase::with_mappings(&[&MEMBERSHIP_MAPPING]).await;
    let dao = SqlxGenericDao::new(db.pool());
    (db, dao)
}

#[tokio::test]
async fn test_save_then_get() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let saved = dao
        .save(&mut cx, &Person::new("A", "a@x.com", "1"))
        .await
        .expect("Failed to save person");
    let id = saved.id.expect("No id assigned");

    let found = dao.get(&mut cx, &id).await.expect("Failed to get person");
    assert_eq!(found, saved);
    assert_eq!(found, Person::new("A", "a@x.com", "1").with_id(id));
}

#[tokio::test]
async fn test_get_all_is_ordered_by_key() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let first = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let second = dao.save(&mut cx, &Person::new("B", "b@x.com", "2")).await.unwrap();

    assert_eq!(dao.get_all(&mut cx).await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn test_get_all_distinct_has_no_value_equal_entries() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    for _ in 0..3 {
        dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    }

    let all = dao.get_all_distinct(&mut cx).await.unwrap();
    assert_eq!(all.len(), 3);
    for (i, a) in all.iter().enumerate() {
        assert!(all.iter().skip(i + 1).all(|b| a != b));
    }
}

#[tokio::test]
async fn test_save_updates_existing_row() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let saved = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let mut changed = saved.clone();
    changed.phone = "2".to_string();

    let updated = dao.save(&mut cx, &changed).await.unwrap();
    assert_eq!(updated, changed);
    assert_eq!(dao.get_all(&mut cx).await.unwrap(), vec![changed]);
}

#[tokio::test]
async fn test_save_with_unseen_id_inserts() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let detached = Person::new("A", "a@x.com", "1").with_id(42);
    let saved = dao.save(&mut cx, &detached).await.unwrap();

    assert_eq!(saved, detached);
    assert!(dao.exists(&mut cx, &42).await.unwrap());
}

#[tokio::test]
async fn test_insert_existing_key_is_persistence_failure() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let saved = dao.insert(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let err = dao.insert(&mut cx, &saved).await.unwrap_err();

    assert!(matches!(
        err,
        ProductSearchError::Persistence {
            operation: "save",
            entity: "Person",
            ..
        }
    ));
    assert_eq!(err.error_code(), "PERSISTENCE_FAILURE");
    assert_eq!(dao.get_all(&mut cx).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_missing_is_not_found_and_exists_is_false() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let err = dao.get(&mut cx, &999).await.unwrap_err();
    assert!(matches!(
        err,
        ProductSearchError::NotFound {
            resource_type: "Person",
            ..
        }
    ));
    assert!(!dao.exists(&mut cx, &999).await.unwrap());
}

#[tokio::test]
async fn test_remove_by_id() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let saved = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let id = saved.id.unwrap();

    dao.remove_by_id(&mut cx, &id).await.unwrap();
    assert!(!dao.exists(&mut cx, &id).await.unwrap());

    // Absence surfaces as NotFound rather than a persistence failure.
    let err = dao.remove_by_id(&mut cx, &id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_transient_or_missing_is_persistence_failure() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let err = dao
        .remove(&mut cx, &Person::new("A", "a@x.com", "1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductSearchError::Persistence {
            operation: "delete",
            ..
        }
    ));

    let err = dao
        .remove(&mut cx, &Person::new("A", "a@x.com", "1").with_id(7))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductSearchError::Persistence {
            operation: "delete",
            ..
        }
    ));
}

#[tokio::test]
async fn test_find_by_named_query() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let a = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    dao.save(&mut cx, &Person::new("B", "b@x.com", "2")).await.unwrap();

    let params = HashMap::from([("email".to_string(), Value::from("a@x.com"))]);
    let found = dao
        .find_by_named_query(&mut cx, "Person.findByEmail", &params)
        .await
        .unwrap();
    assert_eq!(found, vec![a]);

    let err = dao
        .find_by_named_query(&mut cx, "Person.findByShoeSize", &params)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = dao
        .find_by_named_query(&mut cx, "Person.findByName", &params)
        .await
        .unwrap_err();
    assert!(matches!(err, ProductSearchError::Validation(_)));
}

#[tokio::test]
async fn test_find_by_example() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let a = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let a2 = dao.save(&mut cx, &Person::new("A2", "a@x.com", "2")).await.unwrap();
    dao.save(&mut cx, &Person::new("B", "b@x.com", "1")).await.unwrap();

    let found = dao
        .find_by_example(&mut cx, &Person::example_by_email("a@x.com"), &[])
        .await
        .unwrap();
    assert_eq!(found, vec![a.clone(), a2]);

    let template = Person::new("A", "a@x.com", "9");
    let found = dao
        .find_by_example(&mut cx, &template, &["phone", "nickname"])
        .await
        .unwrap();
    assert_eq!(found, vec![a]);

    let everything = dao
        .find_by_example(&mut cx, &Person::new("", "", ""), &[])
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn test_find_by_example_paged() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let mut saved = Vec::new();
    for phone in ["1", "2", "3", "4"] {
        saved.push(dao.save(&mut cx, &Person::new("A", "a@x.com", phone)).await.unwrap());
    }
    let template = Person::example_by_email("a@x.com");

    let page = dao
        .find_by_example_paged(&mut cx, &template, Some(1), Some(2))
        .await
        .unwrap();
    assert_eq!(page, saved[1..3].to_vec());

    let tail = dao
        .find_by_example_paged(&mut cx, &template, Some(3), None)
        .await
        .unwrap();
    assert_eq!(tail, saved[3..].to_vec());
}

#[tokio::test]
async fn test_find_by_criteria() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();

    let ann = dao.save(&mut cx, &Person::new("Ann", "ann@x.com", "1")).await.unwrap();
    let andy = dao.save(&mut cx, &Person::new("Andy", "andy@x.com", "2")).await.unwrap();
    dao.save(&mut cx, &Person::new("Bob", "bob@x.com", "3")).await.unwrap();

    let criteria = Criteria::new()
        .add(Restriction::like("name", "An%"))
        .order_by(Order::desc("name"));
    let found = dao.find_by_criteria(&mut cx, &criteria, None, None).await.unwrap();
    assert_eq!(found, vec![ann.clone(), andy.clone()]);

    let criteria = Criteria::new().add(Restriction::or(vec![
        Restriction::eq("phone", "2"),
        Restriction::eq("email", "ann@x.com"),
    ]));
    let found = dao.find_by_criteria(&mut cx, &criteria, None, Some(1)).await.unwrap();
    assert_eq!(found, vec![ann]);

    let criteria = Criteria::new().add(Restriction::eq("shoeSize", 9_i64));
    let err = dao.find_by_criteria(&mut cx, &criteria, None, None).await.unwrap_err();
    assert!(matches!(err, ProductSearchError::Validation(_)));
}

#[tokio::test]
async fn test_bound_context_rollback_discards_writes() {
    let (db, dao) = person_fixture().await;

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    assert!(cx.is_bound());
    let saved = dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    assert!(dao.exists(&mut cx, &saved.id.unwrap()).await.unwrap());
    cx.rollback().await;

    let mut standalone = SessionContext::standalone();
    assert!(dao.get_all(&mut standalone).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bound_context_commit_applies_writes() {
    let (db, dao) = person_fixture().await;

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    dao.save(&mut cx, &Person::new("B", "b@x.com", "2")).await.unwrap();
    cx.commit().await.unwrap();

    let mut standalone = SessionContext::standalone();
    assert_eq!(dao.get_all(&mut standalone).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_flush_keeps_transaction_open() {
    let (db, dao) = person_fixture().await;

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    dao.save(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    dao.flush(&mut cx).await.unwrap();
    dao.save(&mut cx, &Person::new("B", "b@x.com", "2")).await.unwrap();
    dao.flush(&mut cx).await.unwrap();
    assert_eq!(dao.get_all(&mut cx).await.unwrap().len(), 2);
    cx.rollback().await;

    let mut standalone = SessionContext::standalone();
    assert!(dao.get_all(&mut standalone).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_keys_read_back() {
    let (db, dao) = person_fixture().await;
    assert_eq!(db.pool().dialect(), Dialect::Sqlite);

    let mut standalone = SessionContext::standalone();
    let first = dao
        .insert(&mut standalone, &Person::new("A", "a@x.com", "1"))
        .await
        .unwrap();
    let second = dao
        .insert(&mut standalone, &Person::new("B", "b@x.com", "2"))
        .await
        .unwrap();
    let (first_id, second_id) = (first.id.unwrap(), second.id.unwrap());
    assert!(second_id > first_id);

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    let third = dao.save(&mut cx, &Person::new("C", "c@x.com", "3")).await.unwrap();
    let third_id = third.id.unwrap();
    assert!(third_id > second_id);
    assert_eq!(dao.get(&mut cx, &third_id).await.unwrap(), third);
    cx.commit().await.unwrap();
}

#[tokio::test]
async fn test_named_query_null_parameter_rejected() {
    let (_db, dao) = membership_fixture().await;
    let mut cx = SessionContext::standalone();

    let params = HashMap::from([("role".to_string(), Value::Null)]);
    let err = dao
        .find_by_named_query(&mut cx, "Membership.byRole", &params)
        .await
        .unwrap_err();
    assert!(matches!(err, ProductSearchError::Validation(_)));
}

#[tokio::test]
async fn test_failure_in_bound_context_is_wrapped() {
    let (db, dao) = person_fixture().await;

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    let err = dao
        .remove(&mut cx, &Person::new("A", "a@x.com", "1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProductSearchError::Persistence { .. }));
    cx.rollback().await;
}

#[tokio::test]
async fn test_flush_standalone_is_noop() {
    let (_db, dao) = person_fixture().await;
    let mut cx = SessionContext::standalone();
    dao.flush(&mut cx).await.unwrap();
}

#[tokio::test]
async fn test_mapping_is_exposed() {
    let (_db, dao) = person_fixture().await;
    assert_eq!(dao.mapping().table, "person");
    assert_eq!(mappings::all(), vec![dao.mapping()]);
}

#[tokio::test]
async fn test_composite_key_round_trip() {
    let (_db, dao) = membership_fixture().await;
    let mut cx = SessionContext::standalone();

    let saved = dao.save(&mut cx, &membership(1, "ann", "owner")).await.unwrap();
    assert_eq!(saved, membership(1, "ann", "owner"));

    let key = (1, "ann".to_string());
    assert!(dao.exists(&mut cx, &key).await.unwrap());
    assert!(!dao.exists(&mut cx, &(1, "bob".to_string())).await.unwrap());
    assert_eq!(dao.get(&mut cx, &key).await.unwrap(), saved);
}

#[tokio::test]
async fn test_composite_key_merge_updates() {
    let (_db, dao) = membership_fixture().await;
    let mut cx = SessionContext::standalone();

    dao.save(&mut cx, &membership(1, "ann", "owner")).await.unwrap();
    let mut changed = membership(1, "ann", "reader");
    changed.note = Some("demoted".to_string());

    assert_eq!(dao.save(&mut cx, &changed).await.unwrap(), changed);
    assert_eq!(dao.get_all(&mut cx).await.unwrap(), vec![changed]);
}

#[tokio::test]
async fn test_composite_key_queries() {
    let (_db, dao) = membership_fixture().await;
    let mut cx = SessionContext::standalone();

    let owner = dao.save(&mut cx, &membership(1, "ann", "owner")).await.unwrap();
    dao.save(&mut cx, &membership(1, "bob", "reader")).await.unwrap();
    let other = dao.save(&mut cx, &membership(2, "ann", "owner")).await.unwrap();

    let params = HashMap::from([("role".to_string(), Value::from("owner"))]);
    let owners = dao
        .find_by_named_query(&mut cx, "Membership.byRole", &params)
        .await
        .unwrap();
    assert_eq!(owners, vec![owner.clone(), other.clone()]);

    let criteria = Criteria::new()
        .add(Restriction::eq("member", "ann"))
        .add(Restriction::is_null("note"))
        .distinct_by_id();
    let found = dao.find_by_criteria(&mut cx, &criteria, None, None).await.unwrap();
    assert_eq!(found, vec![owner, other]);
}

#[tokio::test]
async fn test_composite_key_remove() {
    let (_db, dao) = membership_fixture().await;
    let mut cx = SessionContext::standalone();

    dao.save(&mut cx, &membership(1, "ann", "owner")).await.unwrap();
    let key = (1, "ann".to_string());
    dao.remove_by_id(&mut cx, &key).await.unwrap();

    assert!(dao.get(&mut cx, &key).await.unwrap_err().is_not_found());
}
