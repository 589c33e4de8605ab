//! Integration tests for PersonDao.

mod common;

use common::TestDatabase;
use productsearch_core::Person;
use productsearch_repository::{GenericDao, PersonDao, PersonDaoImpl, SessionContext};
use std::sync::Arc;

async fn fixture() -> (TestDatabase, Arc<dyn PersonDao>) {
    let db = TestDatabase::new().await;
    let dao: Arc<dyn PersonDao> = Arc::new(PersonDaoImpl::new(db.pool()));
    (db, dao)
}

#[tokio::test]
async fn test_add_assigns_id() {
    let (_db, dao) = fixture().await;
    let mut cx = SessionContext::standalone();

    let added = dao
        .add(&mut cx, &Person::new("A", "a@x.com", "1"))
        .await
        .expect("Failed to add person");

    let id = added.id.expect("No id assigned");
    assert_eq!(added, Person::new("A", "a@x.com", "1").with_id(id));
    assert_eq!(dao.get(&mut cx, &id).await.unwrap(), added);
}

#[tokio::test]
async fn test_get_person_by_email_matches_exactly() {
    let (_db, dao) = fixture().await;
    let mut cx = SessionContext::standalone();

    let a = dao.add(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    let a2 = dao.add(&mut cx, &Person::new("A2", "a@x.com", "2")).await.unwrap();
    dao.add(&mut cx, &Person::new("B", "b@x.com", "3")).await.unwrap();
    dao.add(&mut cx, &Person::new("C", "A@X.COM.example", "4")).await.unwrap();

    let found = dao.get_person_by_email(&mut cx, "a@x.com").await.unwrap();
    assert_eq!(found, vec![a, a2]);
}

#[tokio::test]
async fn test_get_person_by_unknown_email_is_empty() {
    let (_db, dao) = fixture().await;
    let mut cx = SessionContext::standalone();

    dao.add(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();

    let found = dao.get_person_by_email(&mut cx, "nobody@x.com").await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_add_then_lookup_through_bound_context() {
    let (db, dao) = fixture().await;

    let mut cx = SessionContext::begin(&db.sessions()).await.unwrap();
    let added = dao.add(&mut cx, &Person::new("A", "a@x.com", "1")).await.unwrap();
    assert_eq!(
        dao.get_person_by_email(&mut cx, "a@x.com").await.unwrap(),
        vec![added.clone()]
    );
    cx.commit().await.unwrap();

    let mut standalone = SessionContext::standalone();
    assert_eq!(
        dao.get_person_by_email(&mut standalone, "a@x.com").await.unwrap(),
        vec![added]
    );
}
