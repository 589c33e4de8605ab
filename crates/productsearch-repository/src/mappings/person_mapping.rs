//! `person` table mapping.

use crate::{ColumnMapping, ColumnType, EntityMapping, Generation, NamedQuery, Persistent, Value};
use productsearch_core::{Person, ProductSearchError, ProductSearchResult};
use sqlx::any::AnyRow;
use sqlx::FromRow;

/// Table `person(id, name, email, phone)` with a generated identifier.
pub static PERSON_MAPPING: EntityMapping = EntityMapping {
    entity: "Person",
    table: "person",
    key: &[ColumnMapping::required("id", "id", ColumnType::BigInt)],
    generation: Generation::Identity,
    columns: &[
        ColumnMapping::required("name", "name", ColumnType::Varchar(255)),
        ColumnMapping::required("email", "email", ColumnType::Varchar(255)),
        ColumnMapping::required("phone", "phone", ColumnType::Varchar(255)),
    ],
    named_queries: &[
        NamedQuery {
            name: "Person.findByEmail",
            query: "SELECT id, name, email, phone FROM person WHERE email = :email ORDER BY id",
        },
        NamedQuery {
            name: "Person.findByName",
            query: "SELECT id, name, email, phone FROM person WHERE name = :name ORDER BY id",
        },
    ],
};

/// Database row representation of a person.
#[derive(Debug, FromRow)]
struct PersonRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Person::new(row.name, row.email, row.phone).with_id(row.id)
    }
}

impl Persistent for Person {
    type Key = i64;

    fn mapping() -> &'static EntityMapping {
        &PERSON_MAPPING
    }

    fn key(&self) -> Option<i64> {
        self.id
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::from(&self.name)),
            ("email", Value::from(&self.email)),
            ("phone", Value::from(&self.phone)),
        ]
    }

    fn from_row(row: &AnyRow) -> ProductSearchResult<Self> {
        PersonRow::from_row(row)
            .map(Person::from)
            .map_err(|e| ProductSearchError::Database(format!("Invalid person row: {e}")))
    }
}
