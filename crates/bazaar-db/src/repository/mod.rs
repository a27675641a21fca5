//! # Repository Module
//!
//! Database repository implementations for Bazaar.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.items().list(&query)                                       │
//! │       ▼                                                                 │
//! │  ItemRepository<'c>  (borrows the request's connection)                │
//! │  ├── list(&query)                                                      │
//! │  ├── get(id) / get_listing(id)                                         │
//! │  ├── insert(&draft) / update(id, &draft)                               │
//! │  └── delete(id)                                                        │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold `&mut SqliteConnection` rather than a pool, so every
//! statement of a request goes through the same connection.
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Item CRUD and the filtered listing
//! - [`reference::ReferenceRepository`] - Select choices and cross-reference checks
//! - [`comment::CommentRepository`] - Comments per item

pub mod comment;
pub mod item;
pub mod reference;

#[cfg(test)]
pub(crate) mod test_support {
    use bazaar_core::{ItemDraft, Money};

    use crate::{Database, DbConfig};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// A valid draft in Food / Dairy.
    pub fn draft(title: &str, cents: i64) -> ItemDraft {
        ItemDraft {
            title: title.to_string(),
            description: "A nice old lamp for sale".to_string(),
            price: Money::from_cents(cents),
            image: "ab12_20240101T120000_lamp.png".to_string(),
            category_id: 1,
            subcategory_id: 2,
        }
    }
}
