//! # Item Repository
//!
//! Database operations for items.
//!
//! ## Key Operations
//! - Filtered listing from a [`ListingQuery`] built in bazaar-core
//! - CRUD by id
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ListingQuery { sql, params }                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  query_as::<ItemListing>(sql)                                          │
//! │       .bind(params[0])  → ?1                                           │
//! │       .bind(params[1])  → ?2                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ItemListing> (category / subcategory names joined in)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bazaar_core::filter::{ListingQuery, SqlParam, LISTING_SELECT};
use bazaar_core::{Id, Item, ItemDraft, ItemListing};

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut db = database.acquire().await?;
///
/// let listing = db.items().list(&filter.build()).await?;
/// let item = db.items().get(7).await?;
/// ```
#[derive(Debug)]
pub struct ItemRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ItemRepository<'c> {
    /// Creates a new ItemRepository on a borrowed connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        ItemRepository { conn }
    }

    /// Runs a listing query, binding its parameters in order.
    pub async fn list(&mut self, query: &ListingQuery) -> DbResult<Vec<ItemListing>> {
        debug!(sql = %query.sql, binds = query.params.len(), "Listing items");

        let mut statement = sqlx::query_as::<_, ItemListing>(&query.sql);
        for param in &query.params {
            statement = match param {
                SqlParam::Text(text) => statement.bind(text.as_str()),
                SqlParam::Int(value) => statement.bind(*value),
            };
        }

        let items = statement.fetch_all(&mut *self.conn).await?;

        debug!(count = items.len(), "Listing returned items");
        Ok(items)
    }

    /// Gets an item row by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - No such id
    pub async fn get(&mut self, id: Id) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT
                id,
                title,
                description,
                price_cents,
                image,
                category_id,
                subcategory_id
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// Gets an item with its category and subcategory names.
    pub async fn get_listing(&mut self, id: Id) -> DbResult<Option<ItemListing>> {
        let sql = format!("{LISTING_SELECT} WHERE i.id = ?1");

        let item = sqlx::query_as::<_, ItemListing>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(item)
    }

    /// Inserts a new item and returns its id.
    ///
    /// ## Errors
    /// `DbError::ForeignKeyViolation` when the category or subcategory id
    /// does not exist.
    pub async fn insert(&mut self, draft: &ItemDraft) -> DbResult<Id> {
        debug!(title = %draft.title, "Inserting item");

        let result = sqlx::query(
            r#"
            INSERT INTO items (
                title, description, price_cents, image, category_id, subcategory_id
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6
            )
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(draft.category_id)
        .bind(draft.subcategory_id)
        .execute(&mut *self.conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Overwrites every column of an existing item.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the id no longer exists.
    pub async fn update(&mut self, id: Id, draft: &ItemDraft) -> DbResult<()> {
        debug!(id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                title = ?2,
                description = ?3,
                price_cents = ?4,
                image = ?5,
                category_id = ?6,
                subcategory_id = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(draft.category_id)
        .bind(draft.subcategory_id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Deletes an item; its comments go with it (`ON DELETE CASCADE`).
    ///
    /// ## Errors
    /// `DbError::NotFound` when the id does not exist.
    pub async fn delete(&mut self, id: Id) -> DbResult<()> {
        debug!(id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }

    /// Counts all items.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{database, draft};
    use bazaar_core::filter::{ListingFilter, PriceSort};
    use bazaar_core::Money;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let id = conn.items().insert(&draft("Vintage Lamp", 1250)).await.unwrap();
        let item = conn.items().get(id).await.unwrap().unwrap();

        assert_eq!(item.title, "Vintage Lamp");
        assert_eq!(item.price, Money::from_cents(1250));
        assert_eq!(item.subcategory_id, 2);

        let listing = conn.items().get_listing(id).await.unwrap().unwrap();
        assert_eq!(listing.category, "Food");
        assert_eq!(listing.subcategory, "Dairy");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        assert!(conn.items().get(999).await.unwrap().is_none());
        assert!(conn.items().get_listing(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unfiltered_listing_newest_first() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let first = conn.items().insert(&draft("First item", 500)).await.unwrap();
        let second = conn.items().insert(&draft("Second item", 100)).await.unwrap();

        let items = conn.items().list(&ListingQuery::unfiltered()).await.unwrap();
        let ids: Vec<Id> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_filtered_listing() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        conn.items().insert(&draft("Desk lamp", 2000)).await.unwrap();
        conn.items().insert(&draft("Floor lamp", 9000)).await.unwrap();
        let mut book = draft("Old novel", 300);
        book.category_id = 3;
        book.subcategory_id = 5;
        conn.items().insert(&book).await.unwrap();

        let filter = ListingFilter {
            title: Some("lamp".to_string()),
            sort: PriceSort::Descending,
            ..Default::default()
        };
        let items = conn.items().list(&filter.build()).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Floor lamp", "Desk lamp"]);

        let filter = ListingFilter {
            category_id: Some(3),
            subcategory_id: Some(5),
            ..Default::default()
        };
        let items = conn.items().list(&filter.build()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subcategory, "Fiction");

        let filter = ListingFilter {
            sort: PriceSort::Ascending,
            ..Default::default()
        };
        let items = conn.items().list(&filter.build()).await.unwrap();
        assert_eq!(items[0].price, Money::from_cents(300));
    }

    #[tokio::test]
    async fn test_hostile_title_is_just_a_pattern() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();
        conn.items().insert(&draft("Vintage Lamp", 1250)).await.unwrap();

        let filter = ListingFilter {
            title: Some("'; DROP TABLE items; --".to_string()),
            ..Default::default()
        };
        let items = conn.items().list(&filter.build()).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(conn.items().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_unchanged_leaves_row_identical() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let original = draft("Vintage Lamp", 1250);
        let id = conn.items().insert(&original).await.unwrap();
        let before = conn.items().get(id).await.unwrap().unwrap();

        conn.items().update(id, &original).await.unwrap();
        let after = conn.items().get(id).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let update = conn.items().update(999, &draft("Ghost item", 1)).await;
        assert!(matches!(update, Err(DbError::NotFound { .. })));

        let delete = conn.items().delete(999).await;
        assert!(matches!(delete, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unknown_subcategory_violates_foreign_key() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let mut bad = draft("Vintage Lamp", 1250);
        bad.subcategory_id = 42;
        let result = conn.items().insert(&bad).await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_comments() {
        let db = database().await;
        let mut conn = db.acquire().await.unwrap();

        let id = conn.items().insert(&draft("Vintage Lamp", 1250)).await.unwrap();
        conn.comments().insert(id, "Still available?").await.unwrap();

        conn.items().delete(id).await.unwrap();
        assert!(conn.items().get(id).await.unwrap().is_none());
        assert!(conn.comments().list_for_item(id).await.unwrap().is_empty());
    }
}
