//! # Comment Repository
//!
//! Comments are created and listed, never edited. Content arrives already
//! escaped.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use bazaar_core::{Comment, Id};

/// Repository for comment database operations.
#[derive(Debug)]
pub struct CommentRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CommentRepository<'c> {
    /// Creates a new CommentRepository on a borrowed connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        CommentRepository { conn }
    }

    /// Inserts a comment and returns its id.
    ///
    /// ## Errors
    /// `DbError::ForeignKeyViolation` when the item does not exist.
    pub async fn insert(&mut self, item_id: Id, content: &str) -> DbResult<Id> {
        debug!(item_id, "Inserting comment");

        let result = sqlx::query("INSERT INTO comments (content, item_id) VALUES (?1, ?2)")
            .bind(content)
            .bind(item_id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Comments of an item, newest first.
    pub async fn list_for_item(&mut self, item_id: Id) -> DbResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, item_id
            FROM comments
            WHERE item_id = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(comments)
    }
}
