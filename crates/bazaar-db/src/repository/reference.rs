//! # Reference Repository
//!
//! Loads select-field choices from the reference tables and executes the
//! cross-reference checks a form submission leaves pending.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. load_choices(ChoiceSource::categories(false))  → Choices           │
//! │  2. ItemForm::validate(&input, &categories, &subcategories)            │
//! │        → Submission { pending: [subcategory 5 of category 1] }         │
//! │  3. validate_submission(&mut submission)                               │
//! │        SELECT COUNT(*) FROM subcategories                              │
//! │         WHERE id = ?1 AND category_id = ?2      (5, 1) → 0             │
//! │        → resolve(check, false) → "does not belong" on subcategory      │
//! │  4. submission.finish()                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing loader is a deployment problem (missing table, broken schema),
//! not something the user can fix, so it is logged at error level.

use sqlx::SqliteConnection;
use tracing::{debug, error};

use crate::error::DbResult;
use bazaar_core::form::Submission;
use bazaar_core::reference::{ChoiceSource, Choices, CrossReference};
use bazaar_core::{Category, Id, Subcategory};

/// Repository for categories and subcategories.
#[derive(Debug)]
pub struct ReferenceRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> ReferenceRepository<'c> {
    /// Creates a new ReferenceRepository on a borrowed connection.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        ReferenceRepository { conn }
    }

    /// Loads `(value, label)` pairs for a select field.
    ///
    /// The blank `(0, "---")` pair is prepended when the source allows it.
    pub async fn load_choices(&mut self, source: ChoiceSource) -> DbResult<Choices> {
        let sql = source.select_sql();
        debug!(table = source.table().as_sql(), "Loading choices");

        let rows: Vec<(Id, String)> = sqlx::query_as(&sql)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(|e| {
                error!(table = source.table().as_sql(), error = %e, "Failed to load choices");
                e
            })?;

        Ok(source.into_choices(rows))
    }

    /// All categories, by id.
    pub async fn categories(&mut self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(categories)
    }

    /// Subcategories of one category as `(id, name)` pairs, by id.
    ///
    /// An unknown category yields an empty list.
    pub async fn subcategories_of(&mut self, category_id: Id) -> DbResult<Vec<(Id, String)>> {
        let rows = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT id, name, category_id
            FROM subcategories
            WHERE category_id = ?1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows.into_iter().map(|sub| (sub.id, sub.name)).collect())
    }

    /// Whether the child row exists under the given parent.
    pub async fn check_cross_reference(&mut self, check: &CrossReference) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(&check.count_sql())
            .bind(check.child_id)
            .bind(check.parent_id)
            .fetch_one(&mut *self.conn)
            .await?;

        debug!(
            field = check.field,
            child = check.child_id,
            parent = check.parent_id,
            count,
            "Cross-reference checked"
        );
        Ok(count > 0)
    }

    /// Runs every pending check of a submission and records the outcomes.
    pub async fn validate_submission<T>(&mut self, submission: &mut Submission<T>) -> DbResult<()> {
        for check in submission.take_pending() {
            let exists = self.check_cross_reference(&check).await?;
            submission.resolve(&check, exists);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
