//! # Reference Tables and Select Choices
//!
//! Categories and subcategories are read-mostly lookup tables that supply the
//! option sets of select fields. Their identifiers form a closed set: SQL
//! that names a table or column is only ever built from the enums here, never
//! from request input.
//!
//! ## Two-Step Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Load (bazaar-db)                                                   │
//! │     ChoiceSource::categories(true).select_sql()                        │
//! │        → "SELECT id, name FROM categories ORDER BY id"                 │
//! │        → Choices [(0,"---"), (1,"Food"), (2,"Technology"), ...]        │
//! │                                                                         │
//! │  2. Validate (bazaar-core::form)                                       │
//! │     SelectField { raw: "2" } + &Choices → coerce → contains? → Ok(2)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::Id;
use crate::{BLANK_CHOICE_LABEL, BLANK_CHOICE_VALUE};

// =============================================================================
// Allow-listed Identifiers
// =============================================================================

/// A reference table that may appear in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    Categories,
    Subcategories,
}

impl ReferenceTable {
    /// SQL identifier of the table.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ReferenceTable::Categories => "categories",
            ReferenceTable::Subcategories => "subcategories",
        }
    }
}

/// The (value, label) column pair read from a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceColumns {
    pub value: &'static str,
    pub label: &'static str,
}

impl ReferenceColumns {
    /// The usual `(id, name)` pair.
    pub const ID_NAME: ReferenceColumns = ReferenceColumns {
        value: "id",
        label: "name",
    };
}

/// Where a select field's choices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSource {
    table: ReferenceTable,
    columns: ReferenceColumns,
    allow_blank: bool,
}

impl ChoiceSource {
    /// Declares a choice source.
    ///
    /// ## Errors
    /// `CoreError::Config` when a column identifier is empty or is not a
    /// plain SQL identifier. This is a programming mistake, not user input.
    pub fn new(
        table: ReferenceTable,
        columns: ReferenceColumns,
        allow_blank: bool,
    ) -> CoreResult<Self> {
        for column in [columns.value, columns.label] {
            if column.is_empty() {
                return Err(CoreError::config(format!(
                    "choice source for {} needs both value and label columns",
                    table.as_sql()
                )));
            }
            if !column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(CoreError::config(format!(
                    "{column:?} is not a valid column identifier"
                )));
            }
        }

        Ok(ChoiceSource {
            table,
            columns,
            allow_blank,
        })
    }

    /// `(id, name)` choices from `categories`.
    pub fn categories(allow_blank: bool) -> Self {
        ChoiceSource {
            table: ReferenceTable::Categories,
            columns: ReferenceColumns::ID_NAME,
            allow_blank,
        }
    }

    /// `(id, name)` choices from `subcategories`.
    pub fn subcategories(allow_blank: bool) -> Self {
        ChoiceSource {
            table: ReferenceTable::Subcategories,
            columns: ReferenceColumns::ID_NAME,
            allow_blank,
        }
    }

    pub fn table(&self) -> ReferenceTable {
        self.table
    }

    pub fn allow_blank(&self) -> bool {
        self.allow_blank
    }

    /// SQL reading the (value, label) pairs in value order.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT {value}, {label} FROM {table} ORDER BY {value}",
            value = self.columns.value,
            label = self.columns.label,
            table = self.table.as_sql()
        )
    }

    /// Wraps loaded rows, prepending the blank pair when allowed.
    pub fn into_choices(&self, rows: Vec<(Id, String)>) -> Choices {
        let choices = Choices::new(rows);
        if self.allow_blank {
            choices.with_blank()
        } else {
            choices
        }
    }
}

// =============================================================================
// Choices
// =============================================================================

/// Ordered `(value, label)` options of a select field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Choices(Vec<(Id, String)>);

impl Choices {
    pub fn new(options: Vec<(Id, String)>) -> Self {
        Choices(options)
    }

    /// Prepends `(0, "---")` unless already present.
    pub fn with_blank(mut self) -> Self {
        if !self.contains(BLANK_CHOICE_VALUE) {
            self.0
                .insert(0, (BLANK_CHOICE_VALUE, BLANK_CHOICE_LABEL.to_string()));
        }
        self
    }

    pub fn contains(&self, value: Id) -> bool {
        self.0.iter().any(|(v, _)| *v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Id, String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Cross-Reference
// =============================================================================

/// A pending "child belongs to parent" existence check.
///
/// Produced by form validation once the child field has coerced cleanly;
/// executed by the database layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Form field the error is attached to.
    pub field: &'static str,
    pub table: ReferenceTable,
    /// Column in `table` that points at the parent.
    pub parent_key: &'static str,
    pub child_id: Id,
    pub parent_id: Id,
    pub message: String,
}

impl CrossReference {
    /// Default message when a form does not supply one.
    pub const DEFAULT_MESSAGE: &'static str = "Chosen option is not valid.";

    /// Declares a check of `child_id` against the sibling field `belongs_to`.
    ///
    /// The parent key column is `<belongs_to>_id`.
    ///
    /// ## Errors
    /// `CoreError::Config` when `belongs_to` is not a known parent field.
    pub fn new(
        field: &'static str,
        table: ReferenceTable,
        belongs_to: &str,
        child_id: Id,
        parent_id: Id,
    ) -> CoreResult<Self> {
        Ok(CrossReference {
            field,
            table,
            parent_key: foreign_key_for(belongs_to)?,
            child_id,
            parent_id,
            message: Self::DEFAULT_MESSAGE.to_string(),
        })
    }

    /// Replaces the failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Subcategory must belong to the chosen category.
    pub fn subcategory_of(subcategory_id: Id, category_id: Id) -> Self {
        CrossReference {
            field: "subcategory",
            table: ReferenceTable::Subcategories,
            parent_key: "category_id",
            child_id: subcategory_id,
            parent_id: category_id,
            message: "Subcategory does not belong to that category.".to_string(),
        }
    }

    /// Parameterized `COUNT(*)`; binds `?1 = child_id`, `?2 = parent_id`.
    pub fn count_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE id = ?1 AND {} = ?2",
            self.table.as_sql(),
            self.parent_key
        )
    }
}

/// Parent key column for a parent field name (`category` → `category_id`).
fn foreign_key_for(belongs_to: &str) -> CoreResult<&'static str> {
    match belongs_to {
        "category" => Ok("category_id"),
        "" => Err(CoreError::config("cross-reference needs a belongs_to field")),
        other => Err(CoreError::config(format!(
            "no foreign key known for parent field {other:?}"
        ))),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(Id, String)> {
        vec![(1, "Food".to_string()), (2, "Technology".to_string())]
    }

    #[test]
    fn test_select_sql_uses_allow_listed_identifiers() {
        assert_eq!(
            ChoiceSource::categories(false).select_sql(),
            "SELECT id, name FROM categories ORDER BY id"
        );
        assert_eq!(
            ChoiceSource::subcategories(true).select_sql(),
            "SELECT id, name FROM subcategories ORDER BY id"
        );
    }

    #[test]
    fn test_missing_columns_is_config_error() {
        let columns = ReferenceColumns {
            value: "id",
            label: "",
        };
        let err = ChoiceSource::new(ReferenceTable::Categories, columns, false).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_bad_identifier_is_config_error() {
        let columns = ReferenceColumns {
            value: "id; DROP TABLE items",
            label: "name",
        };
        assert!(ChoiceSource::new(ReferenceTable::Categories, columns, false).is_err());
    }

    #[test]
    fn test_blank_prepended_only_when_allowed() {
        let strict = ChoiceSource::categories(false).into_choices(rows());
        assert_eq!(strict.len(), 2);
        assert!(!strict.contains(0));

        let lenient = ChoiceSource::categories(true).into_choices(rows());
        assert_eq!(lenient.len(), 3);
        assert_eq!(lenient.iter().next(), Some(&(0, "---".to_string())));
    }

    #[test]
    fn test_with_blank_is_idempotent() {
        let choices = Choices::new(rows()).with_blank().with_blank();
        assert_eq!(choices.len(), 3);
    }

    #[test]
    fn test_cross_reference_declaration() {
        let check = CrossReference::new("subcategory", ReferenceTable::Subcategories, "category", 5, 3)
            .unwrap();
        assert_eq!(check.parent_key, "category_id");
        assert_eq!(check.message, CrossReference::DEFAULT_MESSAGE);
        assert_eq!(
            check.with_message("nope").message,
            "nope"
        );

        let err = CrossReference::new("subcategory", ReferenceTable::Subcategories, "", 5, 3);
        assert!(matches!(err, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_cross_reference_sql() {
        let check = CrossReference::subcategory_of(2, 1);
        assert_eq!(
            check.count_sql(),
            "SELECT COUNT(*) FROM subcategories WHERE id = ?1 AND category_id = ?2"
        );
        assert_eq!(check.child_id, 2);
        assert_eq!(check.parent_id, 1);
    }
}
