//! # Listing Filter-Query Builder
//!
//! Turns a validated [`ListingFilter`] into one parameterized SQL statement
//! over `items ⋈ categories ⋈ subcategories`.
//!
//! ## Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ListingFilter { title: "lamp", category_id: 1, sort: Descending }     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SELECT ... FROM items AS i                                            │
//! │    INNER JOIN categories AS c ON i.category_id = c.id                  │
//! │    INNER JOIN subcategories AS s ON i.subcategory_id = s.id            │
//! │  WHERE i.title LIKE ?1 AND i.category_id = ?2     ← only set filters   │
//! │  ORDER BY i.price_cents DESC                      ← default i.id DESC  │
//! │                                                                         │
//! │  params = [Text("%lamp%"), Int(1)]                ← never in the SQL   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::types::Id;

/// Columns and joins shared by the listing and detail queries.
pub const LISTING_SELECT: &str = "SELECT i.id, i.title, i.description, i.price_cents, i.image, \
     c.name AS category, s.name AS subcategory \
     FROM items AS i \
     INNER JOIN categories AS c ON i.category_id = c.id \
     INNER JOIN subcategories AS s ON i.subcategory_id = s.id";

// =============================================================================
// Sort Directive
// =============================================================================

/// Price ordering chosen in the filter form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PriceSort {
    /// Newest first (`i.id DESC`).
    #[default]
    None,
    /// "Max to Min".
    Descending,
    /// "Min to Max".
    Ascending,
}

impl PriceSort {
    pub const ALL: [PriceSort; 3] = [PriceSort::None, PriceSort::Descending, PriceSort::Ascending];

    /// Value used by the select field.
    pub const fn choice_value(&self) -> i64 {
        match self {
            PriceSort::None => 0,
            PriceSort::Descending => 1,
            PriceSort::Ascending => 2,
        }
    }

    pub fn from_choice_value(value: i64) -> Option<PriceSort> {
        PriceSort::ALL
            .into_iter()
            .find(|sort| sort.choice_value() == value)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            PriceSort::None => "---",
            PriceSort::Descending => "Max to Min",
            PriceSort::Ascending => "Min to Max",
        }
    }

    const fn order_by(&self) -> &'static str {
        match self {
            PriceSort::None => "ORDER BY i.id DESC",
            PriceSort::Descending => "ORDER BY i.price_cents DESC",
            PriceSort::Ascending => "ORDER BY i.price_cents",
        }
    }
}

// =============================================================================
// Query Output
// =============================================================================

/// A bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// SQL text plus its parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl ListingQuery {
    /// All items, newest first.
    pub fn unfiltered() -> Self {
        ListingFilter::default().build()
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Validated, optional listing predicates.
///
/// `None` means "do not filter on this"; blank select values have already
/// been mapped to `None` by the filter form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub title: Option<String>,
    pub category_id: Option<Id>,
    pub subcategory_id: Option<Id>,
    pub sort: PriceSort,
}

impl ListingFilter {
    /// Number of predicates that will be bound.
    pub fn predicate_count(&self) -> usize {
        [
            self.title_pattern().is_some(),
            self.category_id.is_some(),
            self.subcategory_id.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Builds the listing statement.
    ///
    /// ## Rules
    /// - Only set predicates appear, joined with `AND`
    /// - Every value goes through a numbered placeholder
    /// - A whitespace-only title counts as unset
    pub fn build(&self) -> ListingQuery {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        let mut bind = |column_expr: &str, param: SqlParam| {
            params.push(param);
            clauses.push(format!("{} ?{}", column_expr, params.len()));
        };

        if let Some(pattern) = self.title_pattern() {
            bind("i.title LIKE", SqlParam::Text(pattern));
        }
        if let Some(category_id) = self.category_id {
            bind("i.category_id =", SqlParam::Int(category_id));
        }
        if let Some(subcategory_id) = self.subcategory_id {
            bind("i.subcategory_id =", SqlParam::Int(subcategory_id));
        }

        let mut sql = String::from(LISTING_SELECT);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push(' ');
        sql.push_str(self.sort.order_by());

        ListingQuery { sql, params }
    }

    /// `%title%` using the raw (untrimmed) title.
    ///
    /// Titles are stored escaped, so the pattern is escaped the same way.
    fn title_pattern(&self) -> Option<String> {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .map(|title| format!("%{}%", crate::html::escape(title)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
