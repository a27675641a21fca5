//! # Domain Types
//!
//! Core domain types used throughout Bazaar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│   Subcategory   │   │     Comment     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  content        │       │
//! │  └────────▲────────┘   │  category_id    │   │  item_id ───────┼──┐    │
//! │           │            └────────▲────────┘   └─────────────────┘  │    │
//! │           │                     │                                 │    │
//! │  ┌────────┴─────────────────────┴──────────────────────────────┐  │    │
//! │  │  Item: id, title, description, price, image,                 │◄─┘    │
//! │  │        category_id, subcategory_id                           │       │
//! │  └──────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  ItemListing = Item ⋈ Category ⋈ Subcategory (names instead of ids)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored Text
//! `title`, `description` and `content` are stored HTML-escaped. Use
//! [`crate::html::unescape`] before displaying or editing them.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Database identifier (SQLite INTEGER PRIMARY KEY).
pub type Id = i64;

// =============================================================================
// Reference Data
// =============================================================================

/// A top-level category ("Food", "Technology", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: Id,
    pub name: String,
}

/// A subcategory. Always belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Subcategory {
    pub id: Id,
    pub name: String,
    pub category_id: Id,
}

// =============================================================================
// Item
// =============================================================================

/// A row of the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    pub id: Id,
    /// HTML-escaped title.
    pub title: String,
    /// HTML-escaped description.
    pub description: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,
    /// Stored upload filename (not a path).
    pub image: String,
    pub category_id: Id,
    pub subcategory_id: Id,
}

/// An item joined with its category and subcategory names.
///
/// Produced by the listing query and by the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemListing {
    pub id: Id,
    pub title: String,
    pub description: String,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,
    pub image: String,
    pub category: String,
    pub subcategory: String,
}

/// Values written by an insert or update.
///
/// Built from a validated item form; text is already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub image: String,
    pub category_id: Id,
    pub subcategory_id: Id,
}

// =============================================================================
// Comment
// =============================================================================

/// A comment left on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Comment {
    pub id: Id,
    /// HTML-escaped content.
    pub content: String,
    pub item_id: Id,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_serializes_price_as_cents() {
        let listing = ItemListing {
            id: 1,
            title: "Vintage Lamp".to_string(),
            description: "A nice old lamp for sale".to_string(),
            price: Money::from_cents(1250),
            image: "ab12_20240101T120000_lamp.png".to_string(),
            category: "Food".to_string(),
            subcategory: "Fruit".to_string(),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["price"], 1250);
        assert_eq!(json["category"], "Food");
    }
}
