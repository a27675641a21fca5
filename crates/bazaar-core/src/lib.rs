//! # bazaar-core: Pure Logic for Bazaar
//!
//! Everything in this crate is deterministic and free of I/O. The database
//! and HTTP layers call into it to coerce and validate submitted forms and to
//! assemble the listing query.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bazaar Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/web (axum)                              │   │
//! │  │    GET /  ──► filter form ──► listing                           │   │
//! │  │    POST /item/new ──► item form ──► insert                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   form    │  │  filter   │  │ reference │  │  upload   │  │   │
//! │  │   │ ItemForm  │  │ Listing   │  │ Reference │  │ secure    │  │   │
//! │  │   │FilterForm │  │  Query    │  │   Table   │  │ filename  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bazaar-db (Database Layer)                   │   │
//! │  │     SQLite queries, migrations, cross-reference checks          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Category, Subcategory, Comment)
//! - [`money`] - Price type held in integer cents
//! - [`error`] - Domain error types
//! - [`validation`] - Single-field validators
//! - [`form`] - Form profiles and the per-field state machine
//! - [`reference`] - Allow-listed reference tables and select choices
//! - [`filter`] - Listing filter-query builder
//! - [`upload`] - Upload filename rules
//! - [`html`] - Escape-on-write helpers
//!
//! ## Example Usage
//!
//! ```rust
//! use bazaar_core::filter::{ListingFilter, PriceSort};
//!
//! let filter = ListingFilter {
//!     title: Some("lamp".to_string()),
//!     category_id: Some(1),
//!     subcategory_id: None,
//!     sort: PriceSort::Descending,
//! };
//! let query = filter.build();
//!
//! assert_eq!(query.params.len(), 2);
//! assert!(query.sql.ends_with("ORDER BY i.price_cents DESC"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod form;
pub mod html;
pub mod money;
pub mod reference;
pub mod types;
pub mod upload;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Value of the blank select option ("---").
pub const BLANK_CHOICE_VALUE: i64 = 0;

/// Label of the blank select option.
pub const BLANK_CHOICE_LABEL: &str = "---";

/// Maximum accepted request body (uploads included): 16 MiB.
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
