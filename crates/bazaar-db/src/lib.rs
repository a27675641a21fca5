//! # bazaar-db: Database Layer for Bazaar
//!
//! This crate provides database access for Bazaar. It uses SQLite with sqlx
//! for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Data Flow                                 │
//! │                                                                         │
//! │  axum handler (RequestDb extractor)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bazaar-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo       │   │ 001_schema   │  │   │
//! │  │   │ SqlitePool    │───►│ ReferenceRepo  │   │ 002_seed     │  │   │
//! │  │   │ RequestDb     │    │ CommentRepo    │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (db/bazaar.db)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool, configuration and the per-request handle
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (items, references, comments)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bazaar_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("db/bazaar.db")).await?;
//!
//! // One connection for the whole request, released on drop
//! let mut conn = db.acquire().await?;
//! let categories = conn.references().load_choices(ChoiceSource::categories(true)).await?;
//! let items = conn.items().list(&ListingQuery::unfiltered()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, RequestDb};

// Repository re-exports for convenience
pub use repository::comment::CommentRepository;
pub use repository::item::ItemRepository;
pub use repository::reference::ReferenceRepository;
