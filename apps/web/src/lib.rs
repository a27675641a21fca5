//! # Bazaar Web
//!
//! The HTTP surface of the marketplace: listing with filters, item
//! create/show/edit/delete, comments, and uploaded images.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET       /                      listing + filter form (AJAX: cards)   │
//! │  GET       /category/{id}         {"subcategories": [[id, name], ...]}  │
//! │  GET,POST  /item/new              create form                           │
//! │  GET       /item/{id}             detail + comments                     │
//! │  GET,POST  /item/{id}/edit        edit form                             │
//! │  POST      /item/{id}/delete      delete, flash, redirect               │
//! │  POST      /comment/new           comment (AJAX: <li> fragment)         │
//! │  GET       /uploads/{filename}    stored image                          │
//! │                                                                         │
//! │  TraceLayer ─► RequestBodyLimit (16 MiB) ─► handler ─► DbConn (1/req)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod flash;
pub mod handlers;
pub mod storage;
pub mod views;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use bazaar_core::MAX_CONTENT_LENGTH;
use bazaar_db::Database;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{comments, items, listing, uploads};
use crate::storage::UploadStore;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub uploads: UploadStore,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, uploads: UploadStore) -> Self {
        AppState {
            db,
            uploads,
            max_body_bytes: MAX_CONTENT_LENGTH,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.max_body_bytes;

    Router::new()
        .route("/", get(listing::home))
        .route("/category/{id}", get(listing::category))
        .route("/item/new", get(items::new_form).post(items::create))
        .route("/item/{id}", get(items::show))
        .route("/item/{id}/edit", get(items::edit_form).post(items::update))
        .route("/item/{id}/delete", post(items::delete))
        .route("/comment/new", post(comments::create))
        .route("/uploads/{filename}", get(uploads::serve))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
