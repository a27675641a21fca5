//! Request extractors.

use std::ops::{Deref, DerefMut};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use bazaar_db::RequestDb;

use crate::error::WebError;
use crate::AppState;

/// The request's database connection.
///
/// Acquired from the pool when the handler starts and returned when the
/// handler's future completes or is dropped, whichever path it takes.
#[derive(Debug)]
pub struct DbConn(pub RequestDb);

impl FromRequestParts<AppState> for DbConn {
    type Rejection = WebError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(DbConn(state.db.acquire().await?))
    }
}

impl Deref for DbConn {
    type Target = RequestDb;

    fn deref(&self) -> &RequestDb {
        &self.0
    }
}

impl DerefMut for DbConn {
    fn deref_mut(&mut self) -> &mut RequestDb {
        &mut self.0
    }
}

const X_REQUESTED_WITH: &str = "x-requested-with";

/// Whether the client asked for a fragment via `X-Requested-With`.
pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get(X_REQUESTED_WITH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// Whether a listing request wants the fragment: a non-zero integer `ajax`
/// parameter or the `X-Requested-With` header.
pub fn wants_fragment(ajax: Option<&str>, headers: &HeaderMap) -> bool {
    let flagged = ajax
        .and_then(|flag| flag.trim().parse::<i64>().ok())
        .is_some_and(|flag| flag != 0);
    flagged || is_xhr(headers)
}
