//! # Route Handlers
//!
//! One module per route group. Handlers are thin: they take a [`DbConn`],
//! run the forms from `bazaar_core::form`, call the repositories and pick a
//! response (page, fragment, JSON or redirect).
//!
//! [`DbConn`]: crate::extract::DbConn

pub mod comments;
pub mod items;
pub mod listing;
pub mod uploads;

use axum::http::header::SET_COOKIE;
use axum::response::{Html, IntoResponse, Response};

use crate::flash::{self, Flash};

/// A full HTML page. Clears the flash cookie when a notice was rendered.
pub(crate) fn page(flash: Option<&Flash>, html: String) -> Response {
    let mut response = Html(html).into_response();
    if flash.is_some() {
        response
            .headers_mut()
            .insert(SET_COOKIE, flash::clear_cookie());
    }
    response
}
