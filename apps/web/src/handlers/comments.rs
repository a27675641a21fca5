//! Comment submission.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use bazaar_core::form::{CommentForm, CommentFormInput};
use bazaar_core::Id;
use bazaar_db::DbError;
use tracing::{info, warn};

use crate::error::WebResult;
use crate::extract::{is_xhr, DbConn};
use crate::flash::redirect;
use crate::views;

/// Plain-text body of a rejected AJAX comment.
pub const COMMENT_REJECTED: &str = " Content is required.";

fn rejected(ajax: bool, item_id: Option<Id>) -> Response {
    if ajax {
        return (StatusCode::UNPROCESSABLE_ENTITY, COMMENT_REJECTED).into_response();
    }
    match item_id {
        Some(id) => redirect(&format!("/item/{id}"), None),
        None => redirect("/", None),
    }
}

/// `POST /comment/new`
///
/// A comment on an item that doesn't exist is rejected like empty content.
pub async fn create(
    mut db: DbConn,
    headers: HeaderMap,
    Form(input): Form<CommentFormInput>,
) -> WebResult<Response> {
    let ajax = input.is_ajax() || is_xhr(&headers);
    let item_id = input
        .item_id
        .as_deref()
        .and_then(|raw| raw.trim().parse::<Id>().ok());

    let comment = match CommentForm.validate(&input).finish() {
        Ok(comment) => comment,
        Err(errors) => {
            warn!(fields = errors.len(), ajax, "Comment rejected");
            return Ok(rejected(ajax, item_id));
        }
    };

    let id = match db
        .comments()
        .insert(comment.item_id, &comment.stored_content())
        .await
    {
        Ok(id) => id,
        Err(DbError::ForeignKeyViolation { .. }) => {
            warn!(item_id = comment.item_id, ajax, "Comment on missing item rejected");
            return Ok(rejected(ajax, None));
        }
        Err(e) => return Err(e.into()),
    };

    info!(id, item_id = comment.item_id, "Comment created");
    if ajax {
        Ok(Html(views::comment_fragment(&comment.content)).into_response())
    } else {
        Ok(redirect(&format!("/item/{}", comment.item_id), None))
    }
}
