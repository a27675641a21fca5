//! Uploaded image serving.

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::WebResult;
use crate::AppState;

/// `GET /uploads/{filename}`
pub async fn serve(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> WebResult<Response> {
    let bytes = state.uploads.read(&filename).await?;
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok(([(CONTENT_TYPE, mime.to_string())], bytes).into_response())
}
