//! Listing and subcategory lookup.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use bazaar_core::filter::ListingQuery;
use bazaar_core::form::{FilterForm, FilterFormInput, FormErrors};
use bazaar_core::reference::ChoiceSource;
use bazaar_core::Id;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::WebResult;
use crate::extract::{wants_fragment, DbConn};
use crate::flash::IncomingFlash;
use crate::handlers::page;
use crate::views::{self, FilterView};

/// The `ajax` query parameter, read alongside the filter fields.
#[derive(Debug, Default, Deserialize)]
pub struct AjaxParam {
    pub ajax: Option<String>,
}

/// Form-level message for a query string that does not fit the filter
/// fields at all (e.g. `?category=1&category=2`).
pub const FILTER_UNREADABLE: &str = "The filter could not be read.";

/// `GET /`
///
/// An invalid filter is not an error: its messages are shown on the form and
/// the unfiltered listing is returned. The same holds for a query string that
/// cannot be decoded.
pub async fn home(
    mut db: DbConn,
    IncomingFlash(flash): IncomingFlash,
    headers: HeaderMap,
    ajax: Result<Query<AjaxParam>, QueryRejection>,
    input: Result<Query<FilterFormInput>, QueryRejection>,
) -> WebResult<Response> {
    let ajax = ajax.map(|Query(ajax)| ajax).unwrap_or_default();
    let categories = db
        .references()
        .load_choices(ChoiceSource::categories(true))
        .await?;
    let subcategories = db
        .references()
        .load_choices(ChoiceSource::subcategories(true))
        .await?;

    let (input, query, errors) = match input {
        Ok(Query(input)) => {
            let mut submission = FilterForm.validate(&input, &categories, &subcategories);
            db.references().validate_submission(&mut submission).await?;

            match submission.finish() {
                Ok(filter) => {
                    debug!(predicates = filter.predicate_count(), sort = ?filter.sort, "Listing filter");
                    (input, filter.build(), FormErrors::new())
                }
                Err(errors) => {
                    warn!(fields = errors.len(), "Listing filter rejected, showing all items");
                    (input, ListingQuery::unfiltered(), errors)
                }
            }
        }
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable listing query, showing all items");
            let mut errors = FormErrors::new();
            errors.add(views::FILTER_FORM_ERRORS, FILTER_UNREADABLE);
            (FilterFormInput::default(), ListingQuery::unfiltered(), errors)
        }
    };

    let items = db.items().list(&query).await?;

    if wants_fragment(ajax.ajax.as_deref(), &headers) {
        return Ok(Html(views::items_fragment(&items)).into_response());
    }

    let filter = FilterView {
        input: &input,
        errors: &errors,
        categories: &categories,
        subcategories: &subcategories,
    };
    Ok(page(
        flash.as_ref(),
        views::home_page(flash.as_ref(), &filter, &items),
    ))
}

/// Body of `GET /category/{id}`.
#[derive(Debug, Serialize)]
pub struct SubcategoryList {
    pub subcategories: Vec<(Id, String)>,
}

/// `GET /category/{id}`
///
/// An unknown category answers with an empty list.
pub async fn category(mut db: DbConn, Path(id): Path<Id>) -> WebResult<Json<SubcategoryList>> {
    let subcategories = db.references().subcategories_of(id).await?;
    Ok(Json(SubcategoryList { subcategories }))
}
