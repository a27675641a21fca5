//! # Item Handlers
//!
//! Create, show, edit and delete.
//!
//! ```text
//! POST /item/new
//!   multipart ──► ItemFormInput + UploadedFile
//!             ──► ItemForm(Create).validate ──► validate_submission (COUNT)
//!             ├── errors ──► re-render form (200), nothing written
//!             └── valid  ──► save upload ──► INSERT ──► 303 / + flash
//! ```
//!
//! The upload is only written once the whole form has validated, so a
//! rejected submission leaves neither a row nor a file behind.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use bazaar_core::form::{FormErrors, ItemForm, ItemFormInput, ItemProfile};
use bazaar_core::html::unescape;
use bazaar_core::reference::{ChoiceSource, Choices};
use bazaar_core::{Id, Item};
use bazaar_db::{DbError, RequestDb};
use tracing::{debug, info, warn};

use crate::error::{WebError, WebResult};
use crate::extract::DbConn;
use crate::flash::{redirect, Flash, IncomingFlash};
use crate::handlers::page;
use crate::storage::UploadedFile;
use crate::views::{self, ItemFormView};
use crate::AppState;

// =============================================================================
// Form Plumbing
// =============================================================================

/// Strict choices (no blank option) for both selects.
async fn item_choices(db: &mut RequestDb) -> WebResult<(Choices, Choices)> {
    let categories = db
        .references()
        .load_choices(ChoiceSource::categories(false))
        .await?;
    let subcategories = db
        .references()
        .load_choices(ChoiceSource::subcategories(false))
        .await?;
    Ok((categories, subcategories))
}

fn multipart_error(err: MultipartError) -> WebError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        WebError::PayloadTooLarge
    } else {
        WebError::BadRequest(err.body_text())
    }
}

/// Splits a multipart item form into its text fields and the image.
///
/// A file part with an empty filename means no file was chosen.
async fn read_item_form(
    mut multipart: Multipart,
) -> WebResult<(ItemFormInput, Option<UploadedFile>)> {
    let mut input = ItemFormInput::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if !filename.is_empty() {
                image = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "title" => input.title = Some(value),
            "description" => input.description = Some(value),
            "price" => input.price = Some(value),
            "category" => input.category = Some(value),
            "subcategory" => input.subcategory = Some(value),
            other => debug!(field = other, "Ignoring unknown form field"),
        }
    }

    input.image_filename = image.as_ref().map(|file| file.filename.clone());
    Ok((input, image))
}

/// Form values of a stored item, unescaped for editing.
fn prefill(item: &Item) -> ItemFormInput {
    ItemFormInput {
        title: Some(unescape(&item.title)),
        description: Some(unescape(&item.description)),
        price: Some(item.price.to_string()),
        category: Some(item.category_id.to_string()),
        subcategory: Some(item.subcategory_id.to_string()),
        image_filename: None,
    }
}

struct FormPage<'a> {
    flash: Option<&'a Flash>,
    input: &'a ItemFormInput,
    errors: &'a FormErrors,
    categories: &'a Choices,
    subcategories: &'a Choices,
}

fn new_item_page(form: FormPage<'_>) -> Response {
    let view = ItemFormView {
        heading: "Sell an item",
        action: "/item/new".to_string(),
        submit: "Submit",
        input: form.input,
        errors: form.errors,
        categories: form.categories,
        subcategories: form.subcategories,
        current_image: None,
    };
    page(form.flash, views::item_form_page(form.flash, &view))
}

fn edit_item_page(item: &Item, form: FormPage<'_>) -> Response {
    let view = ItemFormView {
        heading: "Edit item",
        action: format!("/item/{}/edit", item.id),
        submit: "Update",
        input: form.input,
        errors: form.errors,
        categories: form.categories,
        subcategories: form.subcategories,
        current_image: Some(&item.image),
    };
    page(form.flash, views::item_form_page(form.flash, &view))
}

// =============================================================================
// Create
// =============================================================================

/// `GET /item/new`
pub async fn new_form(
    mut db: DbConn,
    IncomingFlash(flash): IncomingFlash,
) -> WebResult<Response> {
    let (categories, subcategories) = item_choices(&mut db).await?;

    Ok(new_item_page(FormPage {
        flash: flash.as_ref(),
        input: &ItemFormInput::default(),
        errors: &FormErrors::new(),
        categories: &categories,
        subcategories: &subcategories,
    }))
}

/// `POST /item/new`
pub async fn create(
    State(state): State<AppState>,
    mut db: DbConn,
    multipart: Multipart,
) -> WebResult<Response> {
    let (input, upload) = read_item_form(multipart).await?;
    let (categories, subcategories) = item_choices(&mut db).await?;

    let mut submission =
        ItemForm::new(ItemProfile::Create).validate(&input, &categories, &subcategories);
    db.references().validate_submission(&mut submission).await?;

    let (item, upload) = match (submission.finish(), upload) {
        (Ok(item), Some(upload)) => (item, upload),
        (Ok(_), None) => return Err(WebError::BadRequest("image part missing".to_string())),
        (Err(errors), _) => {
            warn!(fields = errors.len(), "Item submission rejected");
            return Ok(new_item_page(FormPage {
                flash: None,
                input: &input,
                errors: &errors,
                categories: &categories,
                subcategories: &subcategories,
            }));
        }
    };

    let image = state.uploads.save(&upload).await?;
    let title = item.title.clone();
    let id = db.items().insert(&item.into_draft(image)).await?;

    info!(id, "Item created");
    Ok(redirect(
        "/",
        Some(Flash::success(format!(
            "Item {title} has been successfully submitted"
        ))),
    ))
}

// =============================================================================
// Show
// =============================================================================

/// `GET /item/{id}`; a missing item goes back to the listing.
pub async fn show(
    mut db: DbConn,
    IncomingFlash(flash): IncomingFlash,
    Path(id): Path<Id>,
) -> WebResult<Response> {
    let Some(item) = db.items().get_listing(id).await? else {
        debug!(id, "Item not found, redirecting to listing");
        return Ok(redirect("/", None));
    };
    let comments = db.comments().list_for_item(id).await?;

    Ok(page(
        flash.as_ref(),
        views::item_page(flash.as_ref(), &item, &comments),
    ))
}

// =============================================================================
// Edit
// =============================================================================

/// `GET /item/{id}/edit`
pub async fn edit_form(
    mut db: DbConn,
    IncomingFlash(flash): IncomingFlash,
    Path(id): Path<Id>,
) -> WebResult<Response> {
    let Some(item) = db.items().get(id).await? else {
        debug!(id, "Item not found, redirecting to listing");
        return Ok(redirect("/", None));
    };
    let (categories, subcategories) = item_choices(&mut db).await?;

    Ok(edit_item_page(
        &item,
        FormPage {
            flash: flash.as_ref(),
            input: &prefill(&item),
            errors: &FormErrors::new(),
            categories: &categories,
            subcategories: &subcategories,
        },
    ))
}

/// `POST /item/{id}/edit`
///
/// Without a new upload the stored image is kept. A replaced image file is
/// left on disk.
pub async fn update(
    State(state): State<AppState>,
    mut db: DbConn,
    Path(id): Path<Id>,
    multipart: Multipart,
) -> WebResult<Response> {
    let Some(existing) = db.items().get(id).await? else {
        debug!(id, "Item not found, redirecting to listing");
        return Ok(redirect("/", None));
    };

    let (input, upload) = read_item_form(multipart).await?;
    let (categories, subcategories) = item_choices(&mut db).await?;

    let mut submission =
        ItemForm::new(ItemProfile::Edit).validate(&input, &categories, &subcategories);
    db.references().validate_submission(&mut submission).await?;

    let item = match submission.finish() {
        Ok(item) => item,
        Err(errors) => {
            warn!(id, fields = errors.len(), "Item update rejected");
            return Ok(edit_item_page(
                &existing,
                FormPage {
                    flash: None,
                    input: &input,
                    errors: &errors,
                    categories: &categories,
                    subcategories: &subcategories,
                },
            ));
        }
    };

    let image = match upload {
        Some(upload) => state.uploads.save(&upload).await?,
        None => existing.image.clone(),
    };
    let title = item.title.clone();

    match db.items().update(id, &item.into_draft(image)).await {
        Ok(()) => {}
        Err(DbError::NotFound { .. }) => {
            debug!(id, "Item vanished before update, redirecting to listing");
            return Ok(redirect("/", None));
        }
        Err(e) => return Err(e.into()),
    }

    info!(id, "Item updated");
    Ok(redirect(
        &format!("/item/{id}"),
        Some(Flash::success(format!(
            "Item {title} has been successfully updated."
        ))),
    ))
}

// =============================================================================
// Delete
// =============================================================================

fn missing_item() -> Response {
    redirect("/", Some(Flash::danger("This item does not exist.")))
}

/// `POST /item/{id}/delete`; always ends on the listing.
pub async fn delete(mut db: DbConn, Path(id): Path<Id>) -> WebResult<Response> {
    let Some(item) = db.items().get(id).await? else {
        return Ok(missing_item());
    };

    match db.items().delete(id).await {
        Ok(()) => {}
        Err(DbError::NotFound { .. }) => return Ok(missing_item()),
        Err(e) => return Err(e.into()),
    }

    info!(id, "Item deleted");
    Ok(redirect(
        "/",
        Some(Flash::success(format!(
            "Item {} has been successfully deleted.",
            unescape(&item.title)
        ))),
    ))
}
