//! # HTML Views
//!
//! Server-side rendering with `format!`. Every piece of user text passes
//! through [`escape`] on its way out:
//!
//! - stored text (already escaped on write) goes through [`stored`], which
//!   unescapes and escapes again so entities are never doubled
//! - raw form input being re-displayed goes through [`escape`] directly
//!
//! Pages share [`layout`]; fragments (`items_fragment`, `comment_fragment`)
//! are returned as-is to AJAX callers.

use std::fmt::Write as _;

use bazaar_core::form::{FilterForm, FilterFormInput, FormErrors, ItemFormInput};
use bazaar_core::html::{escape, unescape};
use bazaar_core::reference::Choices;
use bazaar_core::{Comment, ItemListing};

use crate::flash::Flash;

/// Stored (escaped) text, ready for HTML.
pub fn stored(text: &str) -> String {
    escape(&unescape(text))
}

// =============================================================================
// Layout
// =============================================================================

const SUBCATEGORY_SCRIPT: &str = r#"<script>
document.addEventListener("DOMContentLoaded", function () {
  var category = document.getElementById("category");
  var subcategory = document.getElementById("subcategory");
  if (!category || !subcategory) { return; }
  category.addEventListener("change", function () {
    fetch("/category/" + category.value)
      .then(function (r) { return r.json(); })
      .then(function (data) {
        var keepBlank = subcategory.dataset.blank === "1";
        subcategory.innerHTML = keepBlank ? '<option value="0">---</option>' : "";
        data.subcategories.forEach(function (pair) {
          var option = document.createElement("option");
          option.value = pair[0];
          option.textContent = pair[1];
          subcategory.appendChild(option);
        });
      });
  });
});
</script>"#;

/// Full page shell with navigation and the pending notice.
pub fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    let notice = flash
        .map(|flash| {
            format!(
                r#"<div class="alert alert-{}" role="alert">{}</div>"#,
                flash.category.as_str(),
                escape(&flash.message)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Bazaar</title>
</head>
<body>
<nav class="navbar"><a class="navbar-brand" href="/">Bazaar</a> <a href="/item/new">Sell an item</a></nav>
<main class="container">
{notice}
{body}
</main>
{SUBCATEGORY_SCRIPT}
</body>
</html>
"#,
        title = escape(title),
    )
}

// =============================================================================
// Form Widgets
// =============================================================================

fn field_errors(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .map(|message| format!(r#"<div class="invalid-feedback">{}</div>"#, escape(message)))
        .collect()
}

fn text_input(name: &str, label: &str, value: Option<&str>, errors: &FormErrors) -> String {
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><input type="text" id="{name}" name="{name}" value="{value}">{errors}</div>"#,
        value = escape(value.unwrap_or_default()),
        errors = field_errors(errors, name),
    )
}

fn textarea(name: &str, label: &str, value: Option<&str>, errors: &FormErrors) -> String {
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><textarea id="{name}" name="{name}">{value}</textarea>{errors}</div>"#,
        value = escape(value.unwrap_or_default()),
        errors = field_errors(errors, name),
    )
}

fn select(
    name: &str,
    label: &str,
    choices: &Choices,
    selected: Option<&str>,
    errors: &FormErrors,
) -> String {
    let selected = selected.and_then(|raw| raw.trim().parse::<i64>().ok());
    let blank = if choices.contains(bazaar_core::BLANK_CHOICE_VALUE) {
        "1"
    } else {
        "0"
    };

    let mut options = String::new();
    for (value, option_label) in choices.iter() {
        let marker = if Some(*value) == selected { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{value}"{marker}>{}</option>"#,
            stored(option_label)
        );
    }

    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><select id="{name}" name="{name}" data-blank="{blank}">{options}</select>{errors}</div>"#,
        errors = field_errors(errors, name),
    )
}

// =============================================================================
// Listing
// =============================================================================

/// Filter form state for the listing page.
#[derive(Debug)]
pub struct FilterView<'a> {
    pub input: &'a FilterFormInput,
    pub errors: &'a FormErrors,
    pub categories: &'a Choices,
    pub subcategories: &'a Choices,
}

/// Error key for messages about the filter form as a whole.
pub const FILTER_FORM_ERRORS: &str = "filter";

/// `GET /` full page.
pub fn home_page(flash: Option<&Flash>, filter: &FilterView<'_>, items: &[ItemListing]) -> String {
    let form = format!(
        r#"<form id="filter" method="get" action="/">{form_errors}{title}{category}{subcategory}{price}<button type="submit">Filter</button></form>"#,
        form_errors = field_errors(filter.errors, FILTER_FORM_ERRORS),
        title = text_input("title", "Title", filter.input.title.as_deref(), filter.errors),
        category = select(
            "category",
            "Category",
            filter.categories,
            filter.input.category.as_deref(),
            filter.errors
        ),
        subcategory = select(
            "subcategory",
            "Subcategory",
            filter.subcategories,
            filter.input.subcategory.as_deref(),
            filter.errors
        ),
        price = select(
            "price",
            "Price",
            &FilterForm::price_choices(),
            filter.input.price.as_deref(),
            filter.errors
        ),
    );

    let body = format!(
        r#"<h1>Items for sale</h1>{form}<div id="items">{}</div>"#,
        items_fragment(items)
    );
    layout("Items", flash, &body)
}

/// Listing cards; also the AJAX response of `GET /`.
pub fn items_fragment(items: &[ItemListing]) -> String {
    if items.is_empty() {
        return r#"<p class="empty">No items found.</p>"#.to_string();
    }

    let mut out = String::from(r#"<div class="row">"#);
    for item in items {
        let _ = write!(
            out,
            r#"<div class="card" data-item-id="{id}"><img src="/uploads/{image}" alt="{title}"><div class="card-body"><h5><a href="/item/{id}">{title}</a></h5><p>{description}</p><p class="price">$ {price}</p><p class="category">{category} / {subcategory}</p></div></div>"#,
            id = item.id,
            image = escape(&item.image),
            title = stored(&item.title),
            description = stored(&item.description),
            price = item.price,
            category = stored(&item.category),
            subcategory = stored(&item.subcategory),
        );
    }
    out.push_str("</div>");
    out
}

// =============================================================================
// Item Detail
// =============================================================================

/// `GET /item/{id}` full page.
pub fn item_page(flash: Option<&Flash>, item: &ItemListing, comments: &[Comment]) -> String {
    let comment_list: String = comments
        .iter()
        .map(|comment| comment_item(&stored(&comment.content)))
        .collect();

    let body = format!(
        r#"<article class="item" data-item-id="{id}">
<h1>{title}</h1>
<img src="/uploads/{image}" alt="{title}">
<p>{description}</p>
<p class="price">$ {price}</p>
<p class="category">{category} / {subcategory}</p>
<a href="/item/{id}/edit">Edit</a>
<form method="post" action="/item/{id}/delete"><button type="submit">Delete</button></form>
</article>
<section class="comments">
<h2>Comments</h2>
<form id="comment" method="post" action="/comment/new">
<textarea name="content"></textarea>
<input type="hidden" name="item_id" value="{id}">
<button type="submit">Submit</button>
</form>
<ul id="comments">{comment_list}</ul>
</section>"#,
        id = item.id,
        title = stored(&item.title),
        image = escape(&item.image),
        description = stored(&item.description),
        price = item.price,
        category = stored(&item.category),
        subcategory = stored(&item.subcategory),
    );
    layout(&unescape(&item.title), flash, &body)
}

fn comment_item(html_content: &str) -> String {
    format!(r#"<li class="comment">{html_content}</li>"#)
}

/// One comment, rendered from the text the user just typed.
pub fn comment_fragment(raw_content: &str) -> String {
    comment_item(&escape(raw_content))
}

// =============================================================================
// Item Create / Edit
// =============================================================================

/// State of a create or edit form.
#[derive(Debug)]
pub struct ItemFormView<'a> {
    pub heading: &'a str,
    pub action: String,
    pub submit: &'a str,
    pub input: &'a ItemFormInput,
    pub errors: &'a FormErrors,
    pub categories: &'a Choices,
    pub subcategories: &'a Choices,
    /// Stored image shown on the edit form.
    pub current_image: Option<&'a str>,
}

/// `GET,POST /item/new` and `GET,POST /item/{id}/edit`.
pub fn item_form_page(flash: Option<&Flash>, view: &ItemFormView<'_>) -> String {
    let current = view
        .current_image
        .map(|image| format!(r#"<img class="current" src="/uploads/{0}" alt="{0}">"#, escape(image)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}" enctype="multipart/form-data">
{title}
{description}
<div class="form-group"><label for="price">Price</label><input type="text" id="price" name="price" value="{price}">{price_errors}</div>
<div class="form-group"><label for="image">Image</label>{current}<input type="file" id="image" name="image" accept=".jpg,.jpeg,.png">{image_errors}</div>
{category}
{subcategory}
<button type="submit">{submit}</button>
</form>"#,
        heading = escape(view.heading),
        action = escape(&view.action),
        title = text_input("title", "Title", view.input.title.as_deref(), view.errors),
        description = textarea(
            "description",
            "Description",
            view.input.description.as_deref(),
            view.errors
        ),
        price = escape(view.input.price.as_deref().unwrap_or_default()),
        price_errors = field_errors(view.errors, "price"),
        image_errors = field_errors(view.errors, "image"),
        category = select(
            "category",
            "Category",
            view.categories,
            view.input.category.as_deref(),
            view.errors
        ),
        subcategory = select(
            "subcategory",
            "Subcategory",
            view.subcategories,
            view.input.subcategory.as_deref(),
            view.errors
        ),
        submit = escape(view.submit),
    );
    layout(view.heading, flash, &body)
}
