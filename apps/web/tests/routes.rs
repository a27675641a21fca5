//! Router tests: requests go through the full axum stack against an
//! in-memory database and a temporary uploads directory.

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bazaar_core::{Id, ItemDraft, Money};
use bazaar_db::{Database, DbConfig};
use bazaar_web::flash::{Flash, FlashCategory};
use bazaar_web::storage::UploadStore;
use bazaar_web::{router, AppState};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// =============================================================================
// Harness
// =============================================================================

struct TestApp {
    router: Router,
    state: AppState,
    dir: TempDir,
}

async fn app() -> TestApp {
    app_with_limit(bazaar_core::MAX_CONTENT_LENGTH).await
}

async fn app_with_limit(max_body_bytes: usize) -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let uploads = UploadStore::new(dir.path().join("uploads"));
    uploads.ensure_dir().await.unwrap();

    let state = AppState::new(db, uploads).with_max_body_bytes(max_body_bytes);
    TestApp {
        router: router(state.clone()),
        state,
        dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn insert(&self, title: &str, cents: i64) -> Id {
        let mut db = self.state.db.acquire().await.unwrap();
        db.items()
            .insert(&ItemDraft {
                title: title.to_string(),
                description: "Seeded for a test".to_string(),
                price: Money::from_cents(cents),
                image: "ab12_20240101T120000_lamp.png".to_string(),
                category_id: 1,
                subcategory_id: 2,
            })
            .await
            .unwrap()
    }

    async fn item_count(&self) -> i64 {
        let mut db = self.state.db.acquire().await.unwrap();
        db.items().count().await.unwrap()
    }

    fn stored_uploads(&self) -> Vec<String> {
        std::fs::read_dir(self.state.uploads.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn flash_of(response: &Response) -> Option<Flash> {
    let cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let value = cookie.strip_prefix("flash=")?.split(';').next()?;
    Flash::decode(value)
}

const BOUNDARY: &str = "bazaar-test-boundary";

/// Builds a multipart body. `file` is `(filename, bytes)` for the image part.
fn multipart(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_post(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::post(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn lamp_fields<'a>(category: &'a str, subcategory: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("title", "Vintage Lamp"),
        ("description", "A nice old lamp for sale"),
        ("price", "12.50"),
        ("category", category),
        ("subcategory", subcategory),
    ]
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_item_redirects_with_flash() {
    let app = app().await;

    let body = multipart(&lamp_fields("1", "2"), Some(("lamp.png", b"\x89PNG".as_slice())));
    let response = app.send(multipart_post("/item/new", body)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    let flash = flash_of(&response).unwrap();
    assert_eq!(flash.category, FlashCategory::Success);
    assert_eq!(
        flash.message,
        "Item Vintage Lamp has been successfully submitted"
    );

    assert_eq!(app.item_count().await, 1);
    let stored = app.stored_uploads();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].ends_with("_lamp.png"));

    let mut db = app.state.db.acquire().await.unwrap();
    let item = db.items().get(1).await.unwrap().unwrap();
    assert_eq!(item.price, Money::from_cents(1250));
    assert_eq!(item.image, stored[0]);
}

#[tokio::test]
async fn test_create_with_non_ascii_filename_keeps_extension() {
    let app = app().await;

    let body = multipart(&lamp_fields("1", "2"), Some(("日本.png", b"\x89PNG".as_slice())));
    let response = app.send(multipart_post("/item/new", body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = app.stored_uploads();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].ends_with("_.png"), "{}", stored[0]);

    let response = app.get(&format!("/uploads/{}", stored[0])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
}

#[tokio::test]
async fn test_create_rejects_foreign_subcategory() {
    let app = app().await;

    let body = multipart(&lamp_fields("1", "5"), Some(("lamp.png", b"\x89PNG".as_slice())));
    let response = app.send(multipart_post("/item/new", body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Subcategory does not belong to that category."));
    assert!(html.contains(r#"value="Vintage Lamp""#));

    assert_eq!(app.item_count().await, 0);
    assert!(app.stored_uploads().is_empty());
}

#[tokio::test]
async fn test_create_rejects_short_title_and_missing_image() {
    let app = app().await;

    let mut fields = lamp_fields("1", "2");
    fields[0] = ("title", "Lamp");
    let response = app
        .send(multipart_post("/item/new", multipart(&fields, Some(("", b"".as_slice())))))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Input must be between 5 and 20 characters long"));
    assert!(html.contains("This field is required."));
    assert_eq!(app.item_count().await, 0);
}

#[tokio::test]
async fn test_create_rejects_non_image_upload() {
    let app = app().await;

    let body = multipart(&lamp_fields("1", "2"), Some(("lamp.exe", b"MZ".as_slice())));
    let response = app.send(multipart_post("/item/new", body)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Images only!"));
    assert!(app.stored_uploads().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = app_with_limit(1024).await;

    let big = vec![b'x'; 4096];
    let body = multipart(&lamp_fields("1", "2"), Some(("lamp.png", big.as_slice())));
    let response = app.send(multipart_post("/item/new", body)).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.item_count().await, 0);
}

#[tokio::test]
async fn test_new_form_lists_strict_choices() {
    let app = app().await;

    let html = body_text(app.get("/item/new").await).await;
    assert!(html.contains(r#"<option value="3">Books</option>"#));
    assert!(!html.contains(r#"<option value="0">---</option>"#));
}

// =============================================================================
// Show / Edit / Delete
// =============================================================================

#[tokio::test]
async fn test_show_missing_item_redirects_to_listing() {
    let app = app().await;

    let response = app.get("/item/42").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    assert!(flash_of(&response).is_none());
}

#[tokio::test]
async fn test_show_item_with_comments() {
    let app = app().await;
    let id = app.insert("Tom &amp; Jerry", 300).await;

    let html = body_text(app.get(&format!("/item/{id}")).await).await;
    assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
    assert!(html.contains(&format!(r#"<input type="hidden" name="item_id" value="{id}">"#)));
    assert!(html.contains(&format!(r#"action="/item/{id}/delete""#)));
    assert!(html.contains("Food / Dairy"));
}

#[tokio::test]
async fn test_edit_form_prefills_values() {
    let app = app().await;
    let id = app.insert("Tom &amp; Jerry", 300).await;

    let html = body_text(app.get(&format!("/item/{id}/edit")).await).await;
    assert!(html.contains(r#"value="Tom &amp; Jerry""#));
    assert!(html.contains(r#"value="3.00""#));
    assert!(html.contains(r#"<option value="2" selected>Dairy</option>"#));
}

#[tokio::test]
async fn test_edit_resubmitting_prefilled_values_changes_nothing() {
    let app = app().await;
    let id = app.insert("Tom &amp; Jerry", 300).await;
    let before = {
        let mut db = app.state.db.acquire().await.unwrap();
        db.items().get(id).await.unwrap().unwrap()
    };

    let html = body_text(app.get(&format!("/item/{id}/edit")).await).await;
    assert!(html.contains(r#"value="Tom &amp; Jerry""#));
    assert!(html.contains(r#"value="3.00""#));

    // What a browser sends back after unescaping the attribute values.
    let fields = vec![
        ("title", "Tom & Jerry"),
        ("description", "Seeded for a test"),
        ("price", "3.00"),
        ("category", "1"),
        ("subcategory", "2"),
    ];
    let response = app
        .send(multipart_post(
            &format!("/item/{id}/edit"),
            multipart(&fields, Some(("", b"".as_slice()))),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/item/{id}").as_str());

    let mut db = app.state.db.acquire().await.unwrap();
    let after = db.items().get(id).await.unwrap().unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_edit_without_new_image_keeps_stored_one() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let fields = vec![
        ("title", "Brass Lamp"),
        ("description", "A nice old lamp for sale"),
        ("price", "15"),
        ("category", "2"),
        ("subcategory", "4"),
    ];
    let response = app
        .send(multipart_post(
            &format!("/item/{id}/edit"),
            multipart(&fields, Some(("", b"".as_slice()))),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/item/{id}").as_str());
    assert_eq!(
        flash_of(&response).unwrap().message,
        "Item Brass Lamp has been successfully updated."
    );

    let mut db = app.state.db.acquire().await.unwrap();
    let item = db.items().get(id).await.unwrap().unwrap();
    assert_eq!(item.title, "Brass Lamp");
    assert_eq!(item.price, Money::from_cents(1500));
    assert_eq!(item.category_id, 2);
    assert_eq!(item.subcategory_id, 4);
    assert_eq!(item.image, "ab12_20240101T120000_lamp.png");
}

#[tokio::test]
async fn test_edit_rejects_foreign_subcategory() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let mut fields = lamp_fields("2", "1");
    fields[0] = ("title", "Renamed Lamp");
    let response = app
        .send(multipart_post(
            &format!("/item/{id}/edit"),
            multipart(&fields, None),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Subcategory does not belong to that category."));

    let mut db = app.state.db.acquire().await.unwrap();
    assert_eq!(db.items().get(id).await.unwrap().unwrap().title, "Vintage Lamp");
}

#[tokio::test]
async fn test_delete_missing_item_flashes_danger() {
    let app = app().await;

    let response = app
        .send(Request::post("/item/999/delete").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    assert_eq!(
        flash_of(&response),
        Some(Flash::danger("This item does not exist."))
    );
}

#[tokio::test]
async fn test_delete_existing_item() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let response = app
        .send(
            Request::post(format!("/item/{id}/delete"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        flash_of(&response),
        Some(Flash::success("Item Vintage Lamp has been successfully deleted."))
    );
    assert_eq!(app.item_count().await, 0);
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_order_and_fragment() {
    let app = app().await;
    app.insert("First lamp", 500).await;
    app.insert("Second lamp", 100).await;

    let html = body_text(app.get("/?ajax=1").await).await;
    assert!(!html.contains("<!DOCTYPE html>"));
    let first = html.find("First lamp").unwrap();
    let second = html.find("Second lamp").unwrap();
    assert!(second < first, "newest item comes first");

    let html = body_text(app.get("/?price=1&ajax=1").await).await;
    assert!(html.find("First lamp").unwrap() < html.find("Second lamp").unwrap());

    let html = body_text(app.get("/?price=2&ajax=1").await).await;
    assert!(html.find("Second lamp").unwrap() < html.find("First lamp").unwrap());
}

#[tokio::test]
async fn test_listing_fragment_via_header() {
    let app = app().await;
    app.insert("First lamp", 500).await;

    let response = app
        .send(
            Request::get("/")
                .header("X-Requested-With", "XMLHttpRequest")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    let html = body_text(response).await;
    assert!(!html.contains("<!DOCTYPE html>"));
    assert!(html.contains("First lamp"));
}

#[tokio::test]
async fn test_listing_title_filter() {
    let app = app().await;
    app.insert("First lamp", 500).await;
    app.insert("Second lamp", 100).await;

    let html = body_text(app.get("/?title=Second&ajax=1").await).await;
    assert!(html.contains("Second lamp"));
    assert!(!html.contains("First lamp"));
}

#[tokio::test]
async fn test_invalid_filter_shows_errors_and_all_items() {
    let app = app().await;
    app.insert("First lamp", 500).await;

    let response = app.get("/?category=42&title=lamp").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("The chosen option does not exist."));
    assert!(html.contains("First lamp"));
}

#[tokio::test]
async fn test_repeated_filter_key_shows_all_items() {
    let app = app().await;
    app.insert("First lamp", 500).await;
    app.insert("Second lamp", 100).await;

    let response = app.get("/?category=1&category=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("The filter could not be read."));
    assert!(html.contains("First lamp"));
    assert!(html.contains("Second lamp"));

    let response = app.get("/?ajax=1&ajax=1&title=Second").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Second lamp"));
    assert!(!html.contains("First lamp"));
}

#[tokio::test]
async fn test_listing_choices_include_blank() {
    let app = app().await;

    let html = body_text(app.get("/").await).await;
    assert!(html.contains(r#"<option value="0">---</option>"#));
    assert!(html.contains(r#"<option value="2">Min to Max</option>"#));
}

#[tokio::test]
async fn test_category_subcategories_json() {
    let app = app().await;

    let response = app.get("/category/3").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"subcategories": [[5, "Fiction"], [6, "Non-fiction"]]})
    );

    let json: serde_json::Value =
        serde_json::from_str(&body_text(app.get("/category/99").await).await).unwrap();
    assert_eq!(json, serde_json::json!({"subcategories": []}));
}

// =============================================================================
// Flash
// =============================================================================

#[tokio::test]
async fn test_flash_rendered_once_then_cleared() {
    let app = app().await;
    let flash = Flash::success("Item Vintage Lamp has been successfully submitted");

    let response = app
        .send(
            Request::get("/")
                .header(COOKIE, format!("flash={}", flash.encode()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    let cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.contains("Max-Age=0"));
    let html = body_text(response).await;
    assert!(html.contains(r#"<div class="alert alert-success" role="alert">Item Vintage Lamp has been successfully submitted</div>"#));

    let response = app.get("/").await;
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(!body_text(response).await.contains("alert-success"));
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn test_ajax_comment_returns_fragment() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let response = app
        .send(form_post(
            "/comment/new",
            &format!("content=%3Cb%3EStill+here%3F%3C%2Fb%3E&item_id={id}&ajax=1"),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        r#"<li class="comment">&lt;b&gt;Still here?&lt;/b&gt;</li>"#
    );

    let mut db = app.state.db.acquire().await.unwrap();
    let comments = db.comments().list_for_item(id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "&lt;b&gt;Still here?&lt;/b&gt;");
}

#[tokio::test]
async fn test_comment_redirects_without_ajax() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let response = app
        .send(form_post("/comment/new", &format!("content=Nice&item_id={id}")))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/item/{id}").as_str());
}

#[tokio::test]
async fn test_invalid_ajax_comment() {
    let app = app().await;
    let id = app.insert("Vintage Lamp", 1250).await;

    let response = app
        .send(form_post("/comment/new", &format!("content=&item_id={id}&ajax=1")))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, " Content is required.");

    let response = app
        .send(form_post("/comment/new", "content=Hello&item_id=999&ajax=1"))
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .send(form_post("/comment/new", &format!("content=&item_id={id}")))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], format!("/item/{id}").as_str());
}

// =============================================================================
// Uploads
// =============================================================================

#[tokio::test]
async fn test_serves_stored_upload() {
    let app = app().await;
    let name = "ab12_20240101T120000_lamp.png";
    std::fs::write(app.state.uploads.dir().join(name), b"\x89PNG").unwrap();

    let response = app.get(&format!("/uploads/{name}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"\x89PNG");
}

#[tokio::test]
async fn test_upload_content_type_follows_extension() {
    let app = app().await;
    for name in ["ab12_20240101T120000_lamp.JPG", "ab12_20240101T120000_notes.zzz"] {
        std::fs::write(app.state.uploads.dir().join(name), b"bytes").unwrap();
    }

    let response = app.get("/uploads/ab12_20240101T120000_lamp.JPG").await;
    assert_eq!(response.headers()[CONTENT_TYPE], "image/jpeg");

    let response = app.get("/uploads/ab12_20240101T120000_notes.zzz").await;
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
}

#[tokio::test]
async fn test_upload_path_traversal_is_not_found() {
    let app = app().await;
    std::fs::write(app.dir.path().join("secret.txt"), b"nope").unwrap();

    let response = app.get("/uploads/..%2Fsecret.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/uploads/missing.png").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
