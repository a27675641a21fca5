//! # Flash Notices
//!
//! One-shot messages carried across a redirect in a `flash` cookie.
//!
//! ```text
//! POST /item/new ──► 303 Location: /
//!                    Set-Cookie: flash=success%3AItem%20...; Path=/; HttpOnly
//! GET /          ──► page shows the notice
//!                    Set-Cookie: flash=; Path=/; Max-Age=0; HttpOnly
//! ```

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Cookie name.
pub const FLASH_COOKIE: &str = "flash";

/// Bootstrap-style alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(FlashCategory::Success),
            "danger" => Some(FlashCategory::Danger),
            _ => None,
        }
    }
}

/// A notice to show on the next full page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Flash {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Flash {
            category: FlashCategory::Danger,
            message: message.into(),
        }
    }

    /// `category:message`, URL-encoded.
    pub fn encode(&self) -> String {
        urlencoding::encode(&format!("{}:{}", self.category.as_str(), self.message)).into_owned()
    }

    /// Inverse of [`Flash::encode`]. Anything malformed is dropped.
    pub fn decode(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        let (category, message) = decoded.split_once(':')?;
        Some(Flash {
            category: FlashCategory::parse(category)?,
            message: message.to_string(),
        })
    }

    /// Reads the flash cookie from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, value)| *name == FLASH_COOKIE && !value.is_empty())
            .and_then(|(_, value)| Flash::decode(value))
    }

    fn set_cookie(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!(
            "{FLASH_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
            self.encode()
        ))
        .ok()
    }
}

/// `Set-Cookie` value that removes the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// 303 redirect, optionally carrying a notice.
pub fn redirect(location: &str, flash: Option<Flash>) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    let headers = response.headers_mut();

    match HeaderValue::from_str(location) {
        Ok(value) => {
            headers.insert(LOCATION, value);
        }
        Err(_) => {
            headers.insert(LOCATION, HeaderValue::from_static("/"));
        }
    }

    if let Some(cookie) = flash.as_ref().and_then(Flash::set_cookie) {
        headers.insert(SET_COOKIE, cookie);
    }
    response
}

/// The notice sent with this request, if any.
///
/// A full page that renders it should also clear the cookie.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(IncomingFlash(Flash::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let flash = Flash::success("Item Vintage Lamp has been successfully submitted");
        let encoded = flash.encode();
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains(';'));
        assert_eq!(Flash::decode(&encoded), Some(flash));
    }

    #[test]
    fn test_message_may_contain_colons() {
        let flash = Flash::danger("Note: a: b");
        assert_eq!(Flash::decode(&flash.encode()), Some(flash));
    }

    #[test]
    fn test_decode_rejects_unknown_category() {
        assert_eq!(Flash::decode("info%3Ahello"), None);
        assert_eq!(Flash::decode("no-separator"), None);
    }

    #[test]
    fn test_from_headers_picks_flash_cookie() {
        let mut headers = HeaderMap::new();
        let cookie = format!("theme=dark; flash={}", Flash::danger("This item does not exist.").encode());
        headers.insert(COOKIE, HeaderValue::from_str(&cookie).unwrap());

        let flash = Flash::from_headers(&headers).unwrap();
        assert_eq!(flash.category, FlashCategory::Danger);
        assert_eq!(flash.message, "This item does not exist.");
    }

    #[test]
    fn test_cleared_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("flash="));
        assert_eq!(Flash::from_headers(&headers), None);
    }

    #[test]
    fn test_redirect_sets_location_and_cookie() {
        let response = redirect("/item/3", Some(Flash::success("ok")));
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/item/3");
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=success%3Aok;"));
        assert!(cookie.contains("HttpOnly"));
    }
}
