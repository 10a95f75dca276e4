//! Request parameter extraction.
//!
//! The mobile client sends ids and form fields either in the query string,
//! as a JSON body or as an urlencoded form, so handlers read them through
//! [`Params`] instead of a fixed extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::sync::Arc;
use url::form_urlencoded;

use super::{ApiError, AppState};
use crate::services::FieldErrors;
use crate::services::validation::not_integer;

/// Query string merged with the request body. Body fields win.
#[derive(Debug, Default)]
pub struct Params(pub Map<String, Value>);

impl<S: Send + Sync> FromRequest<S> for Params {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut map = Map::new();
        if let Some(query) = req.uri().query() {
            merge_pairs(&mut map, query.as_bytes());
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(map));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            merge_pairs(&mut map, &body);
        } else {
            match serde_json::from_slice::<Value>(&body) {
                Ok(Value::Object(fields)) => map.extend(fields),
                Ok(_) => {
                    return Err(ApiError::BadRequest(
                        "Request body must be a JSON object".to_string(),
                    ));
                }
                Err(e) => {
                    return Err(ApiError::BadRequest(format!("Malformed JSON body: {e}")));
                }
            }
        }

        Ok(Self(map))
    }
}

fn merge_pairs(map: &mut Map<String, Value>, input: &[u8]) {
    for (key, value) in form_urlencoded::parse(input) {
        map.insert(key.into_owned(), Value::String(value.into_owned()));
    }
}

impl Params {
    /// String form of a scalar field. Null and missing are `None`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// First of `keys` that carries a value.
    #[must_use]
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Lenient id lookup: anything that is not a positive integer counts as
    /// absent.
    #[must_use]
    pub fn id(&self, key: &str) -> Option<i32> {
        self.integer(key).ok().flatten().filter(|id| *id > 0)
    }

    /// Strict integer lookup. Blank values are `None`; anything else that
    /// does not parse is a 422 on that field.
    pub fn integer(&self, key: &str) -> Result<Option<i32>, ApiError> {
        let parsed = match self.0.get(key) {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
            Some(Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        };

        parsed.map(Some).ok_or_else(|| {
            let mut errors = FieldErrors::new();
            not_integer(&mut errors, key);
            errors.into()
        })
    }

    /// 1-based page number, defaulting to the first page.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.text("page")
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

/// `scheme://host` that absolute image URLs are built on.
#[derive(Debug, Clone)]
pub struct BaseUrl(pub String);

impl FromRequestParts<Arc<AppState>> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(base) = &state.config().server.public_base_url {
            return Ok(Self(base.trim_end_matches('/').to_string()));
        }
        Ok(Self(base_from_headers(&parts.headers)))
    }
}

fn base_from_headers(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map_or("http", str::trim);

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");

    format!("{scheme}://{host}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => Params(map),
            _ => Params::default(),
        }
    }

    #[tokio::test]
    async fn test_params_merge_query_and_json_body() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/moviesDetail?id=4&page=2")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id": 7}"#))
            .unwrap();

        let params = Params::from_request(req, &()).await.unwrap();
        assert_eq!(params.id("id"), Some(7));
        assert_eq!(params.page(), 2);
    }

    #[tokio::test]
    async fn test_params_read_form_body() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=ann+lee&password=p%26ss"))
            .unwrap();

        let params = Params::from_request(req, &()).await.unwrap();
        assert_eq!(params.text("username").as_deref(), Some("ann lee"));
        assert_eq!(params.text("password").as_deref(), Some("p&ss"));
    }

    #[tokio::test]
    async fn test_params_reject_malformed_json() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/view")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"id\": "))
            .unwrap();

        let err = Params::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_integer_parsing() {
        let p = params(json!({"a": "12", "b": 5, "c": "abc", "d": "", "e": null}));

        assert_eq!(p.integer("a").unwrap(), Some(12));
        assert_eq!(p.integer("b").unwrap(), Some(5));
        assert!(matches!(
            p.integer("c"),
            Err(ApiError::Validation { ref errors, .. })
                if errors.get("c").is_some()
        ));
        assert_eq!(p.integer("d").unwrap(), None);
        assert_eq!(p.integer("e").unwrap(), None);
        assert_eq!(p.integer("missing").unwrap(), None);
    }

    #[test]
    fn test_id_is_lenient() {
        let p = params(json!({"id": "abc", "zero": 0, "ok": "3"}));
        assert_eq!(p.id("id"), None);
        assert_eq!(p.id("zero"), None);
        assert_eq!(p.id("ok"), Some(3));
    }

    #[test]
    fn test_page_defaults_to_first() {
        assert_eq!(params(json!({})).page(), 1);
        assert_eq!(params(json!({"page": "0"})).page(), 1);
        assert_eq!(params(json!({"page": "x"})).page(), 1);
        assert_eq!(params(json!({"page": 3})).page(), 3);
    }

    #[test]
    fn test_base_url_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "api.example.com".parse().unwrap());
        assert_eq!(base_from_headers(&headers), "http://api.example.com");

        headers.insert("x-forwarded-proto", "https, http".parse().unwrap());
        assert_eq!(base_from_headers(&headers), "https://api.example.com");

        assert_eq!(base_from_headers(&HeaderMap::new()), "http://localhost");
    }
}
