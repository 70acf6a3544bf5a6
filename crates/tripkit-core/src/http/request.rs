//! Request descriptors
//!
//! A [`RequestDescriptor`] is the replayable description of one logical API
//! call. The pipeline turns it into a [`PreparedRequest`] (absolute URL plus
//! final headers) every time it transmits, so the same descriptor can be
//! resent after a token refresh.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Method, Url};
use serde_json::Value;

use crate::http::error::ApiError;

pub const AUTHORIZATION: &str = "authorization";
pub const CONTENT_TYPE: &str = "content-type";
pub const ACCEPT: &str = "accept";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Request body variants
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// Multipart payload used by upload endpoints.
///
/// Kept as plain data so a request can be replayed; the transport builds its
/// own wire form (and boundary) on every send.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        });
        self
    }

    /// Append every scalar member of a JSON object as a text field.
    ///
    /// Strings are sent as-is, other values as their JSON text; `null`
    /// members are skipped.
    pub fn fields_from_json(mut self, value: &Value) -> Self {
        if let Value::Object(map) = value {
            for (name, value) in map {
                let text = match value {
                    Value::Null => continue,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                self = self.text(name.clone(), text);
            }
        }
        self
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            FormField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Replayable description of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `/itineraries/42`
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Header names are stored lowercased
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
    /// Per-request timeout override
    pub timeout: Option<Duration>,
    /// Set once the request has gone through a refresh-and-retry
    pub retried: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
            timeout: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Resolve against a base URL and freeze headers for transmission.
    ///
    /// `access_token` wins over any `Authorization` header already on the
    /// descriptor. JSON bodies get the JSON content type; multipart bodies
    /// never do, since their type carries the transport's boundary.
    pub fn prepare(
        &self,
        base_url: &str,
        access_token: Option<&str>,
        default_timeout: Duration,
    ) -> Result<PreparedRequest, ApiError> {
        let url = join_url(base_url, &self.path, &self.query)?;

        let mut headers = self.headers.clone();
        headers
            .entry(ACCEPT.to_string())
            .or_insert_with(|| JSON_CONTENT_TYPE.to_string());

        match &self.body {
            RequestBody::Json(_) => {
                headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
            }
            RequestBody::Multipart(_) => {
                headers.remove(CONTENT_TYPE);
            }
            RequestBody::Empty => {}
        }

        if let Some(token) = access_token {
            headers.insert(AUTHORIZATION.to_string(), bearer(token));
        }

        Ok(PreparedRequest {
            method: self.method.clone(),
            url,
            headers,
            body: self.body.clone(),
            timeout: self.timeout.unwrap_or(default_timeout),
        })
    }
}

/// A request ready for one transport exchange
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Path component of the URL, handy for matching in logs and tests
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Join a base URL and an absolute API path.
///
/// Plain `Url::join` would drop a base path such as `/api`, so the two are
/// concatenated textually.
pub fn join_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    let mut url = Url::parse(&joined)
        .map_err(|e| ApiError::invalid_request(format!("Invalid request URL {}: {}", joined, e)))?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "https://api.tripkit.app/api";

    #[test]
    fn test_join_keeps_base_path() {
        let url = join_url(BASE, "/itineraries/7", &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.tripkit.app/api/itineraries/7");

        let url = join_url("http://localhost:5000/api/", "reviews", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/reviews");
    }

    #[test]
    fn test_query_pairs_encoded() {
        let request = RequestDescriptor::get("/guides")
            .query("language", "es pt")
            .query("page", 2);
        let prepared = request.prepare(BASE, None, Duration::from_secs(5)).unwrap();
        assert_eq!(prepared.url.query(), Some("language=es+pt&page=2"));
    }

    #[test]
    fn test_bearer_injected_when_token_present() {
        let request = RequestDescriptor::get("/profile");
        let prepared = request
            .prepare(BASE, Some("abc"), Duration::from_secs(5))
            .unwrap();
        assert_eq!(prepared.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_unauthenticated_without_token() {
        let request = RequestDescriptor::get("/guides");
        let prepared = request.prepare(BASE, None, Duration::from_secs(5)).unwrap();
        assert_eq!(prepared.header(AUTHORIZATION), None);
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestDescriptor::post("/itineraries").json(json!({ "title": "Lisbon" }));
        let prepared = request.prepare(BASE, None, Duration::from_secs(5)).unwrap();
        assert_eq!(prepared.header(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn test_multipart_never_json() {
        let form = MultipartForm::new()
            .file("file", "cover.jpg", "image/jpeg", vec![1, 2, 3])
            .text("caption", "Beach");
        let request = RequestDescriptor::post("/itineraries/1/cover")
            .header("Content-Type", JSON_CONTENT_TYPE)
            .multipart(form);
        let prepared = request.prepare(BASE, None, Duration::from_secs(5)).unwrap();
        assert_ne!(prepared.header(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn test_fields_from_json_appends_scalars() {
        let form = MultipartForm::new().fields_from_json(&json!({
            "title": "Day 1",
            "day": 1,
            "public": true,
            "notes": null
        }));
        assert_eq!(form.get_text("title"), Some("Day 1"));
        assert_eq!(form.get_text("day"), Some("1"));
        assert_eq!(form.get_text("public"), Some("true"));
        assert_eq!(form.get_text("notes"), None);
    }

    #[test]
    fn test_timeout_override() {
        let request = RequestDescriptor::get("/weather").timeout(Duration::from_secs(3));
        let prepared = request.prepare(BASE, None, Duration::from_secs(60)).unwrap();
        assert_eq!(prepared.timeout, Duration::from_secs(3));
    }
}
