use std::fmt;
use std::time::Duration;

use crate::{RelayError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    /// Canonical uppercase token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes one outbound HTTP exchange.
///
/// A `Request` is a plain value with no transport state attached: cloning it
/// yields a deep copy that shares nothing with the original. The retry layer
/// relies on that to re-send a pristine descriptor after a failed or
/// rate-limited attempt instead of one the transport may already have
/// consumed.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL of the target resource.
    pub url: String,
    /// Header name/value pairs, sent in insertion order.
    pub headers: Vec<(String, String)>,
    /// Raw request body. Empty means no body is sent.
    pub body: Vec<u8>,
    /// Per-request deadline override. `None` uses the executor default.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body_len", &self.body.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::Patch, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::Head, url)
    }

    /// Appends a header. Names are sent as given; lookup is case-insensitive.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body with raw bytes.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// Sets `content-type: application/json` unless one is already present.
    pub fn with_json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = serde_json::to_vec(value).map_err(|err| {
            RelayError::InvalidRequest(format!("body serialization failed: {err}"))
        })?;
        if self.header_value("content-type").is_none() {
            self.headers
                .push(("content-type".to_owned(), "application/json".to_owned()));
        }
        Ok(self)
    }

    /// Overrides the transport deadline for this request only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::{Method, RelayError, Request};

    #[test]
    fn builder_collects_parts() {
        let request = Request::post("http://api.test/items")
            .with_header("authorization", "token abc")
            .with_body(b"payload".to_vec())
            .with_timeout(Duration::from_secs(3));

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://api.test/items");
        assert_eq!(request.header_value("Authorization"), Some("token abc"));
        assert_eq!(request.body, b"payload");
        assert_eq!(request.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn with_json_sets_content_type_once() {
        let request = Request::post("http://api.test/items")
            .with_json(&serde_json::json!({"name": "kit"}))
            .expect("body must serialize");
        assert_eq!(request.header_value("content-type"), Some("application/json"));

        let request = Request::post("http://api.test/items")
            .with_header("Content-Type", "application/json; charset=utf-8")
            .with_json(&serde_json::json!({"name": "kit"}))
            .expect("body must serialize");
        let content_types = request
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .count();
        assert_eq!(content_types, 1);
    }

    #[test]
    fn with_json_rejects_unserializable_bodies() {
        let mut pairs = HashMap::new();
        pairs.insert((1u8, 2u8), "first");

        let err = Request::post("http://api.test/items")
            .with_json(&pairs)
            .expect_err("tuple keys must not serialize as JSON object keys");

        assert!(matches!(err, RelayError::InvalidRequest(_)));
    }

    #[test]
    fn clone_is_deep_and_equal() {
        let original = Request::put("http://api.test/items/7")
            .with_header("x-request-id", "r-1")
            .with_body(b"body".to_vec());
        let mut copy = original.clone();

        assert_eq!(copy, original);

        copy.headers.push(("mutated".to_owned(), "yes".to_owned()));
        copy.body.push(b'!');
        assert_eq!(original.headers.len(), 1);
        assert_eq!(original.body, b"body");
    }

    #[test]
    fn method_tokens() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn debug_redacts_authorization_value() {
        let request = Request::get("http://api.test/items")
            .with_header("Authorization", "Basic c2VjcmV0")
            .with_header("x-request-id", "r-1");
        let debug = format!("{request:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("r-1"));
    }
}
