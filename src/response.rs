use std::borrow::Cow;

use crate::{RelayError, Result};

/// Describes one completed HTTP exchange as produced by the transport.
///
/// Produced once per attempt and never mutated afterwards. Any status code
/// counts as a response here, including 4xx/5xx; status policy belongs to the
/// layers above the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Header name/value pairs as received.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First header value matching `name`, compared case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Server-provided backoff hint in whole seconds.
    ///
    /// `None` when the `retry-after` header is absent or does not parse as an
    /// integer (HTTP-date forms fall back to the configured default upstream).
    pub fn retry_after(&self) -> Option<u64> {
        self.header_value("retry-after")
            .and_then(|value| value.trim().parse::<u64>().ok())
    }

    /// Whether the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Deserializes the body as JSON.
    pub fn decode_json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| {
            RelayError::Decode(format!("invalid JSON body: {err}; body: {}", self.text()))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{RelayError, Response};

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = Response::new(200).with_header("X-Rate-Limit", "700");
        assert_eq!(response.header_value("x-rate-limit"), Some("700"));
        assert_eq!(response.header_value("missing"), None);
    }

    #[test]
    fn retry_after_parses_whole_seconds() {
        let response = Response::new(429).with_header("Retry-After", "3");
        assert_eq!(response.retry_after(), Some(3));

        let padded = Response::new(429).with_header("retry-after", " 12 ");
        assert_eq!(padded.retry_after(), Some(12));
    }

    #[test]
    fn retry_after_rejects_non_integer_forms() {
        assert_eq!(Response::new(429).retry_after(), None);

        let date = Response::new(429).with_header("retry-after", "Fri, 31 Dec 1999 23:59:59 GMT");
        assert_eq!(date.retry_after(), None);

        let fractional = Response::new(429).with_header("retry-after", "2.5");
        assert_eq!(fractional.retry_after(), None);

        let negative = Response::new(429).with_header("retry-after", "-1");
        assert_eq!(negative.retry_after(), None);
    }

    #[test]
    fn success_band_is_2xx() {
        assert!(Response::new(200).is_success());
        assert!(Response::new(204).is_success());
        assert!(!Response::new(199).is_success());
        assert!(!Response::new(301).is_success());
        assert!(!Response::new(429).is_success());
    }

    #[test]
    fn decode_json_surfaces_decode_error() {
        let response = Response::new(200).with_body(b"{\"count\": 2}".to_vec());
        let value: serde_json::Value = response.decode_json().expect("body must decode");
        assert_eq!(value["count"], 2);

        let broken = Response::new(200).with_body(b"not json".to_vec());
        let err = broken
            .decode_json::<serde_json::Value>()
            .expect_err("body must not decode");
        assert!(matches!(err, RelayError::Decode(_)));
    }
}
