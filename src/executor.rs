use std::time::Duration;

use async_trait::async_trait;

use crate::{Method, RelayError, Request, Response, Result};

/// Performs one HTTP round trip.
///
/// Implementations return whatever response the server produced, including
/// 4xx/5xx; status-code policy belongs to the handlers above. Failures are
/// limited to the transport itself: a deadline overrun surfaces as
/// [`RelayError::Timeout`], any other connectivity failure as
/// [`RelayError::Transport`].
#[async_trait]
pub trait RequestExecutor: Send + Sync + 'static {
    /// Executes the descriptor exactly once.
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// [`RequestExecutor`] backed by a shared [`reqwest::Client`].
///
/// Cloning is cheap and reuses the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestExecutor {
    http: reqwest::Client,
    default_timeout: Duration,
}

impl ReqwestExecutor {
    /// Creates an executor with its own connection pool and a 10 s deadline
    /// per attempt.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps an existing client, keeping its pool and TLS configuration.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            default_timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the deadline applied when a descriptor carries none.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: Request) -> Result<Response> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let mut builder = self
            .http
            .request(reqwest_method(request.method), request.url.as_str())
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|text| (name.as_str().to_owned(), text.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(classify_transport_error)?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}

fn classify_transport_error(err: reqwest::Error) -> RelayError {
    if err.is_timeout() {
        RelayError::Timeout(err.to_string())
    } else if err.is_builder() {
        // Bad URL or header material never left the process.
        RelayError::InvalidRequest(err.to_string())
    } else {
        RelayError::Transport(err.to_string())
    }
}
