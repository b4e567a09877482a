/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The transport hit its deadline before a full response arrived.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Non-timeout connectivity failure (DNS, refused connection, broken
    /// stream). Never retried by the pipeline.
    #[error("transport error: {0}")]
    Transport(String),
    /// The call was cancelled while waiting out a backoff window.
    #[error("call cancelled during backoff wait")]
    Cancelled,
    /// The descriptor could not be turned into a transport request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Response body decoding error.
    #[error("decode error: {0}")]
    Decode(String),
}
