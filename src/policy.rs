/// Configures retry behavior for [`RetryMiddleware`](crate::RetryMiddleware).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of additional attempts after a timed-out one.
    pub max_timeout_retries: usize,
    /// Backoff wait in seconds when the response carries no usable
    /// `retry-after` hint.
    pub default_backoff_seconds: u64,
    /// Status codes that trigger the backoff-and-retry protocol.
    pub retry_trigger_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_timeout_retries: 5,
            default_backoff_seconds: 10,
            retry_trigger_statuses: vec![429, 503],
        }
    }
}

impl RetryPolicy {
    pub fn with_max_timeout_retries(mut self, retries: usize) -> Self {
        self.max_timeout_retries = retries;
        self
    }

    pub fn with_default_backoff_seconds(mut self, seconds: u64) -> Self {
        self.default_backoff_seconds = seconds;
        self
    }

    pub fn with_trigger_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_trigger_statuses = statuses.into();
        self
    }

    /// Whether a response with this status enters the backoff protocol.
    pub fn triggers_backoff(&self, status: u16) -> bool {
        self.retry_trigger_statuses.contains(&status)
    }
}
