use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{CallContext, Middleware, Next, RelayError, Request, Response, Result, RetryPolicy};

/// Retrying wrapper around the rest of the chain. Belongs first in the
/// pipeline so every other handler sits between it and the transport.
///
/// Two independent strategies compose per logical call:
///
/// - attempts that time out are re-sent immediately, up to
///   [`RetryPolicy::max_timeout_retries`] additional tries;
/// - a response whose status is in the trigger set is retried exactly once
///   after waiting out the server's `retry-after` hint (or the configured
///   default), and whatever that second attempt produces is final, even
///   another trigger status.
///
/// Every attempt re-sends a clone of the descriptor this handler received,
/// never one the transport may already have consumed. All bookkeeping is
/// call-local, so a single instance serves concurrent calls without
/// interference.
pub struct RetryMiddleware {
    policy: RetryPolicy,
}

impl RetryMiddleware {
    /// Creates the middleware with the default policy: 5 timeout retries,
    /// 10 s fallback backoff, triggers on 429 and 503.
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Runs the downstream chain, re-sending a fresh clone of `original`
    /// after each timeout until the budget is spent. Non-timeout failures
    /// propagate immediately.
    async fn run_with_timeout_retries(
        &self,
        original: &Request,
        cx: &CallContext,
        next: &Next<'_>,
    ) -> Result<Response> {
        let mut retries_left = self.policy.max_timeout_retries;
        loop {
            match next.clone().run(original.clone(), cx).await {
                Err(RelayError::Timeout(message)) => {
                    if retries_left == 0 {
                        return Err(RelayError::Timeout(message));
                    }
                    retries_left -= 1;
                    debug!(
                        method = %original.method,
                        url = %original.url,
                        retries_left,
                        "attempt timed out, retrying"
                    );
                }
                other => return other,
            }
        }
    }

    /// Sleeps out the backoff window in one-second steps, returning early if
    /// the call is cancelled. A countdown notice is emitted at every whole
    /// five seconds of remaining wait.
    async fn wait_backoff(&self, total_seconds: u64, cx: &CallContext) -> Result<()> {
        for elapsed in 0..total_seconds {
            let remaining = total_seconds - elapsed;
            if remaining % 5 == 0 {
                warn!(seconds_left = remaining, "waiting out rate limit window");
            }
            tokio::select! {
                _ = sleep(Duration::from_secs(1)) => {}
                _ = cx.cancel_token().cancelled() => {
                    warn!("backoff wait cancelled");
                    return Err(RelayError::Cancelled);
                }
            }
        }
        Ok(())
    }
}

impl Default for RetryMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for RetryMiddleware {
    async fn handle(&self, req: Request, cx: &CallContext, next: Next<'_>) -> Result<Response> {
        debug!(method = %req.method, url = %req.url, "sending request");
        let response = self.run_with_timeout_retries(&req, cx, &next).await?;
        debug!(status = response.status, "response received");

        if !self.policy.triggers_backoff(response.status) {
            return Ok(response);
        }

        let wait_seconds = response
            .retry_after()
            .unwrap_or(self.policy.default_backoff_seconds);
        warn!(
            status = response.status,
            wait_seconds, "rate limited, backing off before a single retry"
        );
        self.wait_backoff(wait_seconds, cx).await?;

        // One retry, outside the timeout-retry loop. Its outcome is final.
        debug!(method = %req.method, url = %req.url, "re-sending request after backoff");
        let retried = next.run(req, cx).await?;
        debug!(status = retried.status, "backoff retry response received");
        Ok(retried)
    }
}
