use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::{CallContext, Middleware, Next, Request, Response, Result};

/// Logs every exchange flowing through its position in the chain.
///
/// Pure observer: descriptors and outcomes pass through untouched. Placed
/// after [`RetryMiddleware`](crate::RetryMiddleware) it records each
/// individual attempt; placed before it, only the final outcome per call.
pub struct TraceMiddleware;

#[async_trait]
impl Middleware for TraceMiddleware {
    async fn handle(&self, req: Request, cx: &CallContext, next: Next<'_>) -> Result<Response> {
        let method = req.method;
        let url = req.url.clone();
        let started = Instant::now();

        match next.run(req, cx).await {
            Ok(response) => {
                debug!(
                    %method,
                    %url,
                    status = response.status,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "exchange completed"
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    %method,
                    %url,
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "exchange failed"
                );
                Err(err)
            }
        }
    }
}
