use std::sync::Arc;

use async_trait::async_trait;

use crate::{CancelToken, Request, RequestExecutor, Response, Result};

/// Per-call state threaded through the handler chain.
///
/// The pipeline creates a fresh context for every logical call, so handlers
/// themselves stay stateless and one instance can serve concurrent calls.
#[derive(Clone)]
pub struct CallContext {
    cancel: CancelToken,
}

impl CallContext {
    pub fn new(cancel: CancelToken) -> Self {
        Self { cancel }
    }

    /// Token observing the caller's cancellation signal.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

/// A chain member wrapping request execution.
///
/// Each handler receives the descriptor for one logical call and the
/// remainder of the chain as [`Next`]. It may forward the descriptor
/// downstream, re-run the downstream chain for retries, transform the
/// descriptor or response, or answer without touching the transport at all.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, req: Request, cx: &CallContext, next: Next<'_>) -> Result<Response>;
}

/// The remainder of the chain after the current handler, ending at the
/// transport executor.
///
/// `Next` is cheap to clone, which is how a handler runs its downstream more
/// than once for one logical call.
#[derive(Clone)]
pub struct Next<'a> {
    executor: &'a dyn RequestExecutor,
    middlewares: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        executor: &'a dyn RequestExecutor,
        middlewares: &'a [Arc<dyn Middleware>],
    ) -> Self {
        Self {
            executor,
            middlewares,
        }
    }

    /// Runs the downstream chain to completion for one attempt.
    pub async fn run(self, req: Request, cx: &CallContext) -> Result<Response> {
        match self.middlewares.split_first() {
            Some((current, rest)) => {
                let next = Next::new(self.executor, rest);
                current.handle(req, cx, next).await
            }
            None => self.executor.execute(req).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::{
        CallContext, CancelToken, Middleware, Next, Request, RequestExecutor, Response, Result,
    };

    struct RecordingExecutor {
        log: Arc<Mutex<Vec<String>>>,
        seen: Arc<Mutex<Vec<Request>>>,
    }

    #[async_trait]
    impl RequestExecutor for RecordingExecutor {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.log.lock().unwrap().push("execute".to_owned());
            self.seen.lock().unwrap().push(request);
            Ok(Response::new(200))
        }
    }

    struct TagMiddleware {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for TagMiddleware {
        async fn handle(&self, req: Request, cx: &CallContext, next: Next<'_>) -> Result<Response> {
            self.log.lock().unwrap().push(format!("{}:enter", self.name));
            let response = next.run(req, cx).await;
            self.log.lock().unwrap().push(format!("{}:exit", self.name));
            response
        }
    }

    struct StampMiddleware;

    #[async_trait]
    impl Middleware for StampMiddleware {
        async fn handle(&self, req: Request, cx: &CallContext, next: Next<'_>) -> Result<Response> {
            next.run(req.with_header("x-stamped", "yes"), cx).await
        }
    }

    #[tokio::test]
    async fn empty_chain_reaches_executor() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let executor = RecordingExecutor {
            log: log.clone(),
            seen: seen.clone(),
        };
        let cx = CallContext::new(CancelToken::never());

        let response = Next::new(&executor, &[])
            .run(Request::get("http://api.test/items"), &cx)
            .await
            .expect("executor must answer");

        assert_eq!(response.status, 200);
        assert_eq!(log.lock().unwrap().as_slice(), ["execute"]);
        assert_eq!(seen.lock().unwrap()[0].url, "http://api.test/items");
    }

    #[tokio::test]
    async fn handlers_run_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let executor = RecordingExecutor {
            log: log.clone(),
            seen,
        };
        let chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(TagMiddleware {
                name: "outer",
                log: log.clone(),
            }),
            Arc::new(TagMiddleware {
                name: "inner",
                log: log.clone(),
            }),
        ];
        let cx = CallContext::new(CancelToken::never());

        Next::new(&executor, &chain)
            .run(Request::get("http://api.test/items"), &cx)
            .await
            .expect("chain must complete");

        assert_eq!(
            log.lock().unwrap().as_slice(),
            [
                "outer:enter",
                "inner:enter",
                "execute",
                "inner:exit",
                "outer:exit"
            ]
        );
    }

    #[tokio::test]
    async fn handler_transformations_reach_the_executor() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let executor = RecordingExecutor {
            log,
            seen: seen.clone(),
        };
        let chain: Vec<Arc<dyn Middleware>> = vec![Arc::new(StampMiddleware)];
        let cx = CallContext::new(CancelToken::never());

        Next::new(&executor, &chain)
            .run(Request::get("http://api.test/items"), &cx)
            .await
            .expect("chain must complete");

        assert_eq!(seen.lock().unwrap()[0].header_value("x-stamped"), Some("yes"));
    }
}
