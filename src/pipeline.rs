use std::sync::Arc;

use crate::{
    CallContext, CancelToken, Middleware, Next, Request, RequestExecutor, Response, Result,
};

/// Ordered handler chain ending at a transport executor.
///
/// Cloning is cheap and clones share the chain. Handlers hold no per-call
/// state and every send gets a fresh [`CallContext`], so one pipeline serves
/// concurrent calls.
#[derive(Clone)]
pub struct Pipeline {
    executor: Arc<dyn RequestExecutor>,
    middlewares: Arc<[Arc<dyn Middleware>]>,
}

impl Pipeline {
    /// Starts a builder around the given executor.
    pub fn builder(executor: impl RequestExecutor) -> PipelineBuilder {
        PipelineBuilder::new(executor)
    }

    /// Sends one request through the chain.
    pub async fn send(&self, request: Request) -> Result<Response> {
        self.send_with_cancel(request, CancelToken::never()).await
    }

    /// Sends one request, abandoning retry waits when `cancel` fires.
    pub async fn send_with_cancel(
        &self,
        request: Request,
        cancel: CancelToken,
    ) -> Result<Response> {
        let cx = CallContext::new(cancel);
        Next::new(self.executor.as_ref(), &self.middlewares)
            .run(request, &cx)
            .await
    }
}

/// Assembles a [`Pipeline`] from an executor and an ordered handler list.
///
/// Handlers run in insertion order, the first added being outermost. The
/// retrying handler belongs first so every retry re-enters the handlers
/// below it.
pub struct PipelineBuilder {
    executor: Arc<dyn RequestExecutor>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl PipelineBuilder {
    pub fn new(executor: impl RequestExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
            middlewares: Vec::new(),
        }
    }

    /// Appends a handler to the chain.
    pub fn with(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Appends an already-shared handler.
    pub fn with_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            executor: self.executor,
            middlewares: self.middlewares.into(),
        }
    }
}
