//! `relay-http` is a retrying HTTP request pipeline for REST API clients.
//!
//! A [`Pipeline`] drives each request through an ordered handler chain into a
//! transport executor:
//! - [`RetryMiddleware`] for rate-limit backoff and timeout retry
//! - [`TraceMiddleware`] for request/response logging
//! - [`ReqwestExecutor`] for the HTTP round trip
//!
//! ```no_run
//! use relay_http::{Pipeline, ReqwestExecutor, Request, RetryMiddleware};
//!
//! # async fn run() -> relay_http::Result<()> {
//! let pipeline = Pipeline::builder(ReqwestExecutor::new())
//!     .with(RetryMiddleware::new())
//!     .build();
//!
//! let response = pipeline
//!     .send(Request::get("https://api.example.com/tickets"))
//!     .await?;
//! println!("{} {}", response.status, response.text());
//! # Ok(())
//! # }
//! ```

mod cancel;
mod error;
mod executor;
mod middleware;
mod pipeline;
mod policy;
mod request;
mod response;
mod retry;
mod trace;

pub use cancel::{CancelHandle, CancelToken};
pub use error::RelayError;
pub use executor::{ReqwestExecutor, RequestExecutor};
pub use middleware::{CallContext, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use policy::RetryPolicy;
pub use request::{Method, Request};
pub use response::Response;
pub use retry::RetryMiddleware;
pub use trace::TraceMiddleware;

pub type Result<T> = std::result::Result<T, RelayError>;
