use std::time::Duration;

use relay_http::{CancelHandle, Pipeline, RelayError, ReqwestExecutor, Request, RetryMiddleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("RELAY_URL")?;

    let pipeline = Pipeline::builder(ReqwestExecutor::new())
        .with(RetryMiddleware::new())
        .build();

    let handle = CancelHandle::new();
    let token = handle.token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(3)).await;
        handle.cancel();
    });

    match pipeline.send_with_cancel(Request::get(url), token).await {
        Ok(response) => println!("status: {}", response.status),
        Err(RelayError::Cancelled) => println!("gave up waiting for the rate limit window"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
