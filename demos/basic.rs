use relay_http::{Pipeline, ReqwestExecutor, Request, RetryMiddleware, TraceMiddleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("RELAY_URL")?;

    let pipeline = Pipeline::builder(ReqwestExecutor::new())
        .with(RetryMiddleware::new())
        .with(TraceMiddleware)
        .build();

    let mut request = Request::get(url);
    if let Ok(authorization) = std::env::var("RELAY_AUTHORIZATION") {
        request = request.with_header("authorization", authorization);
    }

    let response = pipeline.send(request).await?;

    println!("status: {}", response.status);
    println!("{}", response.text());

    Ok(())
}
