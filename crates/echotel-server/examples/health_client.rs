use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let base = std::env::var("ECHOTEL_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let response = reqwest::get(format!("{base}/health")).await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;

    info!(http_status = status.as_u16(), body = %body, "health check response received");

    Ok(())
}
