use mock_server::MockCredentials;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let defaults = MockCredentials::default();
    let credentials = MockCredentials {
        company_id: std::env::var("BEXIO_COMPANY_ID").unwrap_or(defaults.company_id),
        user_id: std::env::var("BEXIO_USER_ID").unwrap_or(defaults.user_id),
        public_key: std::env::var("BEXIO_PUBLIC_KEY").unwrap_or(defaults.public_key),
        signature: std::env::var("BEXIO_SIGNATURE").ok().filter(|s| !s.is_empty()),
    };

    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    mock_server::run(listener, credentials).await
}
