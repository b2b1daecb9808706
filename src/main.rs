use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

use schooldesk::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "schooldesk",
        "schooldesk starting: RUST_LOG='{}', bind={}, http_port={}, session_ttl_secs={}, seed_admin={}",
        rust_log, config.bind, config.http_port, config.session_ttl.as_secs(), config.seed_admin.is_some()
    );

    schooldesk::server::run(config).await
}
