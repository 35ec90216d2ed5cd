use catalog_server::utils::logger;
use catalog_server::{Config, ServerState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env is optional)
    dotenv::dotenv().ok();

    // 2. Configuration and logging
    let config = Config::from_env();
    logger::init_logger_with_file(Some(&config.log_level), Some(&config.log_dir));

    tracing::info!(
        environment = %config.environment,
        "catalog-server {} starting",
        env!("CARGO_PKG_VERSION")
    );

    // 3. Database and services
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server
    let app = build_app(state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
