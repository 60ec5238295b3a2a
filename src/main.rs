use trendscope::{app, config::Config, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendscope=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Starting Trendscope server on {}:{} (policy {:?}, period {}, max {} bars)",
        config.host,
        config.port,
        config.ma_policy,
        config.default_period.as_str(),
        config.max_bars
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Trendscope server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
