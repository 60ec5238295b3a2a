//! Trendscope - moving-average trend analysis server for daily price series

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use services::AnalysisService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analysis: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let analysis = AnalysisService::new(config.max_bars);
        Self {
            config: Arc::new(config),
            analysis,
        }
    }
}

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use error::{AppError, Result, SeriesError};
pub use sources::{Provider, SourceError};
pub use types::*;
