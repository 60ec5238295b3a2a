pub mod analysis;
pub mod health;
pub mod periods;

use axum::Router;
use serde::Serialize;

use crate::AppState;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Default, Serialize)]
pub struct ApiMeta {
    /// Vendor whose payload was decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'static str>,
    /// Bars received, before any period trimming.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bars: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: ApiMeta::default(),
        }
    }

    pub fn with_meta(data: T, meta: ApiMeta) -> Self {
        Self { data, meta }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(periods::router())
        .merge(analysis::router())
}
