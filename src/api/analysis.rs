//! Analysis API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::{ApiMeta, ApiResponse};
use crate::error::{AppError, Result};
use crate::services::AnalysisOptions;
use crate::sources::Provider;
use crate::types::{AnalysisReport, AnnotatedSeries, ChartPeriod, MaPolicy, RawBar, ScoringMode, Series};
use crate::AppState;

/// Series posted directly by the caller.
#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

/// Query parameters for analysis endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    /// Chart period: 1d, 1w, 1m, 3m, 6m, 1y, 5y, all
    pub period: Option<String>,
    /// Moving average policy: strict, expanding
    pub policy: Option<String>,
    /// Scoring mode: fixed, weighted, both
    pub mode: Option<String>,
    /// Symbol for vendor payloads that do not carry one
    pub symbol: Option<String>,
}

/// Query parameters for the moving averages endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MovingAverageQuery {
    pub policy: Option<String>,
}

fn parse_policy(policy: Option<&str>, default: MaPolicy) -> Result<MaPolicy> {
    match policy {
        None => Ok(default),
        Some(p) => MaPolicy::from_str(p)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown moving average policy: {}", p))),
    }
}

impl AnalysisQuery {
    /// Resolve request options, filling gaps from configuration.
    fn options(&self, state: &AppState) -> Result<AnalysisOptions> {
        let period = match self.period.as_deref() {
            None => state.config.default_period,
            Some(p) => ChartPeriod::from_str(p)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown period: {}", p)))?,
        };
        let mode = match self.mode.as_deref() {
            None => ScoringMode::default(),
            Some(m) => ScoringMode::from_str(m)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown scoring mode: {}", m)))?,
        };

        Ok(AnalysisOptions {
            period,
            policy: parse_policy(self.policy.as_deref(), state.config.ma_policy)?,
            mode,
        })
    }
}

fn series_from_request(payload: std::result::Result<Json<SeriesRequest>, JsonRejection>) -> Result<Series> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Series::from_raw(request.symbol, request.bars)?)
}

/// Create the analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analysis", post(analyze))
        .route("/api/analysis/:provider", post(analyze_provider))
        .route("/api/moving-averages", post(moving_averages))
}

/// Analyze a series posted as `{symbol, bars}`.
async fn analyze(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
    payload: std::result::Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisReport>>> {
    let options = query.options(&state)?;
    let series = series_from_request(payload)?;
    let bars = series.len();

    let report = state.analysis.analyze(&series, &options)?;
    Ok(Json(ApiResponse::with_meta(
        report,
        ApiMeta {
            provider: None,
            bars: Some(bars),
        },
    )))
}

/// Analyze a raw vendor payload.
async fn analyze_provider(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<AnalysisQuery>,
    body: String,
) -> Result<Json<ApiResponse<AnalysisReport>>> {
    let provider = Provider::from_str(&provider)
        .ok_or_else(|| AppError::NotFound(format!("Unknown provider: {}", provider)))?;
    let options = query.options(&state)?;

    let symbol = query.symbol.as_deref().unwrap_or_default();
    if provider == Provider::Finnhub && symbol.trim().is_empty() {
        return Err(AppError::BadRequest(
            "symbol query parameter is required for finnhub payloads".to_string(),
        ));
    }

    let series = provider.decode(symbol, &body)?;
    debug!(
        "Decoded {} payload into {} bars for {}",
        provider.as_str(),
        series.len(),
        series.symbol()
    );

    let bars = series.len();
    let report = state.analysis.analyze(&series, &options)?;
    Ok(Json(ApiResponse::with_meta(
        report,
        ApiMeta {
            provider: Some(provider.as_str()),
            bars: Some(bars),
        },
    )))
}

/// Annotate a posted series with moving averages only.
async fn moving_averages(
    State(state): State<AppState>,
    Query(query): Query<MovingAverageQuery>,
    payload: std::result::Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnnotatedSeries>>> {
    let policy = parse_policy(query.policy.as_deref(), state.config.ma_policy)?;
    let series = series_from_request(payload)?;
    let bars = series.len();

    let annotated = state.analysis.moving_averages(&series, policy)?;
    Ok(Json(ApiResponse::with_meta(
        annotated,
        ApiMeta {
            provider: None,
            bars: Some(bars),
        },
    )))
}
