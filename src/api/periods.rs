//! Period table endpoint for chart period selectors.

use axum::{routing::get, Json, Router};

use super::ApiResponse;
use crate::types::{ChartPeriod, PeriodInfo};
use crate::AppState;

async fn list_periods() -> Json<ApiResponse<Vec<PeriodInfo>>> {
    let today = chrono::Utc::now().date_naive();
    let periods = ChartPeriod::ALL
        .into_iter()
        .map(|period| PeriodInfo::new(period, today))
        .collect();
    Json(ApiResponse::new(periods))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/periods", get(list_periods))
}
