//! Integration tests for API endpoints

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use trendscope::{app, config::Config, AppState};

fn test_app() -> Router {
    app(AppState::new(Config::default()))
}

/// Closes rising by one per day from 2024-01-01.
fn series_body(symbol: &str, days: u32) -> Value {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars: Vec<Value> = (0..days)
        .map(|i| {
            let close = 100.0 + i as f64;
            json!({
                "date": (start + chrono::Days::new(i as u64)).to_string(),
                "open": close - 0.5,
                "high": close + 1.0,
                "low": close - 1.0,
                "close": close,
                "volume": 1_000_000,
            })
        })
        .collect();
    json!({ "symbol": symbol, "bars": bars })
}

fn uri(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    format!("{}?{}", path, serde_urlencoded::to_string(params).unwrap())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: String, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let request = Request::get("/api/health").body(Body::empty()).unwrap();
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_periods() {
    let request = Request::get("/api/periods").body(Body::empty()).unwrap();
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let periods = body["data"].as_array().unwrap();
    assert_eq!(periods.len(), 8);
    assert_eq!(periods[2]["period"], "1m");
    assert_eq!(periods[2]["weights"]["ma"], 0.5);
    assert!(periods[2]["historyStart"].is_string());
}

#[tokio::test]
async fn test_analysis_report_structure() {
    let uri = uri("/api/analysis", &[("period", "3m"), ("mode", "both")]);
    let (status, body) = send(test_app(), post_json(uri, &series_body("aapl", 150))).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["symbol"], "AAPL");
    assert_eq!(data["period"], "3m");
    assert_eq!(data["policy"], "strict");
    assert_eq!(data["lastPrice"], 249.0);
    assert!(data["series"]["bars"].is_array());
    assert_eq!(data["score"]["breakdown"]["alignment"], 5);
    assert!(data["weighted"]["score"].is_number());
    assert!(data["indicators"].is_array());
    assert!(data["changes"]["week"]["percentChange"].is_number());
    assert_eq!(body["meta"]["bars"], 150);
}

#[tokio::test]
async fn test_analysis_short_series_is_neutral() {
    let (status, body) = send(
        test_app(),
        post_json(uri("/api/analysis", &[]), &series_body("spy", 3)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["score"]["total"], 0);
    assert_eq!(body["data"]["score"]["recommendation"], "hold");
    assert_eq!(body["data"]["score"]["insufficientData"], true);
}

#[tokio::test]
async fn test_analysis_rejects_unknown_period() {
    let uri = uri("/api/analysis", &[("period", "2w")]);
    let (status, body) = send(test_app(), post_json(uri, &series_body("aapl", 10))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("2w"));
}

#[tokio::test]
async fn test_analysis_rejects_invalid_bar() {
    let mut body = series_body("aapl", 10);
    body["bars"][4]["close"] = json!(-1.0);
    let (status, body) = send(test_app(), post_json(uri("/api/analysis", &[]), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("index 4"));
}

#[tokio::test]
async fn test_analysis_rejects_malformed_json() {
    let request = Request::post("/api/analysis")
        .header("content-type", "application/json")
        .body(Body::from("{\"symbol\": "))
        .unwrap();
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_moving_averages_expanding() {
    let uri = uri("/api/moving-averages", &[("policy", "expanding")]);
    let (status, body) = send(test_app(), post_json(uri, &series_body("msft", 6))).await;

    assert_eq!(status, StatusCode::OK);
    let bars = body["data"]["bars"].as_array().unwrap();
    assert_eq!(bars.len(), 6);
    assert_eq!(bars[0]["ma5"], 100.0);
    assert_eq!(bars[1]["ma5"], 100.5);
    assert_eq!(bars[5]["ma5"], 103.0);
    assert_eq!(body["data"]["policy"], "expanding");
}

#[tokio::test]
async fn test_moving_averages_strict() {
    let (status, body) = send(
        test_app(),
        post_json(uri("/api/moving-averages", &[]), &series_body("msft", 6)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let bars = body["data"]["bars"].as_array().unwrap();
    assert!(bars[3]["ma5"].is_null());
    assert_eq!(bars[4]["ma5"], 102.0);
}

#[tokio::test]
async fn test_provider_yahoo_payload() {
    let payload = json!({"chart": {"result": [{
        "meta": {"symbol": "AAPL"},
        "timestamp": [1709562600, 1709649000, 1709735400, 1709821800, 1709908200, 1710167400],
        "indicators": {"quote": [{
            "open":   [176.15, 170.76, 171.06, 169.15, 169.0, 168.8],
            "high":   [176.90, 172.04, 171.24, 170.73, 173.7, 173.0],
            "low":    [173.79, 169.62, 168.49, 168.49, 168.9, 168.5],
            "close":  [175.10, 170.12, 169.12, 169.00, 170.73, 172.75],
            "volume": [81510100, 95132400, 68587700, 71765100, 76114600, 60139500]
        }]}
    }], "error": null}});

    let uri = uri("/api/analysis/yahoo", &[("period", "all")]);
    let (status, body) = send(test_app(), post_json(uri, &payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["symbol"], "AAPL");
    assert_eq!(body["data"]["series"]["bars"].as_array().unwrap().len(), 6);
    assert_eq!(body["meta"]["provider"], "yahoo");
}

#[tokio::test]
async fn test_provider_vendor_error_is_unprocessable() {
    let payload = json!({"Note": "Our standard API call frequency is 5 calls per minute."});
    let uri = uri("/api/analysis/alphavantage", &[("symbol", "IBM")]);
    let (status, body) = send(test_app(), post_json(uri, &payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
}

#[tokio::test]
async fn test_alphavantage_without_symbol_is_rejected() {
    let payload = json!({"Time Series (Daily)": {"2024-03-05": {
        "1. open": "192.0", "2. high": "193.9", "3. low": "190.5", "4. close": "191.9", "5. volume": "5653801"
    }}});
    let (status, body) = send(
        test_app(),
        post_json(uri("/api/analysis/alphavantage", &[]), &payload),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("symbol"));
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let uri = uri("/api/analysis/bloomberg", &[("symbol", "IBM")]);
    let (status, _) = send(test_app(), post_json(uri, &json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_finnhub_requires_symbol() {
    let payload = json!({"c": [1.0], "h": [1.0], "l": [1.0], "o": [1.0], "s": "ok", "t": [1569297600], "v": [10]});
    let (status, _) = send(
        test_app(),
        post_json(uri("/api/analysis/finnhub", &[]), &payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_series_rejected() {
    let mut config = Config::default();
    config.max_bars = 5;
    let app = app(AppState::new(config));

    let (status, _) = send(app, post_json(uri("/api/analysis", &[]), &series_body("aapl", 6))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
