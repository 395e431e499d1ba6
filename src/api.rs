use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::WeatherService;
use crate::models::{AlertSet, WeatherResponse};

const WELCOME: &str = "\u{26c5} Welcome to the wxreport weather API";
const ALERTS_ERROR: &str = "Could not fetch alerts";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: message.into(),
        }),
    )
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/api", get(welcome))
        .route("/weather/{city_state}", get(get_weather))
        .route("/alerts/{state}", get(get_alerts))
        .with_state(service)
}

async fn welcome() -> Json<&'static str> {
    Json(WELCOME)
}

async fn get_weather(
    State(service): State<Arc<WeatherService>>,
    Path(city_state): Path<String>,
) -> ApiResult<WeatherResponse> {
    match service.get_weather(&city_state).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            warn!("Weather request for '{}' failed: {}", city_state, e);
            Err(bad_request(e.user_message()))
        }
    }
}

async fn get_alerts(
    State(service): State<Arc<WeatherService>>,
    Path(state): Path<String>,
) -> ApiResult<AlertSet> {
    match service.get_alerts(&state).await {
        Ok(alerts) => Ok(Json(alerts)),
        Err(e) => {
            warn!("Alerts request for '{}' failed: {}", state, e);
            Err(bad_request(ALERTS_ERROR))
        }
    }
}
