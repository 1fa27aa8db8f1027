//! HTTP routes
//!
//! `GET /` always answers with the keep scenario. `POST /scenario` and
//! `POST /echo/:item` choose between keep and heat from the posted readings.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{panic_response, ApiError};
use crate::scenario::{Readings, Scenario, ScenarioResponse};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the service router for the given configuration
pub fn router(config: Config) -> Router {
    with_envelope(api_routes(), config)
}

/// Business routes, before fallbacks and layers are applied
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/scenario", post(scenario))
        .route("/echo/:item", post(echo))
}

/// Wrap `routes` so every failure, including a panic, renders the error envelope
pub fn with_envelope(routes: Router<AppState>, config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    routes
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Json<ScenarioResponse> {
    Json(ScenarioResponse::new(Scenario::Keep))
}

async fn scenario(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ScenarioResponse> {
    select_scenario(&state, payload)
}

// `item` and `lang` are accepted for compatibility with existing clients and
// do not influence the answer.
async fn echo(
    State(state): State<AppState>,
    item: Result<Path<String>, PathRejection>,
    Query(params): Query<HashMap<String, String>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ScenarioResponse> {
    let item = match item {
        Ok(Path(item)) => item,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Unreadable echo item");
            "none".to_string()
        }
    };
    let lang = params.get("lang").map(String::as_str).unwrap_or("none");
    debug!(item = %item, lang = %lang, "Echo request");

    select_scenario(&state, payload)
}

fn select_scenario(
    state: &AppState,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ScenarioResponse> {
    let Json(payload) = payload?;
    let readings = Readings::from_payload(&payload)?;
    let scenario = readings.scenario();

    if state.config.debug {
        debug!(
            outside_temp = %readings.outside_temp,
            inside_temp = %readings.inside_temp,
            set_temp = %readings.set_temp,
            test_value = %readings.test_value,
            "Received readings"
        );
    }
    info!(scenario = %scenario, "Scenario selected");

    Ok(Json(ScenarioResponse::new(scenario)))
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> AppState {
        AppState {
            config: Arc::new(Config::default()),
        }
    }

    #[tokio::test]
    async fn test_index_returns_keep() {
        let Json(response) = index().await;
        assert_eq!(response.scenario, Scenario::Keep.encoded());
        assert!(response.tstamp > 0.0);
    }

    #[test]
    fn test_select_scenario() {
        let payload = json!({
            "outside_temp": 3,
            "inside_temp": 17,
            "set_temp": 21,
            "test_value": false
        });
        let Json(response) = select_scenario(&state(), Ok(Json(payload))).unwrap();
        assert_eq!(response.scenario, Scenario::Heat.encoded());
    }

    #[test]
    fn test_select_scenario_missing_field() {
        let payload = json!({"outside_temp": 3, "inside_temp": 17, "test_value": true});
        let err = select_scenario(&state(), Ok(Json(payload))).unwrap_err();
        assert!(matches!(err, ApiError::Internal(cause) if cause.contains("set_temp")));
    }
}
