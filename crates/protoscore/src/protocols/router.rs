use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::domain::ProtocolId;
use super::repository::{ProtocolRepository, RepositoryError};
use super::service::{ProtocolScoringService, ScoringServiceError};
use crate::scoring::{ProtocolAdjustments, WeightConfig};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    pub(crate) weights: Option<WeightConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SimulateRequest {
    #[serde(default)]
    pub(crate) adjustments: ProtocolAdjustments,
    #[serde(default)]
    pub(crate) weights: Option<WeightConfig>,
}

/// Router builder exposing catalog lookup, scoring, and what-if endpoints.
pub fn protocol_router<R>(service: Arc<ProtocolScoringService<R>>) -> Router
where
    R: ProtocolRepository + 'static,
{
    Router::new()
        .route("/api/v1/protocols", get(list_handler::<R>))
        .route("/api/v1/protocols/:protocol_id", get(detail_handler::<R>))
        .route(
            "/api/v1/protocols/:protocol_id/score",
            post(score_handler::<R>),
        )
        .route(
            "/api/v1/protocols/:protocol_id/simulate",
            post(simulate_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ProtocolScoringService<R>>>,
) -> Response
where
    R: ProtocolRepository + 'static,
{
    match service.list() {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ProtocolScoringService<R>>>,
    Path(protocol_id): Path<String>,
) -> Response
where
    R: ProtocolRepository + 'static,
{
    match service.get(&ProtocolId(protocol_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_handler<R>(
    State(service): State<Arc<ProtocolScoringService<R>>>,
    Path(protocol_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: ProtocolRepository + 'static,
{
    let request: ScoreRequest = match parse_optional_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match service.assess(&ProtocolId(protocol_id), request.weights) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn simulate_handler<R>(
    State(service): State<Arc<ProtocolScoringService<R>>>,
    Path(protocol_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: ProtocolRepository + 'static,
{
    let request: SimulateRequest = match parse_optional_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let SimulateRequest {
        adjustments,
        weights,
    } = request;

    match service.simulate(&ProtocolId(protocol_id), adjustments, weights) {
        Ok(simulation) => (StatusCode::OK, axum::Json(simulation)).into_response(),
        Err(error) => error_response(error),
    }
}

/// An empty body means "use the defaults"; anything else must be valid JSON.
fn parse_optional_body<T>(body: &Bytes) -> Result<T, Response>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|error| {
        let payload = json!({
            "error": format!("invalid request body: {error}"),
        });
        (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
    })
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        ScoringServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
