use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::protocols::domain::{ProtocolId, ProtocolRecord};
use crate::protocols::repository::{ProtocolRepository, RepositoryError};
use crate::protocols::{protocol_router, InMemoryProtocolCatalog, ProtocolScoringService};
use crate::scoring::WeightConfig;

pub(super) const PHASE_THREE: &str = "ONC-001-PhaseIII";

pub(super) fn reference_service() -> ProtocolScoringService<InMemoryProtocolCatalog> {
    ProtocolScoringService::new(
        Arc::new(InMemoryProtocolCatalog::reference()),
        WeightConfig::default(),
    )
}

pub(super) fn reference_router() -> axum::Router {
    protocol_router(Arc::new(reference_service()))
}

pub(super) fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

pub(super) struct UnavailableRepository;

impl ProtocolRepository for UnavailableRepository {
    fn load_all(&self) -> Result<Vec<ProtocolRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog store offline".to_string()))
    }

    fn get_by_id(&self, _id: &ProtocolId) -> Result<ProtocolRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog store offline".to_string()))
    }
}

pub(super) fn unavailable_router() -> axum::Router {
    protocol_router(Arc::new(ProtocolScoringService::new(
        Arc::new(UnavailableRepository),
        WeightConfig::default(),
    )))
}

pub(super) fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("valid request")
}

pub(super) fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let raw = read_text_body(response).await;
    serde_json::from_str(&raw).expect("json payload")
}
