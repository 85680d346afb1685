//! Open Service Broker v2 handlers.
//!
//! Each handler extracts the wire format, calls one [`ServiceBroker`]
//! operation and maps its result to a status code.
//!
//! [`ServiceBroker`]: crate::broker::ServiceBroker

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::broker::{
    BindDetails, Binding, CatalogResponse, DeprovisionDetails, DeprovisionServiceSpec, LastOperation,
    ProvisionDetails, ProvisionedServiceSpec, UnbindDetails, UpdateDetails, UpdateServiceSpec,
};
use crate::http::request::BrokerJson;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `accepts_incomplete` query parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AsyncQuery {
    pub accepts_incomplete: bool,
}

/// Query of `GET .../last_operation`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LastOperationQuery {
    pub operation: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        services: state.broker.services(),
    })
}

pub async fn provision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    BrokerJson(details): BrokerJson<ProvisionDetails>,
) -> Result<(StatusCode, Json<ProvisionedServiceSpec>), ApiError> {
    let spec = state
        .broker
        .provision(&instance_id, &details, query.accepts_incomplete)?;
    Ok((StatusCode::CREATED, Json(spec)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    BrokerJson(details): BrokerJson<UpdateDetails>,
) -> Result<(StatusCode, Json<UpdateServiceSpec>), ApiError> {
    let spec = state
        .broker
        .update(&instance_id, &details, query.accepts_incomplete)?;
    Ok((StatusCode::OK, Json(spec)))
}

pub async fn deprovision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<AsyncQuery>,
    Query(details): Query<DeprovisionDetails>,
) -> Result<(StatusCode, Json<DeprovisionServiceSpec>), ApiError> {
    let spec = state
        .broker
        .deprovision(&instance_id, &details, query.accepts_incomplete)?;
    Ok((StatusCode::OK, Json(spec)))
}

pub async fn last_operation(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(query): Query<LastOperationQuery>,
) -> Result<Json<LastOperation>, ApiError> {
    let operation = state
        .broker
        .last_operation(&instance_id, query.operation.as_deref())?;
    Ok(Json(operation))
}

pub async fn bind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    BrokerJson(details): BrokerJson<BindDetails>,
) -> Result<(StatusCode, Json<Binding>), ApiError> {
    match state.broker.bind(&instance_id, &binding_id, &details) {
        Ok(binding) => Ok((StatusCode::CREATED, Json(binding))),
        Err(err) => {
            tracing::error!(
                instance_id = %instance_id,
                binding_id = %binding_id,
                service_id = %details.service_id,
                plan_id = %details.plan_id,
                error = %err,
                "Bind failed"
            );
            metrics::record_bind_failure(err.error_key());
            Err(err.into())
        }
    }
}

pub async fn unbind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Query(details): Query<UnbindDetails>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    state.broker.unbind(&instance_id, &binding_id, &details)?;
    Ok(Json(Map::new()))
}
