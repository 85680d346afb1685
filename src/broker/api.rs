//! Open Service Broker v2 request and response shapes.
//!
//! Only the fields this broker reads or writes are modelled. Unknown request
//! fields are ignored; optional response fields are omitted when unset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Plan, RouteService};

/// Body of `GET /v2/catalog`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogResponse {
    pub services: Vec<Service>,
}

/// Permission a service needs from the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequiredPermission {
    RouteForwarding,
}

/// Catalog entry for one service offering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub bindable: bool,
    pub tags: Vec<String>,
    pub plan_updateable: bool,
    pub requires: Vec<RequiredPermission>,
    pub plans: Vec<ServicePlan>,
}

impl From<&RouteService> for Service {
    fn from(service: &RouteService) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            bindable: true,
            tags: service.tags.clone(),
            plan_updateable: false,
            requires: vec![RequiredPermission::RouteForwarding],
            plans: service.plans.iter().map(ServicePlan::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePlan {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&Plan> for ServicePlan {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            name: plan.name.clone(),
            description: plan.description.clone(),
        }
    }
}

/// Body of `PUT /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvisionDetails {
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// Query of `DELETE /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeprovisionDetails {
    pub service_id: String,
    pub plan_id: String,
}

/// Body of `PUT .../service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BindDetails {
    pub service_id: String,
    pub plan_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_resource: Option<BindResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl BindDetails {
    pub fn new(service_id: impl Into<String>, plan_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            plan_id: plan_id.into(),
            ..Self::default()
        }
    }
}

/// Resource the binding is attached to; a route for route services.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BindResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Query of `DELETE .../service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UnbindDetails {
    pub service_id: String,
    pub plan_id: String,
}

/// Body of `PATCH /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateDetails {
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionedServiceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeprovisionServiceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateServiceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

/// Result of a bind. Route services never receive credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Binding {
    pub credentials: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_service_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LastOperationState {
    #[serde(rename = "in progress")]
    InProgress,
    Succeeded,
    Failed,
}

/// Body of `GET .../last_operation`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastOperation {
    pub state: LastOperationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
