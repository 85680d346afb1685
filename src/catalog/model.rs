//! Catalog data model.
//!
//! Raw types mirror what operators write in config; every field is
//! optional there. Prepared types are only built by `prepare.rs` and carry
//! the derived ids.

use serde::{Deserialize, Serialize};

/// Tag applied to services that declare none.
pub const DEFAULT_TAG: &str = "route-service";

/// Operator-authored route service, before preparation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawRouteService {
    pub name: String,
    pub description: String,
    /// Forwarding target of the synthesized default plan.
    pub url: String,
    pub tags: Vec<String>,
    pub plans: Vec<RawPlan>,
}

impl RawRouteService {
    /// Minimal service: a name and a forwarding url.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plan(mut self, plan: RawPlan) -> Self {
        self.plans.push(plan);
        self
    }
}

/// Operator-authored plan, before preparation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawPlan {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl RawPlan {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A prepared route service. Immutable once built.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteService {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub tags: Vec<String>,
    /// Never empty.
    pub plans: Vec<Plan>,
}

impl RouteService {
    /// First plan carrying `plan_id`.
    pub fn plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }
}

/// A prepared plan. `url` is always non-empty.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
}
