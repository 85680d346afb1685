//! Static route service broker.
//!
//! # Responsibilities
//! - Hold the prepared catalog for the life of the process
//! - Resolve (service id, plan id) to a forwarding url
//! - Answer lifecycle operations without touching any state

use std::collections::HashMap;

use serde_json::Map;

use crate::broker::api::*;
use crate::broker::error::{BrokerError, LookupError};
use crate::broker::ServiceBroker;
use crate::catalog::RouteService;

/// Broker over a fixed catalog of route services.
#[derive(Debug)]
pub struct RouteServiceBroker {
    services: Vec<RouteService>,
    /// Service id → position in `services`; the first service wins on duplicates.
    index: HashMap<String, usize>,
}

impl RouteServiceBroker {
    /// Build the broker from a prepared catalog.
    pub fn new(services: Vec<RouteService>) -> Self {
        let mut index = HashMap::with_capacity(services.len());
        for (position, service) in services.iter().enumerate() {
            index.entry(service.id.clone()).or_insert(position);
        }
        Self { services, index }
    }

    /// Prepared catalog, in configuration order.
    pub fn route_services(&self) -> &[RouteService] {
        &self.services
    }

    /// Forwarding url for a plan of a service.
    pub fn resolve_binding_url(&self, service_id: &str, plan_id: &str) -> Result<&str, LookupError> {
        let service = self
            .index
            .get(service_id)
            .map(|&position| &self.services[position])
            .ok_or_else(|| LookupError::ServiceNotFound(service_id.to_string()))?;

        let plan = service.plan(plan_id).ok_or_else(|| LookupError::PlanNotFound {
            service_id: service_id.to_string(),
            plan_id: plan_id.to_string(),
        })?;

        Ok(&plan.url)
    }
}

impl ServiceBroker for RouteServiceBroker {
    fn services(&self) -> Vec<Service> {
        self.services.iter().map(Service::from).collect()
    }

    fn provision(
        &self,
        instance_id: &str,
        details: &ProvisionDetails,
        _async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, BrokerError> {
        tracing::debug!(
            instance_id = %instance_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            "Provision accepted"
        );
        Ok(ProvisionedServiceSpec::default())
    }

    fn deprovision(
        &self,
        instance_id: &str,
        _details: &DeprovisionDetails,
        _async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, BrokerError> {
        tracing::debug!(instance_id = %instance_id, "Deprovision accepted");
        Ok(DeprovisionServiceSpec::default())
    }

    fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        details: &BindDetails,
    ) -> Result<Binding, BrokerError> {
        let url = self.resolve_binding_url(&details.service_id, &details.plan_id)?;

        tracing::info!(
            instance_id = %instance_id,
            binding_id = %binding_id,
            service_id = %details.service_id,
            plan_id = %details.plan_id,
            route_service_url = %url,
            "Binding resolved"
        );

        Ok(Binding {
            credentials: Map::new(),
            route_service_url: Some(url.to_string()),
        })
    }

    fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        _details: &UnbindDetails,
    ) -> Result<(), BrokerError> {
        tracing::debug!(instance_id = %instance_id, binding_id = %binding_id, "Unbind accepted");
        Ok(())
    }

    fn last_operation(
        &self,
        _instance_id: &str,
        _operation_data: Option<&str>,
    ) -> Result<LastOperation, BrokerError> {
        Ok(LastOperation {
            state: LastOperationState::Succeeded,
            description: None,
        })
    }

    fn update(
        &self,
        instance_id: &str,
        _details: &UpdateDetails,
        _async_allowed: bool,
    ) -> Result<UpdateServiceSpec, BrokerError> {
        tracing::debug!(instance_id = %instance_id, "Update accepted");
        Ok(UpdateServiceSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{derive_id, prepare_catalog, RawPlan, RawRouteService};
    use std::sync::Arc;

    fn broker() -> RouteServiceBroker {
        let services = prepare_catalog(vec![
            RawRouteService::new("echo", "http://echo.example.com"),
            RawRouteService::new("auth", "http://unused")
                .with_plan(RawPlan::new("basic", "http://target"))
                .with_plan(RawPlan::new("premium", "http://premium")),
        ])
        .unwrap();
        RouteServiceBroker::new(services)
    }

    #[test]
    fn test_resolve_binding_url() {
        let broker = broker();
        let url = broker
            .resolve_binding_url(&derive_id("auth"), &derive_id("basic"))
            .unwrap();
        assert_eq!(url, "http://target");
    }

    #[test]
    fn test_resolve_unknown_service() {
        let broker = broker();
        let err = broker
            .resolve_binding_url("nonexistent", &derive_id("basic"))
            .unwrap_err();
        assert_eq!(err, LookupError::ServiceNotFound("nonexistent".into()));
        assert_eq!(err.to_string(), "Service with id nonexistent can't be found");
    }

    #[test]
    fn test_resolve_unknown_plan() {
        let broker = broker();
        let service_id = derive_id("auth");
        let err = broker.resolve_binding_url(&service_id, "nonexistent").unwrap_err();
        assert_eq!(
            err,
            LookupError::PlanNotFound {
                service_id: service_id.clone(),
                plan_id: "nonexistent".into(),
            }
        );
    }

    #[test]
    fn test_plan_of_other_service_not_found() {
        let broker = broker();
        let err = broker
            .resolve_binding_url(&derive_id("echo"), &derive_id("basic"))
            .unwrap_err();
        assert!(matches!(err, LookupError::PlanNotFound { .. }));
    }

    #[test]
    fn test_first_duplicate_service_wins() {
        let services = prepare_catalog(vec![
            RawRouteService::new("dup", "http://first"),
            RawRouteService::new("dup", "http://second"),
        ])
        .unwrap();
        let broker = RouteServiceBroker::new(services);

        let url = broker
            .resolve_binding_url(&derive_id("dup"), &derive_id("plan-dup"))
            .unwrap();
        assert_eq!(url, "http://first");
    }

    #[test]
    fn test_bind_returns_route_service_url_without_credentials() {
        let broker = broker();
        let details = BindDetails::new(derive_id("echo"), derive_id("plan-echo"));
        let binding = broker.bind("instance", "binding", &details).unwrap();

        assert!(binding.credentials.is_empty());
        assert_eq!(binding.route_service_url.as_deref(), Some("http://echo.example.com"));
    }

    #[test]
    fn test_bind_failure_is_internal() {
        let broker = broker();
        let details = BindDetails::new("missing", derive_id("plan-echo"));
        let err = broker.bind("instance", "binding", &details).unwrap_err();

        assert_eq!(err.error_key(), "internal-server-error");
        assert_eq!(err.to_string(), "Service with id missing can't be found");
    }

    #[test]
    fn test_services_is_idempotent() {
        let broker = broker();
        let first = broker.services();
        assert_eq!(first, broker.services());
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].plans.len(), 2);
    }

    #[test]
    fn test_lifecycle_operations_succeed() {
        let broker = broker();
        assert_eq!(
            broker.provision("i", &ProvisionDetails::default(), true).unwrap(),
            ProvisionedServiceSpec::default()
        );
        assert_eq!(
            broker.deprovision("i", &DeprovisionDetails::default(), false).unwrap(),
            DeprovisionServiceSpec::default()
        );
        assert!(broker.unbind("i", "b", &UnbindDetails::default()).is_ok());
        assert_eq!(
            broker.update("i", &UpdateDetails::default(), false).unwrap(),
            UpdateServiceSpec::default()
        );
        assert_eq!(
            broker.last_operation("i", None).unwrap().state,
            LastOperationState::Succeeded
        );
    }

    #[test]
    fn test_concurrent_resolution() {
        let broker = Arc::new(broker());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let broker = broker.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let url = broker
                            .resolve_binding_url(&derive_id("auth"), &derive_id("premium"))
                            .unwrap();
                        assert_eq!(url, "http://premium");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
