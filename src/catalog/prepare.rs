//! Catalog preparation.
//!
//! # Responsibilities
//! - Fill defaults (description, tags, default plan)
//! - Validate required fields (service name, plan url)
//! - Derive stable ids from names
//!
//! # Design Decisions
//! - Strictly sequential over input order, first failure wins
//! - All-or-nothing: an error never yields a partial catalog
//! - Duplicate ids are reported as warnings and left as configured

use std::collections::HashSet;

use crate::catalog::error::{CatalogError, ValidationError};
use crate::catalog::id::derive_id;
use crate::catalog::model::{Plan, RawPlan, RawRouteService, RouteService, DEFAULT_TAG};

/// Prepare the whole raw catalog.
pub fn prepare_catalog(raw: Vec<RawRouteService>) -> Result<Vec<RouteService>, CatalogError> {
    if raw.is_empty() {
        return Err(CatalogError::Empty);
    }

    let services = raw
        .into_iter()
        .enumerate()
        .map(|(index, service)| {
            prepare_service(service).map_err(|source| CatalogError::InvalidRoute { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    warn_on_duplicate_ids(&services);

    Ok(services)
}

/// Prepare a single route service and its plans.
pub fn prepare_service(raw: RawRouteService) -> Result<RouteService, ValidationError> {
    if raw.name.is_empty() {
        return Err(ValidationError::MissingName);
    }

    let RawRouteService {
        name,
        description,
        url,
        tags,
        plans,
    } = raw;

    let description = if description.is_empty() {
        format!("Route service {name}")
    } else {
        description
    };

    let tags = if tags.is_empty() {
        vec![DEFAULT_TAG.to_string()]
    } else {
        tags
    };

    let plans = if plans.is_empty() {
        vec![RawPlan {
            name: format!("plan-{name}"),
            description: format!("Default plan for route service {name} forwarding to url {url}"),
            url: url.clone(),
        }]
    } else {
        plans
    };

    let plans = plans
        .into_iter()
        .map(prepare_plan)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteService {
        id: derive_id(&name),
        name,
        description,
        url,
        tags,
        plans,
    })
}

/// Prepare a single plan.
pub fn prepare_plan(raw: RawPlan) -> Result<Plan, ValidationError> {
    if raw.url.is_empty() {
        return Err(ValidationError::MissingPlanUrl(raw.name));
    }

    let RawPlan {
        name,
        description,
        url,
    } = raw;

    let description = if description.is_empty() {
        format!("Plan {name} forwarding to url {url}")
    } else {
        description
    };

    Ok(Plan {
        id: derive_id(&name),
        name,
        description,
        url,
    })
}

fn warn_on_duplicate_ids(services: &[RouteService]) {
    let mut service_ids = HashSet::new();
    for service in services {
        if !service_ids.insert(service.id.as_str()) {
            tracing::warn!(
                service = %service.name,
                id = %service.id,
                "Duplicate route service name, only the first one can be bound"
            );
        }

        let mut plan_ids = HashSet::new();
        for plan in &service.plans {
            if !plan_ids.insert(plan.id.as_str()) {
                tracing::warn!(
                    service = %service.name,
                    plan = %plan.name,
                    id = %plan.id,
                    "Duplicate plan name within route service, only the first one can be bound"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_filled() {
        let service = prepare_service(RawRouteService::new("foo", "http://x")).unwrap();

        assert_eq!(service.name, "foo");
        assert_eq!(service.description, "Route service foo");
        assert_eq!(service.tags, vec!["route-service".to_string()]);
        assert_eq!(service.id, derive_id("foo"));
        assert_eq!(service.plans.len(), 1);

        let plan = &service.plans[0];
        assert_eq!(plan.name, "plan-foo");
        assert_eq!(plan.url, "http://x");
        assert_eq!(
            plan.description,
            "Default plan for route service foo forwarding to url http://x"
        );
        assert_eq!(plan.id, derive_id("plan-foo"));
    }

    #[test]
    fn test_operator_values_kept() {
        let raw = RawRouteService::new("auth", "http://unused")
            .with_description("Authenticating proxy")
            .with_tags(["auth", "proxy"])
            .with_plan(RawPlan::new("small", "https://auth.example.com/small"))
            .with_plan(
                RawPlan::new("large", "https://auth.example.com/large").with_description("Big one"),
            );

        let service = prepare_service(raw).unwrap();
        assert_eq!(service.description, "Authenticating proxy");
        assert_eq!(service.tags, vec!["auth".to_string(), "proxy".to_string()]);

        let names: Vec<&str> = service.plans.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["small", "large"]);
        assert_eq!(
            service.plans[0].description,
            "Plan small forwarding to url https://auth.example.com/small"
        );
        assert_eq!(service.plans[1].description, "Big one");
        assert_eq!(service.plans[1].id, derive_id("large"));
    }

    #[test]
    fn test_plan_description_defaulted() {
        let raw = RawRouteService::new("auth", "http://unused")
            .with_plan(RawPlan::new("basic", "http://target"));

        let service = prepare_service(raw).unwrap();
        assert_eq!(
            service.plans[0].description,
            "Plan basic forwarding to url http://target"
        );
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = prepare_service(RawRouteService::new("", "http://x")).unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
        assert_eq!(err.to_string(), "Route must have a name");
    }

    #[test]
    fn test_missing_plan_url_rejected() {
        let raw = RawRouteService::new("svc", "http://x")
            .with_plan(RawPlan::new("good", "http://good"))
            .with_plan(RawPlan::new("broken", ""));

        let err = prepare_service(raw).unwrap_err();
        assert_eq!(err, ValidationError::MissingPlanUrl("broken".into()));
        assert_eq!(err.to_string(), "Plan 'broken' must have an url");
    }

    #[test]
    fn test_default_plan_needs_service_url() {
        let err = prepare_service(RawRouteService::new("nourl", "")).unwrap_err();
        assert_eq!(err, ValidationError::MissingPlanUrl("plan-nourl".into()));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(prepare_catalog(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_invalid_service_aborts_catalog_at_any_position() {
        for position in 0..3 {
            let mut raw = vec![
                RawRouteService::new("a", "http://a"),
                RawRouteService::new("b", "http://b"),
            ];
            raw.insert(position, RawRouteService::new("", "http://nameless"));

            let err = prepare_catalog(raw).unwrap_err();
            assert_eq!(
                err,
                CatalogError::InvalidRoute {
                    index: position,
                    source: ValidationError::MissingName,
                }
            );
        }
    }

    #[test]
    fn test_plan_error_names_plan_in_catalog_error() {
        let raw = vec![
            RawRouteService::new("ok", "http://ok"),
            RawRouteService::new("bad", "http://bad").with_plan(RawPlan::new("no-url", "")),
        ];

        let err = prepare_catalog(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error on route number 1: Plan 'no-url' must have an url"
        );
    }

    #[test]
    fn test_catalog_order_preserved() {
        let raw = vec![
            RawRouteService::new("zeta", "http://z"),
            RawRouteService::new("alpha", "http://a"),
            RawRouteService::new("mid", "http://m"),
        ];

        let services = prepare_catalog(raw).unwrap();
        let names: Vec<&str> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_ids_pairwise_distinct() {
        let raw = vec![
            RawRouteService::new("one", "http://1")
                .with_plan(RawPlan::new("one-a", "http://1a"))
                .with_plan(RawPlan::new("one-b", "http://1b")),
            RawRouteService::new("two", "http://2"),
            RawRouteService::new("three", "http://3").with_plan(RawPlan::new("three-a", "http://3a")),
        ];

        let services = prepare_catalog(raw).unwrap();
        let mut ids: Vec<&str> = services
            .iter()
            .flat_map(|s| std::iter::once(s.id.as_str()).chain(s.plans.iter().map(|p| p.id.as_str())))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(total, 7);
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_duplicate_names_are_not_rejected() {
        let raw = vec![
            RawRouteService::new("dup", "http://first"),
            RawRouteService::new("dup", "http://second"),
        ];

        let services = prepare_catalog(raw).unwrap();
        assert_eq!(services[0].id, services[1].id);
    }

    #[test]
    fn test_preparation_is_stable_across_runs() {
        let raw = vec![RawRouteService::new("echo", "http://echo.example.com")];
        assert_eq!(prepare_catalog(raw.clone()).unwrap(), prepare_catalog(raw).unwrap());
    }
}
