//! Route policy table, built once at startup and passed down explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use gatekeeper_auth::{PolicyResult, Requirement};

use crate::config::{ConfigError, PolicyConfig};

/// Immutable map of route name to requirement.
///
/// Requirements are shared read-only with every request on their route.
#[derive(Debug, Clone, Default)]
pub struct RoutePolicies {
    routes: HashMap<String, Arc<dyn Requirement>>,
}

impl RoutePolicies {
    pub fn builder() -> RoutePoliciesBuilder {
        RoutePoliciesBuilder::default()
    }

    pub fn from_config(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        for entry in &config.routes {
            builder = builder.route_shared(&entry.route, entry.requirement.build());
        }
        builder.build()
    }

    pub fn get(&self, route: &str) -> Option<&Arc<dyn Requirement>> {
        self.routes.get(route)
    }

    /// Look up a route that must be configured.
    pub fn require(&self, route: &str) -> Result<Arc<dyn Requirement>, ConfigError> {
        self.get(route)
            .cloned()
            .ok_or_else(|| ConfigError::MissingRoute(route.to_string()))
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects route registrations; the first failure wins and is reported by
/// [`RoutePoliciesBuilder::build`].
#[derive(Debug, Default)]
pub struct RoutePoliciesBuilder {
    routes: HashMap<String, Arc<dyn Requirement>>,
    error: Option<ConfigError>,
}

impl RoutePoliciesBuilder {
    pub fn route<R>(self, name: &str, requirement: PolicyResult<R>) -> Self
    where
        R: Requirement + 'static,
    {
        let shared = requirement.map(|r| Arc::new(r) as Arc<dyn Requirement>);
        self.route_shared(name, shared)
    }

    /// Register an already shared requirement as is.
    pub fn route_shared(
        mut self,
        name: &str,
        requirement: PolicyResult<Arc<dyn Requirement>>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }

        match requirement {
            Ok(_) if self.routes.contains_key(name) => {
                self.error = Some(ConfigError::DuplicateRoute(name.to_string()));
            }
            Ok(requirement) => {
                self.routes.insert(name.to_string(), requirement);
            }
            Err(source) => {
                self.error = Some(ConfigError::Policy {
                    route: name.to_string(),
                    source,
                });
            }
        }
        self
    }

    pub fn build(self) -> Result<RoutePolicies, ConfigError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(RoutePolicies {
                routes: self.routes,
            }),
        }
    }
}
