//! Startup configuration.
//!
//! Everything is resolved once, before the router is built; nothing here is
//! consulted on the request path.

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gatekeeper_auth::{All, Any, PolicyError, Requirement};

pub const BIND_ADDR_ENV: &str = "GATEKEEPER_BIND_ADDR";
pub const PERMISSIONS_HEADER_ENV: &str = "GATEKEEPER_PERMISSIONS_HEADER";
pub const POLICY_FILE_ENV: &str = "GATEKEEPER_POLICY_FILE";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_PERMISSIONS_HEADER: &str = "x-permissions";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("invalid permissions header name '{0}'")]
    InvalidHeaderName(String),

    #[error("failed to read policy file '{}': {source}", path.display())]
    PolicyFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse policy file '{}': {source}", path.display())]
    PolicyFileParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("route '{route}': {source}")]
    Policy { route: String, source: PolicyError },

    #[error("duplicate policy for route '{0}'")]
    DuplicateRoute(String),

    #[error("no policy configured for route '{0}'")]
    MissingRoute(String),

    #[error("policy configured for unknown route '{0}'")]
    UnknownRoute(String),
}

/// Declarative requirement for one route.
///
/// Only the two built-in combinators are expressible here; richer
/// requirements are registered programmatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementConfig {
    All(Vec<String>),
    Any(Vec<String>),
}

impl RequirementConfig {
    pub fn build(&self) -> Result<Arc<dyn Requirement>, PolicyError> {
        let requirement: Arc<dyn Requirement> = match self {
            Self::All(tokens) => Arc::new(All::new(tokens.iter().cloned())?),
            Self::Any(tokens) => Arc::new(Any::new(tokens.iter().cloned())?),
        };
        Ok(requirement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub route: String,
    #[serde(flatten)]
    pub requirement: RequirementConfig,
}

impl RoutePolicy {
    fn new(route: &str, requirement: RequirementConfig) -> Self {
        Self {
            route: route.to_string(),
            requirement,
        }
    }
}

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// Route policy table as read from JSON.
///
/// ```json
/// { "routes": [ { "route": "admin", "any": ["super_admin", "admin"] } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub routes: Vec<RoutePolicy>,
}

impl PolicyConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::PolicyFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::PolicyFileParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        use RequirementConfig::{All, Any};

        Self {
            routes: vec![
                RoutePolicy::new("admin", Any(tokens(&["super_admin", "admin"]))),
                RoutePolicy::new("customers_list", All(tokens(&["user", "customers_get"]))),
                RoutePolicy::new(
                    "customers_delete",
                    All(tokens(&["super_admin", "customers_delete"])),
                ),
                RoutePolicy::new("accounts_list", Any(tokens(&["admin", "accounts_get"]))),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Header carrying the caller's space-separated permissions.
    ///
    /// Must be set (or overwritten) by a trusted upstream component.
    pub permissions_header: HeaderName,
    pub policies: PolicyConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup (env, tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = lookup(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        let header =
            lookup(PERMISSIONS_HEADER_ENV).unwrap_or_else(|| DEFAULT_PERMISSIONS_HEADER.to_string());
        let permissions_header = HeaderName::from_bytes(header.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(header.clone()))?;

        let policies = match lookup(POLICY_FILE_ENV) {
            Some(path) => PolicyConfig::from_file(Path::new(&path))?,
            None => PolicyConfig::default(),
        };

        Ok(Self {
            bind_addr,
            permissions_header,
            policies,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            permissions_header: HeaderName::from_static(DEFAULT_PERMISSIONS_HEADER),
            policies: PolicyConfig::default(),
        }
    }
}
