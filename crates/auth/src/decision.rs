//! Admit/deny decisions and the evaluator entry points.

use serde::Serialize;

use crate::{PermissionSet, Requirement};

/// Outcome of evaluating one requirement against one permission set.
///
/// Produced fresh on every call; never cached across requests. The reason is
/// for internal observability only and must not be surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    admitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl Decision {
    pub fn admit() -> Self {
        Self {
            admitted: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            admitted: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.admitted
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

impl From<bool> for Decision {
    fn from(admitted: bool) -> Self {
        Self {
            admitted,
            reason: None,
        }
    }
}

/// Evaluate a requirement against a permission set.
///
/// - No IO
/// - No panics
/// - No knowledge of concrete requirement variants
pub fn evaluate(requirement: &dyn Requirement, set: &PermissionSet) -> bool {
    requirement.is_satisfied(set)
}

/// Evaluate, attaching an internal reason to denials.
///
/// Admissions carry no reason, so the admit path costs no more than
/// [`evaluate`].
pub fn decide(requirement: &dyn Requirement, set: &PermissionSet) -> Decision {
    if evaluate(requirement, set) {
        Decision::admit()
    } else {
        Decision::deny(format!("not satisfied: {}", requirement.describe()))
    }
}
