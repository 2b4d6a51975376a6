//! Policy construction errors.
//!
//! These only occur while building requirements (route registration time).
//! A denied request is a decision, never an error.

use thiserror::Error;

pub type PolicyResult<T> = Result<T, PolicyError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A token requirement was built with nothing to check.
    #[error("'{kind}' requirement must list at least one permission")]
    EmptyRequirement { kind: &'static str },

    /// A token that no parsed permission set can ever hold (empty, or
    /// containing the whitespace used to delimit tokens on the wire).
    #[error("'{kind}' requirement lists invalid permission '{token}'")]
    InvalidToken { kind: &'static str, token: String },

    /// A composite requirement was built with no children.
    #[error("'{kind}' requirement must contain at least one child requirement")]
    EmptyComposite { kind: &'static str },
}
