//! `gatekeeper-auth` — composable permission-requirement evaluation.
//!
//! This crate is intentionally decoupled from HTTP, storage, and logging.
//! It turns a caller's raw permission string into a [`PermissionSet`],
//! evaluates a [`Requirement`] against it, and exposes a [`Gate`] that hosts
//! mount in front of their handlers.

pub mod decision;
pub mod error;
pub mod gate;
pub mod permissions;
pub mod requirement;
pub mod set;

pub use decision::{Decision, decide, evaluate};
pub use error::{PolicyError, PolicyResult};
pub use gate::{Denial, Gate, GateOutcome, Guarded, PermissionSource, RawSource};
pub use permissions::Permission;
pub use requirement::{All, AllOf, Any, AnyOf, Not, Predicate, Requirement};
pub use set::PermissionSet;
