//! Boundary adapter that guards a handler with a requirement.
//!
//! The gate is transport-agnostic: it learns the caller's raw permissions
//! through a [`PermissionSource`], and reports denials back to its caller as
//! a [`GateOutcome`] instead of writing a response itself. It performs no
//! logging or auditing; hosts layer those on top of the outcome.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::{Decision, PermissionSet, Requirement, decide};

/// Extracts the raw permission string from an inbound request.
///
/// Implementations are trusted: the value must already be authenticated
/// upstream (e.g. a verified token claim). `None` means "no permissions".
pub trait PermissionSource<Req: ?Sized>: Send + Sync {
    fn raw_permissions<'r>(&self, request: &'r Req) -> Option<Cow<'r, str>>;
}

/// Source for requests that *are* the raw permission string (CLI guards, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSource;

impl<Req: AsRef<str> + ?Sized> PermissionSource<Req> for RawSource {
    fn raw_permissions<'r>(&self, request: &'r Req) -> Option<Cow<'r, str>> {
        Some(Cow::Borrowed(request.as_ref()))
    }
}

/// Result of passing a request through a gate.
#[derive(Debug)]
pub enum GateOutcome<T> {
    /// The handler ran; this is its output.
    Admitted(T),
    /// The handler was not invoked.
    Denied(Denial),
}

impl<T> GateOutcome<T> {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    /// Convert into a `Result`, for hosts that prefer `?` on the deny branch.
    pub fn into_result(self) -> Result<T, Denial> {
        match self {
            Self::Admitted(value) => Ok(value),
            Self::Denied(denial) => Err(denial),
        }
    }
}

/// A denied invocation.
///
/// `Display` intentionally says nothing about which permission was missing;
/// the detailed reason is only reachable through [`Denial::reason`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    decision: Decision,
}

impl Denial {
    /// Internal-only reason (for logs).
    pub fn reason(&self) -> Option<&str> {
        self.decision.reason()
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not authorized")
    }
}

/// A requirement bound to a permission source.
///
/// Cheap to clone; the requirement is shared, never copied or mutated.
#[derive(Clone)]
pub struct Gate<S> {
    requirement: Arc<dyn Requirement>,
    source: S,
}

impl<S> Gate<S> {
    pub fn new(requirement: Arc<dyn Requirement>, source: S) -> Self {
        Self { requirement, source }
    }

    /// Decide for a request without running anything.
    pub fn check<Req>(&self, request: &Req) -> Decision
    where
        Req: ?Sized,
        S: PermissionSource<Req>,
    {
        let raw = self.source.raw_permissions(request);
        let set = PermissionSet::from_raw_opt(raw.as_deref());
        decide(self.requirement.as_ref(), &set)
    }

    /// Run `handler` with the unchanged request only if the requirement holds.
    pub fn guard<Req, T, H>(&self, request: Req, handler: H) -> GateOutcome<T>
    where
        S: PermissionSource<Req>,
        H: FnOnce(Req) -> T,
    {
        let decision = self.check(&request);
        if decision.is_admitted() {
            GateOutcome::Admitted(handler(request))
        } else {
            GateOutcome::Denied(Denial { decision })
        }
    }

    /// Bind a reusable handler, producing a handler-shaped guarded value.
    pub fn wrap<H>(self, handler: H) -> Guarded<H, S> {
        Guarded { gate: self, handler }
    }
}

impl<S: fmt::Debug> fmt::Debug for Gate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("requirement", &self.requirement.describe())
            .field("source", &self.source)
            .finish()
    }
}

/// A handler wrapped by a [`Gate`].
///
/// For async handlers the admitted value is the handler's future; the host
/// awaits it.
#[derive(Debug, Clone)]
pub struct Guarded<H, S> {
    gate: Gate<S>,
    handler: H,
}

impl<H, S> Guarded<H, S> {
    pub fn call<Req, T>(&self, request: Req) -> GateOutcome<T>
    where
        S: PermissionSource<Req>,
        H: Fn(Req) -> T,
    {
        self.gate.guard(request, &self.handler)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;
    use crate::{All, Any, Not, Predicate};

    /// Minimal request shape: a header map plus a body.
    #[derive(Debug, Clone, PartialEq)]
    struct FakeRequest {
        headers: HashMap<&'static str, String>,
        body: &'static str,
    }

    impl FakeRequest {
        fn new(permissions: Option<&str>) -> Self {
            let mut headers = HashMap::new();
            if let Some(p) = permissions {
                headers.insert("permissions", p.to_string());
            }
            Self {
                headers,
                body: "payload",
            }
        }
    }

    #[derive(Debug)]
    struct HeaderLookup;

    impl PermissionSource<FakeRequest> for HeaderLookup {
        fn raw_permissions<'r>(&self, request: &'r FakeRequest) -> Option<Cow<'r, str>> {
            request.headers.get("permissions").map(|v| Cow::Borrowed(v.as_str()))
        }
    }

    fn gate(req: impl Requirement + 'static) -> Gate<HeaderLookup> {
        Gate::new(Arc::new(req), HeaderLookup)
    }

    #[test]
    fn admitted_request_reaches_handler_unchanged() {
        let gate = gate(Any::new(["super_admin", "admin"]).unwrap());
        let request = FakeRequest::new(Some("admin guest"));
        let expected = request.clone();

        let outcome = gate.guard(request, |seen| seen);
        match outcome {
            GateOutcome::Admitted(seen) => assert_eq!(seen, expected),
            GateOutcome::Denied(_) => panic!("expected admission"),
        }
    }

    #[test]
    fn denied_request_never_invokes_handler() {
        let gate = gate(All::new(["user", "customers_get"]).unwrap());
        let calls = Cell::new(0);

        let outcome = gate.guard(FakeRequest::new(Some("user")), |_| calls.set(calls.get() + 1));

        assert!(!outcome.is_admitted());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn missing_permissions_are_denied() {
        let gate = gate(All::new(["super_admin", "customers_delete"]).unwrap());
        let decision = gate.check(&FakeRequest::new(None));
        assert!(!decision.is_admitted());
    }

    #[test]
    fn denial_display_does_not_leak_tokens() {
        let gate = gate(All::new(["user", "customers_get"]).unwrap());
        let denial = gate
            .guard(FakeRequest::new(Some("user")), |r| r.body)
            .into_result()
            .unwrap_err();

        assert_eq!(denial.to_string(), "not authorized");
        assert!(denial.reason().unwrap().contains("customers_get"));
    }

    #[test]
    fn wrapped_handler_is_reusable() {
        let guarded = gate(Any::new(["admin", "accounts_get"]).unwrap()).wrap(|r: FakeRequest| r.body.len());

        assert_eq!(guarded.call(FakeRequest::new(Some("accounts_get"))).into_result().unwrap(), 7);
        assert!(!guarded.call(FakeRequest::new(Some("guest"))).is_admitted());
        assert!(guarded.call(FakeRequest::new(Some("admin"))).is_admitted());
    }

    #[test]
    fn custom_requirements_plug_into_gate() {
        let not_banned = Not::new(Predicate::new("banned", |s: &PermissionSet| s.contains("banned")));
        let guarded = gate(not_banned).wrap(|_: FakeRequest| ());

        assert!(guarded.call(FakeRequest::new(None)).is_admitted());
        assert!(!guarded.call(FakeRequest::new(Some("banned"))).is_admitted());
    }

    #[test]
    fn raw_source_guards_plain_strings() {
        let gate = Gate::new(Arc::new(Any::new(["admin"]).unwrap()), RawSource);
        assert!(gate.check("admin").is_admitted());
        assert!(!gate.check("").is_admitted());
        assert!(gate.guard(String::from("admin"), |s| s.len()).is_admitted());
    }
}
