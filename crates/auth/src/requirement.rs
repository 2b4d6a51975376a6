//! Requirement capability and its built-in variants.
//!
//! Every requirement answers one question: is it satisfied by a given
//! [`PermissionSet`]? The evaluator and the gate only ever see that
//! capability, so new variants plug in without touching either.
//!
//! Requirements are immutable after construction and are shared read-only
//! across concurrent requests (`Send + Sync` is part of the contract).

use std::fmt;
use std::sync::Arc;

use crate::{Permission, PermissionSet, PolicyError, PolicyResult};

/// "What must be true of the caller's permission set."
pub trait Requirement: Send + Sync + fmt::Debug {
    /// Pure check; never fails and never mutates.
    fn is_satisfied(&self, set: &PermissionSet) -> bool;

    /// Internal-only description used for decision reasons.
    fn describe(&self) -> String {
        "custom requirement".to_string()
    }
}

impl<R: Requirement + ?Sized> Requirement for &R {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        (**self).is_satisfied(set)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<R: Requirement + ?Sized> Requirement for Box<R> {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        (**self).is_satisfied(set)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<R: Requirement + ?Sized> Requirement for Arc<R> {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        (**self).is_satisfied(set)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Collect tokens, dropping duplicates but keeping first-seen order.
///
/// Tokens must be matchable: `PermissionSet::from_raw` never yields empty
/// tokens or tokens containing ASCII whitespace.
fn collect_tokens<I, P>(kind: &'static str, tokens: I) -> PolicyResult<Box<[Permission]>>
where
    I: IntoIterator<Item = P>,
    P: Into<Permission>,
{
    let mut out: Vec<Permission> = Vec::new();
    for token in tokens {
        let token = token.into();
        let raw = token.as_str();
        if raw.is_empty() || raw.bytes().any(|b| b.is_ascii_whitespace()) {
            return Err(PolicyError::InvalidToken {
                kind,
                token: raw.to_string(),
            });
        }
        if !out.contains(&token) {
            out.push(token);
        }
    }

    if out.is_empty() {
        return Err(PolicyError::EmptyRequirement { kind });
    }

    Ok(out.into_boxed_slice())
}

fn join_tokens(tokens: &[Permission]) -> String {
    tokens
        .iter()
        .map(Permission::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Satisfied iff every listed token is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct All {
    tokens: Box<[Permission]>,
}

impl All {
    pub fn new<I, P>(tokens: I) -> PolicyResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Ok(Self {
            tokens: collect_tokens("all", tokens)?,
        })
    }

    pub fn tokens(&self) -> &[Permission] {
        &self.tokens
    }
}

impl Requirement for All {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        // Stops at the first missing token.
        self.tokens.iter().all(|t| set.contains(t.as_str()))
    }

    fn describe(&self) -> String {
        format!("all of [{}]", join_tokens(&self.tokens))
    }
}

/// Satisfied iff at least one listed token is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Any {
    tokens: Box<[Permission]>,
}

impl Any {
    pub fn new<I, P>(tokens: I) -> PolicyResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        Ok(Self {
            tokens: collect_tokens("any", tokens)?,
        })
    }

    pub fn tokens(&self) -> &[Permission] {
        &self.tokens
    }
}

impl Requirement for Any {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        // Stops at the first held token.
        self.tokens.iter().any(|t| set.contains(t.as_str()))
    }

    fn describe(&self) -> String {
        format!("any of [{}]", join_tokens(&self.tokens))
    }
}

/// Satisfied iff the inner requirement is not.
#[derive(Debug, Clone)]
pub struct Not<R> {
    inner: R,
}

impl<R: Requirement> Not<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Requirement> Requirement for Not<R> {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        !self.inner.is_satisfied(set)
    }

    fn describe(&self) -> String {
        format!("not ({})", self.inner.describe())
    }
}

fn describe_children(children: &[Box<dyn Requirement>]) -> String {
    children
        .iter()
        .map(|c| c.describe())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Conjunction over child requirements, e.g. `all_of(any(..), all(..))`.
#[derive(Debug)]
pub struct AllOf {
    children: Box<[Box<dyn Requirement>]>,
}

impl AllOf {
    pub fn new(children: Vec<Box<dyn Requirement>>) -> PolicyResult<Self> {
        if children.is_empty() {
            return Err(PolicyError::EmptyComposite { kind: "all_of" });
        }
        Ok(Self {
            children: children.into_boxed_slice(),
        })
    }
}

impl Requirement for AllOf {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        self.children.iter().all(|c| c.is_satisfied(set))
    }

    fn describe(&self) -> String {
        format!("all_of ({})", describe_children(&self.children))
    }
}

/// Disjunction over child requirements.
#[derive(Debug)]
pub struct AnyOf {
    children: Box<[Box<dyn Requirement>]>,
}

impl AnyOf {
    pub fn new(children: Vec<Box<dyn Requirement>>) -> PolicyResult<Self> {
        if children.is_empty() {
            return Err(PolicyError::EmptyComposite { kind: "any_of" });
        }
        Ok(Self {
            children: children.into_boxed_slice(),
        })
    }
}

impl Requirement for AnyOf {
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        self.children.iter().any(|c| c.is_satisfied(set))
    }

    fn describe(&self) -> String {
        format!("any_of ({})", describe_children(&self.children))
    }
}

/// User-supplied check over the whole permission set.
pub struct Predicate<F> {
    name: String,
    check: F,
}

impl<F> Predicate<F>
where
    F: Fn(&PermissionSet) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

impl<F> Requirement for Predicate<F>
where
    F: Fn(&PermissionSet) -> bool + Send + Sync,
{
    fn is_satisfied(&self, set: &PermissionSet) -> bool {
        (self.check)(set)
    }

    fn describe(&self) -> String {
        format!("predicate '{}'", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(raw: &str) -> PermissionSet {
        PermissionSet::from_raw(raw)
    }

    #[test]
    fn all_requires_every_token() {
        let req = All::new(["a", "b", "c"]).unwrap();
        assert!(!req.is_satisfied(&set("a")));
        assert!(req.is_satisfied(&set("a b c d")));
    }

    #[test]
    fn any_succeeds_on_partial_overlap() {
        let req = Any::new(["admin", "root"]).unwrap();
        assert!(req.is_satisfied(&set("root guest")));
        assert!(!req.is_satisfied(&set("guest")));
    }

    #[test]
    fn empty_token_list_is_rejected_at_construction() {
        let all = All::new(Vec::<Permission>::new());
        assert_eq!(all, Err(PolicyError::EmptyRequirement { kind: "all" }));

        let any = Any::new(Vec::<&'static str>::new());
        assert_eq!(any, Err(PolicyError::EmptyRequirement { kind: "any" }));
    }

    #[test]
    fn unmatchable_tokens_are_rejected_at_construction() {
        assert_eq!(
            All::new([""]),
            Err(PolicyError::InvalidToken {
                kind: "all",
                token: String::new(),
            })
        );
        assert_eq!(
            Any::new(["admin", "admin user"]),
            Err(PolicyError::InvalidToken {
                kind: "any",
                token: "admin user".to_string(),
            })
        );
        assert!(All::new(["user", "\tcustomers_get"]).is_err());
        assert!(Any::new(["root\n"]).is_err());
    }

    #[test]
    fn duplicate_tokens_collapse_in_order() {
        let req = All::new(["b", "a", "b"]).unwrap();
        let names: Vec<&str> = req.tokens().iter().map(Permission::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn empty_set_fails_builtins() {
        let empty = PermissionSet::empty();
        assert!(!All::new(["user"]).unwrap().is_satisfied(&empty));
        assert!(!Any::new(["user", "admin"]).unwrap().is_satisfied(&empty));
    }

    #[test]
    fn not_inverts() {
        let req = Not::new(Any::new(["banned"]).unwrap());
        assert!(req.is_satisfied(&set("user")));
        assert!(!req.is_satisfied(&set("user banned")));
        assert_eq!(req.describe(), "not (any of [banned])");
    }

    #[test]
    fn nested_composites() {
        let req = AllOf::new(vec![
            Box::new(Any::new(["admin", "super_admin"]).unwrap()),
            Box::new(All::new(["customers_delete"]).unwrap()),
        ])
        .unwrap();

        assert!(req.is_satisfied(&set("admin customers_delete")));
        assert!(!req.is_satisfied(&set("admin")));
        assert!(!req.is_satisfied(&set("customers_delete")));

        let either = AnyOf::new(vec![Box::new(req), Box::new(All::new(["root"]).unwrap())]).unwrap();
        assert!(either.is_satisfied(&set("root")));
    }

    #[test]
    fn empty_composites_are_rejected() {
        assert_eq!(
            AllOf::new(Vec::new()).unwrap_err(),
            PolicyError::EmptyComposite { kind: "all_of" }
        );
        assert_eq!(
            AnyOf::new(Vec::new()).unwrap_err(),
            PolicyError::EmptyComposite { kind: "any_of" }
        );
    }

    #[test]
    fn predicate_sees_whole_set() {
        let at_least_two = Predicate::new("two or more", |s: &PermissionSet| s.len() >= 2);
        assert!(at_least_two.is_satisfied(&set("a b")));
        assert!(!at_least_two.is_satisfied(&set("a")));
        assert_eq!(at_least_two.describe(), "predicate 'two or more'");
    }

    #[test]
    fn smart_pointers_forward() {
        let shared: Arc<dyn Requirement> = Arc::new(All::new(["a"]).unwrap());
        let boxed: Box<dyn Requirement> = Box::new(Any::new(["b"]).unwrap());
        assert!(shared.is_satisfied(&set("a")));
        assert!(boxed.is_satisfied(&set("b")));
        assert_eq!(shared.describe(), "all of [a]");
    }

    fn token_vec() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-e]", 1..5)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: adding permissions never revokes an `All` grant.
        #[test]
        fn all_is_monotonic(
            required in token_vec(),
            held in prop::collection::vec("[a-e]", 0..5),
            extra in prop::collection::vec("[a-e]", 0..5),
        ) {
            let req = All::new(required).unwrap();
            let small = PermissionSet::from_raw(&held.join(" "));
            let large = PermissionSet::from_raw(&[held, extra].concat().join(" "));

            if req.is_satisfied(&small) {
                prop_assert!(req.is_satisfied(&large));
            }
        }

        /// Property: adding permissions never revokes an `Any` grant.
        #[test]
        fn any_is_monotonic(
            required in token_vec(),
            held in prop::collection::vec("[a-e]", 0..5),
            extra in prop::collection::vec("[a-e]", 0..5),
        ) {
            let req = Any::new(required).unwrap();
            let small = PermissionSet::from_raw(&held.join(" "));
            let large = PermissionSet::from_raw(&[held, extra].concat().join(" "));

            if req.is_satisfied(&small) {
                prop_assert!(req.is_satisfied(&large));
            }
        }

        /// Property: a caller without permissions never passes a built-in.
        #[test]
        fn empty_set_always_denied(required in token_vec()) {
            let empty = PermissionSet::empty();
            prop_assert!(!All::new(required.clone()).unwrap().is_satisfied(&empty));
            prop_assert!(!Any::new(required).unwrap().is_satisfied(&empty));
        }

        /// Property: results depend on the token set, not the listing order.
        #[test]
        fn order_does_not_matter(
            required in token_vec(),
            held in prop::collection::vec("[a-e]", 0..5),
        ) {
            let set = PermissionSet::from_raw(&held.join(" "));
            let mut reversed = required.clone();
            reversed.reverse();

            prop_assert_eq!(
                All::new(required.clone()).unwrap().is_satisfied(&set),
                All::new(reversed.clone()).unwrap().is_satisfied(&set)
            );
            prop_assert_eq!(
                Any::new(required).unwrap().is_satisfied(&set),
                Any::new(reversed).unwrap().is_satisfied(&set)
            );
        }
    }
}
