//! The caller's held permissions, scoped to one request.

use std::collections::HashSet;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::Permission;

/// Immutable, de-duplicated set of permission tokens held by a caller.
///
/// Built once per request from the raw wire representation and read-only
/// afterwards. There is intentionally no way to insert or remove tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    tokens: HashSet<Permission>,
}

impl PermissionSet {
    /// A set holding no permissions (anonymous caller).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a whitespace-delimited token string.
    ///
    /// Empty, whitespace-only, or oddly spaced input never fails: runs of
    /// delimiters and leading/trailing delimiters produce no empty tokens.
    pub fn from_raw(raw: &str) -> Self {
        raw.split_ascii_whitespace()
            .map(|token| Permission::new(token.to_owned()))
            .collect()
    }

    /// Like [`PermissionSet::from_raw`], treating a missing value as empty.
    pub fn from_raw_opt(raw: Option<&str>) -> Self {
        raw.map(Self::from_raw).unwrap_or_default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in lexical order (stable output for diagnostics).
    pub fn sorted(&self) -> Vec<&Permission> {
        let mut out: Vec<&Permission> = self.tokens.iter().collect();
        out.sort();
        out
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl FromStr for PermissionSet {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s))
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}
