//! Node identifiers.
//!
//! Callers name nodes with whatever tokens their data carries, integers or
//! strings; `1` and `"1"` are the same token. Each distinct token is
//! resolved once, at ingestion, into:
//! - An [`ExternalId`] that round-trips back to the caller's token
//! - A dense [`NodeId`] handle used by the layout engines

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Dense node handle, assigned in order of first appearance in the edge list.
///
/// Handles are only meaningful for the graph model that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position of this node in per-node buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The caller's own node token.
///
/// Equality and hashing go through the string form, so `Int(1)` and
/// `Str("1")` name the same node. The first spelling seen is the one kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Int(i64),
    Str(String),
}

impl ExternalId {
    /// Canonical string form, used as the node's key.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            ExternalId::Int(value) => Cow::Owned(value.to_string()),
            ExternalId::Str(value) => Cow::Borrowed(value),
        }
    }
}

impl PartialEq for ExternalId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExternalId::Int(a), ExternalId::Int(b)) => a == b,
            (ExternalId::Str(a), ExternalId::Str(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl Eq for ExternalId {}

impl Hash for ExternalId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalId::Int(value) => write!(f, "{value}"),
            ExternalId::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for ExternalId {
    fn from(value: i64) -> Self {
        ExternalId::Int(value)
    }
}

impl From<i32> for ExternalId {
    fn from(value: i32) -> Self {
        ExternalId::Int(value.into())
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        ExternalId::Str(value.to_owned())
    }
}

impl From<String> for ExternalId {
    fn from(value: String) -> Self {
        ExternalId::Str(value)
    }
}
