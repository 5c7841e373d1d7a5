//! Element ids.
//!
//! Ids are plain strings in the document JSON and interned `NodeId`s in
//! memory. Every id is unique across the whole document: the scene tree
//! and every master subtree share one namespace, and a master's registry
//! key is its root element's id (`Document::from_parts` rejects anything
//! else). Ids loaded from JSON are kept verbatim; an empty id is refused.
//!
//! Ids minted by the editor are `<kind>_<n>`, where `<kind>` is the
//! element's type name (`rect_12`, `frame_3`) or `master` for promoted
//! masters, and `n` comes from a process-wide counter. The counter alone
//! does not make an id free: an imported document may already hold
//! `rect_12`, so `SceneGraph::fresh_id` keeps drawing until the id is in
//! neither the tree nor the master registry.

use lasso::{Spur, ThreadedRodeo};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Next suffix handed out by `NodeId::with_prefix`.
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// An interned element id. `Copy` and four bytes wide; equality and
/// hashing never touch the string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Spur);

impl NodeId {
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Mint `<prefix>_<n>` with the next counter value.
    ///
    /// Not checked against any document; go through
    /// `Document::fresh_id` or `SceneGraph::fresh_id` when inserting.
    pub fn with_prefix(prefix: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(D::Error::custom("element id must not be empty"));
        }
        Ok(NodeId::intern(&s))
    }
}
