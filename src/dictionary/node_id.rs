//! Surrogate node identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate node-id assigned by the node dictionary.
///
/// A node-id round-trips to exactly one term. The id `0` is reserved as the
/// null/invalid marker and is never assigned to a term.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(u64);

impl NodeId {
    /// Reserved null/invalid id, never assigned
    pub const NULL: NodeId = NodeId(0);

    /// First assignable id
    pub const FIRST: NodeId = NodeId(1);

    /// Largest representable id (range-scan upper bound)
    pub const MAX: NodeId = NodeId(u64::MAX);

    /// Create a node-id from a raw value
    pub const fn new(id: u64) -> Self {
        NodeId(id)
    }

    /// Raw value of this id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// The next id in assignment order
    pub const fn next(&self) -> Self {
        NodeId(self.0 + 1)
    }

    /// Whether this is the reserved null id
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{}", self.0)
    }
}
