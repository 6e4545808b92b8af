//! Tuple tables: fixed-arity indexes over surrogate node-ids
//!
//! A [`TupleTable`] stores a set of `[NodeId; N]` rows in natural order and
//! answers pattern finds by range-scanning the bound prefix and filtering the
//! rest. [`NodeTupleTable`] layers node↔id translation on top.

pub mod node_tuple_table;

pub use node_tuple_table::NodeTupleTable;

use crate::dictionary::NodeId;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use tracing::trace;

/// Pattern over an id-tuple: `None` matches any id in that position.
pub type IdPattern<const N: usize> = [Option<NodeId>; N];

/// Ordered set of fixed-arity node-id tuples.
///
/// A stored tuple set is a mathematical set: `add` of a present row and
/// `delete` of an absent row are no-ops, reported through the returned bool.
pub struct TupleTable<const N: usize> {
    rows: RwLock<BTreeSet<[NodeId; N]>>,
}

impl<const N: usize> TupleTable<N> {
    /// Create an empty tuple table
    pub fn new() -> Self {
        TupleTable {
            rows: RwLock::new(BTreeSet::new()),
        }
    }

    /// Insert a row. Returns true if the row was not already present.
    pub fn add(&self, row: [NodeId; N]) -> bool {
        self.rows.write().insert(row)
    }

    /// Delete a row. Returns true if the row was present.
    pub fn delete(&self, row: &[NodeId; N]) -> bool {
        self.rows.write().remove(row)
    }

    /// Find rows matching a pattern, optionally capped at `limit` results.
    ///
    /// The longest bound prefix of the pattern narrows the scan to a key
    /// range; positions bound after the first wildcard are filtered.
    pub fn find(&self, pattern: IdPattern<N>, limit: Option<usize>) -> Vec<[NodeId; N]> {
        let rows = self.rows.read();
        let cap = limit.unwrap_or(usize::MAX);
        if cap == 0 {
            return Vec::new();
        }

        let prefix_len = pattern.iter().take_while(|slot| slot.is_some()).count();

        let mut lo = [NodeId::NULL; N];
        let mut hi = [NodeId::MAX; N];
        for i in 0..prefix_len {
            let bound = pattern[i].unwrap_or(NodeId::NULL);
            lo[i] = bound;
            hi[i] = bound;
        }

        let mut out = Vec::new();
        for row in rows.range(lo..=hi) {
            if Self::matches(row, &pattern, prefix_len) {
                out.push(*row);
                if out.len() >= cap {
                    break;
                }
            }
        }
        out
    }

    /// All rows, in natural order
    pub fn find_all(&self) -> Vec<[NodeId; N]> {
        self.rows.read().iter().copied().collect()
    }

    /// Check whether a fully-bound row is present
    pub fn contains(&self, row: &[NodeId; N]) -> bool {
        self.rows.read().contains(row)
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Remove every row. The dictionary that produced the ids is untouched.
    pub fn clear(&self) {
        self.rows.write().clear();
    }

    /// Flush pending state to stable storage.
    ///
    /// In-memory tables have nothing to flush; storage-backed variants hook
    /// their write-back here.
    pub fn sync(&self) {
        trace!(rows = self.len(), "tuple table sync");
    }

    fn matches(row: &[NodeId; N], pattern: &IdPattern<N>, prefix_len: usize) -> bool {
        pattern
            .iter()
            .enumerate()
            .skip(prefix_len)
            .all(|(i, slot)| slot.map_or(true, |id| row[i] == id))
    }
}

impl<const N: usize> Default for TupleTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
