//! Node-level view over a tuple table
//!
//! Translates between full terms and surrogate node-ids at the table
//! boundary, so the underlying index only ever sees ids.

use super::{IdPattern, TupleTable};
use crate::dictionary::{NodeId, NodeTable, Term};
use crate::error::{Result, StoreError};
use std::sync::Arc;

/// Term pattern over an N-ary row: `None` matches any term.
pub type TermPattern<'a, const N: usize> = [Option<&'a Term>; N];

/// A tuple table plus the shared node dictionary needed for translation.
///
/// The dictionary is shared: both tables of a dataset intern into the same
/// [`NodeTable`], so a graph name and a subject resolve to the same id.
pub struct NodeTupleTable<const N: usize> {
    node_table: Arc<NodeTable>,
    tuple_table: TupleTable<N>,
}

impl<const N: usize> NodeTupleTable<N> {
    /// Create a node tuple table over a shared dictionary
    pub fn new(node_table: Arc<NodeTable>) -> Self {
        NodeTupleTable {
            node_table,
            tuple_table: TupleTable::new(),
        }
    }

    /// Add a row of terms, interning any new ones.
    /// Returns true if the row was not already present.
    pub fn add_row(&self, row: [&Term; N]) -> Result<bool> {
        let mut ids = [NodeId::NULL; N];
        for (slot, term) in ids.iter_mut().zip(row.iter()) {
            *slot = self.node_table.get_or_create(term)?;
        }
        Ok(self.tuple_table.add(ids))
    }

    /// Delete a row of terms. A term with no id means the row cannot be
    /// stored, so this is a no-op returning false.
    pub fn delete_row(&self, row: [&Term; N]) -> Result<bool> {
        let mut ids = [NodeId::NULL; N];
        for (slot, term) in ids.iter_mut().zip(row.iter()) {
            match self.node_table.get_id(term)? {
                Some(id) => *slot = id,
                None => return Ok(false),
            }
        }
        Ok(self.tuple_table.delete(&ids))
    }

    /// Find matching rows as id-tuples.
    ///
    /// Returns `None` when a bound term has no node-id: there is nothing to
    /// iterate. Callers must treat `None` and an empty result identically as
    /// zero matches.
    pub fn find_as_node_ids(&self, pattern: TermPattern<'_, N>) -> Result<Option<Vec<[NodeId; N]>>> {
        self.find_as_node_ids_limited(pattern, None)
    }

    /// As [`find_as_node_ids`](Self::find_as_node_ids), capped at `limit` rows.
    pub fn find_as_node_ids_limited(
        &self,
        pattern: TermPattern<'_, N>,
        limit: Option<usize>,
    ) -> Result<Option<Vec<[NodeId; N]>>> {
        let id_pattern = match self.translate_pattern(pattern)? {
            Some(p) => p,
            None => return Ok(None),
        };
        Ok(Some(self.tuple_table.find(id_pattern, limit)))
    }

    /// Find matching rows as terms
    pub fn find(&self, pattern: TermPattern<'_, N>) -> Result<Vec<[Term; N]>> {
        let rows = match self.find_as_node_ids(pattern)? {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };
        rows.iter().map(|row| self.translate_row(row)).collect()
    }

    /// All rows as id-tuples, in index order
    pub fn find_all(&self) -> Vec<[NodeId; N]> {
        self.tuple_table.find_all()
    }

    /// Check whether a fully-bound row of terms is present
    pub fn contains_row(&self, row: [&Term; N]) -> Result<bool> {
        let pattern = row.map(Some);
        match self.find_as_node_ids_limited(pattern, Some(1))? {
            Some(rows) => Ok(!rows.is_empty()),
            None => Ok(false),
        }
    }

    /// Translate a stored id-tuple back to terms
    pub fn translate_row(&self, row: &[NodeId; N]) -> Result<[Term; N]> {
        let mut out: [Term; N] = std::array::from_fn(|_| Term::Iri(String::new()));
        for (slot, id) in out.iter_mut().zip(row.iter()) {
            *slot = self
                .node_table
                .get_term(*id)?
                .ok_or(StoreError::InvalidNodeId(id.as_u64()))?;
        }
        Ok(out)
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.tuple_table.len()
    }

    /// Whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.tuple_table.is_empty()
    }

    /// Remove every row, leaving the dictionary alone
    pub fn clear(&self) {
        self.tuple_table.clear();
    }

    /// Flush the underlying index
    pub fn sync(&self) {
        self.tuple_table.sync();
    }

    /// The shared node dictionary
    pub fn node_table(&self) -> &Arc<NodeTable> {
        &self.node_table
    }

    /// The raw tuple table, for id-level operations
    pub fn tuple_table(&self) -> &TupleTable<N> {
        &self.tuple_table
    }

    fn translate_pattern(&self, pattern: TermPattern<'_, N>) -> Result<Option<IdPattern<N>>> {
        let mut out = [None; N];
        for (slot, term) in out.iter_mut().zip(pattern.iter()) {
            if let Some(term) = term {
                match self.node_table.get_id(term)? {
                    Some(id) => *slot = Some(id),
                    // Bound term unknown to the dictionary: nothing matches.
                    None => return Ok(None),
                }
            }
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NodeTupleTable<3> {
        NodeTupleTable::new(Arc::new(NodeTable::new()))
    }

    #[test]
    fn test_add_and_find_roundtrip() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");

        assert!(t.add_row([&s, &p, &o])?);
        assert!(!t.add_row([&s, &p, &o])?);

        let found = t.find([Some(&s), None, None])?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], [s.clone(), p.clone(), o.clone()]);

        Ok(())
    }

    #[test]
    fn test_unknown_bound_term_yields_none() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");
        t.add_row([&s, &p, &o])?;

        let unknown = Term::iri("http://example.org/never-seen");
        assert!(t.find_as_node_ids([Some(&unknown), None, None])?.is_none());
        // Node-level find treats that as zero matches
        assert!(t.find([Some(&unknown), None, None])?.is_empty());

        Ok(())
    }

    #[test]
    fn test_known_term_no_rows_yields_empty() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");
        t.add_row([&s, &p, &o])?;
        t.delete_row([&s, &p, &o])?;

        // Terms are interned, so the pattern translates but matches nothing
        let found = t.find_as_node_ids([Some(&s), None, None])?;
        assert_eq!(found, Some(Vec::new()));

        Ok(())
    }

    #[test]
    fn test_delete_unknown_row_is_noop() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");

        assert!(!t.delete_row([&s, &p, &o])?);
        Ok(())
    }

    #[test]
    fn test_clear_preserves_dictionary() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");
        t.add_row([&s, &p, &o])?;

        let dict_len = t.node_table().len();
        t.clear();

        assert!(t.is_empty());
        assert_eq!(t.node_table().len(), dict_len);
        assert!(t.node_table().get_id(&s)?.is_some());

        Ok(())
    }

    #[test]
    fn test_contains_row() -> Result<()> {
        let t = table();
        let s = Term::iri("http://example.org/s");
        let p = Term::iri("http://example.org/p");
        let o = Term::literal("o");

        assert!(!t.contains_row([&s, &p, &o])?);
        t.add_row([&s, &p, &o])?;
        assert!(t.contains_row([&s, &p, &o])?);

        Ok(())
    }
}
