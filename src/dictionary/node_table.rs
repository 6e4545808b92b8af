//! NodeTable for Term ↔ NodeId mapping

use super::node_id::NodeId;
use super::term::Term;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// NodeTable provides bidirectional mapping between Terms and NodeIds.
///
/// Two maps are maintained:
/// - term_to_id: Term → NodeId (for encoding)
/// - id_to_term: NodeId → Term (for decoding)
///
/// Ids are assigned once and never reclaimed; clearing the tuple tables of a
/// dataset leaves the dictionary untouched, so previously assigned ids stay
/// valid even when nothing references them any more.
pub struct NodeTable {
    term_to_id: RwLock<HashMap<Term, NodeId>>,
    id_to_term: RwLock<HashMap<NodeId, Term>>,
    next_id: RwLock<NodeId>,
}

impl NodeTable {
    /// Create a new empty NodeTable
    pub fn new() -> Self {
        NodeTable {
            term_to_id: RwLock::new(HashMap::new()),
            id_to_term: RwLock::new(HashMap::new()),
            next_id: RwLock::new(NodeId::FIRST),
        }
    }

    /// Get or create a NodeId for a term.
    ///
    /// If the term already exists, returns its NodeId. Otherwise assigns a
    /// new NodeId and stores the mapping in both directions.
    pub fn get_or_create(&self, term: &Term) -> Result<NodeId> {
        {
            let term_to_id = self.term_to_id.read();
            if let Some(&id) = term_to_id.get(term) {
                return Ok(id);
            }
        }

        let mut term_to_id = self.term_to_id.write();
        let mut id_to_term = self.id_to_term.write();
        let mut next_id = self.next_id.write();

        // Double-check under the write lock (another thread may have won)
        if let Some(&id) = term_to_id.get(term) {
            return Ok(id);
        }

        let id = *next_id;
        *next_id = next_id.next();

        term_to_id.insert(term.clone(), id);
        id_to_term.insert(id, term.clone());

        Ok(id)
    }

    /// Get the NodeId for a term (returns None if not found)
    pub fn get_id(&self, term: &Term) -> Result<Option<NodeId>> {
        Ok(self.term_to_id.read().get(term).copied())
    }

    /// Get the Term for a NodeId (returns None if not found)
    pub fn get_term(&self, id: NodeId) -> Result<Option<Term>> {
        Ok(self.id_to_term.read().get(&id).cloned())
    }

    /// Check if a term exists in the dictionary
    pub fn contains(&self, term: &Term) -> Result<bool> {
        Ok(self.get_id(term)?.is_some())
    }

    /// Total number of terms stored
    pub fn len(&self) -> usize {
        self.id_to_term.read().len()
    }

    /// Whether the dictionary holds no terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_table_get_or_create() -> Result<()> {
        let table = NodeTable::new();

        let term1 = Term::iri("http://example.org/resource1");
        let term2 = Term::iri("http://example.org/resource2");

        let id1 = table.get_or_create(&term1)?;
        let id2 = table.get_or_create(&term2)?;

        // Different terms get different IDs
        assert_ne!(id1, id2);

        // Same term gets the same ID
        let id1_again = table.get_or_create(&term1)?;
        assert_eq!(id1, id1_again);

        Ok(())
    }

    #[test]
    fn test_node_table_bidirectional_mapping() -> Result<()> {
        let table = NodeTable::new();

        let term = Term::lang_literal("Hello World", "en");
        let id = table.get_or_create(&term)?;

        assert_eq!(table.get_id(&term)?, Some(id));
        assert_eq!(table.get_term(id)?, Some(term));

        Ok(())
    }

    #[test]
    fn test_node_table_not_found() -> Result<()> {
        let table = NodeTable::new();

        assert_eq!(table.get_id(&Term::iri("http://not-exists.com"))?, None);
        assert_eq!(table.get_term(NodeId::new(999))?, None);

        Ok(())
    }

    #[test]
    fn test_node_table_len() -> Result<()> {
        let table = NodeTable::new();
        assert_eq!(table.len(), 0);

        table.get_or_create(&Term::iri("http://a.com"))?;
        assert_eq!(table.len(), 1);

        table.get_or_create(&Term::iri("http://b.com"))?;
        assert_eq!(table.len(), 2);

        // Creating the same term again does not grow the dictionary
        table.get_or_create(&Term::iri("http://a.com"))?;
        assert_eq!(table.len(), 2);

        Ok(())
    }

    #[test]
    fn test_node_table_null_never_assigned() -> Result<()> {
        let table = NodeTable::new();
        let id = table.get_or_create(&Term::literal("first"))?;
        assert!(!id.is_null());
        Ok(())
    }

    #[test]
    fn test_node_table_multiple_term_types() -> Result<()> {
        let table = NodeTable::new();

        let iri = Term::iri("http://example.org");
        let literal = Term::literal("test value");
        let blank = Term::blank_node("b0");

        let id1 = table.get_or_create(&iri)?;
        let id2 = table.get_or_create(&literal)?;
        let id3 = table.get_or_create(&blank)?;

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);

        assert_eq!(table.get_term(id1)?, Some(iri));
        assert_eq!(table.get_term(id2)?, Some(literal));
        assert_eq!(table.get_term(id3)?, Some(blank));

        Ok(())
    }
}
