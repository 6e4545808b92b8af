//! Triple and quad tables
//!
//! Node-level value types plus the two table wrappers. A [`TripleTable`]
//! holds the default graph as 3-ary tuples; a [`QuadTable`] holds the named
//! graphs as 4-ary tuples with the graph id in position 0. Both delegate to
//! a [`NodeTupleTable`] for translation and indexing.

use crate::dictionary::{NodeTable, Term};
use crate::error::Result;
use crate::tuple::NodeTupleTable;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;
use tracing::debug;

/// Reserved IRI naming the default graph in quad results
pub const DEFAULT_GRAPH_IRI: &str = "urn:x-arq:DefaultGraph";

/// Reserved IRI addressing the union of all named graphs
pub const UNION_GRAPH_IRI: &str = "urn:x-arq:UnionGraph";

/// A node-level triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

impl Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A node-level quad. Triples found in the default graph are surfaced as
/// quads with [`DEFAULT_GRAPH_IRI`] in the graph position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub graph: Term,
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Quad {
    /// Create a new quad
    pub fn new(graph: Term, subject: Term, predicate: Term, object: Term) -> Self {
        Quad {
            graph,
            subject,
            predicate,
            object,
        }
    }

    /// The quad's triple part, dropping the graph
    pub fn to_triple(&self) -> Triple {
        Triple::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
        )
    }

    /// Whether a graph name is the explicit default-graph marker
    pub fn is_default_graph(graph: &Term) -> bool {
        matches!(graph, Term::Iri(iri) if iri == DEFAULT_GRAPH_IRI)
    }

    /// Whether a graph name is the union-graph marker
    pub fn is_union_graph(graph: &Term) -> bool {
        matches!(graph, Term::Iri(iri) if iri == UNION_GRAPH_IRI)
    }

    /// The default-graph marker term
    pub fn default_graph_node() -> Term {
        Term::iri(DEFAULT_GRAPH_IRI)
    }

    /// The union-graph marker term
    pub fn union_graph_node() -> Term {
        Term::iri(UNION_GRAPH_IRI)
    }
}

impl Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} .",
            self.graph, self.subject, self.predicate, self.object
        )
    }
}

/// Table of default-graph triples
pub struct TripleTable {
    table: NodeTupleTable<3>,
}

impl TripleTable {
    /// Create a triple table over a shared dictionary
    pub fn new(node_table: Arc<NodeTable>) -> Self {
        TripleTable {
            table: NodeTupleTable::new(node_table),
        }
    }

    /// Pattern find; `None` slots match anything
    pub fn find(
        &self,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Triple>> {
        let rows = self.table.find([s, p, o])?;
        Ok(rows
            .into_iter()
            .map(|[s, p, o]| Triple::new(s, p, o))
            .collect())
    }

    /// Add a triple. Returns true if it was newly stored.
    pub fn add(&self, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        self.table.add_row([s, p, o])
    }

    /// Delete a triple. Absent triples are a no-op returning false.
    pub fn delete(&self, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        self.table.delete_row([s, p, o])
    }

    /// Whether the table holds no triples
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remove every triple, leaving the dictionary alone
    pub fn clear_triples(&self) {
        self.table.clear();
    }

    /// Flush to stable storage
    pub fn sync(&self) {
        self.table.sync();
    }

    /// Release table resources. Called from dataset shutdown only.
    pub fn close(&self) {
        debug!("triple table closed");
    }

    /// The underlying node tuple table
    pub fn node_tuple_table(&self) -> &NodeTupleTable<3> {
        &self.table
    }
}

/// Table of named-graph quads, graph id in position 0
pub struct QuadTable {
    table: NodeTupleTable<4>,
}

impl QuadTable {
    /// Create a quad table over a shared dictionary
    pub fn new(node_table: Arc<NodeTable>) -> Self {
        QuadTable {
            table: NodeTupleTable::new(node_table),
        }
    }

    /// Pattern find; `None` slots match anything
    pub fn find(
        &self,
        g: Option<&Term>,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        let rows = self.table.find([g, s, p, o])?;
        Ok(rows
            .into_iter()
            .map(|[g, s, p, o]| Quad::new(g, s, p, o))
            .collect())
    }

    /// Add a quad. Returns true if it was newly stored.
    pub fn add(&self, g: &Term, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        self.table.add_row([g, s, p, o])
    }

    /// Delete a quad. Absent quads are a no-op returning false.
    pub fn delete(&self, g: &Term, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        self.table.delete_row([g, s, p, o])
    }

    /// Whether the table holds no quads
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remove every quad, leaving the dictionary alone
    pub fn clear_quads(&self) {
        self.table.clear();
    }

    /// Flush to stable storage
    pub fn sync(&self) {
        self.table.sync();
    }

    /// Release table resources. Called from dataset shutdown only.
    pub fn close(&self) {
        debug!("quad table closed");
    }

    /// The underlying node tuple table
    pub fn node_tuple_table(&self) -> &NodeTupleTable<4> {
        &self.table
    }
}
