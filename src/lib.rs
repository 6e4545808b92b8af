//! # quadstore — transactional quad-store coordination layer
//!
//! A dataset abstraction over two separately-indexed tuple tables: triples
//! for the default graph and quads for the named graphs. The coordinator,
//! [`DatasetGraphTDB`], routes node-level pattern finds and mutations to the
//! right table, translates terms to surrogate node-ids at the table
//! boundary, reports changes and transaction phases to optional monitors,
//! delegates transaction lifecycle to a [`TransactionalSystem`], and deletes
//! in bounded batches so no index is ever mutated under a live iterator.
//!
//! ## Quick start
//!
//! ```rust
//! use quadstore::{DatasetGraphTDB, ReadWrite, Term};
//!
//! # fn example() -> quadstore::Result<()> {
//! let dataset = DatasetGraphTDB::in_memory();
//!
//! dataset.begin(ReadWrite::Write)?;
//!
//! let alice = Term::iri("http://example.org/alice");
//! let knows = Term::iri("http://xmlns.com/foaf/0.1/knows");
//! let bob = Term::iri("http://example.org/bob");
//! dataset.add_to_default_graph(&alice, &knows, &bob)?;
//!
//! dataset.commit()?;
//! dataset.end()?;
//!
//! let found = dataset.find_in_default_graph(Some(&alice), None, None)?;
//! assert_eq!(found.len(), 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Architecture
//!
//! - [`dictionary`]: term ↔ surrogate node-id mapping
//! - [`tuple`]: fixed-arity id-tuple indexes and their node-level wrappers
//! - [`tables`]: the triple table and the quad table
//! - [`dataset`]: the coordinator tying tables, prefixes, monitors and the
//!   transactional system together
//! - [`graph`]: stateless per-graph views
//! - [`txn`]: the transactional-system boundary
//!
//! Physical index storage, the node dictionary's persistence, and the commit
//! protocol itself are collaborator concerns behind the traits in this
//! crate; the in-memory implementations here are complete but
//! non-persistent.

pub mod dataset;
pub mod dictionary;
pub mod error;
pub mod graph;
pub mod monitor;
pub mod params;
pub mod prefixes;
pub mod reorder;
pub mod tables;
pub mod tuple;
pub mod txn;

pub use dataset::{DatasetGraphTDB, TableChoice};
pub use dictionary::{NodeId, NodeTable, Term};
pub use error::{Result, StoreError};
pub use graph::{GraphTarget, GraphView};
pub use monitor::{DatasetChanges, QuadAction, TransactionalMonitor};
pub use params::{Location, StoreParams};
pub use prefixes::{DatasetPrefixStorage, InMemoryPrefixStorage};
pub use reorder::{ReorderNone, ReorderTransformation};
pub use tables::{Quad, QuadTable, Triple, TripleTable, DEFAULT_GRAPH_IRI, UNION_GRAPH_IRI};
pub use tuple::{NodeTupleTable, TupleTable};
pub use txn::{LocalTransactionalSystem, ReadWrite, TransactionalSystem};
