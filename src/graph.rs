//! Graph views
//!
//! A [`GraphView`] is a stateless projection of one graph of a dataset. It
//! owns no storage and caches nothing: every operation goes straight back to
//! the coordinator, so views are safe to discard and recreate freely.

use crate::dataset::DatasetGraphTDB;
use crate::dictionary::Term;
use crate::error::{Result, StoreError};
use crate::tables::Triple;
use std::collections::HashSet;

/// Which graph a view projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphTarget {
    /// The unnamed default graph
    Default,
    /// One named graph
    Named(Term),
    /// The union of all named graphs (read-only)
    Union,
}

/// Stateless triple-level view over one graph of a dataset
pub struct GraphView<'a> {
    dataset: &'a DatasetGraphTDB,
    target: GraphTarget,
}

impl<'a> GraphView<'a> {
    pub(crate) fn new(dataset: &'a DatasetGraphTDB, target: GraphTarget) -> Self {
        GraphView { dataset, target }
    }

    /// The graph this view projects
    pub fn target(&self) -> &GraphTarget {
        &self.target
    }

    /// Pattern find within this graph.
    ///
    /// Union views deduplicate: the same triple stored in several named
    /// graphs appears once.
    pub fn find(
        &self,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Triple>> {
        match &self.target {
            GraphTarget::Default => Ok(self
                .dataset
                .find_in_default_graph(s, p, o)?
                .into_iter()
                .map(|q| q.to_triple())
                .collect()),
            GraphTarget::Named(g) => Ok(self
                .dataset
                .find_in_named_graph(g, s, p, o)?
                .into_iter()
                .map(|q| q.to_triple())
                .collect()),
            GraphTarget::Union => {
                let mut seen = HashSet::new();
                Ok(self
                    .dataset
                    .find_in_any_named_graphs(s, p, o)?
                    .into_iter()
                    .map(|q| q.to_triple())
                    .filter(|t| seen.insert(t.clone()))
                    .collect())
            }
        }
    }

    /// Add a triple to this graph. Union views are read-only.
    pub fn add(&self, s: &Term, p: &Term, o: &Term) -> Result<()> {
        match &self.target {
            GraphTarget::Default => self.dataset.add_to_default_graph(s, p, o),
            GraphTarget::Named(g) => self.dataset.add_to_named_graph(g, s, p, o),
            GraphTarget::Union => Err(StoreError::UnsupportedOperation(
                "the union graph is read-only",
            )),
        }
    }

    /// Delete a triple from this graph. Union views are read-only.
    pub fn delete(&self, s: &Term, p: &Term, o: &Term) -> Result<()> {
        match &self.target {
            GraphTarget::Default => self.dataset.delete_from_default_graph(s, p, o),
            GraphTarget::Named(g) => self.dataset.delete_from_named_graph(g, s, p, o),
            GraphTarget::Union => Err(StoreError::UnsupportedOperation(
                "the union graph is read-only",
            )),
        }
    }

    /// Whether this graph contains a fully-bound triple
    pub fn contains(&self, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        match &self.target {
            GraphTarget::Default => self.dataset.contains(None, s, p, o),
            GraphTarget::Named(g) => self.dataset.contains(Some(g), s, p, o),
            GraphTarget::Union => {
                self.dataset
                    .contains(Some(&crate::tables::Quad::union_graph_node()), s, p, o)
            }
        }
    }

    /// Number of triples in this graph
    pub fn len(&self) -> Result<usize> {
        Ok(self.find(None, None, None)?.len())
    }

    /// Whether this graph holds no triples
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.find(None, None, None)?.is_empty())
    }

    /// Delete every triple of this graph. Union views are read-only.
    pub fn clear(&self) -> Result<()> {
        match &self.target {
            GraphTarget::Default => self.dataset.delete_any(None, None, None, None),
            GraphTarget::Named(g) => self.dataset.remove_graph(g),
            GraphTarget::Union => Err(StoreError::UnsupportedOperation(
                "the union graph is read-only",
            )),
        }
    }
}
