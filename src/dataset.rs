//! The dataset coordinator
//!
//! [`DatasetGraphTDB`] unifies the triple table (default graph) and the quad
//! table (named graphs) behind one dataset: it routes pattern finds and
//! mutations to the right table, reports changes to an optional monitor,
//! delegates transaction lifecycle to the transactional system, and performs
//! bulk deletion in batches so no index is mutated under a live iterator.

use crate::dictionary::{NodeId, Term};
use crate::error::{Result, StoreError};
use crate::graph::{GraphTarget, GraphView};
use crate::monitor::{DatasetChanges, QuadAction, TransactionalMonitor};
use crate::params::{Location, StoreParams};
use crate::prefixes::DatasetPrefixStorage;
use crate::reorder::ReorderTransformation;
use crate::tables::{Quad, QuadTable, Triple, TripleTable};
use crate::tuple::node_tuple_table::TermPattern;
use crate::tuple::NodeTupleTable;
use crate::txn::{ReadWrite, TransactionalSystem};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Batch size for [`DatasetGraphTDB::delete_any`]
const DELETE_SLICE: usize = 1000;

/// The tuple table serving a given graph name
pub enum TableChoice<'a> {
    /// Default graph: the 3-ary table
    Triples(&'a NodeTupleTable<3>),
    /// Named graphs (including union/any): the 4-ary table
    Quads(&'a NodeTupleTable<4>),
}

/// Coordinator over the triple table, quad table, prefix storage and the
/// transactional system.
///
/// The coordinator is a synchronous façade: it owns no execution machinery
/// and imposes only one discipline of its own, that no find-iterator stays
/// live across a delete against the same table (see
/// [`delete_any`](Self::delete_any)). Once [`close`](Self::close) has been
/// called every operation fails with [`StoreError::DatasetClosed`]; closing
/// is one-way.
pub struct DatasetGraphTDB {
    triple_table: TripleTable,
    quad_table: QuadTable,
    prefixes: Box<dyn DatasetPrefixStorage>,
    txn_system: Arc<dyn TransactionalSystem>,
    transform: Arc<dyn ReorderTransformation>,
    params: StoreParams,
    location: Location,
    closed: AtomicBool,
    monitor: Mutex<Option<Arc<dyn DatasetChanges>>>,
    txn_monitor: Mutex<Option<Arc<dyn TransactionalMonitor>>>,
}

impl DatasetGraphTDB {
    /// Assemble a dataset from its parts.
    ///
    /// The transactional system is shared, not owned: its lifetime exceeds
    /// the dataset's. Both tables must have been built over the same node
    /// dictionary.
    pub fn new(
        txn_system: Arc<dyn TransactionalSystem>,
        triple_table: TripleTable,
        quad_table: QuadTable,
        prefixes: Box<dyn DatasetPrefixStorage>,
        transform: Arc<dyn ReorderTransformation>,
        location: Location,
        params: StoreParams,
    ) -> Self {
        DatasetGraphTDB {
            triple_table,
            quad_table,
            prefixes,
            txn_system,
            transform,
            params,
            location,
            closed: AtomicBool::new(false),
            monitor: Mutex::new(None),
            txn_monitor: Mutex::new(None),
        }
    }

    /// Convenience constructor wiring an all-in-memory dataset
    pub fn in_memory() -> Self {
        Self::in_memory_with_params(StoreParams::default())
    }

    /// In-memory dataset with explicit parameters
    pub fn in_memory_with_params(params: StoreParams) -> Self {
        use crate::dictionary::NodeTable;
        use crate::prefixes::InMemoryPrefixStorage;
        use crate::reorder::ReorderNone;
        use crate::txn::LocalTransactionalSystem;

        let node_table = Arc::new(NodeTable::new());
        Self::new(
            Arc::new(LocalTransactionalSystem::new()),
            TripleTable::new(node_table.clone()),
            QuadTable::new(node_table),
            Box::new(InMemoryPrefixStorage::new()),
            Arc::new(ReorderNone),
            Location::mem(),
            params,
        )
    }

    fn check_not_closed(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::DatasetClosed);
        }
        Ok(())
    }

    // ----- Pattern dispatch

    /// Find in the default graph; results are wrapped as quads carrying the
    /// default-graph IRI.
    pub fn find_in_default_graph(
        &self,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        self.check_not_closed()?;
        let dft = Quad::default_graph_node();
        Ok(self
            .triple_table
            .find(s, p, o)?
            .into_iter()
            .map(|t| Quad::new(dft.clone(), t.subject, t.predicate, t.object))
            .collect())
    }

    /// Find in one named graph
    pub fn find_in_named_graph(
        &self,
        g: &Term,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        self.check_not_closed()?;
        self.quad_table.find(Some(g), s, p, o)
    }

    /// Find across all named graphs
    pub fn find_in_any_named_graphs(
        &self,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        self.check_not_closed()?;
        self.quad_table.find(None, s, p, o)
    }

    /// General find: `g` of `None` (or the default-graph marker) targets the
    /// default graph, the union-graph marker targets all named graphs, and
    /// any other name targets that graph.
    pub fn find(
        &self,
        g: Option<&Term>,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        match g {
            None => self.find_in_default_graph(s, p, o),
            Some(g) if Quad::is_default_graph(g) => self.find_in_default_graph(s, p, o),
            Some(g) if Quad::is_union_graph(g) => self.find_in_any_named_graphs(s, p, o),
            Some(g) => self.find_in_named_graph(g, s, p, o),
        }
    }

    /// Whether a fully-bound quad is present. `g` of `None` means the
    /// default graph; the union marker probes all named graphs.
    pub fn contains(&self, g: Option<&Term>, s: &Term, p: &Term, o: &Term) -> Result<bool> {
        self.check_not_closed()?;
        match g {
            None => self
                .triple_table
                .node_tuple_table()
                .contains_row([s, p, o]),
            Some(g) if Quad::is_default_graph(g) => self
                .triple_table
                .node_tuple_table()
                .contains_row([s, p, o]),
            Some(g) if Quad::is_union_graph(g) => {
                let found = self
                    .quad_table
                    .node_tuple_table()
                    .find_as_node_ids_limited([None, Some(s), Some(p), Some(o)], Some(1))?;
                Ok(found.map_or(false, |rows| !rows.is_empty()))
            }
            Some(g) => self
                .quad_table
                .node_tuple_table()
                .contains_row([g, s, p, o]),
        }
    }

    // ----- Mutation with notification

    /// Add a triple to the default graph
    pub fn add_to_default_graph(&self, s: &Term, p: &Term, o: &Term) -> Result<()> {
        self.check_not_closed()?;
        self.notify_add(None, s, p, o)?;
        self.triple_table.add(s, p, o)?;
        Ok(())
    }

    /// Add a quad to a named graph
    pub fn add_to_named_graph(&self, g: &Term, s: &Term, p: &Term, o: &Term) -> Result<()> {
        self.check_not_closed()?;
        self.notify_add(Some(g), s, p, o)?;
        self.quad_table.add(g, s, p, o)?;
        Ok(())
    }

    /// Delete a triple from the default graph
    pub fn delete_from_default_graph(&self, s: &Term, p: &Term, o: &Term) -> Result<()> {
        self.check_not_closed()?;
        self.notify_delete(None, s, p, o)?;
        self.triple_table.delete(s, p, o)?;
        Ok(())
    }

    /// Delete a quad from a named graph
    pub fn delete_from_named_graph(&self, g: &Term, s: &Term, p: &Term, o: &Term) -> Result<()> {
        self.check_not_closed()?;
        self.notify_delete(Some(g), s, p, o)?;
        self.quad_table.delete(g, s, p, o)?;
        Ok(())
    }

    fn notify_add(&self, g: Option<&Term>, s: &Term, p: &Term, o: &Term) -> Result<()> {
        let monitor = self.monitor.lock().clone();
        let Some(monitor) = monitor else {
            return Ok(());
        };
        let mut action = QuadAction::Add;
        if self.params.check_for_change && self.contains(g, s, p, o)? {
            action = QuadAction::NoAdd;
        }
        monitor.change(action, g, s, p, o);
        Ok(())
    }

    fn notify_delete(&self, g: Option<&Term>, s: &Term, p: &Term, o: &Term) -> Result<()> {
        let monitor = self.monitor.lock().clone();
        let Some(monitor) = monitor else {
            return Ok(());
        };
        let mut action = QuadAction::Delete;
        if self.params.check_for_change && !self.contains(g, s, p, o)? {
            action = QuadAction::NoDelete;
        }
        monitor.change(action, g, s, p, o);
        Ok(())
    }

    // ----- Graph-level operations

    /// Whether a graph "exists". The default and union markers always do;
    /// any other graph exists iff at least one quad names it — an empty
    /// named graph is indistinguishable from a non-existent one.
    pub fn contains_graph(&self, graph: &Term) -> Result<bool> {
        self.check_not_closed()?;
        if Quad::is_default_graph(graph) || Quad::is_union_graph(graph) {
            return Ok(true);
        }
        let found = self
            .quad_table
            .node_tuple_table()
            .find_as_node_ids_limited([Some(graph), None, None, None], Some(1))?;
        Ok(found.map_or(false, |rows| !rows.is_empty()))
    }

    /// Replace the content of a named graph with the given triples
    /// (overwrite, not merge).
    pub fn add_graph<I>(&self, name: &Term, triples: I) -> Result<()>
    where
        I: IntoIterator<Item = Triple>,
    {
        self.check_not_closed()?;
        self.remove_graph(name)?;
        if Quad::is_default_graph(name) {
            for t in triples {
                self.add_to_default_graph(&t.subject, &t.predicate, &t.object)?;
            }
        } else {
            for t in triples {
                self.add_to_named_graph(name, &t.subject, &t.predicate, &t.object)?;
            }
        }
        Ok(())
    }

    /// Delete every quad of a named graph
    pub fn remove_graph(&self, name: &Term) -> Result<()> {
        self.check_not_closed()?;
        self.delete_any(Some(name), None, None, None)
    }

    /// All distinct named-graph nodes. There is no separate graph registry:
    /// this enumerates position 0 of the stored quads.
    pub fn list_graph_nodes(&self) -> Result<Vec<Term>> {
        self.check_not_closed()?;
        let node_tuple_table = self.quad_table.node_tuple_table();
        let graph_ids: BTreeSet<NodeId> = node_tuple_table
            .find_all()
            .into_iter()
            .map(|row| row[0])
            .collect();

        let node_table = node_tuple_table.node_table();
        graph_ids
            .into_iter()
            .map(|id| {
                node_table
                    .get_term(id)?
                    .ok_or(StoreError::InvalidNodeId(id.as_u64()))
            })
            .collect()
    }

    /// Number of named graphs (not a triple or quad count)
    pub fn size(&self) -> Result<usize> {
        Ok(self.list_graph_nodes()?.len())
    }

    /// Whether both tables hold no tuples
    pub fn is_empty(&self) -> Result<bool> {
        self.check_not_closed()?;
        Ok(self.triple_table.is_empty() && self.quad_table.is_empty())
    }

    /// Empty both tables. The node dictionary is untouched: ids whose
    /// tuples are gone remain valid, just orphaned.
    pub fn clear(&self) -> Result<()> {
        self.check_not_closed()?;
        self.triple_table.clear_triples();
        self.quad_table.clear_quads();
        Ok(())
    }

    /// The tuple table serving a graph name: default graph → triples,
    /// anything else (named, union, any) → quads.
    pub fn choose_node_tuple_table(&self, g: Option<&Term>) -> Result<TableChoice<'_>> {
        self.check_not_closed()?;
        match g {
            None => Ok(TableChoice::Triples(self.triple_table.node_tuple_table())),
            Some(g) if Quad::is_default_graph(g) => {
                Ok(TableChoice::Triples(self.triple_table.node_tuple_table()))
            }
            Some(_) => Ok(TableChoice::Quads(self.quad_table.node_tuple_table())),
        }
    }

    // ----- Batched deletion

    /// Delete every quad matching a pattern.
    ///
    /// With a change monitor registered, deletion goes tuple by tuple
    /// through the notified paths so every removal is reported. Otherwise
    /// deletion runs as node-ids in batches of 1000: each round opens a
    /// fresh pattern find, materializes at most one slice, and only then
    /// deletes the buffered tuples through the raw tuple table, so no
    /// delete ever executes under the iterator that produced it. A short
    /// slice ends the loop.
    pub fn delete_any(
        &self,
        g: Option<&Term>,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<()> {
        self.check_not_closed()?;

        if self.monitor.lock().is_some() {
            return self.delete_any_notified(g, s, p, o);
        }

        match self.choose_node_tuple_table(g)? {
            TableChoice::Triples(t) => delete_batched(t, [s, p, o]),
            TableChoice::Quads(t) => {
                let g_slot = match g {
                    Some(g) if !Quad::is_union_graph(g) => Some(g),
                    _ => None,
                };
                delete_batched(t, [g_slot, s, p, o])
            }
        }
    }

    /// Notified deletion path: find first (the result is materialized, so
    /// the find is finished before any delete), then delete through the
    /// monitoring mutation operations.
    fn delete_any_notified(
        &self,
        g: Option<&Term>,
        s: Option<&Term>,
        p: Option<&Term>,
        o: Option<&Term>,
    ) -> Result<()> {
        let matches = self.find(g, s, p, o)?;
        for quad in matches {
            if Quad::is_default_graph(&quad.graph) {
                self.delete_from_default_graph(&quad.subject, &quad.predicate, &quad.object)?;
            } else {
                self.delete_from_named_graph(
                    &quad.graph,
                    &quad.subject,
                    &quad.predicate,
                    &quad.object,
                )?;
            }
        }
        Ok(())
    }

    // ----- Lifecycle

    /// Flush both tables and the prefix storage
    pub fn sync(&self) -> Result<()> {
        self.check_not_closed()?;
        self.triple_table.sync();
        self.quad_table.sync();
        self.prefixes.sync();
        Ok(())
    }

    /// Mark the dataset closed. Idempotent; there is no reopening.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(location = %self.location, "dataset closed");
    }

    /// Whether the dataset has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Release the tables, the prefix storage and the transaction manager.
    ///
    /// Consumes the dataset: reuse after shutdown is a compile error, not a
    /// runtime one. Only the owning connection registry should call this;
    /// ordinary callers use [`close`](Self::close).
    pub fn shutdown(self) {
        self.triple_table.close();
        self.quad_table.close();
        self.prefixes.close();
        self.txn_system.shutdown();
        debug!(location = %self.location, "dataset shut down");
    }

    /// Wholesale replacement of the default graph is not permitted by this
    /// storage model.
    pub fn set_default_graph(&self, _triples: &[Triple]) -> Result<()> {
        Err(StoreError::UnsupportedOperation(
            "cannot replace the default graph of a TDB-backed dataset",
        ))
    }

    // ----- Transaction lifecycle delegation
    //
    // Each operation is bracketed by the transaction monitor's start/finish
    // pair; finish fires even when the delegated call fails, and the error
    // then propagates.

    /// Start a transaction
    pub fn begin(&self, mode: ReadWrite) -> Result<()> {
        self.check_not_closed()?;
        let monitor = self.txn_monitor.lock().clone();
        if let Some(m) = &monitor {
            m.start_begin(mode);
        }
        let result = self.txn_system.begin(mode);
        if let Some(m) = &monitor {
            m.finish_begin(mode);
        }
        result
    }

    /// Try to upgrade a read transaction to a write transaction.
    /// `Ok(false)` means the upgrade was refused, not that anything failed.
    pub fn promote(&self) -> Result<bool> {
        self.check_not_closed()?;
        let monitor = self.txn_monitor.lock().clone();
        if let Some(m) = &monitor {
            m.start_promote();
        }
        let result = self.txn_system.promote();
        if let Some(m) = &monitor {
            m.finish_promote();
        }
        result
    }

    /// Commit the active transaction
    pub fn commit(&self) -> Result<()> {
        self.check_not_closed()?;
        let monitor = self.txn_monitor.lock().clone();
        if let Some(m) = &monitor {
            m.start_commit();
        }
        let result = self.txn_system.commit();
        if let Some(m) = &monitor {
            m.finish_commit();
        }
        result
    }

    /// Abort the active transaction
    pub fn abort(&self) -> Result<()> {
        self.check_not_closed()?;
        let monitor = self.txn_monitor.lock().clone();
        if let Some(m) = &monitor {
            m.start_abort();
        }
        let result = self.txn_system.abort();
        if let Some(m) = &monitor {
            m.finish_abort();
        }
        result
    }

    /// Finish the active transaction
    pub fn end(&self) -> Result<()> {
        self.check_not_closed()?;
        let monitor = self.txn_monitor.lock().clone();
        if let Some(m) = &monitor {
            m.start_end();
        }
        let result = self.txn_system.end();
        if let Some(m) = &monitor {
            m.finish_end();
        }
        result
    }

    /// Whether a transaction is active
    pub fn is_in_transaction(&self) -> bool {
        self.txn_system.is_in_transaction()
    }

    // ----- Monitors

    /// Register the change monitor. At most one may be registered;
    /// registering over an existing one is a contract violation.
    pub fn set_monitor(&self, changes: Arc<dyn DatasetChanges>) -> Result<()> {
        let mut slot = self.monitor.lock();
        if slot.is_some() {
            return Err(StoreError::Internal(
                "change monitor already registered".into(),
            ));
        }
        *slot = Some(changes);
        Ok(())
    }

    /// Remove the change monitor. Identity-checked: only the currently
    /// registered monitor may be removed.
    pub fn remove_monitor(&self, changes: &Arc<dyn DatasetChanges>) -> Result<()> {
        let mut slot = self.monitor.lock();
        match &*slot {
            Some(current) if Arc::ptr_eq(current, changes) => {
                *slot = None;
                Ok(())
            }
            _ => Err(StoreError::Internal(
                "monitor being removed is not the registered change monitor".into(),
            )),
        }
    }

    /// Register the transaction monitor; same discipline as
    /// [`set_monitor`](Self::set_monitor).
    pub fn set_transactional_monitor(&self, monitor: Arc<dyn TransactionalMonitor>) -> Result<()> {
        let mut slot = self.txn_monitor.lock();
        if slot.is_some() {
            return Err(StoreError::Internal(
                "transaction monitor already registered".into(),
            ));
        }
        *slot = Some(monitor);
        Ok(())
    }

    /// Remove the transaction monitor, identity-checked
    pub fn remove_transactional_monitor(
        &self,
        monitor: &Arc<dyn TransactionalMonitor>,
    ) -> Result<()> {
        let mut slot = self.txn_monitor.lock();
        match &*slot {
            Some(current) if Arc::ptr_eq(current, monitor) => {
                *slot = None;
                Ok(())
            }
            _ => Err(StoreError::Internal(
                "monitor being removed is not the registered transaction monitor".into(),
            )),
        }
    }

    // ----- Graph views

    /// A view of the default graph
    pub fn default_graph(&self) -> Result<GraphView<'_>> {
        self.check_not_closed()?;
        Ok(GraphView::new(self, GraphTarget::Default))
    }

    /// A view of one graph. The default-graph and union-graph markers are
    /// recognized and routed accordingly.
    pub fn graph(&self, name: &Term) -> Result<GraphView<'_>> {
        self.check_not_closed()?;
        let target = if Quad::is_default_graph(name) {
            GraphTarget::Default
        } else if Quad::is_union_graph(name) {
            GraphTarget::Union
        } else {
            GraphTarget::Named(name.clone())
        };
        Ok(GraphView::new(self, target))
    }

    /// A read-only view over the union of all named graphs
    pub fn union_graph(&self) -> Result<GraphView<'_>> {
        self.check_not_closed()?;
        Ok(GraphView::new(self, GraphTarget::Union))
    }

    // ----- Accessors

    /// The triple table
    pub fn triple_table(&self) -> Result<&TripleTable> {
        self.check_not_closed()?;
        Ok(&self.triple_table)
    }

    /// The quad table
    pub fn quad_table(&self) -> Result<&QuadTable> {
        self.check_not_closed()?;
        Ok(&self.quad_table)
    }

    /// The prefix storage
    pub fn prefixes(&self) -> Result<&dyn DatasetPrefixStorage> {
        self.check_not_closed()?;
        Ok(self.prefixes.as_ref())
    }

    /// The configuration snapshot
    pub fn params(&self) -> Result<&StoreParams> {
        self.check_not_closed()?;
        Ok(&self.params)
    }

    /// The reorder strategy, immutable for the dataset's life
    pub fn reorder_transform(&self) -> Result<&Arc<dyn ReorderTransformation>> {
        self.check_not_closed()?;
        Ok(&self.transform)
    }

    /// The shared transactional system
    pub fn txn_system(&self) -> &Arc<dyn TransactionalSystem> {
        &self.txn_system
    }

    /// The storage location tag
    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// One round of batched deletion per loop iteration: a fresh find, a
/// buffered slice, then raw tuple-level deletes. The find result is fully
/// materialized (and the read released) before the first delete.
fn delete_batched<const N: usize>(
    table: &NodeTupleTable<N>,
    pattern: TermPattern<'_, N>,
) -> Result<()> {
    loop {
        let batch = match table.find_as_node_ids_limited(pattern, Some(DELETE_SLICE))? {
            Some(batch) => batch,
            // A bound term with no node-id: nothing to iterate.
            None => return Ok(()),
        };

        let len = batch.len();
        for row in &batch {
            table.tuple_table().delete(row);
        }
        trace!(deleted = len, "delete_any slice");

        // A short slice means the pattern is exhausted.
        if len < DELETE_SLICE {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::QuadAction;

    fn t(name: &str) -> Term {
        Term::iri(format!("http://example.org/{name}"))
    }

    #[derive(Default)]
    struct RecordingChanges {
        events: Mutex<Vec<(QuadAction, Option<Term>, Term, Term, Term)>>,
    }

    impl DatasetChanges for RecordingChanges {
        fn change(&self, action: QuadAction, g: Option<&Term>, s: &Term, p: &Term, o: &Term) {
            self.events
                .lock()
                .push((action, g.cloned(), s.clone(), p.clone(), o.clone()));
        }
    }

    #[derive(Default)]
    struct CountingTxnMonitor {
        starts: Mutex<Vec<&'static str>>,
        finishes: Mutex<Vec<&'static str>>,
    }

    impl TransactionalMonitor for CountingTxnMonitor {
        fn start_begin(&self, _mode: ReadWrite) {
            self.starts.lock().push("begin");
        }
        fn finish_begin(&self, _mode: ReadWrite) {
            self.finishes.lock().push("begin");
        }
        fn start_commit(&self) {
            self.starts.lock().push("commit");
        }
        fn finish_commit(&self) {
            self.finishes.lock().push("commit");
        }
        fn start_end(&self) {
            self.starts.lock().push("end");
        }
        fn finish_end(&self) {
            self.finishes.lock().push("end");
        }
    }

    /// Transactional system whose promote always refuses and whose commit
    /// always fails.
    struct StubbornTxnSystem;

    impl TransactionalSystem for StubbornTxnSystem {
        fn begin(&self, _mode: ReadWrite) -> Result<()> {
            Ok(())
        }
        fn promote(&self) -> Result<bool> {
            Ok(false)
        }
        fn commit(&self) -> Result<()> {
            Err(StoreError::Transaction("commit conflict".into()))
        }
        fn abort(&self) -> Result<()> {
            Ok(())
        }
        fn end(&self) -> Result<()> {
            Ok(())
        }
        fn is_in_transaction(&self) -> bool {
            false
        }
        fn shutdown(&self) {}
    }

    #[test]
    fn test_default_graph_find_wraps_quads() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let (a, knows, b) = (t("a"), t("knows"), t("b"));

        ds.add_to_default_graph(&a, &knows, &b)?;

        let quads = ds.find_in_default_graph(Some(&a), None, None)?;
        assert_eq!(quads.len(), 1);
        assert!(Quad::is_default_graph(&quads[0].graph));
        assert_eq!(quads[0].subject, a);

        // The general dispatcher agrees
        let quads = ds.find(None, Some(&a), None, None)?;
        assert_eq!(quads.len(), 1);

        Ok(())
    }

    #[test]
    fn test_add_is_idempotent_delete_missing_is_noop() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let (g, s, p, o) = (t("g"), t("s"), t("p"), t("o"));

        ds.add_to_named_graph(&g, &s, &p, &o)?;
        ds.add_to_named_graph(&g, &s, &p, &o)?;
        assert_eq!(ds.find_in_named_graph(&g, None, None, None)?.len(), 1);

        ds.delete_from_named_graph(&g, &s, &p, &o)?;
        // Deleting again is a no-op, not an error
        ds.delete_from_named_graph(&g, &s, &p, &o)?;
        assert!(ds.find_in_named_graph(&g, None, None, None)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_unknown_bound_term_finds_nothing() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;

        let never_seen = t("never-seen");
        assert!(ds
            .find_in_default_graph(Some(&never_seen), None, None)?
            .is_empty());
        assert!(ds
            .find_in_any_named_graphs(Some(&never_seen), None, None)?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_contains_graph_semantics() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();

        assert!(ds.contains_graph(&Quad::default_graph_node())?);
        assert!(ds.contains_graph(&Quad::union_graph_node())?);
        assert!(!ds.contains_graph(&t("g1"))?);

        ds.add_to_named_graph(&t("g1"), &t("s"), &t("p"), &t("o"))?;
        assert!(ds.contains_graph(&t("g1"))?);

        // Emptied graph no longer "exists"
        ds.remove_graph(&t("g1"))?;
        assert!(!ds.contains_graph(&t("g1"))?);
        assert!(ds.contains_graph(&Quad::default_graph_node())?);

        Ok(())
    }

    #[test]
    fn test_add_graph_overwrites() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let name = t("g");

        let first = vec![
            Triple::new(t("a"), t("p"), t("1")),
            Triple::new(t("b"), t("p"), t("2")),
        ];
        let second = vec![Triple::new(t("c"), t("p"), t("3"))];

        ds.add_graph(&name, first)?;
        assert_eq!(ds.find_in_named_graph(&name, None, None, None)?.len(), 2);

        ds.add_graph(&name, second.clone())?;
        let quads = ds.find_in_named_graph(&name, None, None, None)?;
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].to_triple(), second[0]);

        Ok(())
    }

    #[test]
    fn test_list_graph_nodes_and_size() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        assert_eq!(ds.size()?, 0);

        ds.add_to_named_graph(&t("g1"), &t("s"), &t("p"), &t("o"))?;
        ds.add_to_named_graph(&t("g1"), &t("s2"), &t("p"), &t("o"))?;
        ds.add_to_named_graph(&t("g2"), &t("s"), &t("p"), &t("o"))?;
        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;

        let graphs = ds.list_graph_nodes()?;
        assert_eq!(graphs.len(), 2);
        assert!(graphs.contains(&t("g1")));
        assert!(graphs.contains(&t("g2")));
        // size() counts named graphs, not tuples
        assert_eq!(ds.size()?, 2);

        ds.remove_graph(&t("g1"))?;
        assert_eq!(ds.size()?, 1);
        assert!(!ds.list_graph_nodes()?.contains(&t("g1")));

        Ok(())
    }

    #[test]
    fn test_is_empty_and_clear() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        assert!(ds.is_empty()?);

        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;
        assert!(!ds.is_empty()?);
        ds.add_to_named_graph(&t("g"), &t("s"), &t("p"), &t("o"))?;

        ds.clear()?;
        assert!(ds.is_empty()?);
        assert!(ds.find_in_default_graph(None, None, None)?.is_empty());
        assert!(ds.find_in_any_named_graphs(None, None, None)?.is_empty());

        // Dictionary untouched by clear
        let dict = ds.triple_table()?.node_tuple_table().node_table().clone();
        assert!(dict.get_id(&t("s"))?.is_some());

        Ok(())
    }

    #[test]
    fn test_delete_any_crosses_slice_boundary() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let (g, p, o) = (t("g"), t("p"), t("o"));

        // 2500 matching quads: three rounds (1000, 1000, 500)
        for i in 0..2500 {
            ds.add_to_named_graph(&g, &t(&format!("s{i}")), &p, &o)?;
        }
        // And some that must survive
        ds.add_to_named_graph(&t("other"), &t("s"), &p, &o)?;
        ds.add_to_default_graph(&t("s"), &p, &o)?;

        ds.delete_any(Some(&g), None, None, None)?;

        assert!(ds.find_in_named_graph(&g, None, None, None)?.is_empty());
        assert_eq!(ds.find_in_named_graph(&t("other"), None, None, None)?.len(), 1);
        assert_eq!(ds.find_in_default_graph(None, None, None)?.len(), 1);

        Ok(())
    }

    #[test]
    fn test_delete_any_default_graph_and_union() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        for i in 0..1200 {
            ds.add_to_default_graph(&t(&format!("s{i}")), &t("p"), &t("o"))?;
        }
        ds.add_to_named_graph(&t("g1"), &t("s"), &t("p"), &t("o"))?;
        ds.add_to_named_graph(&t("g2"), &t("s"), &t("p"), &t("o"))?;

        ds.delete_any(None, None, None, None)?;
        assert!(ds.find_in_default_graph(None, None, None)?.is_empty());
        assert_eq!(ds.find_in_any_named_graphs(None, None, None)?.len(), 2);

        // Union marker wildcards the graph position
        ds.delete_any(Some(&Quad::union_graph_node()), None, None, None)?;
        assert!(ds.find_in_any_named_graphs(None, None, None)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_delete_any_with_monitor_notifies_every_tuple() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let (g, p, o) = (t("g"), t("p"), t("o"));
        for i in 0..25 {
            ds.add_to_named_graph(&g, &t(&format!("s{i}")), &p, &o)?;
        }

        let monitor = Arc::new(RecordingChanges::default());
        ds.set_monitor(monitor.clone())?;
        ds.delete_any(Some(&g), None, None, None)?;

        let events = monitor.events.lock();
        assert_eq!(events.len(), 25);
        assert!(events.iter().all(|e| e.0 == QuadAction::Delete));
        drop(events);

        assert!(ds.find_in_named_graph(&g, None, None, None)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_notify_optimistic_by_default() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let monitor = Arc::new(RecordingChanges::default());
        ds.set_monitor(monitor.clone())?;

        let (s, p, o) = (t("s"), t("p"), t("o"));
        ds.add_to_default_graph(&s, &p, &o)?;
        // Redundant add still classified Add with checking off
        ds.add_to_default_graph(&s, &p, &o)?;
        // Delete of an absent tuple still classified Delete
        ds.delete_from_default_graph(&t("x"), &p, &o)?;

        let events = monitor.events.lock();
        assert_eq!(events[0].0, QuadAction::Add);
        assert_eq!(events[1].0, QuadAction::Add);
        assert_eq!(events[2].0, QuadAction::Delete);
        assert_eq!(events[0].1, None);

        Ok(())
    }

    #[test]
    fn test_notify_strict_classifies_redundant_ops() -> Result<()> {
        let params = StoreParams {
            check_for_change: true,
            ..StoreParams::default()
        };
        let ds = DatasetGraphTDB::in_memory_with_params(params);
        let monitor = Arc::new(RecordingChanges::default());
        ds.set_monitor(monitor.clone())?;

        let (g, s, p, o) = (t("g"), t("s"), t("p"), t("o"));
        ds.add_to_named_graph(&g, &s, &p, &o)?;
        ds.add_to_named_graph(&g, &s, &p, &o)?;
        ds.delete_from_named_graph(&g, &s, &p, &o)?;
        ds.delete_from_named_graph(&g, &s, &p, &o)?;

        let events = monitor.events.lock();
        assert_eq!(events[0].0, QuadAction::Add);
        assert_eq!(events[1].0, QuadAction::NoAdd);
        assert_eq!(events[2].0, QuadAction::Delete);
        assert_eq!(events[3].0, QuadAction::NoDelete);
        assert_eq!(events[0].1, Some(g.clone()));

        Ok(())
    }

    #[test]
    fn test_monitor_registration_contract() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let m1: Arc<dyn DatasetChanges> = Arc::new(RecordingChanges::default());
        let m2: Arc<dyn DatasetChanges> = Arc::new(RecordingChanges::default());

        ds.set_monitor(m1.clone())?;
        // Second registration without removal fails loudly
        assert!(ds.set_monitor(m2.clone()).is_err());
        // Removing a monitor that is not the registrant fails loudly
        assert!(ds.remove_monitor(&m2).is_err());

        ds.remove_monitor(&m1)?;
        ds.set_monitor(m2.clone())?;
        ds.remove_monitor(&m2)?;

        Ok(())
    }

    #[test]
    fn test_closed_dataset_rejects_everything() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;

        ds.close();
        // Second close is a harmless no-op
        ds.close();
        assert!(ds.is_closed());

        assert!(matches!(
            ds.find_in_default_graph(None, None, None),
            Err(StoreError::DatasetClosed)
        ));
        assert!(matches!(
            ds.add_to_default_graph(&t("s"), &t("p"), &t("o")),
            Err(StoreError::DatasetClosed)
        ));
        assert!(matches!(ds.size(), Err(StoreError::DatasetClosed)));
        assert!(matches!(ds.clear(), Err(StoreError::DatasetClosed)));
        assert!(matches!(ds.sync(), Err(StoreError::DatasetClosed)));
        assert!(matches!(
            ds.begin(ReadWrite::Read),
            Err(StoreError::DatasetClosed)
        ));
        assert!(matches!(
            ds.delete_any(None, None, None, None),
            Err(StoreError::DatasetClosed)
        ));
        assert!(matches!(ds.triple_table(), Err(StoreError::DatasetClosed)));

        Ok(())
    }

    #[test]
    fn test_set_default_graph_unsupported() {
        let ds = DatasetGraphTDB::in_memory();
        assert!(matches!(
            ds.set_default_graph(&[]),
            Err(StoreError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_txn_delegation_with_monitor_brackets() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        let monitor = Arc::new(CountingTxnMonitor::default());
        ds.set_transactional_monitor(monitor.clone())?;

        ds.begin(ReadWrite::Write)?;
        assert!(ds.is_in_transaction());
        ds.commit()?;
        ds.end()?;
        assert!(!ds.is_in_transaction());

        assert_eq!(*monitor.starts.lock(), vec!["begin", "commit", "end"]);
        assert_eq!(*monitor.finishes.lock(), vec!["begin", "commit", "end"]);

        Ok(())
    }

    #[test]
    fn test_txn_monitor_finish_fires_on_failure() -> Result<()> {
        let ds = DatasetGraphTDB::new(
            Arc::new(StubbornTxnSystem),
            TripleTable::new(Arc::new(crate::dictionary::NodeTable::new())),
            QuadTable::new(Arc::new(crate::dictionary::NodeTable::new())),
            Box::new(crate::prefixes::InMemoryPrefixStorage::new()),
            Arc::new(crate::reorder::ReorderNone),
            Location::mem(),
            StoreParams::default(),
        );
        let monitor = Arc::new(CountingTxnMonitor::default());
        ds.set_transactional_monitor(monitor.clone())?;

        ds.begin(ReadWrite::Write)?;
        assert!(ds.commit().is_err());
        // finish_commit ran despite the failure
        assert_eq!(*monitor.finishes.lock(), vec!["begin", "commit"]);

        // promote() refusing is a negative result, not an error
        assert!(!ds.promote()?);

        Ok(())
    }

    #[test]
    fn test_promote_with_local_system() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        ds.begin(ReadWrite::Read)?;
        assert!(ds.promote()?);
        ds.commit()?;
        ds.end()?;
        Ok(())
    }

    #[test]
    fn test_accessors_and_sync() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();

        assert!(ds.location().is_mem());
        assert!(!ds.params()?.check_for_change);
        assert!(ds.triple_table()?.is_empty());
        assert!(ds.quad_table()?.is_empty());

        ds.prefixes()?.insert_prefix("ex", "http://example.org/");
        assert_eq!(
            ds.prefixes()?.get("ex"),
            Some("http://example.org/".to_string())
        );

        let order = ds.reorder_transform()?.reorder(&[[None, None, None]]);
        assert_eq!(order, vec![0]);

        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;
        ds.sync()?;

        Ok(())
    }

    #[test]
    fn test_shutdown_consumes_dataset() -> Result<()> {
        let ds = DatasetGraphTDB::in_memory();
        ds.add_to_default_graph(&t("s"), &t("p"), &t("o"))?;
        ds.shutdown();
        Ok(())
    }
}
