//! Change and transaction monitors
//!
//! Optional observers over a dataset. At most one of each kind may be
//! registered at a time; only the current registrant may unregister, checked
//! by `Arc` identity rather than value equality.

use crate::dictionary::Term;
use crate::txn::ReadWrite;

/// Classification of a mutation reported to a change monitor.
///
/// The `NoAdd`/`NoDelete` variants are produced only in the strict
/// change-check mode, when a pre-existence probe shows the operation was
/// redundant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadAction {
    Add,
    NoAdd,
    Delete,
    NoDelete,
}

/// Observer of logical add/delete events on a dataset.
///
/// `graph` is `None` for the default graph.
pub trait DatasetChanges: Send + Sync {
    fn change(&self, action: QuadAction, graph: Option<&Term>, s: &Term, p: &Term, o: &Term);
}

/// Observer of transaction-phase transitions.
///
/// One start/finish pair fires per lifecycle operation. The finish callback
/// runs even when the delegated transactional-system call fails.
pub trait TransactionalMonitor: Send + Sync {
    fn start_begin(&self, _mode: ReadWrite) {}
    fn finish_begin(&self, _mode: ReadWrite) {}

    fn start_promote(&self) {}
    fn finish_promote(&self) {}

    fn start_commit(&self) {}
    fn finish_commit(&self) {}

    fn start_abort(&self) {}
    fn finish_abort(&self) {}

    fn start_end(&self) {}
    fn finish_end(&self) {}
}
