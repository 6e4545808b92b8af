//! Transactional system boundary
//!
//! The dataset does not own transaction state; it delegates lifecycle calls
//! to a [`TransactionalSystem`]. The commit protocol (WAL, locking, MVCC) is
//! the implementor's concern. [`LocalTransactionalSystem`] is the in-memory
//! state machine used by default wiring and tests.

use crate::error::{Result, StoreError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, warn};

/// Transaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadWrite {
    Read,
    Write,
}

/// Owner of the transaction state machine:
/// not-in-transaction → read | write → (promoted write) → ended.
pub trait TransactionalSystem: Send + Sync {
    /// Start a transaction in the given mode
    fn begin(&self, mode: ReadWrite) -> Result<()>;

    /// Try to upgrade a read transaction to a write transaction.
    /// `false` is a negative result, not an error.
    fn promote(&self) -> Result<bool>;

    /// Commit the active transaction
    fn commit(&self) -> Result<()>;

    /// Abort the active transaction
    fn abort(&self) -> Result<()>;

    /// Finish the active transaction, releasing its resources
    fn end(&self) -> Result<()>;

    /// Whether a transaction is active
    fn is_in_transaction(&self) -> bool;

    /// Shut the transaction manager down. Called from dataset shutdown.
    fn shutdown(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxnState {
    Read { begin_epoch: u64 },
    Write,
    Committed,
    Aborted,
}

/// In-memory transactional system supporting one active transaction at a
/// time. Tracks lifecycle state only; isolation is out of scope here.
pub struct LocalTransactionalSystem {
    state: Mutex<Option<TxnState>>,
    commit_epoch: AtomicU64,
    shut_down: AtomicBool,
}

impl LocalTransactionalSystem {
    pub fn new() -> Self {
        LocalTransactionalSystem {
            state: Mutex::new(None),
            commit_epoch: AtomicU64::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Number of commits since creation
    pub fn commit_epoch(&self) -> u64 {
        self.commit_epoch.load(Ordering::SeqCst)
    }

    fn check_running(&self) -> Result<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(StoreError::Transaction(
                "transaction system has been shut down".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LocalTransactionalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionalSystem for LocalTransactionalSystem {
    fn begin(&self, mode: ReadWrite) -> Result<()> {
        self.check_running()?;
        let mut state = self.state.lock();
        if state.is_some() {
            return Err(StoreError::Transaction(
                "already in a transaction".into(),
            ));
        }
        *state = Some(match mode {
            ReadWrite::Read => TxnState::Read {
                begin_epoch: self.commit_epoch.load(Ordering::SeqCst),
            },
            ReadWrite::Write => TxnState::Write,
        });
        debug!(?mode, "transaction begin");
        Ok(())
    }

    fn promote(&self) -> Result<bool> {
        self.check_running()?;
        let mut state = self.state.lock();
        match *state {
            Some(TxnState::Read { begin_epoch }) => {
                // Promotion fails if a writer committed since this read began
                if begin_epoch != self.commit_epoch.load(Ordering::SeqCst) {
                    return Ok(false);
                }
                *state = Some(TxnState::Write);
                Ok(true)
            }
            Some(TxnState::Write) => Ok(true),
            Some(_) | None => Err(StoreError::Transaction(
                "promote outside an active transaction".into(),
            )),
        }
    }

    fn commit(&self) -> Result<()> {
        self.check_running()?;
        let mut state = self.state.lock();
        match *state {
            Some(TxnState::Read { .. }) => {
                *state = Some(TxnState::Committed);
                Ok(())
            }
            Some(TxnState::Write) => {
                self.commit_epoch.fetch_add(1, Ordering::SeqCst);
                *state = Some(TxnState::Committed);
                debug!("transaction committed");
                Ok(())
            }
            Some(_) | None => Err(StoreError::Transaction(
                "commit outside an active transaction".into(),
            )),
        }
    }

    fn abort(&self) -> Result<()> {
        self.check_running()?;
        let mut state = self.state.lock();
        match *state {
            Some(TxnState::Read { .. }) | Some(TxnState::Write) => {
                *state = Some(TxnState::Aborted);
                debug!("transaction aborted");
                Ok(())
            }
            Some(_) | None => Err(StoreError::Transaction(
                "abort outside an active transaction".into(),
            )),
        }
    }

    fn end(&self) -> Result<()> {
        self.check_running()?;
        let mut state = self.state.lock();
        if let Some(TxnState::Write) = *state {
            // Write transaction ended without commit or abort
            warn!("end of write transaction without commit or abort; aborting");
        }
        *state = None;
        Ok(())
    }

    fn is_in_transaction(&self) -> bool {
        matches!(
            *self.state.lock(),
            Some(TxnState::Read { .. }) | Some(TxnState::Write)
        )
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        debug!("transaction system shut down");
    }
}
