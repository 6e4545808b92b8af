//! Store configuration and location

use std::fmt;
use std::path::PathBuf;

/// Storage tuning parameters.
///
/// Passed through to the storage collaborators unexamined, except for
/// `check_for_change`, which this layer reads to decide whether mutation
/// notifications probe for pre-existence (strict mode) or classify
/// optimistically (default).
#[derive(Debug, Clone)]
pub struct StoreParams {
    /// Node dictionary cache size, in entries
    pub node_cache_size: usize,
    /// Tuple index cache size, in entries
    pub index_cache_size: usize,
    /// Probe existence before classifying a change notification
    pub check_for_change: bool,
}

impl Default for StoreParams {
    fn default() -> Self {
        StoreParams {
            node_cache_size: 100_000,
            index_cache_size: 250_000,
            check_for_change: false,
        }
    }
}

/// Storage location tag: a directory on disk or the in-memory marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Non-persistent store
    Mem,
    /// Directory holding the store's files
    Path(PathBuf),
}

impl Location {
    /// In-memory location
    pub fn mem() -> Self {
        Location::Mem
    }

    /// File-system location
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Location::Path(path.into())
    }

    /// Whether this location is non-persistent
    pub fn is_mem(&self) -> bool {
        matches!(self, Location::Mem)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Mem => write!(f, "--mem--"),
            Location::Path(p) => write!(f, "{}", p.display()),
        }
    }
}
