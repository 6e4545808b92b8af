//! Pattern reorder strategy
//!
//! The dataset holds a reorder transformation for its whole life and hands
//! it to query engines untouched; the coordinator never interprets it.

use crate::dictionary::NodeId;

/// An id-level triple pattern as seen by a reorder strategy
pub type ReorderPattern = [Option<NodeId>; 3];

/// Pattern-execution-order strategy.
///
/// Given a basic pattern block, returns the indexes of its entries in
/// execution order. Implementations must return a permutation of
/// `0..pattern.len()`.
pub trait ReorderTransformation: Send + Sync {
    fn reorder(&self, pattern: &[ReorderPattern]) -> Vec<usize>;
}

/// Identity strategy: execute patterns in the order given
pub struct ReorderNone;

impl ReorderTransformation for ReorderNone {
    fn reorder(&self, pattern: &[ReorderPattern]) -> Vec<usize> {
        (0..pattern.len()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_none_is_identity() {
        let strategy = ReorderNone;
        let pattern = vec![
            [Some(NodeId::new(1)), None, None],
            [None, Some(NodeId::new(2)), None],
            [None, None, None],
        ];
        assert_eq!(strategy.reorder(&pattern), vec![0, 1, 2]);
        assert!(strategy.reorder(&[]).is_empty());
    }
}
