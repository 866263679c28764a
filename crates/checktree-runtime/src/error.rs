#![forbid(unsafe_code)]

//! Errors surfaced by [`CheckboxTree`](crate::CheckboxTree) operations.
//!
//! Expected conditions are not errors: toggling a disabled item, checking an
//! already-checked item, or unchecking an absent one all succeed without
//! changing anything. Only addressing something the current tree does not
//! contain fails.

/// Operation addressed an item or node outside the current tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckboxTreeError {
    /// No node of the current tree matches the item under the comparator.
    #[error("item is not part of the current tree")]
    ItemNotInTree,
    /// Node id from an older (or different) tree.
    #[error("node {id} is out of range for a tree of {len} nodes")]
    NodeOutOfRange {
        /// The offending id.
        id: usize,
        /// Node count of the current tree, synthetic root included.
        len: usize,
    },
}

/// Standard result type for checkbox-tree operations.
pub type Result<T> = std::result::Result<T, CheckboxTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            CheckboxTreeError::ItemNotInTree.to_string(),
            "item is not part of the current tree"
        );
        assert_eq!(
            CheckboxTreeError::NodeOutOfRange { id: 9, len: 4 }.to_string(),
            "node 9 is out of range for a tree of 4 nodes"
        );
    }
}
