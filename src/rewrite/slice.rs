//! Limit/offset mutation

use super::{RewriteError, RewriteResult};
use crate::algebra::{AlgebraNode, NodeKind};
use tracing::debug;

/// What a slice mutation did to the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceChange {
    /// An existing slice node was overwritten in place
    Updated,
    /// A new slice node became the root
    Inserted,
}

pub fn set_limit(tree: &mut AlgebraNode, limit: u64) -> RewriteResult<SliceChange> {
    set_slice(tree, Some(limit), None)
}

pub fn set_offset(tree: &mut AlgebraNode, offset: u64) -> RewriteResult<SliceChange> {
    set_slice(tree, None, Some(offset))
}

pub fn set_limit_and_offset(tree: &mut AlgebraNode, limit: u64, offset: u64) -> RewriteResult<SliceChange> {
    set_slice(tree, Some(limit), Some(offset))
}

/// Overwrite only the given fields of the slice node, inserting one at the
/// root when the tree has none.
fn set_slice(tree: &mut AlgebraNode, limit: Option<u64>, offset: Option<u64>) -> RewriteResult<SliceChange> {
    let slices = tree.count_kind(NodeKind::Slice);
    if slices > 1 {
        return Err(RewriteError::UnsupportedRewrite(format!(
            "tree has {} slice nodes, expected at most one",
            slices
        )));
    }

    if let Some((current_limit, current_offset)) = find_slice_mut(tree) {
        if limit.is_some() {
            *current_limit = limit;
        }
        if offset.is_some() {
            *current_offset = offset;
        }
        debug!("Updated slice: limit={:?}, offset={:?}", current_limit, current_offset);
        return Ok(SliceChange::Updated);
    }

    let old_root = std::mem::replace(tree, AlgebraNode::SingletonSet);
    *tree = AlgebraNode::slice(old_root, limit, offset);
    debug!("Inserted slice root: limit={:?}, offset={:?}", limit, offset);
    Ok(SliceChange::Inserted)
}

fn find_slice_mut(node: &mut AlgebraNode) -> Option<(&mut Option<u64>, &mut Option<u64>)> {
    match node {
        AlgebraNode::Slice { limit, offset, .. } => Some((limit, offset)),
        other => other.children_mut().into_iter().find_map(find_slice_mut),
    }
}
