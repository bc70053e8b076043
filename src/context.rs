//! Named-graph context collection
//!
//! A single bottom-up pass that annotates the highest node whose whole
//! subtree shares one graph context. Renderers open a graph block only at
//! annotated nodes.

use crate::algebra::{AlgebraNode, Term};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Node identity → context, borrowed from the tree it was collected from
#[derive(Debug, Default, Clone)]
pub struct ContextMap<'t> {
    entries: FxHashMap<*const AlgebraNode, &'t Term>,
}

/// Collect the context map of a tree
pub fn collect_contexts(root: &AlgebraNode) -> ContextMap<'_> {
    ContextMap::collect(root)
}

impl<'t> ContextMap<'t> {
    /// An empty map: nothing renders inside a graph block
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(root: &'t AlgebraNode) -> Self {
        let mut map = Self::new();
        map.visit(root);
        debug!("Collected {} graph context(s)", map.len());
        map
    }

    /// Context covering this node's subtree, if it opens a graph block
    pub fn get(&self, node: &AlgebraNode) -> Option<&'t Term> {
        self.entries.get(&key(node)).copied()
    }

    pub fn contains(&self, node: &AlgebraNode) -> bool {
        self.entries.contains_key(&key(node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded contexts, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &'t Term> + '_ {
        self.entries.values().copied()
    }

    fn visit(&mut self, node: &'t AlgebraNode) {
        match node {
            AlgebraNode::Pattern(pattern) => {
                if let Some(ctx) = pattern.context() {
                    self.entries.insert(key(node), ctx);
                }
            }
            AlgebraNode::Join { left, right }
            | AlgebraNode::LeftJoin { left, right, .. }
            | AlgebraNode::Union { left, right }
            | AlgebraNode::Difference { left, right }
            | AlgebraNode::Intersection { left, right } => {
                self.visit(left);
                self.visit(right);
                self.merge_binary(node, left, right);
            }
            AlgebraNode::Filter { arg, .. } => {
                self.visit(arg);
                if let Some(ctx) = self.entries.remove(&key(arg)) {
                    self.entries.insert(key(node), ctx);
                }
            }
            AlgebraNode::Extension { arg, .. }
            | AlgebraNode::Order { arg, .. }
            | AlgebraNode::Distinct(arg)
            | AlgebraNode::Reduced(arg)
            | AlgebraNode::Slice { arg, .. } => self.visit(arg),
            AlgebraNode::Projection { arg, .. } | AlgebraNode::MultiProjection { arg, .. } => {
                if let Some(arg) = arg {
                    self.visit(arg);
                }
            }
            AlgebraNode::SingletonSet => {}
        }
    }

    fn merge_binary(&mut self, node: &AlgebraNode, left: &AlgebraNode, right: &AlgebraNode) {
        let (l, r) = (key(left), key(right));
        let promoted = match (self.entries.get(&l).copied(), self.entries.get(&r).copied()) {
            (Some(ctx), None) => {
                self.entries.remove(&l);
                Some(ctx)
            }
            (None, Some(ctx)) => {
                self.entries.remove(&r);
                Some(ctx)
            }
            (Some(a), Some(b)) if a.same_context(b) => {
                self.entries.remove(&l);
                self.entries.remove(&r);
                Some(a)
            }
            _ => None,
        };
        if let Some(ctx) = promoted {
            self.entries.insert(key(node), ctx);
        }
    }
}

fn key(node: &AlgebraNode) -> *const AlgebraNode {
    node as *const AlgebraNode
}
