// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The containment forest: a synthetic root plus one node per visible region.

use core::fmt;

use crate::visibility::VisibleRegion;

/// Identifier of a node in a [`Forest`]. The root is always `0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The synthetic whole-scene node.
    pub const ROOT: Self = Self(0);

    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node ids are intentionally 32-bit; scenes never approach that many regions."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Position of the node in the forest.
    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    /// The numeric id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One node of the forest.
#[derive(Clone, Debug)]
pub struct HierarchyNode {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    region: Option<VisibleRegion>,
}

impl HierarchyNode {
    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Parent id as exported: `-1` for the root.
    pub fn parent_id(&self) -> i64 {
        self.parent.map_or(-1, |p| i64::from(p.get()))
    }

    /// Children in ascending id order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The region, `None` only for the root.
    pub fn region(&self) -> Option<&VisibleRegion> {
        self.region.as_ref()
    }

    /// Whether this is the synthetic root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A tree rooted at [`NodeId::ROOT`] whose other nodes each own a region.
///
/// Node ids are dense: node `k` is at position `k`.
#[derive(Clone, Debug)]
pub struct Forest {
    nodes: Vec<HierarchyNode>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::from_parents(Vec::new(), &[])
    }
}

impl Forest {
    /// Build from regions and, for each, the position of its parent region.
    ///
    /// Region `i` becomes node `i + 1`. A `None` (or an out-of-range or
    /// self-referencing position) attaches the region to the root.
    pub(crate) fn from_parents(regions: Vec<VisibleRegion>, parents: &[Option<usize>]) -> Self {
        let n = regions.len();
        let mut nodes = Vec::with_capacity(n + 1);
        nodes.push(HierarchyNode {
            id: NodeId::ROOT,
            parent: None,
            children: Vec::new(),
            region: None,
        });
        for (i, region) in regions.into_iter().enumerate() {
            let parent = match parents.get(i).copied().flatten() {
                Some(p) if p < n && p != i => NodeId::new(p + 1),
                _ => NodeId::ROOT,
            };
            nodes.push(HierarchyNode {
                id: NodeId::new(i + 1),
                parent: Some(parent),
                children: Vec::new(),
                region: Some(region),
            });
        }
        let mut forest = Self { nodes };
        forest.link_children();
        forest
    }

    fn link_children(&mut self) {
        for node in &mut self.nodes {
            node.children.clear();
        }
        for i in 1..self.nodes.len() {
            if let Some(p) = self.nodes[i].parent {
                self.nodes[p.idx()].children.push(NodeId::new(i));
            }
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// The root node.
    pub fn root(&self) -> &HierarchyNode {
        &self.nodes[0]
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.idx())
    }

    /// All nodes in id order, root first.
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    /// Parent of `id`; `None` for the root or unknown ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(HierarchyNode::parent)
    }

    /// Children of `id`, or an empty slice for unknown ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(HierarchyNode::children)
            .unwrap_or_default()
    }

    /// Number of edges between `id` and the root.
    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        self.node(id)?;
        Some(self.ancestors(id).count())
    }

    /// Ancestors of `id`, nearest first, ending with the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent_of(id), |&p| self.parent_of(p))
    }

    /// Next node in pre-order depth-first traversal.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if let Some(&first) = self.children_of(current).first() {
            return Some(first);
        }
        let mut node = current;
        while let Some(parent) = self.parent_of(node) {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children_of(self.parent_of(node)?);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Every node in pre-order, starting at the root.
    pub fn depth_first(&self) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(Some(NodeId::ROOT), |&id| self.next_depth_first(id))
    }

    /// Reassign ids 1..n by sorting nodes on `key`; ties keep the current order.
    ///
    /// The shape of the tree is unchanged, only the labels move.
    #[must_use]
    pub fn renumbered_by<K, F>(self, mut key: F) -> Self
    where
        K: Ord,
        F: FnMut(&VisibleRegion) -> K,
    {
        let mut order: Vec<usize> = (1..self.nodes.len()).collect();
        order.sort_by_cached_key(|&i| self.nodes[i].region.as_ref().map(&mut key));

        let mut new_id = vec![NodeId::ROOT; self.nodes.len()];
        for (pos, &old) in order.iter().enumerate() {
            new_id[old] = NodeId::new(pos + 1);
        }

        let mut old_nodes: Vec<Option<HierarchyNode>> = self.nodes.into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(old_nodes.len());
        if let Some(root) = old_nodes[0].take() {
            nodes.push(root);
        }
        for &old in &order {
            if let Some(mut node) = old_nodes[old].take() {
                node.id = new_id[old];
                node.parent = node.parent.map(|p| new_id[p.idx()]);
                nodes.push(node);
            }
        }
        let mut forest = Self { nodes };
        forest.link_children();
        forest
    }
}
