//! Layered tree layout
//!
//! A layered drawing specialized for trees. Because every node has at most
//! one parent there is no rank search and no crossing minimization:
//!
//! 1. **Rank** - depth below the root.
//! 2. **Order** - preorder traversal; children stay contiguous under their
//!    parent, so edges never cross.
//! 3. **Coordinates** - the rank axis advances by node extent plus
//!    `rank_separation` per rank. On the cross axis each leaf reserves one
//!    pitch (node extent plus `node_separation`); every subtree owns the band
//!    spanned by its leaves and its root is centered in that band.
//! 4. **Anchor** - centers are shifted by half the node size so positions
//!    are top-left corners.
//!
//! ```text
//!  LR:   rank 0      rank 1      rank 2
//!                  ┌─ a ──────── a1      leaf 0
//!        root ─────┤             a2      leaf 1
//!                  └─ b                  leaf 2
//! ```

mod config;

pub use config::{
    Direction, HandleSide, LayoutConfig, ParseDirectionError, NODE_HEIGHT, NODE_SEPARATION,
    NODE_WIDTH, RANK_SEPARATION,
};

use crate::error::LayoutError;
use crate::graph::{GraphEdge, GraphNode, Position};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Position `nodes` with the given configuration.
pub fn layout(
    nodes: Vec<GraphNode>,
    edges: &[GraphEdge],
    config: &LayoutConfig,
) -> Result<Vec<GraphNode>, LayoutError> {
    LayoutEngine::new(config.clone()).layout(nodes, edges)
}

/// Stateless layered layout engine; safe to reuse across graphs.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Assign rank, order, and top-left position to every node.
    ///
    /// Nodes are returned in their input order. Nodes without a parent edge
    /// each start a tree; trees are placed one after another along the cross
    /// axis. Edges naming unknown nodes, self loops, and second parents are
    /// skipped.
    pub fn layout(
        &self,
        mut nodes: Vec<GraphNode>,
        edges: &[GraphEdge],
    ) -> Result<Vec<GraphNode>, LayoutError> {
        self.config.validate()?;
        if nodes.is_empty() {
            return Ok(nodes);
        }

        let forest = Forest::build(&nodes, edges);
        let walk = forest.preorder();

        // Leaf counts, children before parents.
        let mut leaves = vec![0usize; nodes.len()];
        for &(idx, _) in walk.iter().rev() {
            leaves[idx] = forest.children[idx]
                .iter()
                .map(|&c| leaves[c])
                .sum::<usize>()
                .max(1);
        }

        // First leaf slot of every subtree, parents before children.
        let mut first_slot = vec![0usize; nodes.len()];
        let mut cursor = 0usize;
        let mut rank_counts: Vec<usize> = Vec::new();
        for &(idx, rank) in &walk {
            if forest.tree_parent[idx].is_none() {
                first_slot[idx] = cursor;
                cursor += leaves[idx];
            }
            let mut slot = first_slot[idx];
            for &child in &forest.children[idx] {
                first_slot[child] = slot;
                slot += leaves[child];
            }

            if rank_counts.len() <= rank {
                rank_counts.resize(rank + 1, 0);
            }
            let node = &mut nodes[idx];
            node.rank = rank;
            node.order = rank_counts[rank];
            rank_counts[rank] += 1;
            node.position = self.position(rank, first_slot[idx], leaves[idx]);
        }

        debug!(
            nodes = nodes.len(),
            ranks = rank_counts.len(),
            leaf_slots = cursor,
            direction = %self.config.direction,
            "layout complete"
        );

        Ok(nodes)
    }

    /// Top-left corner of a node in `rank` whose subtree starts at leaf
    /// `first_slot` and spans `leaf_count` leaves.
    fn position(&self, rank: usize, first_slot: usize, leaf_count: usize) -> Position {
        let rank_extent = self.config.rank_extent();
        let cross_extent = self.config.cross_extent();
        let pitch = cross_extent + self.config.node_separation;

        let rank_center =
            rank as f32 * (rank_extent + self.config.rank_separation) + rank_extent / 2.0;
        let band_start = first_slot as f32 * pitch;
        let band_len = leaf_count as f32 * pitch - self.config.node_separation;
        let cross_center = band_start + band_len / 2.0;

        let rank_pos = rank_center - rank_extent / 2.0;
        let cross_pos = cross_center - cross_extent / 2.0;
        match self.config.direction {
            Direction::LeftRight => Position::new(rank_pos, cross_pos),
            Direction::TopBottom => Position::new(cross_pos, rank_pos),
        }
    }
}

/// Spanning forest over node indices.
struct Forest {
    /// Child lists in edge order, restricted to edges kept in the forest.
    children: Vec<Vec<usize>>,
    tree_parent: Vec<Option<usize>>,
}

impl Forest {
    fn build(nodes: &[GraphNode], edges: &[GraphEdge]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(i);
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut tree_parent = vec![None; nodes.len()];
        for edge in edges {
            let (Some(&source), Some(&target)) = (
                index.get(edge.source_id.as_str()),
                index.get(edge.target_id.as_str()),
            ) else {
                warn!(edge = %edge.id, "edge references unknown node, skipping");
                continue;
            };
            if source == target || tree_parent[target].is_some() {
                warn!(edge = %edge.id, "edge would break the tree shape, skipping");
                continue;
            }
            tree_parent[target] = Some(source);
            children[source].push(target);
        }

        let mut forest = Self {
            children,
            tree_parent,
        };
        forest.break_cycles(nodes.len());
        forest
    }

    /// Nodes on a parent cycle are unreachable from any root; cut the edge
    /// into the first such node so it becomes a root itself.
    fn break_cycles(&mut self, len: usize) {
        let mut reached = vec![false; len];
        let mut stack: Vec<usize> = (0..len)
            .filter(|&i| self.tree_parent[i].is_none())
            .collect();
        loop {
            while let Some(idx) = stack.pop() {
                reached[idx] = true;
                stack.extend(self.children[idx].iter().copied());
            }
            let Some(orphan) = (0..len).find(|&i| !reached[i]) else {
                break;
            };
            if let Some(parent) = self.tree_parent[orphan].take() {
                warn!(node = orphan, "cycle in parent edges, treating node as a root");
                self.children[parent].retain(|&c| c != orphan);
            }
            stack.push(orphan);
        }
    }

    /// (node index, rank) in preorder, roots in node order.
    fn preorder(&self) -> Vec<(usize, usize)> {
        let len = self.tree_parent.len();
        let mut walk = Vec::with_capacity(len);
        for root in (0..len).filter(|&i| self.tree_parent[i].is_none()) {
            let mut stack = vec![(root, 0usize)];
            while let Some((idx, rank)) = stack.pop() {
                walk.push((idx, rank));
                for &child in self.children[idx].iter().rev() {
                    stack.push((child, rank + 1));
                }
            }
        }
        walk
    }
}
