//! Tree flattener - turns an `IdeaTree` into graph nodes and edges.
//!
//! Nodes come out in depth-first preorder, edges in the order their child
//! nodes are reached. Branch colors:
//!
//! ```text
//! root              (none)
//! ├── child 0       0
//! │   └── ...       0   (inherited)
//! ├── child 1       1
//! ...
//! └── child 9       9 % palette_size
//! ```

use crate::graph::{GraphEdge, GraphNode, Position};
use crate::model::IdeaTree;
use crate::palette::PALETTE_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlattenConfig {
    /// Number of branch colors; indices wrap modulo this. Zero is treated as one.
    pub palette_size: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            palette_size: PALETTE_SIZE,
        }
    }
}

/// Flatten with the default palette size.
pub fn flatten(tree: &IdeaTree) -> (Vec<GraphNode>, Vec<GraphEdge>) {
    TreeFlattener::default().flatten(tree)
}

/// Deterministic tree → (nodes, edges) conversion.
#[derive(Debug, Clone, Default)]
pub struct TreeFlattener {
    config: FlattenConfig,
}

impl TreeFlattener {
    pub fn new(config: FlattenConfig) -> Self {
        Self { config }
    }

    pub fn flatten(&self, tree: &IdeaTree) -> (Vec<GraphNode>, Vec<GraphEdge>) {
        let palette_size = self.config.palette_size.max(1);
        let mut nodes = Vec::with_capacity(tree.node_count());
        let mut edges = Vec::with_capacity(nodes.capacity().saturating_sub(1));

        // (node, parent id, depth, branch index)
        let mut stack: Vec<(&IdeaTree, Option<&str>, usize, Option<usize>)> =
            vec![(tree, None, 0, None)];

        while let Some((node, parent_id, depth, branch_index)) = stack.pop() {
            if let Some(parent_id) = parent_id {
                edges.push(GraphEdge::new(parent_id, node.id.as_str()));
            }

            nodes.push(GraphNode {
                id: node.id.clone(),
                label: node.label.clone(),
                depth,
                branch_index,
                rank: depth,
                order: 0,
                position: Position::default(),
                parent_id: parent_id.map(str::to_string),
                collapsed: node.collapsed,
            });

            // Reverse push keeps preorder in sibling order.
            for (ordinal, child) in node.children.iter().enumerate().rev() {
                let child_branch = if depth == 0 {
                    Some(ordinal % palette_size)
                } else {
                    branch_index
                };
                stack.push((child, Some(node.id.as_str()), depth + 1, child_branch));
            }
        }

        (nodes, edges)
    }
}
