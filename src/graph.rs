//! Graph model consumed by rendering surfaces.
//!
//! ```text
//! GraphModel
//! ├── direction (LR | TB)
//! ├── nodeSize
//! ├── nodes: [GraphNode]   (preorder of the source tree)
//! └── edges: [GraphEdge]   (one per parent → child pair)
//! ```
//!
//! A model is never patched: changing direction or sizes means building a
//! new one from the tree.

use crate::layout::{Direction, HandleSide, LayoutConfig};
use serde::Serialize;
use std::collections::HashMap;

/// A point in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow on every side by `padding`.
    pub fn expand(&self, padding: f32) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }
}

/// One node of the flattened graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Palette slot of the node's top-level branch; `None` for the root.
    pub branch_index: Option<usize>,
    /// Layout layer.
    pub rank: usize,
    /// Left-to-right (or top-to-bottom) position within the rank.
    pub order: usize,
    /// Top-left corner.
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
}

impl GraphNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A parent → child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
}

impl GraphEdge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        let source_id = source_id.into();
        let target_id = target_id.into();
        Self {
            id: edge_id(&source_id, &target_id),
            source_id,
            target_id,
        }
    }
}

/// Edge id for a (source, target) pair: `source-target`.
///
/// `-` and `\` inside either id are backslash-escaped so distinct pairs never
/// map to the same id (`a-b`,`c` vs `a`,`b-c`).
pub fn edge_id(source_id: &str, target_id: &str) -> String {
    fn escape(id: &str, out: &mut String) {
        for c in id.chars() {
            if c == '-' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
    }
    let mut id = String::with_capacity(source_id.len() + target_id.len() + 1);
    escape(source_id, &mut id);
    id.push('-');
    escape(target_id, &mut id);
    id
}

/// Positioned graph, ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphModel {
    direction: Direction,
    node_size: Size,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GraphModel {
    /// Wrap positioned nodes and their edges.
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>, config: &LayoutConfig) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(i);
        }
        Self {
            direction: config.direction,
            node_size: Size {
                width: config.node_width,
                height: config.node_height,
            },
            nodes,
            edges,
            index,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn node_size(&self) -> Size {
        self.node_size
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.is_root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of `id`, in sibling order.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source_id == id)
            .filter_map(move |e| self.node(&e.target_id))
    }

    /// Bounding box of a single node.
    pub fn node_rect(&self, node: &GraphNode) -> Rect {
        Rect {
            x: node.position.x,
            y: node.position.y,
            width: self.node_size.width,
            height: self.node_size.height,
        }
    }

    /// Smallest rectangle containing every node box.
    pub fn bounds(&self) -> Rect {
        let mut rects = self.nodes.iter().map(|n| self.node_rect(n));
        let Some(first) = rects.next() else {
            return Rect::default();
        };
        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.right(), first.bottom());
        for r in rects {
            min_x = min_x.min(r.x);
            min_y = min_y.min(r.y);
            max_x = max_x.max(r.right());
            max_y = max_y.max(r.bottom());
        }
        Rect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Edge attachment sides: (incoming, outgoing).
    pub fn handle_sides(&self) -> (HandleSide, HandleSide) {
        (self.direction.target_side(), self.direction.source_side())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, parent: Option<&str>, x: f32, y: f32) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            depth: usize::from(parent.is_some()),
            branch_index: parent.map(|_| 0),
            rank: usize::from(parent.is_some()),
            order: 0,
            position: Position::new(x, y),
            parent_id: parent.map(str::to_string),
            collapsed: false,
        }
    }

    #[test]
    fn test_edge_id_plain() {
        assert_eq!(GraphEdge::new("r", "a").id, "r-a");
    }

    #[test]
    fn test_edge_id_escapes_separator() {
        assert_ne!(edge_id("a-b", "c"), edge_id("a", "b-c"));
        assert_eq!(edge_id("a-b", "c"), r"a\-b-c");
        assert_eq!(edge_id(r"a\", "b"), r"a\\-b");
    }

    #[test]
    fn test_lookup_and_children() {
        let model = GraphModel::new(
            vec![
                node("r", None, 0.0, 0.0),
                node("a", Some("r"), 430.0, 0.0),
                node("b", Some("r"), 430.0, 140.0),
            ],
            vec![GraphEdge::new("r", "a"), GraphEdge::new("r", "b")],
            &LayoutConfig::default(),
        );

        assert_eq!(model.len(), 3);
        assert_eq!(model.root().unwrap().id, "r");
        assert_eq!(model.node("b").unwrap().position.y, 140.0);
        assert!(model.node("zzz").is_none());
        let children: Vec<_> = model.children_of("r").map(|n| n.id.as_str()).collect();
        assert_eq!(children, vec!["a", "b"]);
    }

    #[test]
    fn test_bounds() {
        let model = GraphModel::new(
            vec![node("r", None, 0.0, 70.0), node("a", Some("r"), 430.0, 0.0)],
            vec![GraphEdge::new("r", "a")],
            &LayoutConfig::default(),
        );
        let bounds = model.bounds();
        assert_eq!(bounds, Rect { x: 0.0, y: 0.0, width: 680.0, height: 150.0 });
        assert_eq!(bounds.expand(50.0).width, 780.0);
        assert_eq!(GraphModel::new(vec![], vec![], &LayoutConfig::default()).bounds(), Rect::default());
    }

    #[test]
    fn test_serializes_camel_case() {
        let model = GraphModel::new(
            vec![node("r", None, 0.0, 0.0), node("a", Some("r"), 430.0, 0.0)],
            vec![GraphEdge::new("r", "a")],
            &LayoutConfig::default(),
        );
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["direction"], "LR");
        assert_eq!(json["nodeSize"]["width"], 250.0);
        assert_eq!(json["nodes"][0]["branchIndex"], serde_json::Value::Null);
        assert_eq!(json["nodes"][1]["branchIndex"], 0);
        assert_eq!(json["nodes"][1]["parentId"], "r");
        assert_eq!(json["edges"][0]["sourceId"], "r");
        assert!(json.get("index").is_none());
    }
}
