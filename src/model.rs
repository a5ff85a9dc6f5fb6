//! Idea tree types produced by validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advisory size of the idea, as judged by the model. Not used by layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the three values.
impl FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            other => Err(format!(
                "Unknown complexity '{}'. Valid values: Low, Medium, High",
                other
            )),
        }
    }
}

/// One node of the idea tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaTree {
    pub id: String,
    /// May contain embedded newlines for multi-line cards.
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IdeaTree>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
}

impl IdeaTree {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
            collapsed: false,
        }
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: IdeaTree) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(IdeaTree::node_count).sum::<usize>()
    }

    /// Number of levels in this subtree (a lone leaf has one).
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(IdeaTree::height).max().unwrap_or(0)
    }
}

/// A validated idea map: the tree plus the model's complexity rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaMap {
    pub root: IdeaTree,
    pub complexity: Complexity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complexity_is_case_sensitive() {
        assert_eq!("Medium".parse::<Complexity>().unwrap(), Complexity::Medium);
        assert!("medium".parse::<Complexity>().is_err());
        assert!("HIGH".parse::<Complexity>().is_err());
        assert!("extreme".parse::<Complexity>().is_err());
    }

    #[test]
    fn test_counts() {
        let tree = IdeaTree::new("r", "Root")
            .with_child(IdeaTree::new("a", "A").with_child(IdeaTree::new("a1", "A1")))
            .with_child(IdeaTree::new("b", "B"));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.height(), 3);
        assert!(!tree.is_leaf());
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn test_serialize_omits_defaults() {
        let json = serde_json::to_string(&IdeaTree::new("a", "A")).unwrap();
        assert_eq!(json, r#"{"id":"a","label":"A"}"#);
    }
}
