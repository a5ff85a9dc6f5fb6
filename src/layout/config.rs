//! Layout configuration
//!
//! A closed set of options; unknown keys in config files are rejected.

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default node size, in layout units.
pub const NODE_WIDTH: f32 = 250.0;
pub const NODE_HEIGHT: f32 = 80.0;

/// Gap between adjacent ranks.
pub const RANK_SEPARATION: f32 = 180.0;
/// Minimum gap between adjacent nodes of the same rank.
pub const NODE_SEPARATION: f32 = 60.0;

/// Flow direction of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks advance along x; siblings stack along y.
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    /// Ranks advance along y; siblings spread along x.
    #[serde(rename = "TB")]
    TopBottom,
}

/// Side of a node box where edges attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftRight => "LR",
            Self::TopBottom => "TB",
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftRight)
    }

    /// Where incoming edges attach.
    pub fn target_side(&self) -> HandleSide {
        match self {
            Self::LeftRight => HandleSide::Left,
            Self::TopBottom => HandleSide::Top,
        }
    }

    /// Where outgoing edges leave.
    pub fn source_side(&self) -> HandleSide {
        match self {
            Self::LeftRight => HandleSide::Right,
            Self::TopBottom => HandleSide::Bottom,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing Direction
#[derive(Debug)]
pub struct ParseDirectionError(String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LR" => Ok(Self::LeftRight),
            "TB" => Ok(Self::TopBottom),
            other => Err(ParseDirectionError(format!(
                "Unknown direction '{}'. Valid values: LR, TB",
                other
            ))),
        }
    }
}

/// Options recognized by the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_width: f32,
    pub node_height: f32,
    pub rank_separation: f32,
    pub node_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            node_width: NODE_WIDTH,
            node_height: NODE_HEIGHT,
            rank_separation: RANK_SEPARATION,
            node_separation: NODE_SEPARATION,
        }
    }
}

impl LayoutConfig {
    /// Builder: set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let size_ok = |v: f32| v.is_finite() && v > 0.0;
        if !size_ok(self.node_width) || !size_ok(self.node_height) {
            return Err(LayoutError::InvalidNodeSize {
                width: self.node_width,
                height: self.node_height,
            });
        }
        for (name, value) in [
            ("rankSeparation", self.rank_separation),
            ("nodeSeparation", self.node_separation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidSeparation { name, value });
            }
        }
        Ok(())
    }

    /// Node extent along the rank axis.
    pub(crate) fn rank_extent(&self) -> f32 {
        match self.direction {
            Direction::LeftRight => self.node_width,
            Direction::TopBottom => self.node_height,
        }
    }

    /// Node extent along the cross axis.
    pub(crate) fn cross_extent(&self) -> f32 {
        match self.direction {
            Direction::LeftRight => self.node_height,
            Direction::TopBottom => self.node_width,
        }
    }
}
