//! Branch color palette
//!
//! Each top-level branch of a map is drawn in one color family. The palette
//! is fixed and ordered; `branch_index` values produced by the flattener are
//! indices into it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of entries in [`BRANCH_COLORS`].
pub const PALETTE_SIZE: usize = 8;

// =============================================================================
// COLOR
// =============================================================================

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Darken each channel by `percent` of full scale, clamping at black.
    pub fn darken(&self, percent: f32) -> Self {
        let amount = (2.55 * percent).round() as i32;
        let channel = |c: u8| (c as i32 - amount).clamp(0, 255) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error type for parsing a hex color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Accepts `#rrggbb` or `rrggbb`.
impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(format!(
                "Invalid color '{}'. Expected #rrggbb",
                s
            )));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|e| ParseColorError(format!("Invalid color '{}': {}", s, e)))?;
        Ok(Self::new(
            (value >> 16) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Darken a `#rrggbb` string by `percent`.
pub fn darken_color(color: &str, percent: f32) -> Result<String, ParseColorError> {
    Ok(color.parse::<Rgb>()?.darken(percent).to_hex())
}

// =============================================================================
// BRANCH PALETTE
// =============================================================================

/// Ordered branch colors.
pub const BRANCH_COLORS: [Rgb; PALETTE_SIZE] = [
    Rgb::new(0xef, 0x40, 0x2f), // Core red
    Rgb::new(0xf5, 0x9e, 0x0b), // Amber
    Rgb::new(0x10, 0xb9, 0x81), // Emerald
    Rgb::new(0x3b, 0x82, 0xf6), // Blue
    Rgb::new(0x8b, 0x5c, 0xf6), // Violet
    Rgb::new(0xec, 0x48, 0x99), // Pink
    Rgb::new(0x06, 0xb6, 0xd4), // Cyan
    Rgb::new(0xf9, 0x73, 0x16), // Orange
];

/// Color for a branch index, wrapping past the end of the palette.
pub fn branch_color(branch_index: usize) -> Rgb {
    BRANCH_COLORS[branch_index % PALETTE_SIZE]
}

/// Fill, border, and text colors for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeStyle {
    pub fill: Rgb,
    pub border: Rgb,
    pub text: Rgb,
}

/// The root has its own dark style, independent of the palette.
pub const ROOT_STYLE: NodeStyle = NodeStyle {
    fill: Rgb::new(0x0f, 0x17, 0x2a),
    border: Rgb::new(0x0f, 0x17, 0x2a),
    text: Rgb::new(0xff, 0xff, 0xff),
};

/// Edge stroke color.
pub const EDGE_COLOR: Rgb = Rgb::new(0xcb, 0xd5, 0xe1);

/// Style for a node: root style when `branch_index` is `None`, otherwise a
/// white card bordered in the branch color.
pub fn node_style(branch_index: Option<usize>) -> NodeStyle {
    match branch_index {
        None => ROOT_STYLE,
        Some(index) => NodeStyle {
            fill: Rgb::new(0xff, 0xff, 0xff),
            border: branch_color(index),
            text: Rgb::new(0x1e, 0x29, 0x3b),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c: Rgb = "#3B82F6".parse().unwrap();
        assert_eq!(c, Rgb::new(0x3b, 0x82, 0xf6));
        assert_eq!(c.to_hex(), "#3b82f6");
        assert_eq!("ef402f".parse::<Rgb>().unwrap(), BRANCH_COLORS[0]);
    }

    #[test]
    fn test_invalid_hex() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_darken_clamps() {
        // 20% of 255 rounds to 51
        assert_eq!(darken_color("#ef402f", 20.0).unwrap(), "#bc0d00");
        assert_eq!(darken_color("#000000", 50.0).unwrap(), "#000000");
        assert_eq!(Rgb::new(10, 200, 255).darken(0.0), Rgb::new(10, 200, 255));
    }

    #[test]
    fn test_branch_color_wraps() {
        assert_eq!(branch_color(0), BRANCH_COLORS[0]);
        assert_eq!(branch_color(7), BRANCH_COLORS[7]);
        assert_eq!(branch_color(8), BRANCH_COLORS[0]);
        assert_eq!(branch_color(19), BRANCH_COLORS[3]);
    }

    #[test]
    fn test_node_style() {
        assert_eq!(node_style(None), ROOT_STYLE);
        assert_eq!(node_style(Some(2)).border, BRANCH_COLORS[2]);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&BRANCH_COLORS[1]).unwrap();
        assert_eq!(json, "\"#f59e0b\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BRANCH_COLORS[1]);
    }
}
