//! OCR layout types
//!
//! Positioned word boxes as produced by an OCR provider and the line buckets
//! the layout reconstructor groups them into.

use serde::{Deserialize, Serialize};

/// Pixel coordinate on the source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A single recognized word and its bounding polygon.
///
/// `x`/`y` are the first (top-left) vertex of `polygon` and are the reference
/// point used for clustering and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedToken {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub polygon: [Point; 4],
}

impl PositionedToken {
    /// Build a token from its polygon, taking the reference point from the
    /// first vertex.
    pub fn from_polygon(text: impl Into<String>, polygon: [Point; 4]) -> Self {
        let origin = polygon[0];
        Self { text: text.into(), x: origin.x, y: origin.y, polygon }
    }

    /// Axis-aligned token with the given top-left corner and size.
    pub fn at(text: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::from_polygon(
            text,
            [
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
        )
    }
}

/// Tokens clustered onto one visual line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLine {
    /// y of the first token assigned to this line
    pub y_key: i32,
    pub tokens: Vec<PositionedToken>,
}

impl TextLine {
    pub fn new(first: PositionedToken) -> Self {
        Self { y_key: first.y, tokens: vec![first] }
    }

    /// Space-joined token texts in their current order.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ")
    }
}
