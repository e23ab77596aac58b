//! Duplicate-glyph search over recognized text and conversion of each hit
//! into a click position.

use std::collections::HashSet;

use ocr::{Point, Quad, RecognizedText};
use serde::{Deserialize, Serialize};

/// Pixel-space centre of one occurrence of the duplicated glyph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickCoordinate {
    pub x: f32,
    pub y: f32,
}

impl ClickCoordinate {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for ClickCoordinate {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Outcome of the locator for one recognized image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Group texts concatenated in group order.
    pub key: String,
    /// First character that repeats in `key`, if any.
    pub duplicate: Option<char>,
    /// One entry per occurrence of `duplicate`, in scan order.
    pub clicks: Vec<ClickCoordinate>,
}

impl Location {
    /// `true` when there is nothing to click.
    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }
}

/// Concatenate every group's text in group order.
pub fn text_key(groups: &[RecognizedText]) -> String {
    groups.iter().map(|group| group.text.as_str()).collect()
}

/// First character of `key` that was already seen earlier in the scan.
///
/// `"AB7A9"` yields `Some('A')`; `"XYZ"` yields `None`.
pub fn find_duplicate(key: &str) -> Option<char> {
    let mut seen = HashSet::new();
    key.chars().find(|c| !seen.insert(*c))
}

/// Sub-box of character `index` out of `length` characters sharing `quad`.
///
/// The top edge is split into `length` equal steps. The bottom edge reuses
/// the top-edge step starting from the bottom-left corner instead of
/// splitting the bottom edge itself, so the result is exact only when the
/// quad is a parallelogram. Recognizers that return perspective-distorted
/// boxes get an approximation.
pub fn sub_quad(quad: &Quad, index: usize, length: usize) -> Quad {
    debug_assert!(length > 0 && index < length);
    let [top_left, top_right, _, bottom_left] = *quad.corners();
    let n = length as f32;
    let tx = (top_right.x - top_left.x) / n;
    let ty = (top_right.y - top_left.y) / n;

    let start = index as f32;
    let end = start + 1.0;
    Quad::new(
        top_left.offset(tx * start, ty * start),
        top_left.offset(tx * end, ty * end),
        bottom_left.offset(tx * end, ty * end),
        bottom_left.offset(tx * start, ty * start),
    )
}

/// Click positions for every occurrence of `duplicate`, ordered by group
/// then by character position inside the group.
pub fn locate(groups: &[RecognizedText], duplicate: char) -> Vec<ClickCoordinate> {
    let mut clicks = Vec::new();
    for group in groups {
        let length = group.char_count();
        for (index, ch) in group.text.chars().enumerate() {
            if ch == duplicate {
                let centre = sub_quad(&group.quad, index, length).centroid();
                clicks.push(centre.into());
            }
        }
    }
    clicks
}

/// Build the key, find its duplicate and locate every occurrence.
pub fn locate_all(groups: &[RecognizedText]) -> Location {
    let key = text_key(groups);
    let duplicate = find_duplicate(&key);
    let clicks = duplicate
        .map(|ch| locate(groups, ch))
        .unwrap_or_default();
    Location {
        key,
        duplicate,
        clicks,
    }
}
