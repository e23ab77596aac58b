use serde::{Deserialize, Serialize};

/// Pixel-space point with sub-pixel precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point moved by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Bounding quadrilateral of a recognized text region.
///
/// Corners are always stored clockwise starting at the top-left:
/// top-left, top-right, bottom-right, bottom-left. Per-character
/// interpolation downstream relies on that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    corners: [Point; 4],
}

impl Quad {
    pub fn new(top_left: Point, top_right: Point, bottom_right: Point, bottom_left: Point) -> Self {
        Self {
            corners: [top_left, top_right, bottom_right, bottom_left],
        }
    }

    /// Axis-aligned quad covering `width` x `height` pixels from `(left, top)`.
    pub fn from_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        let right = left + width;
        let bottom = top + height;
        Self::new(
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        )
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Arithmetic mean of the four corners.
    pub fn centroid(&self) -> Point {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / 4.0, sy / 4.0)
    }
}

impl From<[Point; 4]> for Quad {
    fn from(corners: [Point; 4]) -> Self {
        Self { corners }
    }
}

impl From<[(f32, f32); 4]> for Quad {
    fn from(corners: [(f32, f32); 4]) -> Self {
        Self {
            corners: corners.map(Point::from),
        }
    }
}

/// OCR output for a single detected region.
///
/// `text` may hold several glyphs when the recognizer merges neighbouring
/// characters into one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub quad: Quad,
    pub text: String,
}

impl RecognizedText {
    pub fn new(quad: Quad, text: impl Into<String>) -> Self {
        Self {
            quad,
            text: text.into(),
        }
    }

    /// Number of characters (Unicode scalar values) in `text`.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
