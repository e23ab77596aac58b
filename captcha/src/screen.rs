use serde::{Deserialize, Serialize};

use crate::locator::ClickCoordinate;

/// Maps image pixels to screen pixels for a caller that shows the CAPTCHA at
/// some offset and size.
///
/// `screen = origin + round(coordinate * scale)` on each axis. The solver
/// never moves the pointer itself; this only does the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMapping {
    /// Screen position of the image's top-left pixel.
    pub origin: (i32, i32),
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for ScreenMapping {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScreenMapping {
    /// Image pixels are screen pixels.
    pub const fn identity() -> Self {
        Self {
            origin: (0, 0),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Derive the scale from the decoded image size and the size it is
    /// displayed at on screen.
    pub fn from_display(image_size: (u32, u32), display_size: (u32, u32), origin: (i32, i32)) -> Self {
        let scale_x = display_size.0 as f32 / image_size.0.max(1) as f32;
        let scale_y = display_size.1 as f32 / image_size.1.max(1) as f32;
        Self {
            origin,
            scale_x,
            scale_y,
        }
    }

    pub fn to_screen(&self, click: ClickCoordinate) -> (i32, i32) {
        let x = self.origin.0 + (click.x * self.scale_x).round() as i32;
        let y = self.origin.1 + (click.y * self.scale_y).round() as i32;
        (x, y)
    }

    pub fn map_all(&self, clicks: &[ClickCoordinate]) -> Vec<(i32, i32)> {
        clicks.iter().map(|click| self.to_screen(*click)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rounds_to_nearest_pixel() {
        let mapping = ScreenMapping::identity();
        assert_eq!(mapping.to_screen(ClickCoordinate::new(2.5, 7.4)), (3, 7));
    }

    #[test]
    fn display_scale_and_origin_are_applied() {
        // 200x80 image shown at 100x40 starting at (300, 150)
        let mapping = ScreenMapping::from_display((200, 80), (100, 40), (300, 150));
        assert_eq!(mapping.scale_x, 0.5);
        assert_eq!(mapping.scale_y, 0.5);
        assert_eq!(
            mapping.map_all(&[ClickCoordinate::new(40.0, 20.0), ClickCoordinate::new(0.0, 0.0)]),
            vec![(320, 160), (300, 150)]
        );
    }

    #[test]
    fn zero_sized_image_does_not_divide_by_zero() {
        let mapping = ScreenMapping::from_display((0, 0), (10, 10), (0, 0));
        assert!(mapping.scale_x.is_finite());
        assert!(mapping.scale_y.is_finite());
    }
}
