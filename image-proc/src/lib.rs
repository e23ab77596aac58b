//! Pixel-level preprocessing applied to a CAPTCHA before text recognition.
//!
//! Two passes are provided: a neutral-tone mask that turns the image into
//! pure black ink on a white background, and a Gaussian smoothing pass that
//! softens the hard mask edges. Both operate on [`RgbImage`] and never change
//! the image dimensions.

use std::path::Path;

use image::{ImageFormat, ImageResult, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;

/// Default neutrality threshold used by [`binarize`].
pub const DEFAULT_SENSITIVITY: u16 = 25;

/// Standard deviation (in pixels) of the smoothing pass run before recognition.
pub const BLUR_RADIUS: f32 = 1.0;

/// Color written for pixels classified as background.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Color written for pixels classified as ink.
pub const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Outcome of the per-pixel neutrality test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Near-gray pixel, rewritten to white.
    Background,
    /// Colored pixel, rewritten to black.
    Ink,
}

impl PixelClass {
    /// Color the mask writes for this class.
    pub fn color(self) -> Rgb<u8> {
        match self {
            PixelClass::Background => BACKGROUND,
            PixelClass::Ink => INK,
        }
    }
}

/// Pixel counts produced by one [`binarize`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskStats {
    pub background: usize,
    pub ink: usize,
}

impl MaskStats {
    pub fn total(&self) -> usize {
        self.background + self.ink
    }
}

/// Classify a single pixel.
///
/// A pixel is background only when every channel lies strictly within
/// `sensitivity` of the pixel's own channel mean. The test runs on integers
/// (`|n*c - sum| < n*sensitivity` for `n` channels) so the mean is never
/// rounded.
///
/// A uniform pixel has zero deviation and is background for any
/// `sensitivity > 0`. With `sensitivity == 0` nothing passes the strict test
/// and every pixel is ink.
pub fn classify(pixel: Rgb<u8>, sensitivity: u16) -> PixelClass {
    let channels = pixel.0.len() as i32;
    let sum: i32 = pixel.0.iter().map(|&c| i32::from(c)).sum();
    let limit = channels * i32::from(sensitivity);

    let neutral = pixel
        .0
        .iter()
        .all(|&c| (channels * i32::from(c) - sum).abs() < limit);

    if neutral {
        PixelClass::Background
    } else {
        PixelClass::Ink
    }
}

/// Rewrite every pixel of `image` in place to pure white or pure black.
///
/// # Arguments
/// - `image`: RGB grid, mutated in place. Dimensions are unchanged.
/// - `sensitivity`: neutrality threshold, see [`classify`]. Larger values
///   classify more pixels as background.
///
/// # Returns
/// - Background and ink counts for the pass.
///
/// Running the mask a second time is not a no-op: pure black has zero
/// channel spread, so every ink pixel of the first pass becomes background.
pub fn binarize(image: &mut RgbImage, sensitivity: u16) -> MaskStats {
    let mut stats = MaskStats::default();
    for pixel in image.pixels_mut() {
        let class = classify(*pixel, sensitivity);
        *pixel = class.color();
        match class {
            PixelClass::Background => stats.background += 1,
            PixelClass::Ink => stats.ink += 1,
        }
    }
    stats
}

/// Gaussian-blur `image` with standard deviation `sigma`.
///
/// Returns a new image with the same dimensions. A non-positive (or NaN)
/// `sigma` returns an unchanged copy.
pub fn blur(image: &RgbImage, sigma: f32) -> RgbImage {
    if sigma.is_nan() || sigma <= 0.0 {
        return image.clone();
    }
    gaussian_blur_f32(image, sigma)
}

/// Write `image` to `path` as PNG regardless of the path's extension.
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}
