//! Text recognition contract for the workspace, plus a Tesseract backend.
//!
//! The solver only depends on [`Recognizer`]: an image goes in, an ordered
//! list of `(text, quad)` regions comes out. [`TesseractEngine`] is the
//! bundled implementation; callers may inject any other engine.

mod config;
mod engine;
mod result;

use anyhow::Context;
use image::DynamicImage;
use std::path::Path;

pub use config::TesseractOptions;
pub use engine::{TesseractEngine, recognize_path};
pub use result::{Point, Quad, RecognizedText};

/// Crate-wide result type.
pub type OcrResult<T> = anyhow::Result<T>;

/// Anything that can turn an image into recognized text regions.
///
/// Implementations return regions in reading order with quad corners in
/// top-left, top-right, bottom-right, bottom-left order. Loading models or
/// locating binaries is the implementor's job and happens before the first
/// call.
pub trait Recognizer {
    /// Run OCR on an already loaded image.
    fn recognize(&mut self, image: &DynamicImage) -> OcrResult<Vec<RecognizedText>>;

    /// Run OCR on an image file.
    fn recognize_path(&mut self, image_path: &Path) -> OcrResult<Vec<RecognizedText>> {
        let image = image::open(image_path)
            .with_context(|| format!("failed to open image at {:?}", image_path))?;
        self.recognize(&image)
    }
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn recognize(&mut self, image: &DynamicImage) -> OcrResult<Vec<RecognizedText>> {
        (**self).recognize(image)
    }

    fn recognize_path(&mut self, image_path: &Path) -> OcrResult<Vec<RecognizedText>> {
        (**self).recognize_path(image_path)
    }
}

#[cfg(test)]
mod tests {
    use super::{OcrResult, Point, Quad, RecognizedText, Recognizer, TesseractEngine, TesseractOptions};
    use image::{DynamicImage, Rgb, RgbImage};

    struct Canned(Vec<RecognizedText>);

    impl Recognizer for Canned {
        fn recognize(&mut self, _image: &DynamicImage) -> OcrResult<Vec<RecognizedText>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn quad_from_rect_is_clockwise_from_top_left() {
        let quad = Quad::from_rect(5.0, 10.0, 20.0, 30.0);
        assert_eq!(quad.top_left(), Point::new(5.0, 10.0));
        assert_eq!(quad.top_right(), Point::new(25.0, 10.0));
        assert_eq!(quad.bottom_right(), Point::new(25.0, 40.0));
        assert_eq!(quad.bottom_left(), Point::new(5.0, 40.0));
    }

    #[test]
    fn centroid_averages_corners() {
        let quad = Quad::from([(0.0, 0.0), (10.0, 2.0), (12.0, 8.0), (2.0, 6.0)]);
        assert_eq!(quad.centroid(), Point::new(6.0, 4.0));
    }

    #[test]
    fn char_count_counts_scalars_not_bytes() {
        let text = RecognizedText::new(Quad::from_rect(0.0, 0.0, 1.0, 1.0), "é7ß");
        assert_eq!(text.char_count(), 3);
    }

    #[test]
    fn options_apply_defaults() {
        let opts = TesseractOptions::default();
        assert_eq!(opts.lang, "eng");
        assert_eq!(opts.psm, Some(11));
        assert!(opts.whitelist.is_none());
        assert!(opts.to_args().config_variables.is_empty());
    }

    #[test]
    fn whitelist_becomes_config_variable() {
        let opts = TesseractOptions {
            whitelist: Some("ABC123".to_string()),
            ..TesseractOptions::default()
        };
        let args = opts.to_args();
        assert_eq!(
            args.config_variables.get("tessedit_char_whitelist").map(String::as_str),
            Some("ABC123")
        );
    }

    #[test]
    fn options_deserialize_with_partial_fields() {
        let opts: TesseractOptions = serde_json::from_str(r#"{ "psm": 7 }"#).unwrap();
        assert_eq!(opts.psm, Some(7));
        assert_eq!(opts.lang, "eng");
    }

    #[test]
    fn recognize_path_reads_the_file_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let expected = vec![RecognizedText::new(Quad::from_rect(0.0, 0.0, 4.0, 4.0), "x")];
        let mut recognizer: Box<dyn Recognizer> = Box::new(Canned(expected.clone()));
        assert_eq!(recognizer.recognize_path(&path).unwrap(), expected);

        let missing = recognizer.recognize_path(&dir.path().join("missing.png"));
        assert!(missing.is_err());
    }

    // Building the engine must not touch the tesseract binary.
    #[test]
    fn engine_construction_is_side_effect_free() {
        fn takes_engine(_: TesseractEngine) {}
        let engine = TesseractEngine::with_options(TesseractOptions::default());
        assert_eq!(engine.options().oem, Some(3));
        takes_engine(engine);
    }
}
