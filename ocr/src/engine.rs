use crate::config::TesseractOptions;
use crate::result::{Quad, RecognizedText};
use crate::{OcrResult, Recognizer};
use anyhow::anyhow;
use image::DynamicImage;
use rusty_tesseract::Image;
use std::path::Path;

/// Recognizer backed by the system `tesseract` binary via `rusty-tesseract`.
///
/// Tesseract reports word-level boxes, so a single [`RecognizedText`] often
/// carries several glyphs. The boxes are axis aligned.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    options: TesseractOptions,
}

impl TesseractEngine {
    /// Build an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine with custom options.
    pub fn with_options(options: TesseractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TesseractOptions {
        &self.options
    }
}

impl Recognizer for TesseractEngine {
    fn recognize(&mut self, image: &DynamicImage) -> OcrResult<Vec<RecognizedText>> {
        let tess_image = Image::from_dynamic_image(image)
            .map_err(|err| anyhow!("failed to prepare image for tesseract: {err}"))?;
        let output = rusty_tesseract::image_to_data(&tess_image, &self.options.to_args())
            .map_err(|err| anyhow!("tesseract recognition failed: {err}"))?;

        let words = output
            .data
            .into_iter()
            .map(|d| Word {
                order: [d.page_num, d.block_num, d.par_num, d.line_num, d.word_num],
                left: d.left,
                top: d.top,
                width: d.width,
                height: d.height,
                conf: d.conf,
                text: d.text,
            })
            .collect();

        let results = words_to_results(words, self.options.min_confidence);
        tracing::debug!(count = results.len(), "tesseract returned text regions");
        Ok(results)
    }
}

/// One row of Tesseract's TSV output.
#[derive(Debug, Clone)]
struct Word {
    /// page, block, paragraph, line, word
    order: [i32; 5],
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    conf: f32,
    text: String,
}

/// Keep confident, non-blank words in reading order.
fn words_to_results(mut words: Vec<Word>, min_confidence: f32) -> Vec<RecognizedText> {
    words.retain(|w| !w.text.trim().is_empty() && w.conf > min_confidence);
    words.sort_by_key(|w| w.order);
    words
        .into_iter()
        .map(|w| {
            let quad = Quad::from_rect(
                w.left as f32,
                w.top as f32,
                w.width as f32,
                w.height as f32,
            );
            RecognizedText::new(quad, w.text.trim())
        })
        .collect()
}

/// Convenience function to run Tesseract on an image file without keeping an engine.
pub fn recognize_path(
    image_path: impl AsRef<Path>,
    options: Option<TesseractOptions>,
) -> OcrResult<Vec<RecognizedText>> {
    let mut engine = TesseractEngine::with_options(options.unwrap_or_default());
    engine.recognize_path(image_path.as_ref())
}
