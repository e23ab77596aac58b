use image::{DynamicImage, Rgb, RgbImage};
use ocr::{Recognizer, TesseractEngine};

// Heavy test that shells out to a real Tesseract install; run with:
// cargo test -p ocr -- --ignored
#[test]
#[ignore = "requires the tesseract binary and the eng language pack"]
fn blank_image_yields_no_text() {
    let mut engine = TesseractEngine::new();
    let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 40, Rgb([255, 255, 255])));

    let results = engine
        .recognize(&blank)
        .expect("tesseract should run on a blank image");

    assert!(
        results.is_empty(),
        "expected no detections on a blank image, got {results:?}"
    );
}
