//! Locate the duplicated glyph in a CAPTCHA image.
//!
//! The solver downloads the image, masks it to black ink on white, blurs
//! it, hands it to an injected [`ocr::Recognizer`], and turns every
//! occurrence of the first repeated character into a pixel-space click
//! target. See [`CaptchaSolver`] for the entry point.

pub mod acquire;
pub mod config;
pub mod error;
pub mod locator;
pub mod pipeline;
pub mod screen;

pub use acquire::{ImageSource, decode_image, fetch_image, fetch_image_with, open_image};
pub use config::{BLUR_FILE_NAME, MASK_FILE_NAME, SolverConfig};
pub use error::{CaptchaError, Result};
pub use locator::{ClickCoordinate, Location, find_duplicate, locate, locate_all, sub_quad, text_key};
pub use pipeline::{CaptchaSolver, Solution, Stage};
pub use screen::ScreenMapping;
