use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use image_proc::MaskStats;
use ocr::{RecognizedText, Recognizer};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::acquire::ImageSource;
use crate::config::SolverConfig;
use crate::error::{CaptchaError, Result};
use crate::locator::{self, ClickCoordinate};

/// The five solver stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Mask,
    Blur,
    Recognize,
    Locate,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Mask => "mask",
            Stage::Blur => "blur",
            Stage::Recognize => "recognize",
            Stage::Locate => "locate",
        }
    }

    fn enter(self) {
        info!("[stage {:02}] {}", self as usize, self.label());
    }
}

/// Everything one solve produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub width: u32,
    pub height: u32,
    /// Pixels the mask classified as ink.
    pub ink_pixels: usize,
    /// Raw recognizer output, in recognizer order.
    pub groups: Vec<RecognizedText>,
    /// Group texts concatenated in group order.
    pub key: String,
    /// First repeated character of `key`; `None` means nothing to click.
    pub duplicate: Option<char>,
    /// Pixel-space click targets, in scan order.
    pub clicks: Vec<ClickCoordinate>,
    pub mask_path: PathBuf,
    pub blur_path: PathBuf,
}

impl Solution {
    pub fn has_target(&self) -> bool {
        !self.clicks.is_empty()
    }
}

/// Runs acquisition, masking, blur, recognition and location for one CAPTCHA.
///
/// Building a solver does no work; every solve is an explicit call. The
/// recognizer is injected so tests and callers can swap the OCR backend.
pub struct CaptchaSolver<R> {
    config: SolverConfig,
    recognizer: R,
}

impl<R: Recognizer> CaptchaSolver<R> {
    /// Validate `config` and pair it with `recognizer`.
    pub fn new(config: SolverConfig, recognizer: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, recognizer })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn recognizer_mut(&mut self) -> &mut R {
        &mut self.recognizer
    }

    pub fn into_recognizer(self) -> R {
        self.recognizer
    }

    /// Download the image at `url` and solve it.
    pub fn solve_url(&mut self, url: &str) -> Result<Solution> {
        self.solve_source(&ImageSource::Url(url.to_string()))
    }

    /// Load the image from a URL or a local file and solve it.
    pub fn solve_source(&mut self, source: &ImageSource) -> Result<Solution> {
        Stage::Acquire.enter();
        let image = source.load()?;
        info!(
            %source,
            width = image.width(),
            height = image.height(),
            "loaded captcha image"
        );
        self.solve_image(image)
    }

    /// Run every stage after acquisition on an already decoded image.
    pub fn solve_image(&mut self, mut image: RgbImage) -> Result<Solution> {
        self.prepare_output_dir()?;
        let (width, height) = image.dimensions();

        let stats = self.mask_stage(&mut image)?;
        let blur_path = self.blur_stage(&image)?;
        let groups = self.recognize_stage(&blur_path)?;

        Stage::Locate.enter();
        let location = locator::locate_all(&groups);
        match location.duplicate {
            Some(duplicate) => info!(
                key = %location.key,
                %duplicate,
                clicks = location.clicks.len(),
                "located duplicate glyph"
            ),
            None => warn!(key = %location.key, "no repeated character in recognized text"),
        }

        Ok(Solution {
            width,
            height,
            ink_pixels: stats.ink,
            groups,
            key: location.key,
            duplicate: location.duplicate,
            clicks: location.clicks,
            mask_path: self.config.mask_path(),
            blur_path,
        })
    }

    /// Binarize `image` in place and write the mask artifact.
    pub fn mask_stage(&self, image: &mut RgbImage) -> Result<MaskStats> {
        Stage::Mask.enter();
        let stats = image_proc::binarize(image, self.config.sensitivity);
        debug!(
            background = stats.background,
            ink = stats.ink,
            sensitivity = self.config.sensitivity,
            "mask applied"
        );
        save_artifact(image, &self.config.mask_path())?;
        Ok(stats)
    }

    /// Blur the binarized image and write the artifact recognition reads.
    pub fn blur_stage(&self, image: &RgbImage) -> Result<PathBuf> {
        Stage::Blur.enter();
        let blurred = image_proc::blur(image, self.config.blur_radius);
        let path = self.config.blur_path();
        save_artifact(&blurred, &path)?;
        Ok(path)
    }

    /// Run the injected recognizer on the image stored at `path`.
    pub fn recognize_stage(&mut self, path: &Path) -> Result<Vec<RecognizedText>> {
        Stage::Recognize.enter();
        let groups = self
            .recognizer
            .recognize_path(path)
            .map_err(CaptchaError::Recognition)?;
        for (index, group) in groups.iter().enumerate() {
            debug!(index, text = %group.text, quad = ?group.quad.corners(), "recognized group");
        }
        Ok(groups)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| CaptchaError::Io {
            path: dir.clone(),
            source,
        })
    }
}

fn save_artifact(image: &RgbImage, path: &Path) -> Result<()> {
    image_proc::save_png(image, path).map_err(|source| CaptchaError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}
