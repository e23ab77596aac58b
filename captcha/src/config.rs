use std::fs;
use std::path::{Path, PathBuf};

use image_proc::{BLUR_RADIUS, DEFAULT_SENSITIVITY};
use ocr::TesseractOptions;
use serde::{Deserialize, Serialize};

use crate::error::{CaptchaError, Result};

/// File name of the binarized artifact inside the output directory.
pub const MASK_FILE_NAME: &str = "PostProcess.png";

/// File name of the binarized and blurred artifact inside the output directory.
pub const BLUR_FILE_NAME: &str = "PostProcessBlur.png";

/// Settings for one solver instance.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Directory receiving the intermediate PNG artifacts.
    pub output_dir: PathBuf,
    /// Neutrality threshold for the mask. Must be at least 1.
    pub sensitivity: u16,
    /// Gaussian sigma of the smoothing pass; `0` disables it.
    pub blur_radius: f32,
    /// Options for the bundled Tesseract recognizer. The solver itself never
    /// reads them; they travel here so one file configures a whole run.
    pub recognizer: TesseractOptions,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            sensitivity: DEFAULT_SENSITIVITY,
            blur_radius: BLUR_RADIUS,
            recognizer: TesseractOptions::default(),
        }
    }
}

impl SolverConfig {
    /// Load a JSON config file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CaptchaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|err| CaptchaError::Config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sensitivity == 0 {
            return Err(CaptchaError::Config(
                "sensitivity must be at least 1; 0 classifies every pixel as ink".to_string(),
            ));
        }
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(CaptchaError::Config(format!(
                "blur_radius must be a finite, non-negative number, got {}",
                self.blur_radius
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(CaptchaError::Config("output_dir must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: u16) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_blur_radius(mut self, blur_radius: f32) -> Self {
        self.blur_radius = blur_radius;
        self
    }

    pub fn with_recognizer(mut self, recognizer: TesseractOptions) -> Self {
        self.recognizer = recognizer;
        self
    }

    /// Where the binarized image is written.
    pub fn mask_path(&self) -> PathBuf {
        self.output_dir.join(MASK_FILE_NAME)
    }

    /// Where the blurred image is written and read back for recognition.
    pub fn blur_path(&self) -> PathBuf {
        self.output_dir.join(BLUR_FILE_NAME)
    }
}

/// `~/Documents` (or the platform's documents folder), falling back to the
/// current directory when no home directory is known.
pub fn default_output_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = SolverConfig::default();
        assert_eq!(config.sensitivity, 25);
        assert_eq!(config.blur_radius, 1.0);
        assert!(!config.output_dir.as_os_str().is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn artifact_paths_join_the_output_dir() {
        let config = SolverConfig::default().with_output_dir("/tmp/solver-out");
        assert_eq!(config.mask_path(), Path::new("/tmp/solver-out").join("PostProcess.png"));
        assert_eq!(
            config.blur_path(),
            Path::new("/tmp/solver-out").join("PostProcessBlur.png")
        );
    }

    #[test]
    fn zero_sensitivity_is_rejected() {
        let err = SolverConfig::default().with_sensitivity(0).validate().unwrap_err();
        assert!(matches!(err, CaptchaError::Config(_)));
    }

    #[test]
    fn negative_or_nan_blur_is_rejected() {
        for radius in [-1.0, f32::NAN, f32::INFINITY] {
            let err = SolverConfig::default()
                .with_blur_radius(radius)
                .validate()
                .unwrap_err();
            assert!(matches!(err, CaptchaError::Config(_)), "{radius}");
        }
        SolverConfig::default().with_blur_radius(0.0).validate().unwrap();
    }

    #[test]
    fn from_file_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.json");
        fs::write(
            &path,
            r#"{ "sensitivity": 40, "output_dir": "/var/tmp/x", "recognizer": { "psm": 8 } }"#,
        )
        .unwrap();

        let config = SolverConfig::from_file(&path).unwrap();
        assert_eq!(config.sensitivity, 40);
        assert_eq!(config.output_dir, PathBuf::from("/var/tmp/x"));
        assert_eq!(config.blur_radius, 1.0);
        assert_eq!(config.recognizer.psm, Some(8));
        assert_eq!(config.recognizer.lang, "eng");
    }

    #[test]
    fn from_file_reports_bad_json_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ sensitivity: ").unwrap();
        assert!(matches!(
            SolverConfig::from_file(&bad),
            Err(CaptchaError::Config(_))
        ));

        assert!(matches!(
            SolverConfig::from_file(dir.path().join("absent.json")),
            Err(CaptchaError::Io { .. })
        ));
    }

    #[test]
    fn from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.json");
        fs::write(&path, r#"{ "sensitivity": 0 }"#).unwrap();
        assert!(matches!(
            SolverConfig::from_file(&path),
            Err(CaptchaError::Config(_))
        ));
    }
}
