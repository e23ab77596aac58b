use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tesseract variable restricting recognition to a fixed character set.
const WHITELIST_VARIABLE: &str = "tessedit_char_whitelist";

/// Tunable parameters when running Tesseract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractOptions {
    /// Language pack, e.g. `eng`.
    pub lang: String,
    /// Resolution hint; CAPTCHAs are small so a high value helps.
    pub dpi: Option<i32>,
    /// Page segmentation mode. `11` looks for sparse text in no particular order.
    pub psm: Option<i32>,
    /// OCR engine mode. `3` lets Tesseract pick.
    pub oem: Option<i32>,
    /// Words at or below this confidence are dropped.
    pub min_confidence: f32,
    /// Restrict recognition to these characters.
    pub whitelist: Option<String>,
}

impl Default for TesseractOptions {
    fn default() -> Self {
        Self {
            lang: "eng".to_string(),
            dpi: Some(300),
            psm: Some(11),
            oem: Some(3),
            min_confidence: 0.0,
            whitelist: None,
        }
    }
}

impl TesseractOptions {
    pub(crate) fn to_args(&self) -> rusty_tesseract::Args {
        let mut config_variables = HashMap::new();
        if let Some(whitelist) = self.whitelist.as_ref().filter(|w| !w.is_empty()) {
            config_variables.insert(WHITELIST_VARIABLE.to_string(), whitelist.clone());
        }
        rusty_tesseract::Args {
            lang: self.lang.clone(),
            config_variables,
            dpi: self.dpi,
            psm: self.psm,
            oem: self.oem,
        }
    }
}
