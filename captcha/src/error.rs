use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a solve. "No duplicate found" is not one of them.
#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("failed to retrieve image from {location}: {reason}")]
    Retrieval { location: String, reason: String },

    #[error("text recognition failed: {0:#}")]
    Recognition(anyhow::Error),

    #[error("failed to write artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CaptchaError {
    pub(crate) fn retrieval(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptchaError>;
