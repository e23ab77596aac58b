use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::RgbImage;
use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{CaptchaError, Result};

/// Where a CAPTCHA image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// `http://` or `https://` URL, fetched with a blocking GET.
    Url(String),
    /// Local file, typically a previously saved CAPTCHA.
    File(PathBuf),
}

impl ImageSource {
    /// Treat `raw` as a URL when it carries an HTTP(S) scheme, as a path otherwise.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(raw.trim().to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    /// Load the image and normalize it to RGB.
    pub fn load(&self) -> Result<RgbImage> {
        match self {
            Self::Url(url) => fetch_image(url),
            Self::File(path) => open_image(path),
        }
    }
}

impl FromStr for ImageSource {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Download `url` and decode it as an RGB image.
///
/// Unreachable hosts, non-success statuses and undecodable payloads all
/// become [`CaptchaError::Retrieval`]. There is no retry.
pub fn fetch_image(url: &str) -> Result<RgbImage> {
    let client = Client::builder()
        .build()
        .map_err(|err| CaptchaError::retrieval(url, chain(&err)))?;
    fetch_image_with(&client, url)
}

/// [`fetch_image`] over a caller-configured client (timeouts, proxies, headers).
pub fn fetch_image_with(client: &Client, url: &str) -> Result<RgbImage> {
    let response = client
        .get(url)
        .send()
        .map_err(|err| CaptchaError::retrieval(url, chain(&err)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CaptchaError::retrieval(url, format!("server answered {status}")));
    }

    let bytes = response
        .bytes()
        .map_err(|err| CaptchaError::retrieval(url, chain(&err)))?;
    debug!(url, bytes = bytes.len(), "downloaded captcha image");
    decode_image(url, &bytes)
}

/// Read a local image file and decode it as RGB.
pub fn open_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let image = image::open(path)
        .map_err(|err| CaptchaError::retrieval(path.display().to_string(), chain(&err)))?;
    Ok(image.to_rgb8())
}

/// Decode raw bytes; alpha and palette information is dropped.
pub fn decode_image(location: &str, bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| CaptchaError::retrieval(location, chain(&err)))?;
    Ok(image.to_rgb8())
}

/// Render an error together with its sources, outermost first.
fn chain(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
