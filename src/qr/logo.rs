//! Logo sources and asynchronous logo loading

use crate::error::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Where a logo image comes from
#[derive(Clone, PartialEq, Eq)]
pub enum LogoSource {
    /// Image file on the local filesystem
    Path(PathBuf),
    /// `data:<mime>;base64,<body>` URL
    DataUrl(String),
    /// Encoded image bytes already in memory
    Bytes(Vec<u8>),
}

impl LogoSource {
    /// Interpret a user-supplied string: `data:` URLs stay inline, anything else is a path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("data:") {
            Self::DataUrl(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Debug for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::DataUrl(url) => write!(f, "DataUrl({} chars)", url.len()),
            Self::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

impl fmt::Display for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::DataUrl(url) => write!(f, "data URL ({} chars)", url.len()),
            Self::Bytes(bytes) => write!(f, "in-memory image ({} bytes)", bytes.len()),
        }
    }
}

impl Serialize for LogoSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Path(path) => serializer.serialize_str(&path.to_string_lossy()),
            Self::DataUrl(url) => serializer.serialize_str(url),
            Self::Bytes(bytes) => serializer.serialize_str(&format!(
                "data:image/png;base64,{}",
                STANDARD.encode(bytes)
            )),
        }
    }
}

impl<'de> Deserialize<'de> for LogoSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LogoSource::parse(&raw))
    }
}

/// Resolves a [`LogoSource`] into a decoded image.
///
/// Loading is a suspension point of the render pipeline; failures surface as
/// [`Error::LogoLoad`] and are swallowed by the compositor.
#[async_trait]
pub trait LogoLoader: Send + Sync {
    /// Load and decode the logo
    async fn load(&self, source: &LogoSource) -> Result<DynamicImage>;
}

/// Default loader reading files through tokio and decoding data URLs inline
#[derive(Debug, Clone, Default)]
pub struct FsLogoLoader;

#[async_trait]
impl LogoLoader for FsLogoLoader {
    async fn load(&self, source: &LogoSource) -> Result<DynamicImage> {
        let bytes = match source {
            LogoSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| Error::LogoLoad(format!("{}: {e}", path.display())))?,
            LogoSource::DataUrl(url) => decode_data_url(url)?,
            LogoSource::Bytes(bytes) => bytes.clone(),
        };

        image::load_from_memory(&bytes).map_err(|e| Error::LogoLoad(format!("{source}: {e}")))
    }
}

/// Decode the body of a base64 `data:` URL
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::LogoLoad("not a data URL".to_string()))?;
    let (meta, body) = rest
        .split_once(',')
        .ok_or_else(|| Error::LogoLoad("data URL has no body".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(Error::LogoLoad(
            "only base64 data URLs are supported".to_string(),
        ));
    }

    STANDARD
        .decode(body.trim())
        .map_err(|e| Error::LogoLoad(format!("invalid base64 body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn parse_distinguishes_data_urls() {
        assert!(matches!(
            LogoSource::parse("data:image/png;base64,AAAA"),
            LogoSource::DataUrl(_)
        ));
        assert_eq!(
            LogoSource::parse("assets/logo.png"),
            LogoSource::Path(PathBuf::from("assets/logo.png"))
        );
    }

    #[tokio::test]
    async fn loads_from_data_url() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes()));
        let img = FsLogoLoader.load(&LogoSource::DataUrl(url)).await.unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));
    }

    #[tokio::test]
    async fn loads_from_bytes() {
        let img = FsLogoLoader
            .load(&LogoSource::Bytes(png_bytes()))
            .await
            .unwrap();
        assert_eq!(img.width(), 8);
    }

    #[tokio::test]
    async fn missing_file_is_logo_error() {
        let err = FsLogoLoader
            .load(&LogoSource::Path(PathBuf::from("/nonexistent/logo.png")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LogoLoad(_)));
    }

    #[tokio::test]
    async fn undecodable_bytes_are_logo_error() {
        let err = FsLogoLoader
            .load(&LogoSource::Bytes(b"not an image".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LogoLoad(_)));
    }

    #[test]
    fn rejects_non_base64_data_urls() {
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("https://example.com/logo.png").is_err());
    }
}
