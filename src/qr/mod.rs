//! QR code composition
//!
//! Encodes a payload at High error correction, rasterizes it at the requested
//! pixel size and optionally overlays a circular logo. The decoder is kept
//! alongside so composed images can be checked for scannability.

mod color;
mod compositor;
mod decoder;
mod encoder;
mod logo;
pub mod overlay;

pub use color::Color;
pub use compositor::QrCompositor;
pub use decoder::QrDecoder;
pub use encoder::{DEFAULT_MARGIN, QrEncoder};
pub use logo::{FsLogoLoader, LogoLoader, LogoSource, decode_data_url};

use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Default output size in pixels
pub const DEFAULT_SIZE: u32 = 256;

/// Default logo size as a percentage of the output size
pub const DEFAULT_LOGO_SIZE_PERCENT: u8 = 20;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Visual options for a single render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylingOptions {
    /// Output width and height in pixels
    pub size: u32,
    /// Color of dark modules
    pub foreground: Color,
    /// Color of light modules and the quiet zone
    pub background: Color,
    /// Optional logo drawn in the center
    pub logo: Option<LogoSource>,
    /// Requested logo diameter as a percentage of `size` (capped at 25%)
    pub logo_size_percent: u8,
}

impl Default for StylingOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            foreground: Color::BLACK,
            background: Color::WHITE,
            logo: None,
            logo_size_percent: DEFAULT_LOGO_SIZE_PERCENT,
        }
    }
}

impl StylingOptions {
    /// Builder-style logo setter
    pub fn with_logo(mut self, logo: LogoSource) -> Self {
        self.logo = Some(logo);
        self
    }
}

/// A payload plus the styling it should be rendered with
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Text to encode
    pub payload_text: String,
    /// Styling for this render
    pub styling: StylingOptions,
}

impl GenerationRequest {
    /// Pair a payload with styling
    pub fn new(payload_text: impl Into<String>, styling: StylingOptions) -> Self {
        Self {
            payload_text: payload_text.into(),
            styling,
        }
    }
}

/// Result of a render: the composed image and its PNG data URL
#[derive(Debug, Clone)]
pub struct RenderedArtifact {
    /// `data:image/png;base64,...`
    pub image_data_url: String,
    /// Composed pixels
    pub image: RgbaImage,
}

impl RenderedArtifact {
    /// Encode `image` as PNG and wrap it in a data URL
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png)?;
        let image_data_url = format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png.get_ref()));
        Ok(Self {
            image_data_url,
            image,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// PNG bytes decoded from the data URL
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let body = self
            .image_data_url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| Error::Image("artifact is not a PNG data URL".to_string()))?;
        STANDARD
            .decode(body)
            .map_err(|e| Error::Image(format!("invalid base64 in artifact: {e}")))
    }

    /// Write the PNG to disk
    pub async fn save(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.png_bytes()?).await?;
        Ok(())
    }
}
