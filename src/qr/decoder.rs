//! QR code decoder using rqrr
//!
//! Used to check that a composed image (logo included) still scans.

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage};

/// QR code decoder
pub struct QrDecoder {}

impl QrDecoder {
    /// Create a new QR decoder with default settings
    pub fn new() -> Self {
        Self {}
    }

    /// Decode the first QR code found in an image into text
    pub fn decode(&self, img: &DynamicImage) -> Result<String> {
        self.decode_gray(&img.to_luma8())
    }

    /// Decode the first QR code found in a grayscale image
    pub fn decode_gray(&self, img: &GrayImage) -> Result<String> {
        let mut prepared = rqrr::PreparedImage::prepare(img.clone());
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;

        match grid.decode() {
            Ok((meta, content)) => {
                tracing::debug!(
                    version = ?meta.version,
                    ecc_level = meta.ecc_level,
                    length = content.len(),
                    "Decoded QR"
                );
                Ok(content)
            }
            Err(e) => Err(Error::QrDecode(format!("{e:?}"))),
        }
    }

    /// Decode an encoded image file (PNG, JPEG, ...) held in memory
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<String> {
        let img = image::load_from_memory(bytes)?;
        self.decode(&img)
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{Color, QrEncoder};

    #[test]
    fn decodes_rasterized_symbol() {
        let raster = QrEncoder::new()
            .rasterize("round trip", 300, Color::BLACK, Color::WHITE)
            .unwrap();
        let text = QrDecoder::new()
            .decode(&DynamicImage::ImageRgba8(raster))
            .unwrap();
        assert_eq!(text, "round trip");
    }

    #[test]
    fn blank_image_has_no_code() {
        let blank = GrayImage::from_pixel(64, 64, image::Luma([255]));
        assert!(matches!(
            QrDecoder::new().decode_gray(&blank),
            Err(Error::NoQrCodeFound)
        ));
    }
}
