//! QR code encoder
//!
//! Wraps the `qrcode` crate and rasterizes the module matrix to an exact
//! pixel size with a quiet-zone margin, always at High error correction.

use crate::error::{Error, Result};
use crate::qr::Color;
use image::RgbaImage;
use qrcode::{EcLevel, QrCode};

/// Quiet zone around the symbol, in modules
pub const DEFAULT_MARGIN: u32 = 2;

/// QR code encoder
#[derive(Debug, Clone)]
pub struct QrEncoder {
    margin: u32,
}

impl QrEncoder {
    /// Create a new QR encoder with the default two-module margin
    pub fn new() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }

    /// Create a new QR encoder with a custom quiet-zone margin (in modules)
    pub fn with_margin(margin: u32) -> Self {
        Self { margin }
    }

    /// Error correction level used for every symbol.
    ///
    /// High (~30% redundancy) leaves room for the logo overlay to obscure modules.
    pub fn ec_level(&self) -> EcLevel {
        EcLevel::H
    }

    /// Encode `data` into a module matrix
    pub fn encode(&self, data: &str) -> Result<QrCode> {
        if data.is_empty() {
            return Err(Error::Encoding("payload is empty".to_string()));
        }

        QrCode::with_error_correction_level(data.as_bytes(), self.ec_level())
            .map_err(|e| Error::Encoding(format!("{e} ({} bytes at level H)", data.len())))
    }

    /// Encode `data` and rasterize it to a `size` x `size` image.
    pub fn rasterize(
        &self,
        data: &str,
        size: u32,
        foreground: Color,
        background: Color,
    ) -> Result<RgbaImage> {
        let code = self.encode(data)?;
        let modules = code.width() as u32;
        let span = modules + self.margin * 2;

        if size < span {
            return Err(Error::Encoding(format!(
                "{size}px is too small for a {modules}x{modules} symbol with {} module margin (need at least {span}px)",
                self.margin
            )));
        }

        // Fractional scale so the output is exactly `size` pixels wide.
        let scale = size as f64 / span as f64;
        let colors = code.to_colors();
        let module_at = |pixel: u32| -> Option<usize> {
            let cell = (pixel as f64 / scale).floor() as i64 - self.margin as i64;
            (0..modules as i64).contains(&cell).then_some(cell as usize)
        };

        let fg = foreground.rgba();
        let bg = background.rgba();
        let image = RgbaImage::from_fn(size, size, |x, y| match (module_at(x), module_at(y)) {
            (Some(mx), Some(my)) if colors[my * modules as usize + mx] == qrcode::Color::Dark => fg,
            _ => bg,
        });

        tracing::debug!(
            version = ?code.version(),
            modules,
            size,
            bytes = data.len(),
            "Rasterized QR symbol"
        );

        Ok(image)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_uses_high_error_correction() {
        assert_eq!(QrEncoder::new().ec_level(), EcLevel::H);
        let code = QrEncoder::new().encode("hello").unwrap();
        assert_eq!(code.error_correction_level(), EcLevel::H);
    }

    #[test]
    fn rasterizes_to_exact_size() {
        let image = QrEncoder::new()
            .rasterize("https://example.com", 256, Color::BLACK, Color::WHITE)
            .unwrap();
        assert_eq!(image.dimensions(), (256, 256));
    }

    #[test]
    fn margin_is_background() {
        let image = QrEncoder::new()
            .rasterize("margin", 300, Color::BLACK, Color::WHITE)
            .unwrap();
        // The corners sit inside the two-module quiet zone.
        assert_eq!(*image.get_pixel(0, 0), Color::WHITE.rgba());
        assert_eq!(*image.get_pixel(299, 299), Color::WHITE.rgba());
        assert!(image.pixels().any(|p| *p == Color::BLACK.rgba()));
    }

    #[test]
    fn custom_colors_are_applied() {
        let fg = Color::parse("#1d4ed8").unwrap();
        let bg = Color::parse("#fef3c7").unwrap();
        let image = QrEncoder::new().rasterize("colors", 200, fg, bg).unwrap();
        assert!(image.pixels().all(|p| *p == fg.rgba() || *p == bg.rgba()));
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(matches!(
            QrEncoder::new().encode(""),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        // Level H tops out well below 2000 bytes.
        let data = "x".repeat(2000);
        let err = QrEncoder::new()
            .rasterize(&data, 1024, Color::BLACK, Color::WHITE)
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn too_small_canvas_is_rejected() {
        let err = QrEncoder::new()
            .rasterize("tiny canvas", 10, Color::BLACK, Color::WHITE)
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
