//! Error types for SmartQR operations

use thiserror::Error;

/// Result type alias using SmartQR's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for SmartQR operations
#[derive(Error, Debug)]
pub enum Error {
    /// Payload could not be encoded at the requested size / High error correction
    #[error("Failed to encode QR code: {0}")]
    Encoding(String),

    /// Logo image could not be loaded or decoded
    #[error("Failed to load logo: {0}")]
    LogoLoad(String),

    /// Completion service call failed or returned unusable data
    #[error("Completion service error: {0}")]
    Service(String),

    /// Prompt or template input rejected before any work was done
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// Color string could not be parsed
    #[error("Invalid color '{0}', expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// Persisted analytics data could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error ends the current generation request.
    ///
    /// Logo failures are recovered inside the compositor and never reach callers
    /// of `render`, everything else is reported to the user.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Error::LogoLoad(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Service(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::Encoding(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_errors_are_not_terminal() {
        assert!(!Error::LogoLoad("broken".into()).is_terminal());
        assert!(Error::Encoding("too long".into()).is_terminal());
        assert!(Error::Service("timeout".into()).is_terminal());
    }

    #[test]
    fn qr_capacity_error_maps_to_encoding() {
        let err: Error = qrcode::types::QrError::DataTooLong.into();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
