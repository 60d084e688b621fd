//! Render pipeline: encode, rasterize, overlay logo, export

use crate::error::{Error, Result};
use crate::qr::logo::{FsLogoLoader, LogoLoader};
use crate::qr::overlay::{draw_logo, logo_diameter};
use crate::qr::{QrEncoder, RenderedArtifact, StylingOptions};
use std::sync::Arc;
use tracing::{debug, warn};

/// Composes QR images from payload text and styling
#[derive(Clone)]
pub struct QrCompositor {
    encoder: QrEncoder,
    loader: Arc<dyn LogoLoader>,
}

impl QrCompositor {
    /// Compositor with the default encoder and filesystem logo loader
    pub fn new() -> Self {
        Self::with_loader(Arc::new(FsLogoLoader))
    }

    /// Compositor resolving logos through a custom loader
    pub fn with_loader(loader: Arc<dyn LogoLoader>) -> Self {
        Self {
            encoder: QrEncoder::new(),
            loader,
        }
    }

    /// Render `payload` into a PNG artifact.
    ///
    /// Fails with [`Error::Encoding`] when the payload is empty or cannot be
    /// encoded at level H within `styling.size`. A logo that fails to load is
    /// skipped and the plain symbol is returned.
    pub async fn render(
        &self,
        payload: &str,
        styling: &StylingOptions,
    ) -> Result<RenderedArtifact> {
        if payload.is_empty() {
            return Err(Error::Encoding("payload is empty".to_string()));
        }

        let encoder = self.encoder.clone();
        let data = payload.to_string();
        let (size, fg, bg) = (styling.size, styling.foreground, styling.background);
        let handle = tokio::task::spawn_blocking(move || encoder.rasterize(&data, size, fg, bg));
        let mut canvas = handle
            .await
            .map_err(|e| Error::Other(format!("encoder task failed: {e}")))??;

        if let Some(source) = &styling.logo {
            match self.loader.load(source).await {
                Ok(logo) => {
                    let diameter = logo_diameter(size, styling.logo_size_percent);
                    debug!(diameter, size, logo = %source, "Drawing logo overlay");
                    draw_logo(&mut canvas, &logo, diameter, fg, bg);
                }
                Err(err) => {
                    warn!(logo = %source, "Skipping logo overlay: {err}");
                }
            }
        }

        RenderedArtifact::from_image(canvas)
    }
}

impl Default for QrCompositor {
    fn default() -> Self {
        Self::new()
    }
}
