//! SmartQR - describe a QR code in plain language, render it locally
//!
//! A prompt (typed, or assembled from a WiFi / contact / event template) is
//! classified by an external completion service into the text a QR code
//! should encode. That text is rendered at High error correction, optionally
//! with a circular logo in the middle, and every successful generation is
//! recorded in a local history log.
//!
//! # Features
//!
//! - **Compositor**: exact-size rasterization with a capped logo overlay
//! - **Templates**: guided prompts for WiFi, contacts and events
//! - **History**: newest-first log over a pluggable key-value store
//! - **Async-first**: built on Tokio for non-blocking rendering and I/O
//!
//! # Example
//!
//! ```no_run
//! use smartqr::{QrCompositor, StylingOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let compositor = QrCompositor::new();
//!     let artifact = compositor
//!         .render("WIFI:T:WPA;S:HomeNet;P:secret123;;", &StylingOptions::default())
//!         .await?;
//!
//!     println!("{}x{} PNG", artifact.width(), artifact.height());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod analytics;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod qr;
pub mod service;

// Re-exports for convenience
pub use error::{Error, Result};

pub use analytics::{
    AnalyticsEntry, AnalyticsLog, AnalyticsStats, FileStore, KeyValueStore, MemoryStore,
};
pub use config::{LogRotation, LoggingOptions, RenderOptions, ServiceOptions, SmartQrConfig};
pub use prompt::{PromptHandoff, PromptTemplate};
pub use qr::{
    Color, GenerationRequest, LogoSource, QrCompositor, QrDecoder, QrEncoder, RenderedArtifact,
    StylingOptions,
};
pub use service::{ClassifiedPayload, CompletionService, PayloadKind, PayloadService};

use std::sync::Arc;
use tracing::info;

/// Outcome of a successful prompt-to-QR generation
#[derive(Debug, Clone)]
pub struct Generation {
    /// What the service decided to encode
    pub payload: ClassifiedPayload,
    /// The composed image
    pub artifact: RenderedArtifact,
    /// History entry recorded for this generation
    pub entry: AnalyticsEntry,
}

/// High-level interface combining classification, composition and history
pub struct SmartQr {
    service: Arc<dyn PayloadService>,
    compositor: QrCompositor,
    analytics: AnalyticsLog<Arc<dyn KeyValueStore>>,
}

impl SmartQr {
    /// Assemble from explicit collaborators
    pub fn new(
        service: Arc<dyn PayloadService>,
        compositor: QrCompositor,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            service,
            compositor,
            analytics: AnalyticsLog::new(store),
        }
    }

    /// Completion service and file-backed history as described by `config`
    pub fn from_config(config: &SmartQrConfig) -> Result<Self> {
        let service = CompletionService::new(&config.service)?;
        let store = FileStore::open(config.storage.resolved_data_dir())?;
        Ok(Self::new(
            Arc::new(service),
            QrCompositor::new(),
            Arc::new(store),
        ))
    }

    /// Classify `prompt`, render the payload and record it in history.
    ///
    /// Nothing is recorded when classification or encoding fails.
    pub async fn generate(&self, prompt: &str, styling: &StylingOptions) -> Result<Generation> {
        let payload = self.service.classify(prompt).await?;
        let artifact = self.compositor.render(&payload.data, styling).await?;

        let entry = AnalyticsEntry::new(payload.kind.label(), prompt.trim(), payload.data.clone());
        self.analytics.append(entry.clone())?;

        info!(
            kind = %payload.kind,
            size = styling.size,
            id = %entry.id,
            "Generated QR code"
        );

        Ok(Generation {
            payload,
            artifact,
            entry,
        })
    }

    /// Render a request without classification or history
    pub async fn render(&self, request: &GenerationRequest) -> Result<RenderedArtifact> {
        self.compositor
            .render(&request.payload_text, &request.styling)
            .await
    }

    /// Generation history
    pub fn analytics(&self) -> &AnalyticsLog<Arc<dyn KeyValueStore>> {
        &self.analytics
    }
}
