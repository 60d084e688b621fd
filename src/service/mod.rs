//! Prompt classification
//!
//! Turns a natural-language description into the string a QR code should
//! encode, plus a label describing what kind of payload it is. The heavy
//! lifting happens in an external completion service behind [`PayloadService`].

mod completion;

pub use completion::{CompletionService, parse_completion};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a classified payload encodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PayloadKind {
    /// `WIFI:T:...;S:...;P:...;;` network config
    Wifi,
    /// vCard / MECARD contact
    Contact,
    /// Web link
    Url,
    /// Plain text
    Text,
    /// iCalendar event
    Event,
    /// Any other label, kept verbatim
    Other(String),
}

impl PayloadKind {
    /// Classify a label case-insensitively
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "wifi" | "wi-fi" => Self::Wifi,
            "contact" | "vcard" => Self::Contact,
            "url" | "link" => Self::Url,
            "text" => Self::Text,
            "event" | "calendar" => Self::Event,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Display label stored in the analytics log
    pub fn label(&self) -> &str {
        match self {
            Self::Wifi => "WiFi",
            Self::Contact => "Contact",
            Self::Url => "URL",
            Self::Text => "Text",
            Self::Event => "Event",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for PayloadKind {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<PayloadKind> for String {
    fn from(kind: PayloadKind) -> Self {
        kind.label().to_string()
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Service output: a label plus the text to encode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedPayload {
    /// Payload classification
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    /// Text to encode in the QR symbol
    pub data: String,
}

/// Converts free text into a [`ClassifiedPayload`].
///
/// Failures are reported as [`crate::Error::Service`] and are not retried.
#[async_trait]
pub trait PayloadService: Send + Sync {
    /// Classify `prompt`
    async fn classify(&self, prompt: &str) -> Result<ClassifiedPayload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(PayloadKind::from_label("WIFI"), PayloadKind::Wifi);
        assert_eq!(PayloadKind::from_label("url"), PayloadKind::Url);
        assert_eq!(
            PayloadKind::from_label("Crypto"),
            PayloadKind::Other("Crypto".to_string())
        );
    }

    #[test]
    fn serializes_with_display_labels() {
        let payload = ClassifiedPayload {
            kind: PayloadKind::Wifi,
            data: "WIFI:T:WPA;S:HomeNet;P:secret123;;".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "WiFi");

        let parsed: ClassifiedPayload =
            serde_json::from_str(r#"{"type":"contact","data":"BEGIN:VCARD"}"#).unwrap();
        assert_eq!(parsed.kind, PayloadKind::Contact);
    }
}
