//! Helpers for rendering generation results and history for the terminal

use crate::Generation;
use crate::analytics::{AnalyticsEntry, AnalyticsStats};
use crate::qr::RenderedArtifact;
use serde_json::{Value, json};
use std::path::Path;

/// Longest payload excerpt shown in human-readable listings
const PREVIEW_CHARS: usize = 80;

/// Combined structured and human-readable representation of a result
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation suitable for downstream consumers
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

impl Rendered {
    /// Print either form to stdout
    pub fn print(&self, as_json: bool) -> crate::Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(&self.json)?);
        } else {
            for line in &self.human {
                println!("{line}");
            }
        }
        Ok(())
    }
}

/// Describe a finished prompt-to-QR generation.
pub fn render_generation(generation: &Generation, saved_to: Option<&Path>) -> Rendered {
    let mut rendered = render_artifact(&generation.artifact, saved_to);

    if let Some(obj) = rendered.json.as_object_mut() {
        obj.insert("type".to_string(), Value::String(generation.payload.kind.to_string()));
        obj.insert("data".to_string(), Value::String(generation.payload.data.clone()));
        obj.insert("entry_id".to_string(), Value::String(generation.entry.id.clone()));
    }

    let mut human = vec![
        format!("QR generated ({})", generation.payload.kind),
        format!("  Payload: {}", preview(&generation.payload.data)),
    ];
    human.extend(rendered.human.into_iter().skip(1));
    human.push(format!("  History id: {}", generation.entry.id));
    rendered.human = human;

    rendered
}

/// Describe a rendered artifact on its own.
pub fn render_artifact(artifact: &RenderedArtifact, saved_to: Option<&Path>) -> Rendered {
    let mut human = vec![
        "QR rendered".to_string(),
        format!("  Size: {}x{}", artifact.width(), artifact.height()),
    ];

    let json = match saved_to {
        Some(path) => {
            human.push(format!("  Saved to: {}", path.display()));
            json!({
                "width": artifact.width(),
                "height": artifact.height(),
                "path": path.display().to_string(),
            })
        }
        None => {
            let chars = artifact.image_data_url.len();
            human.push(format!("  Data URL: {chars} chars"));
            json!({
                "width": artifact.width(),
                "height": artifact.height(),
                "image_data_url": artifact.image_data_url,
            })
        }
    };

    Rendered { json, human }
}

/// Render the history listing, newest first.
pub fn render_history(entries: &[AnalyticsEntry]) -> Rendered {
    let json = serde_json::to_value(entries).unwrap_or(Value::Array(Vec::new()));

    if entries.is_empty() {
        return Rendered {
            json,
            human: vec!["No QR codes generated yet".to_string()],
        };
    }

    let mut human = Vec::with_capacity(entries.len() * 3);
    for entry in entries {
        human.push(format!(
            "{} [{}] {}",
            entry.id,
            entry.kind,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        human.push(format!("  \"{}\"", entry.prompt));
        human.push(format!("  {}", preview(&entry.data)));
    }

    Rendered { json, human }
}

/// Render summary counters.
pub fn render_stats(stats: &AnalyticsStats) -> Rendered {
    let json = json!({
        "total": stats.total,
        "wifi": stats.wifi,
        "contact": stats.contact,
        "url": stats.url,
        "text": stats.text,
        "today": stats.today,
    });

    let human = vec![
        format!("Total QRs: {}", stats.total),
        format!("  WiFi:    {}", stats.wifi),
        format!("  Contact: {}", stats.contact),
        format!("  URLs:    {}", stats.url),
        format!("  Text:    {}", stats.text),
        format!("  Today:   {}", stats.today),
    ];

    Rendered { json, human }
}

/// Single-line status message (`removed`, `cleared`, decoded text, ...).
pub fn render_message(key: &str, message: impl Into<String>) -> Rendered {
    let message = message.into();
    Rendered {
        json: json!({ key: message }),
        human: vec![message],
    }
}

fn preview(data: &str) -> String {
    let flat = data.replace(['\r', '\n'], " ");
    if flat.chars().count() <= PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    }
}
