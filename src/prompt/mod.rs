//! Prompt capture: templates, sample prompts and the session handoff slot

mod templates;

pub use templates::{ContactTemplate, EventTemplate, PromptTemplate, WifiSecurity, WifiTemplate};

use crate::analytics::KeyValueStore;
use crate::error::Result;

/// Session key holding the prompt waiting to be generated
pub const HANDOFF_KEY: &str = "qr-prompt";

/// Sample descriptions offered to new users
pub const EXAMPLE_PROMPTS: [&str; 4] = [
    "Create a QR for my WiFi named HomeNetwork with password mypassword123",
    "Generate a contact QR for John Doe, phone 555-0123, email john@example.com",
    "Make a QR for my LinkedIn profile linkedin.com/in/johndoe",
    "Create an event QR for Tech Conference on December 15, 2024",
];

/// Single-slot prompt handoff between the capture step and generation
#[derive(Debug, Clone)]
pub struct PromptHandoff<S> {
    store: S,
}

impl<S: KeyValueStore> PromptHandoff<S> {
    /// Handoff over a session-scoped store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace the pending prompt
    pub fn stash(&self, prompt: &str) -> Result<()> {
        self.store.set(HANDOFF_KEY, prompt)
    }

    /// Pending prompt, if any, without consuming it
    pub fn peek(&self) -> Result<Option<String>> {
        self.store.get(HANDOFF_KEY)
    }

    /// Consume the pending prompt
    pub fn take(&self) -> Result<Option<String>> {
        let prompt = self.store.get(HANDOFF_KEY)?;
        if prompt.is_some() {
            self.store.remove(HANDOFF_KEY)?;
        }
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::MemoryStore;

    #[test]
    fn take_consumes_the_prompt() {
        let handoff = PromptHandoff::new(MemoryStore::new());
        handoff.stash("first").unwrap();
        handoff.stash("second").unwrap();

        assert_eq!(handoff.peek().unwrap().as_deref(), Some("second"));
        assert_eq!(handoff.take().unwrap().as_deref(), Some("second"));
        assert_eq!(handoff.take().unwrap(), None);
    }

    #[test]
    fn template_prompt_flows_through_handoff() {
        let handoff = PromptHandoff::new(MemoryStore::new());
        let wifi = WifiTemplate {
            network_name: "HomeNet".to_string(),
            password: "secret123".to_string(),
            ..WifiTemplate::default()
        };
        handoff.stash(&wifi.build().unwrap()).unwrap();

        let prompt = handoff.take().unwrap().unwrap();
        assert!(prompt.contains("\"HomeNet\""));
    }
}
