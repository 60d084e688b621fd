//! Guided templates that assemble a natural-language prompt from form fields

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A form that produces a prompt for the completion service
pub trait PromptTemplate {
    /// Check required fields
    fn validate(&self) -> Result<()>;

    /// Assemble the prompt text; callers should validate first
    fn to_prompt(&self) -> String;

    /// Validate, then assemble
    fn build(&self) -> Result<String> {
        self.validate()?;
        Ok(self.to_prompt())
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// WiFi network security
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    /// WPA/WPA2 personal
    #[default]
    #[serde(rename = "WPA")]
    Wpa,
    /// Legacy WEP
    #[serde(rename = "WEP")]
    Wep,
    /// Open network
    #[serde(rename = "nopass")]
    NoPass,
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wpa => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        })
    }
}

impl FromStr for WifiSecurity {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" | "wpa/wpa2" => Ok(Self::Wpa),
            "wep" => Ok(Self::Wep),
            "nopass" | "none" | "open" => Ok(Self::NoPass),
            other => Err(format!(
                "Unknown WiFi security '{other}', expected WPA, WEP or nopass"
            )),
        }
    }
}

/// WiFi credentials form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiTemplate {
    /// SSID
    pub network_name: String,
    /// Passphrase (unused for open networks)
    pub password: String,
    /// Security type
    pub security: WifiSecurity,
    /// Whether the SSID is hidden
    pub hidden: bool,
}

impl PromptTemplate for WifiTemplate {
    fn validate(&self) -> Result<()> {
        if self.network_name.trim().is_empty() {
            return Err(Error::InvalidPrompt("network name is required".to_string()));
        }
        if self.security != WifiSecurity::NoPass && self.password.is_empty() {
            return Err(Error::InvalidPrompt(format!(
                "a password is required for {} networks",
                self.security
            )));
        }
        Ok(())
    }

    fn to_prompt(&self) -> String {
        let network = &self.network_name;
        let mut prompt = match self.security {
            WifiSecurity::NoPass => {
                format!("Create a WiFi QR code for open network \"{network}\" with no password")
            }
            security => {
                let mut prompt = format!("Create a WiFi QR code for network \"{network}\"");
                prompt.push_str(&format!(" with password \"{}\"", self.password));
                prompt.push_str(&format!(" using {security} security"));
                prompt
            }
        };
        if self.hidden {
            prompt.push_str(" (hidden network)");
        }
        prompt
    }
}

/// Contact card form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTemplate {
    /// Given name (required)
    pub first_name: String,
    /// Family name
    pub last_name: Option<String>,
    /// Phone number
    pub phone: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Organization
    pub company: Option<String>,
    /// Role
    pub job_title: Option<String>,
    /// Homepage
    pub website: Option<String>,
    /// Postal address
    pub address: Option<String>,
}

impl ContactTemplate {
    /// First and last name joined
    pub fn full_name(&self) -> String {
        match present(&self.last_name) {
            Some(last) => format!("{} {last}", self.first_name.trim()),
            None => self.first_name.trim().to_string(),
        }
    }
}

impl PromptTemplate for ContactTemplate {
    fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(Error::InvalidPrompt("first name is required".to_string()));
        }
        if present(&self.phone).is_none() && present(&self.email).is_none() {
            return Err(Error::InvalidPrompt(
                "a phone number or email address is required".to_string(),
            ));
        }
        Ok(())
    }

    fn to_prompt(&self) -> String {
        let mut prompt = format!("Create a contact QR code for {}", self.full_name());
        let fields = [
            ("phone", &self.phone),
            ("email", &self.email),
            ("company", &self.company),
            ("job title", &self.job_title),
            ("website", &self.website),
            ("address", &self.address),
        ];
        for (label, value) in fields {
            if let Some(value) = present(value) {
                prompt.push_str(&format!(", {label} {value}"));
            }
        }
        prompt
    }
}

/// Event pass form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    /// Event title (required)
    pub event_name: String,
    /// Date (required, free-form)
    pub date: String,
    /// Start time
    pub time: Option<String>,
    /// Venue
    pub location: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Organizer name
    pub organizer: Option<String>,
    /// Ticket identifier
    pub ticket_id: Option<String>,
}

impl PromptTemplate for EventTemplate {
    fn validate(&self) -> Result<()> {
        if self.event_name.trim().is_empty() {
            return Err(Error::InvalidPrompt("event name is required".to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(Error::InvalidPrompt("event date is required".to_string()));
        }
        Ok(())
    }

    fn to_prompt(&self) -> String {
        let mut prompt = format!("Create an event QR code for \"{}\"", self.event_name.trim());
        prompt.push_str(&format!(" on {}", self.date.trim()));
        if let Some(time) = present(&self.time) {
            prompt.push_str(&format!(" at {time}"));
        }
        if let Some(location) = present(&self.location) {
            prompt.push_str(&format!(" located at {location}"));
        }
        if let Some(organizer) = present(&self.organizer) {
            prompt.push_str(&format!(" organized by {organizer}"));
        }
        if let Some(ticket) = present(&self.ticket_id) {
            prompt.push_str(&format!(" with ticket ID {ticket}"));
        }
        if let Some(description) = present(&self.description) {
            prompt.push_str(&format!(". Description: {description}"));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_prompt_mentions_every_field() {
        let wifi = WifiTemplate {
            network_name: "HomeNetwork".to_string(),
            password: "mypassword123".to_string(),
            security: WifiSecurity::Wpa,
            hidden: true,
        };
        assert_eq!(
            wifi.build().unwrap(),
            "Create a WiFi QR code for network \"HomeNetwork\" with password \"mypassword123\" using WPA security (hidden network)"
        );
    }

    #[test]
    fn wifi_requires_password_unless_open() {
        let mut wifi = WifiTemplate {
            network_name: "Cafe".to_string(),
            ..WifiTemplate::default()
        };
        assert!(matches!(wifi.validate(), Err(Error::InvalidPrompt(_))));

        wifi.security = WifiSecurity::NoPass;
        assert!(wifi.validate().is_ok());
    }

    #[test]
    fn open_wifi_prompt_has_no_password_clause() {
        let wifi = WifiTemplate {
            network_name: "Cafe".to_string(),
            security: WifiSecurity::NoPass,
            ..WifiTemplate::default()
        };
        let prompt = wifi.build().unwrap();
        assert_eq!(prompt, "Create a WiFi QR code for open network \"Cafe\" with no password");
        assert!(!prompt.contains("with password"));
    }

    #[test]
    fn security_parses_common_spellings() {
        assert_eq!("wpa2".parse::<WifiSecurity>().unwrap(), WifiSecurity::Wpa);
        assert_eq!("open".parse::<WifiSecurity>().unwrap(), WifiSecurity::NoPass);
        assert!("wpa3-enterprise".parse::<WifiSecurity>().is_err());
    }

    #[test]
    fn contact_prompt_skips_blank_fields() {
        let contact = ContactTemplate {
            first_name: "John".to_string(),
            last_name: Some("Doe".to_string()),
            phone: Some("555-0123".to_string()),
            email: Some("john@example.com".to_string()),
            company: Some("  ".to_string()),
            ..ContactTemplate::default()
        };
        assert_eq!(
            contact.build().unwrap(),
            "Create a contact QR code for John Doe, phone 555-0123, email john@example.com"
        );
    }

    #[test]
    fn contact_needs_a_way_to_reach_them() {
        let contact = ContactTemplate {
            first_name: "Ada".to_string(),
            ..ContactTemplate::default()
        };
        assert!(matches!(contact.validate(), Err(Error::InvalidPrompt(_))));
    }

    #[test]
    fn event_prompt_orders_clauses() {
        let event = EventTemplate {
            event_name: "Tech Conference".to_string(),
            date: "2024-12-15".to_string(),
            time: Some("09:00".to_string()),
            location: Some("Hall A".to_string()),
            organizer: Some("ACME".to_string()),
            ticket_id: Some("T-42".to_string()),
            description: Some("Annual meetup".to_string()),
        };
        assert_eq!(
            event.build().unwrap(),
            "Create an event QR code for \"Tech Conference\" on 2024-12-15 at 09:00 located at Hall A organized by ACME with ticket ID T-42. Description: Annual meetup"
        );
    }

    #[test]
    fn event_requires_name_and_date() {
        let event = EventTemplate {
            event_name: "Launch".to_string(),
            ..EventTemplate::default()
        };
        assert!(event.build().is_err());
    }
}
