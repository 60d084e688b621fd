//! Hex color parsing for foreground/background styling

use crate::error::{Error, Result};
use image::Rgba;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An RGBA color parsed from a CSS-style hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub Rgba<u8>);

impl Color {
    /// Opaque black (`#000000`)
    pub const BLACK: Color = Color(Rgba([0, 0, 0, 255]));
    /// Opaque white (`#ffffff`)
    pub const WHITE: Color = Color(Rgba([255, 255, 255, 255]));

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn parse(value: &str) -> Result<Self> {
        let hex_str = value.trim().trim_start_matches('#');
        let expanded = match hex_str.len() {
            3 => hex_str.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 | 8 => hex_str.to_string(),
            _ => return Err(Error::InvalidColor(value.to_string())),
        };

        let bytes = hex::decode(&expanded).map_err(|_| Error::InvalidColor(value.to_string()))?;
        let alpha = bytes.get(3).copied().unwrap_or(255);
        Ok(Self(Rgba([bytes[0], bytes[1], bytes[2], alpha])))
    }

    /// Underlying pixel value
    pub fn rgba(&self) -> Rgba<u8> {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.0;
        if a == 255 {
            write!(f, "#{}", hex::encode([r, g, b]))
        } else {
            write!(f, "#{}", hex::encode([r, g, b, a]))
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(Color::parse("#000000").unwrap(), Color::BLACK);
        assert_eq!(Color::parse("fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse("#1a2b3c80").unwrap().rgba(),
            Rgba([0x1a, 0x2b, 0x3c, 0x80])
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Color::parse("#12345"),
            Err(Error::InvalidColor(_))
        ));
        assert!(matches!(
            Color::parse("#gggggg"),
            Err(Error::InvalidColor(_))
        ));
        assert!(Color::parse("").is_err());
    }

    #[test]
    fn displays_as_lowercase_hex() {
        assert_eq!(Color::parse("#ABCDEF").unwrap().to_string(), "#abcdef");
        assert_eq!(Color::parse("#abcdef7f").unwrap().to_string(), "#abcdef7f");
    }
}
