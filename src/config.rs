//! SmartQR runtime configuration handling

use crate::error::{Error, Result};
use crate::qr::{Color, DEFAULT_LOGO_SIZE_PERCENT, DEFAULT_SIZE, LogoSource, StylingOptions};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartQrConfig {
    /// Default render styling
    pub render: RenderOptions,
    /// Completion service settings
    pub service: ServiceOptions,
    /// Where the generation history lives
    pub storage: StorageOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl SmartQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No smartqr.toml / smartqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["smartqr.toml", "smartqr.yaml", "smartqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("smartqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.render.apply_env_overrides();
        self.service.apply_env_overrides();
        self.storage.apply_env_overrides();
        self.logging.apply_env_overrides();
    }
}

/// Default styling applied to every render unless overridden on the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output size in pixels
    pub size: u32,
    /// Dark module color (hex)
    pub foreground: String,
    /// Light module color (hex)
    pub background: String,
    /// Logo path or data URL
    pub logo: Option<String>,
    /// Logo size as percentage of output size
    pub logo_size_percent: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            foreground: "#000000".to_string(),
            background: "#ffffff".to_string(),
            logo: None,
            logo_size_percent: DEFAULT_LOGO_SIZE_PERCENT,
        }
    }
}

impl RenderOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("SMARTQR_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.size = parsed;
            }
        }
        if let Ok(fg) = env::var("SMARTQR_FOREGROUND") {
            self.foreground = fg;
        }
        if let Ok(bg) = env::var("SMARTQR_BACKGROUND") {
            self.background = bg;
        }
        if let Ok(logo) = env::var("SMARTQR_LOGO") {
            self.logo = (!logo.trim().is_empty()).then_some(logo);
        }
        if let Ok(percent) = env::var("SMARTQR_LOGO_SIZE") {
            if let Ok(parsed) = percent.parse::<u8>() {
                self.logo_size_percent = parsed.min(100);
            }
        }
    }

    /// Resolve into validated styling options.
    pub fn to_styling(&self) -> Result<StylingOptions> {
        if self.size == 0 {
            return Err(Error::Config("Render size must be positive".to_string()));
        }

        Ok(StylingOptions {
            size: self.size,
            foreground: Color::parse(&self.foreground)?,
            background: Color::parse(&self.background)?,
            logo: self.logo.as_deref().map(LogoSource::parse),
            logo_size_percent: self.logo_size_percent.min(100),
        })
    }
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    /// Chat-completions URL
    pub endpoint: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Bearer token (prefer `SMARTQR_API_KEY` over writing it to disk)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ServiceOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var("SMARTQR_SERVICE_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(model) = env::var("SMARTQR_SERVICE_MODEL") {
            self.model = model;
        }
        if let Ok(key) = env::var("SMARTQR_API_KEY") {
            self.api_key = (!key.trim().is_empty()).then_some(key);
        }
        if let Ok(timeout) = env::var("SMARTQR_SERVICE_TIMEOUT") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.timeout_secs = parsed.max(1);
            }
        }
    }
}

/// Persistent storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Directory holding the analytics log; defaults to the XDG data dir
    pub data_dir: Option<PathBuf>,
}

impl StorageOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("SMARTQR_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// Configured directory, else `$XDG_DATA_HOME/smartqr`, else `~/.local/share/smartqr`.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(xdg_data) = env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg_data).join("smartqr");
        }
        if let Some(home) = env::var_os("HOME") {
            return PathBuf::from(home).join(".local/share/smartqr");
        }
        PathBuf::from(".smartqr")
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `SMARTQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in terminal logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("SMARTQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("SMARTQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("SMARTQR_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("SMARTQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::parse(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_default_styling() {
        let styling = RenderOptions::default().to_styling().unwrap();
        assert_eq!(styling, StylingOptions::default());
    }

    #[test]
    fn parses_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartqr.toml");
        fs::write(
            &path,
            r##"
[render]
size = 512
foreground = "#1d4ed8"
logo = "brand.png"
logo_size_percent = 40

[service]
model = "local-model"

[storage]
data_dir = "/tmp/smartqr-test"
"##,
        )
        .unwrap();

        let config = SmartQrConfig::from_file(&path).unwrap();
        assert_eq!(config.render.size, 512);
        assert_eq!(config.service.model, "local-model");
        assert_eq!(config.service.timeout_secs, 30);
        assert_eq!(
            config.storage.resolved_data_dir(),
            PathBuf::from("/tmp/smartqr-test")
        );

        let styling = config.render.to_styling().unwrap();
        assert_eq!(styling.foreground.to_string(), "#1d4ed8");
        assert_eq!(styling.logo, Some(LogoSource::parse("brand.png")));
        assert_eq!(styling.logo_size_percent, 40);
    }

    #[test]
    fn parses_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartqr.yaml");
        fs::write(&path, "logging:\n  level: debug\n  rotation: daily\n").unwrap();

        let config = SmartQrConfig::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartqr.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            SmartQrConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn invalid_color_is_reported() {
        let options = RenderOptions {
            background: "white".to_string(),
            ..RenderOptions::default()
        };
        assert!(matches!(options.to_styling(), Err(Error::InvalidColor(_))));
    }
}
