//! Bridge configuration.
//!
//! Defaults cover the common editor setup; every field can be overridden
//! programmatically with `with_*` builders or through `SCRIPTBRIDGE_*`
//! environment variables (a `.env` file is honoured when present).

use crate::errors::BridgeError;
use crate::surface::DEFAULT_SURFACE_ID;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`BridgeConfig::program_name`].
pub const ENV_PROGRAM_NAME: &str = "SCRIPTBRIDGE_PROGRAM_NAME";
/// Environment variable overriding [`BridgeConfig::display_surface_id`].
pub const ENV_SURFACE_ID: &str = "SCRIPTBRIDGE_SURFACE_ID";
/// Environment variable overriding [`BridgeConfig::prompt_enabled`].
pub const ENV_PROMPT_ENABLED: &str = "SCRIPTBRIDGE_PROMPT_ENABLED";
/// Environment variable overriding [`BridgeConfig::export_mime_type`].
pub const ENV_EXPORT_MIME: &str = "SCRIPTBRIDGE_EXPORT_MIME";
/// Environment variable overriding [`BridgeConfig::session_key_prefix`].
pub const ENV_SESSION_PREFIX: &str = "SCRIPTBRIDGE_SESSION_PREFIX";

/// Configuration shared by the bridge components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Module name submitted code runs under.
    #[serde(default = "default_program_name")]
    pub program_name: String,
    /// Id of the surface the graphics subsystem draws into.
    #[serde(default = "default_surface_id")]
    pub display_surface_id: String,
    /// Whether interactive input prompts display their prompt text.
    #[serde(default = "default_prompt_enabled")]
    pub prompt_enabled: bool,
    /// MIME type of exported files.
    #[serde(default = "default_export_mime")]
    pub export_mime_type: String,
    /// Prefix of editor session keys.
    #[serde(default = "default_session_prefix")]
    pub session_key_prefix: String,
}

fn default_program_name() -> String {
    "esercizio".to_string()
}

fn default_surface_id() -> String {
    DEFAULT_SURFACE_ID.to_string()
}

const fn default_prompt_enabled() -> bool {
    true
}

fn default_export_mime() -> String {
    "text/plain".to_string()
}

fn default_session_prefix() -> String {
    "editor".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program_name: default_program_name(),
            display_surface_id: default_surface_id(),
            prompt_enabled: default_prompt_enabled(),
            export_mime_type: default_export_mime(),
            session_key_prefix: default_session_prefix(),
        }
    }
}

impl BridgeConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the configuration from the environment, reading `.env` first.
    pub fn from_env() -> Result<Self, BridgeError> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_PROGRAM_NAME) {
            config.program_name = value;
        }
        if let Some(value) = lookup(ENV_SURFACE_ID) {
            config.display_surface_id = value;
        }
        if let Some(value) = lookup(ENV_PROMPT_ENABLED) {
            config.prompt_enabled = parse_bool(ENV_PROMPT_ENABLED, &value)?;
        }
        if let Some(value) = lookup(ENV_EXPORT_MIME) {
            config.export_mime_type = value;
        }
        if let Some(value) = lookup(ENV_SESSION_PREFIX) {
            config.session_key_prefix = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that required names are not blank.
    pub fn validate(&self) -> Result<(), BridgeError> {
        for (name, value) in [
            ("program_name", &self.program_name),
            ("display_surface_id", &self.display_surface_id),
            ("export_mime_type", &self.export_mime_type),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Sets the program name.
    #[must_use]
    pub fn with_program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = name.into();
        self
    }

    /// Sets the display surface id.
    #[must_use]
    pub fn with_display_surface_id(mut self, id: impl Into<String>) -> Self {
        self.display_surface_id = id.into();
        self
    }

    /// Sets whether input prompts are displayed.
    #[must_use]
    pub fn with_prompt_enabled(mut self, enabled: bool) -> Self {
        self.prompt_enabled = enabled;
        self
    }

    /// Sets the export MIME type.
    #[must_use]
    pub fn with_export_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.export_mime_type = mime.into();
        self
    }

    /// Sets the session key prefix.
    #[must_use]
    pub fn with_session_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.session_key_prefix = prefix.into();
        self
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, BridgeError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(BridgeError::Config(format!(
            "{name}: expected a boolean, got '{other}'"
        ))),
    }
}
