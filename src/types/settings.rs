use serde::{Deserialize, Serialize};

/// Client settings, stored as JSON in the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// Origin of the backend; `/api/...` paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Session cookie of an existing login, sent on every request.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Seconds after load before visible cards are marked read.
    #[serde(default = "default_read_dwell_secs")]
    pub read_dwell_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_read_dwell_secs() -> u64 {
    3
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            read_dwell_secs: default_read_dwell_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Persisted light/dark choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    /// Parses the stored value; anything unrecognised is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ThemePreference::Dark),
            "light" => Some(ThemePreference::Light),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }
}

impl Default for ThemePreference {
    fn default() -> Self {
        ThemePreference::Light
    }
}
