use crate::error::{RelayError, Result};
use std::env;
use std::time::Duration;

pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub image_model: String,
    pub text_model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_key: String::new(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(60),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &self.redacted_key())
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Config {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads the process environment. Fails when no API key is set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| get(*key))
            .ok_or_else(|| {
                RelayError::ConfigError(
                    "GOOGLE_API_KEY or GEMINI_API_KEY environment variable is required".into(),
                )
            })?;

        let defaults = Config::default();
        let port = match get("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| RelayError::ConfigError(format!("Invalid PORT: {}", raw)))?,
            None => defaults.port,
        };

        Ok(Config {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            api_key,
            image_model: get("GEMINI_MODEL").unwrap_or(defaults.image_model),
            text_model: get("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: parse_secs(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout),
            connect_timeout: parse_secs(get("CONNECT_TIMEOUT_SECS"), "CONNECT_TIMEOUT_SECS")?
                .unwrap_or(defaults.connect_timeout),
        })
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    /// First four characters of the key followed by its length.
    pub fn redacted_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(4).collect();
        format!("{}... ({} chars)", prefix, self.api_key.chars().count())
    }
}

fn parse_secs(raw: Option<String>, name: &str) -> Result<Option<Duration>> {
    raw.map(|value| {
        value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| RelayError::ConfigError(format!("Invalid {}: {}", name, value)))
    })
    .transpose()
}
