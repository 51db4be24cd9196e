//! Client configuration

use std::time::Duration;

use crate::error::Error;

/// Environment variable holding the backend base URL.
pub const API_URL_VAR: &str = "DOCREG_API_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "DOCREG_TIMEOUT_SECS";
/// Environment variable overriding the ViaCEP base URL.
pub const VIACEP_URL_VAR: &str = "DOCREG_VIACEP_URL";

/// Where the backend and the address service live, and how long to wait.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use docreg_client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_api_url("https://registry.example.com")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL.
    ///
    /// Default: `http://localhost:5000`
    pub api_url: String,

    /// Per-request timeout, applied to backend and address lookups alike.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// ViaCEP base URL, without the trailing `/{cep}/json/`.
    ///
    /// Default: `https://viacep.com.br/ws`
    pub viacep_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
            viacep_url: "https://viacep.com.br/ws".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_viacep_url(mut self, url: impl Into<String>) -> Self {
        self.viacep_url = url.into();
        self
    }

    /// Reads the `DOCREG_*` variables from the process environment, keeping
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(url) = lookup(VIACEP_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.viacep_url = url.trim().to_string();
        }

        Ok(config)
    }
}
