use config::{Config, ConfigError, Environment, File};
use plextv_api::transport::DEFAULT_USER_AGENT;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Overrides the stored client identifier
    #[serde(default)]
    pub client_id: Option<String>,

    /// Previously obtained token to try before starting a new login
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub forward: ForwardSettings,

    #[serde(default)]
    pub poll: PollSettings,
}

/// Where the provider sends the user's browser after sign-in.
#[derive(Debug, Deserialize, Clone)]
pub struct ForwardSettings {
    #[serde(default)]
    pub secure: bool,

    #[serde(default = "default_forward_host")]
    pub host: String,

    #[serde(default = "default_forward_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_poll_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_app_name() -> String {
    "plextv-api".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_forward_host() -> String {
    "localhost".to_string()
}

fn default_forward_endpoint() -> String {
    "/plex/auth".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_poll_timeout_secs() -> u64 {
    300
}

impl Default for ForwardSettings {
    fn default() -> Self {
        Self {
            secure: false,
            host: default_forward_host(),
            endpoint: default_forward_endpoint(),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl ForwardSettings {
    pub fn url(&self) -> String {
        forward_url(self.secure, &self.host, &self.endpoint)
    }
}

/// `{scheme}://{host}{endpoint}`, inserting the leading slash if missing.
pub fn forward_url(secure: bool, host: &str, endpoint: &str) -> String {
    let scheme = if secure { "https" } else { "http" };
    if endpoint.starts_with('/') {
        format!("{}://{}{}", scheme, host, endpoint)
    } else {
        format!("{}://{}/{}", scheme, host, endpoint)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("PLEXTV_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        Self::from_file(&config_path)
    }

    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("PLEXTV").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("app_name is required".to_string());
        }
        if self.forward.host.trim().is_empty() {
            return Err("forward.host is required".to_string());
        }
        if self.poll.interval_ms == 0 {
            return Err("poll.interval_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_forward_url() {
        assert_eq!(forward_url(false, "localhost:8080", "/plex/auth"), "http://localhost:8080/plex/auth");
        assert_eq!(forward_url(true, "example.com", "plex/auth"), "https://example.com/plex/auth");
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::from_file("/nonexistent/plextv-config").unwrap();
        assert_eq!(settings.forward.endpoint, "/plex/auth");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
app_name = "my-app"
client_id = "fixed-id"

[forward]
secure = true
host = "media.example.com"

[poll]
interval_ms = 500
"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(settings.app_name, "my-app");
        assert_eq!(settings.client_id.as_deref(), Some("fixed-id"));
        assert_eq!(settings.forward.url(), "https://media.example.com/plex/auth");
        assert_eq!(settings.poll.interval_ms, 500);
        assert_eq!(settings.poll.timeout_secs, 300);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut settings = Settings::from_file("/nonexistent/plextv-config").unwrap();
        settings.poll.interval_ms = 0;
        assert!(settings.validate().is_err());
    }
}
