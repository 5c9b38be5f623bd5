//! Configuration types for the hospital dashboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Remote hospital API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Where the bearer token is kept between runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// Refresh periods for the polling views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_dashboard_interval")]
    pub dashboard_interval_seconds: u64,
    #[serde(default = "default_patients_interval")]
    pub patients_interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            dashboard_interval_seconds: default_dashboard_interval(),
            patients_interval_seconds: default_patients_interval(),
        }
    }
}

impl PollingConfig {
    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_interval_seconds)
    }

    pub fn patients_interval(&self) -> Duration {
        Duration::from_secs(self.patients_interval_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Pause between a successful registration and the jump to login
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_seconds: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            redirect_delay_seconds: default_redirect_delay(),
        }
    }
}

impl RegistrationConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_secs(self.redirect_delay_seconds)
    }
}

fn default_base_url() -> String {
    "https://instaaid-backend.onrender.com".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_token_file() -> PathBuf {
    PathBuf::from("hospital-dashboard-session.json")
}

fn default_dashboard_interval() -> u64 {
    30
}

fn default_patients_interval() -> u64 {
    15
}

fn default_redirect_delay() -> u64 {
    3
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject settings that would make the views unusable
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(crate::DashboardError::Config(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.polling.dashboard_interval_seconds == 0
            || self.polling.patients_interval_seconds == 0
        {
            return Err(crate::DashboardError::Config(
                "polling intervals must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}
