use std::time::Duration;

use thiserror::Error;

/// PCA service used when no override is given.
pub const DEFAULT_API_URL: &str = "https://render-pd-homcloud-api-2.onrender.com";

/// Render free-tier instances can take minutes to wake up.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_API_URL: &str = "XYZ_PCA_API_URL";
pub const ENV_TIMESTEP_FS: &str = "XYZ_PCA_TIMESTEP_FS";
pub const ENV_TIMEOUT_SECS: &str = "XYZ_PCA_TIMEOUT_SECS";

const PLACEHOLDER_HOST: &str = "your-service-name";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("replace the placeholder API URL `{0}` with your deployed service URL")]
    PlaceholderUrl(String),
    #[error("API URL `{0}` must start with http:// or https://")]
    InvalidUrl(String),
    #[error("timestep size must be a positive number of femtoseconds, got `{0}`")]
    InvalidTimestep(String),
    #[error("XYZ_PCA_TIMEOUT_SECS must be a whole number of seconds, got `{0}`")]
    InvalidTimeout(String),
}

/// Runtime settings of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Endpoint receiving the multipart upload.
    pub api_url: String,
    /// Simulation timestep in femtoseconds, used for labels.
    pub timestep_size_fs: f64,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timestep_size_fs: 1.0,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `XYZ_PCA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMESTEP_FS) {
            config.timestep_size_fs = parse_timestep_size(&raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_api_url(&self.api_url)?;
        if !is_valid_timestep_size(self.timestep_size_fs) {
            return Err(ConfigError::InvalidTimestep(self.timestep_size_fs.to_string()));
        }
        Ok(())
    }
}

pub fn validate_api_url(url: &str) -> Result<(), ConfigError> {
    if url.contains(PLACEHOLDER_HOST) {
        return Err(ConfigError::PlaceholderUrl(url.to_string()));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ConfigError::InvalidUrl(url.to_string()));
    }
    Ok(())
}

pub fn is_valid_timestep_size(fs: f64) -> bool {
    fs.is_finite() && fs > 0.0
}

fn parse_timestep_size(raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| is_valid_timestep_size(*v))
        .ok_or_else(|| ConfigError::InvalidTimestep(raw.to_string()))
}
