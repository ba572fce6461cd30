// ============================================================================
// Configuration
// ============================================================================
// Runtime configuration for the dashboard. The only knob today is the base
// URL of the prediction / ingestion service, taken from the COINDASH_API_URL
// environment variable (same convention as RUST_LOG for the log filter).
// ============================================================================

/// Environment variable overriding the service base URL.
pub const API_URL_ENV: &str = "COINDASH_API_URL";

/// Base URL used when no override is present.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Runtime configuration of the dashboard.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the prediction / ingestion service, without trailing slash.
    pub api_base_url: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(API_URL_ENV).ok())
    }

    /// Builds the configuration from an optional base URL override.
    ///
    /// A trailing slash is trimmed so endpoint paths can be appended
    /// uniformly; a blank override falls back to the default.
    fn from_override(value: Option<String>) -> Self {
        let api_base_url = match value {
            Some(url) if !url.trim().is_empty() => {
                url.trim().trim_end_matches('/').to_string()
            }
            _ => DEFAULT_BASE_URL.to_string(),
        };

        Self { api_base_url }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_override(None)
    }
}

// ============================================================================
// Tests
// ============================================================================
