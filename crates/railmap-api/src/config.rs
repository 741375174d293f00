use std::time::Duration;

/// Environment variable that overrides the API base URL at deployment time.
pub const API_BASE_ENV: &str = "RAILMAP_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::default().with_base_url(resolve_base_url(std::env::var(API_BASE_ENV).ok()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn network_url(&self) -> String {
        format!("{}/network", self.base_url.trim_end_matches('/'))
    }
}

/// Blank overrides fall back to the built-in address.
pub fn resolve_base_url(override_value: Option<String>) -> String {
    match override_value {
        Some(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}
