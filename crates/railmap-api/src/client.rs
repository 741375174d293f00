use crate::config::ApiConfig;
use crate::dto::RawNetwork;
use railmap_core::NetworkError;
use std::path::PathBuf;

/// Source of the raw station/link graph.
///
/// Implementations perform a single attempt; retry policy is the caller's business.
pub trait NetworkProvider: Send + Sync {
    fn fetch_network(&self) -> Result<RawNetwork, NetworkError>;
}

/// Blocking client for the analytics REST API.
#[derive(Debug, Clone)]
pub struct HttpNetworkProvider {
    client: reqwest::blocking::Client,
    config: ApiConfig,
}

impl HttpNetworkProvider {
    pub fn new(config: ApiConfig) -> Result<Self, NetworkError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("railmap/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| NetworkError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl NetworkProvider for HttpNetworkProvider {
    fn fetch_network(&self) -> Result<RawNetwork, NetworkError> {
        let url = self.config.network_url();
        tracing::info!("Fetching network graph from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| NetworkError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| NetworkError::Decode(e.to_string()))?;
        let network = RawNetwork::from_value(&body)?;
        tracing::info!(
            "Received {} stations and {} links",
            network.nodes.len(),
            network.links.len()
        );
        Ok(network)
    }
}

/// Reads a saved `/network` response from disk.
#[derive(Debug, Clone)]
pub struct FileNetworkProvider {
    path: PathBuf,
}

impl FileNetworkProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NetworkProvider for FileNetworkProvider {
    fn fetch_network(&self) -> Result<RawNetwork, NetworkError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| NetworkError::Io(format!("{}: {}", self.path.display(), e)))?;
        RawNetwork::from_json_str(&text)
    }
}
