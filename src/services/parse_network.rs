// src/services/parse_network.rs
// DOCUMENTATION: HTTP network collaborator for a Parse-style backend
// PURPOSE: Execute class queries, cloud functions and downloads, or read bundled fixtures

use async_trait::async_trait;
use reqwest::{Client, Url};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use super::network::{NetworkService, RequestResource};
use crate::errors::NetworkError;

/// Parse backend client
/// DOCUMENTATION: Speaks plain HTTP via reqwest. Bundled resources are read
/// from disk so the same service also backs offline mode.
#[derive(Debug, Clone)]
pub struct ParseNetworkService {
    /// HTTP client for making requests
    client: Client,
}

impl ParseNetworkService {
    /// Create a client that gives up connecting after `connect_timeout_secs`
    pub fn new(connect_timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_bundle(dir: &Path, file_name: &str) -> Result<Vec<u8>, NetworkError> {
        let path = dir.join(file_name);
        log::debug!("Reading bundled resource {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| {
            log::error!("Cannot read bundled resource {}: {}", path.display(), e);
            match e.kind() {
                ErrorKind::NotFound => NetworkError::InvalidRequest,
                _ => NetworkError::InvalidResponse,
            }
        })
    }

    async fn send(&self, resource: &RequestResource, url: Url) -> Result<Vec<u8>, NetworkError> {
        let mut request = match resource {
            RequestResource::Function { parameters, .. } => {
                self.client.post(url.clone()).json(parameters)
            }
            _ => self.client.get(url.clone()),
        };

        if let Some(headers) = resource.headers() {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        log::debug!("Backend request: {}", url.path());

        let response = request
            .send()
            .await
            .map_err(|e| convert_reqwest_error(e, &url))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| convert_reqwest_error(e, &url))?;

        if !status.is_success() {
            log::error!("Backend error {} for {}", status, url.path());
            return Err(NetworkError::DataLoading {
                status_code: status.as_u16(),
                data: body.to_vec(),
            });
        }

        log::debug!("Backend returned {} bytes for {}", body.len(), url.path());
        Ok(body.to_vec())
    }
}

#[async_trait]
impl NetworkService for ParseNetworkService {
    async fn fetch(&self, resource: &RequestResource) -> Result<Vec<u8>, NetworkError> {
        if let RequestResource::Bundle { dir, file_name } = resource {
            return Self::read_bundle(dir, file_name).await;
        }

        let url = resource.target_url()?.ok_or(NetworkError::InvalidRequest)?;
        self.send(resource, url).await
    }
}

/// Map reqwest failures onto the transport taxonomy
fn convert_reqwest_error(error: reqwest::Error, url: &Url) -> NetworkError {
    log::error!("Backend request to {} failed: {}", url.path(), error);

    if error.is_connect() || error.is_timeout() {
        NetworkError::InternetConnection
    } else if error.is_builder() {
        NetworkError::InvalidRequest
    } else {
        NetworkError::InvalidResponse
    }
}
