//! Rijksmuseum collection API client
//!
//! Fetches collection object metadata and probes image URLs for their
//! declared content type.
//!
//! # API Reference
//! - Endpoint: `GET <endpoint>/<objectNumber>?format=json&key=<key>&culture=en`
//! - Documentation: https://data.rijksmuseum.nl/object-metadata/api/

use super::{CollectionSource, MediaProbe};
use crate::models::CollectionResponse;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default collection endpoint (English culture)
pub const DEFAULT_METADATA_ENDPOINT: &str = "https://www.rijksmuseum.nl/api/en/collection";

const USER_AGENT: &str = concat!(
    "rijks-upload/",
    env!("CARGO_PKG_VERSION"),
    " (collection media uploader)"
);

/// Rijksmuseum client errors
#[derive(Debug, Error)]
pub enum RijksError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Rijksmuseum API client
pub struct RijksmuseumClient {
    http_client: Client,
    endpoint: Url,
    api_key: String,
}

impl RijksmuseumClient {
    pub fn new(endpoint: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, RijksError> {
        let endpoint = Url::parse(endpoint).map_err(|e| RijksError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(RijksError::InvalidUrl(endpoint.to_string()));
        }

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RijksError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            api_key: api_key.into(),
        })
    }

    /// Object URL with the object number as its own path segment
    fn object_url(&self, collection_id: &str) -> Result<Url, RijksError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| RijksError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(collection_id);
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("key", &self.api_key)
            .append_pair("culture", "en");
        Ok(url)
    }
}

#[async_trait]
impl CollectionSource for RijksmuseumClient {
    async fn fetch_object(&self, collection_id: &str) -> Result<CollectionResponse, RijksError> {
        let url = self.object_url(collection_id)?;

        debug!(collection_id = %collection_id, "Querying collection API");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| RijksError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RijksError::Api(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RijksError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| RijksError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MediaProbe for RijksmuseumClient {
    async fn content_type(&self, media_url: &str) -> Result<Option<String>, RijksError> {
        let url = Url::parse(media_url).map_err(|e| RijksError::InvalidUrl(format!("{}: {}", media_url, e)))?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| RijksError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RijksError::Api(status.as_u16(), status.to_string()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        debug!(media_url = %media_url, content_type = ?content_type, "Probed media");

        Ok(content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> RijksmuseumClient {
        RijksmuseumClient::new(endpoint, "secret key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_object_url() {
        let url = client(DEFAULT_METADATA_ENDPOINT).object_url("SK-C-5").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.rijksmuseum.nl/api/en/collection/SK-C-5?format=json&key=secret+key&culture=en"
        );
    }

    #[test]
    fn test_object_url_with_trailing_slash_and_odd_id() {
        let url = client("https://example.org/api/collection/").object_url("RP-P 1/2").unwrap();
        assert_eq!(url.path(), "/api/collection/RP-P%201%2F2");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(RijksmuseumClient::new("not a url", "k", Duration::from_secs(1)).is_err());
        assert!(RijksmuseumClient::new("mailto:someone@example.org", "k", Duration::from_secs(1)).is_err());
    }
}
