//! Client for the public placeholder API the population job draws its
//! synthetic users, posts and comments from.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, thiserror::Error)]
pub enum PlaceholderError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} list was empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceholderUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderPost {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderComment {
    pub id: i64,
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub body: String,
}

/// Source of synthetic records for the population job
#[async_trait]
pub trait PlaceholderSource: Send + Sync {
    async fn users(&self) -> Result<Vec<PlaceholderUser>, PlaceholderError>;
    async fn posts(&self) -> Result<Vec<PlaceholderPost>, PlaceholderError>;
    async fn comments(&self) -> Result<Vec<PlaceholderComment>, PlaceholderError>;
}

/// `PlaceholderSource` backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpPlaceholderSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlaceholderSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, PlaceholderError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| PlaceholderError::Request {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T, PlaceholderError> {
        let url = self.url(resource);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| PlaceholderError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PlaceholderError::Status { url, status, body });
        }

        response
            .json()
            .await
            .map_err(|source| PlaceholderError::Decode { url, source })
    }
}

#[async_trait]
impl PlaceholderSource for HttpPlaceholderSource {
    async fn users(&self) -> Result<Vec<PlaceholderUser>, PlaceholderError> {
        self.fetch("users").await
    }

    async fn posts(&self) -> Result<Vec<PlaceholderPost>, PlaceholderError> {
        self.fetch("posts").await
    }

    async fn comments(&self) -> Result<Vec<PlaceholderComment>, PlaceholderError> {
        self.fetch("comments").await
    }
}
