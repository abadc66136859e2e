//! Dapr State Client
//!
//! `StateStoreClient` over the Dapr sidecar HTTP state API.
//! Concurrency is first-write-wins keyed on the ETag returned by the sidecar.

use async_trait::async_trait;
use reqwest::header::ETAG;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;

use crate::domain::Account;

use super::{ETag, StateEntry, StateStoreClient, StateStoreError};

const API_TOKEN_HEADER: &str = "dapr-api-token";

/// HTTP client for a Dapr sidecar
#[derive(Debug, Clone)]
pub struct DaprStateClient {
    base_url: Url,
    client: Client,
    api_token: Option<String>,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    key: &'a str,
    value: &'a Account,
    #[serde(skip_serializing_if = "Option::is_none")]
    etag: Option<&'a str>,
    options: SaveOptions,
}

#[derive(Serialize)]
struct SaveOptions {
    concurrency: &'static str,
    consistency: &'static str,
}

impl DaprStateClient {
    /// Create a client for the sidecar at `host:port`
    pub fn new(host: &str, port: u16, timeout: Duration) -> Result<Self, StateStoreError> {
        let base_url = Url::parse(&format!("http://{}:{}/", host, port))
            .map_err(|e| StateStoreError::Transport(format!("invalid sidecar address: {}", e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            api_token: None,
        })
    }

    /// Send `dapr-api-token` with every request
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    fn state_url(&self, segments: &[&str]) -> Result<Url, StateStoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StateStoreError::Transport("sidecar URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1.0", "state"])
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(API_TOKEN_HEADER, token),
            None => request,
        }
    }
}

#[async_trait]
impl StateStoreClient for DaprStateClient {
    async fn fetch(&self, store: &str, key: &str) -> Result<StateEntry<Account>, StateStoreError> {
        let url = self.state_url(&[store, key])?;
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
            return Ok(StateEntry::absent(key));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StateStoreError::Transport(format!(
                "fetch {}/{} returned {}: {}",
                store, key, status, body
            )));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(ETag::new);
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(StateEntry::absent(key));
        }

        let account: Account = serde_json::from_slice(&body)?;
        Ok(StateEntry {
            key: key.to_string(),
            value: Some(account),
            etag,
        })
    }

    async fn save(&self, store: &str, entry: &StateEntry<Account>) -> Result<(), StateStoreError> {
        let value = entry
            .value
            .as_ref()
            .ok_or_else(|| StateStoreError::EmptyValue(entry.key.clone()))?;

        let body = [SaveRequest {
            key: &entry.key,
            value,
            etag: entry.etag.as_ref().map(ETag::as_str),
            options: SaveOptions {
                concurrency: "first-write",
                consistency: "strong",
            },
        }];

        let url = self.state_url(&[store])?;
        let response = self
            .authorize(self.client.post(url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::CONFLICT || status == StatusCode::PRECONDITION_FAILED {
            return Err(StateStoreError::Conflict {
                key: entry.key.clone(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(StateStoreError::Transport(format!(
            "save {}/{} returned {}: {}",
            store, entry.key, status, body
        )))
    }
}
