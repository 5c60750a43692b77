//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{Backend, Entry};
use crate::config::ImportConfig;
use crate::error::{BackendError, BackendResult};
use crate::models::{EntryId, Payload};

/// `{ "data": [...] }`
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    data: Vec<Entry>,
}

/// `{ "data": { "id": ... } }`, other keys ignored.
#[derive(Debug, Deserialize)]
struct CreatedEnvelope {
    data: Option<CreatedEntry>,
}

#[derive(Debug, Deserialize)]
struct CreatedEntry {
    id: EntryId,
}

/// Strapi REST client.
///
/// Built once per run; the underlying connection pool is reused for every
/// request.
#[derive(Clone)]
pub struct StrapiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl StrapiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:1337`).
    pub fn new(base_url: &str, token: Option<String>) -> BackendResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("strapi-import/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &ImportConfig) -> BackendResult<Self> {
        Self::new(&config.base_url, config.token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, content_type: &str) -> String {
        format!("{}/api/{}", self.base_url, content_type)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> BackendResult<(StatusCode, String)> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok((status, body))
    }
}

#[async_trait]
impl Backend for StrapiClient {
    async fn list_by_field(&self, content_type: &str, field: &str, value: &str) -> BackendResult<Vec<Entry>> {
        let url = self.collection_url(content_type);
        let filter = format!("filters[{}]", field);
        debug!(%url, %filter, %value, "list_by_field");

        let (_, body) = self.send(self.http.get(&url).query(&[(filter.as_str(), value)])).await?;

        let envelope: ListEnvelope =
            serde_json::from_str(&body).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }

    async fn create(&self, content_type: &str, payload: &Payload) -> BackendResult<Option<EntryId>> {
        let url = self.collection_url(content_type);
        debug!(%url, fields = payload.len(), "create");

        let (status, body) = self
            .send(self.http.post(&url).json(&payload.to_request_body()))
            .await?;
        debug!(%status, "create: accepted");

        // Any 2xx counts as created, even if the body is not the usual envelope.
        Ok(serde_json::from_str::<CreatedEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.data)
            .map(|entry| entry.id))
    }
}
