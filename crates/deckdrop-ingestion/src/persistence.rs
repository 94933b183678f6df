//! Remote persistence of parsed documents
//!
//! Saves a [`StructuredDocument`] with `POST {base}/ppts/save` and reads the
//! identifier the server assigned from the response body.

use async_trait::async_trait;
use deckdrop_core::{ApiConfig, DocumentIdentifier, StructuredDocument};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::{IngestionError, Result};

/// Path of the save endpoint relative to the API base
pub const SAVE_PATH: &str = "ppts/save";

/// Sends a parsed document to the remote store.
#[async_trait]
pub trait DocumentPersistence: Send + Sync {
    /// Persist a document under `file_name` and return its remote identifier
    async fn save(&self, document: &StructuredDocument, file_name: &str)
        -> Result<DocumentIdentifier>;
}

/// Body of the save request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest<'a> {
    pub ppt_data: &'a StructuredDocument,
    pub file_name: &'a str,
}

/// [`DocumentPersistence`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpPersistence {
    http: Client,
    save_url: Url,
}

/// Builder for creating an [`HttpPersistence`]
#[derive(Default)]
pub struct HttpPersistenceBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpPersistenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API base the save path is appended to
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpPersistence> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| ApiConfig::default().base_url);

        let save_url = Url::parse(&format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            SAVE_PATH
        ))?;

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("deckdrop/{}", env!("CARGO_PKG_VERSION")));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(HttpPersistence { http, save_url })
    }
}

impl HttpPersistence {
    pub fn builder() -> HttpPersistenceBuilder {
        HttpPersistenceBuilder::new()
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::builder()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .build()
    }

    pub fn save_url(&self) -> &Url {
        &self.save_url
    }

    async fn handle_response(&self, response: Response) -> Result<DocumentIdentifier> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(IngestionError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        identifier_from_body(&body)
    }
}

#[async_trait]
impl DocumentPersistence for HttpPersistence {
    #[instrument(skip(self, document), fields(slides = document.slide_count()))]
    async fn save(
        &self,
        document: &StructuredDocument,
        file_name: &str,
    ) -> Result<DocumentIdentifier> {
        let request = SaveRequest {
            ppt_data: document,
            file_name,
        };

        let response = self
            .http
            .post(self.save_url.clone())
            .json(&request)
            .send()
            .await?;

        let id = self.handle_response(response).await?;
        debug!(ppt_id = %id, "Document saved");
        Ok(id)
    }
}

/// Keys checked, in order, when the server answers with an object
const ID_KEYS: [&str; 3] = ["pptId", "id", "_id"];

/// Read a document identifier from a save response.
///
/// Accepts a JSON string or number, an object carrying one of [`ID_KEYS`],
/// or a non-JSON plain-text body. Empty identifiers are rejected.
fn identifier_from_body(body: &str) -> Result<DocumentIdentifier> {
    let body = body.trim();
    if body.is_empty() {
        return Err(IngestionError::MalformedIdentifier(
            "empty response body".to_string(),
        ));
    }

    let id = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => ID_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(scalar_to_string)),
        Ok(value) => scalar_to_string(&value),
        Err(_) => Some(body.to_string()),
    }
    .ok_or_else(|| IngestionError::MalformedIdentifier(format!("unexpected body: {}", body)))?;

    if id.is_empty() {
        return Err(IngestionError::MalformedIdentifier(
            "empty identifier".to_string(),
        ));
    }

    Ok(DocumentIdentifier::new(id))
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
