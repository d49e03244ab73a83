//! Client for the target Solr core.
//!
//! [`SearchIndex`] is the only way the rest of the crate reaches the index.
//! [`SolrClient`] implements it over HTTP with `reqwest`; tests substitute an
//! in-memory implementation.
//!
//! # Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`add_field`](SearchIndex::add_field) | `POST {base}/schema` `{"add-field": {...}}` |
//! | [`add_documents`](SearchIndex::add_documents) | `POST {base}/update?commit=true` `[doc, ...]` |
//! | [`delete_all`](SearchIndex::delete_all) | `POST {base}/update?commit=true` `{"delete": {"query": "*:*"}}` |
//! | [`count`](SearchIndex::count) | `GET {base}/select?q=*:*&rows=0` |
//!
//! No call is retried. Each returns an [`IndexError`] describing what went
//! wrong and the caller decides whether it matters.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::IndexConfig;
use crate::models::Document;
use crate::schema::FieldDef;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl IndexError {
    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            IndexError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a non-success answer.
    pub fn body(&self) -> Option<&str> {
        match self {
            IndexError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }
}

/// Operations the seeder needs from a search index.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Where the index lives, for log lines.
    fn location(&self) -> &str;

    /// Declare one field in the index schema.
    async fn add_field(&self, field: &FieldDef) -> Result<(), IndexError>;

    /// Write documents and commit them before returning.
    async fn add_documents(&self, docs: &[Document]) -> Result<(), IndexError>;

    /// Remove every document and commit.
    async fn delete_all(&self) -> Result<(), IndexError>;

    /// Number of documents a match-all query returns.
    async fn count(&self) -> Result<u64, IndexError>;
}

/// [`SearchIndex`] backed by a Solr core's HTTP API.
pub struct SolrClient {
    base_url: String,
    http: reqwest::Client,
}

impl SolrClient {
    pub fn new(config: &IndexConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), IndexError> {
        let url = self.endpoint(path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|source| IndexError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(IndexError::Status {
            url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SearchIndex for SolrClient {
    fn location(&self) -> &str {
        &self.base_url
    }

    async fn add_field(&self, field: &FieldDef) -> Result<(), IndexError> {
        self.post_json("schema", &json!({ "add-field": field })).await
    }

    async fn add_documents(&self, docs: &[Document]) -> Result<(), IndexError> {
        self.post_json("update?commit=true", docs).await
    }

    async fn delete_all(&self) -> Result<(), IndexError> {
        self.post_json("update?commit=true", &json!({ "delete": { "query": "*:*" } }))
            .await
    }

    async fn count(&self) -> Result<u64, IndexError> {
        let url = self.endpoint("select?q=*:*&rows=0");
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| IndexError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| IndexError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        parse_num_found(&json).ok_or_else(|| IndexError::Decode {
            url,
            message: "missing response.numFound".to_string(),
        })
    }
}

/// Extract `response.numFound` from a select response.
fn parse_num_found(json: &serde_json::Value) -> Option<u64> {
    json.get("response")?.get("numFound")?.as_u64()
}
