// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Elasticsearch completion-suggester backend
//!
//! Stores one document per trigger in a `completion` field and answers
//! prefix queries with the completion suggester.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::config::ElasticsearchConfig;
use super::suggester::BangSuggester;
use super::types::{Bang, Results, SuggestError, Suggestion};

/// Name of both the completion field and the suggester
const BANG_SUGGEST: &str = "bang_suggest";

/// Elasticsearch-backed !bang suggester
pub struct ElasticsearchSuggester {
    client: Client,
    base: Url,
    index: String,
    doc_type: String,
    timeout_ms: u64,
}

impl ElasticsearchSuggester {
    /// Create a new Elasticsearch suggester
    ///
    /// # Arguments
    /// * `config` - Cluster URL, index and document type
    /// * `timeout` - Per-request HTTP timeout
    pub fn new(config: &ElasticsearchConfig, timeout: Duration) -> Result<Self, SuggestError> {
        let mut base = Url::parse(&config.url)
            .map_err(|e| SuggestError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SuggestError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base,
            index: config.index.clone(),
            doc_type: config.doc_type.clone(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    fn url(&self, path: &str) -> Result<Url, SuggestError> {
        self.base
            .join(path)
            .map_err(|e| SuggestError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn request_error(&self, e: reqwest::Error) -> SuggestError {
        if e.is_timeout() {
            SuggestError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            SuggestError::Transport(e.to_string())
        }
    }

    fn mapping(&self) -> Value {
        json!({
            "mappings": {
                self.doc_type.as_str(): {
                    "dynamic": "strict",
                    "properties": {
                        BANG_SUGGEST: {
                            "type": "completion",
                            "analyzer": "simple",
                            "search_analyzer": "simple",
                            "preserve_separators": true,
                            "preserve_position_increments": true,
                            "max_input_length": 100
                        }
                    }
                }
            }
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, SuggestError> {
        let response = request.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SuggestError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl BangSuggester for ElasticsearchSuggester {
    async fn index_exists(&self) -> Result<bool, SuggestError> {
        let url = self.url(&self.index)?;
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(SuggestError::ApiError {
                status: status.as_u16(),
                message: format!("unexpected status checking index {}", self.index),
            }),
        }
    }

    async fn delete_index(&self) -> Result<(), SuggestError> {
        let url = self.url(&self.index)?;
        self.send(self.client.delete(url)).await?;
        info!("Deleted bang index {}", self.index);
        Ok(())
    }

    async fn setup(&self, bangs: &[Bang]) -> Result<(), SuggestError> {
        let url = self.url(&self.index)?;
        self.send(self.client.put(url).json(&self.mapping())).await?;

        let doc_url = self.url(&format!("{}/{}", self.index, self.doc_type))?;
        let mut indexed = 0usize;

        for bang in bangs {
            for trigger in &bang.triggers {
                let doc = json!({ BANG_SUGGEST: { "input": trigger, "weight": 0 } });
                self.send(self.client.post(doc_url.clone()).json(&doc))
                    .await?;
                indexed += 1;
            }
        }

        info!("Indexed {} bang triggers into {}", indexed, self.index);
        Ok(())
    }

    async fn suggest_results(&self, prefix: &str, limit: usize) -> Result<Results, SuggestError> {
        let term = prefix.strip_prefix('!').unwrap_or(prefix);
        let url = self.url(&format!("{}/_search", self.index))?;

        let body = json!({
            "query": { "match_all": {} },
            "suggest": {
                BANG_SUGGEST: {
                    "text": term,
                    "completion": { "field": BANG_SUGGEST, "size": limit }
                }
            }
        });

        let response = self.send(self.client.post(url).json(&body)).await?;
        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::Decode(e.to_string()))?;

        let results = data.into_results();
        debug!("Elasticsearch returned {} hits for {:?}", results.len(), term);
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "elasticsearch"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    suggest: HashMap<String, Vec<SuggestEntry>>,
}

#[derive(Debug, Deserialize)]
struct SuggestEntry {
    #[serde(default)]
    options: Vec<SuggestOption>,
}

#[derive(Debug, Deserialize)]
struct SuggestOption {
    text: String,
}

impl SearchResponse {
    fn into_results(mut self) -> Results {
        let suggestions = self
            .suggest
            .remove(BANG_SUGGEST)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|entry| entry.options)
            .map(|option| Suggestion::raw(option.text))
            .collect();

        Results { suggestions }
    }
}
