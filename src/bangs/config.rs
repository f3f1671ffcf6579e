// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for !bang resolution and autocomplete

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Configuration for the bang service
#[derive(Debug, Clone)]
pub struct BangsConfig {
    /// Bang data file; the built-in set is used when unset
    pub bangs_file: Option<PathBuf>,
    /// Elasticsearch backend settings
    pub elasticsearch: ElasticsearchConfig,
    /// Number of suggestions requested for a `!` prefix
    pub suggest_limit: usize,
    /// Backend round-trip timeout in milliseconds
    pub suggest_timeout_ms: u64,
}

/// Elasticsearch-specific configuration
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster
    pub url: String,
    /// Index holding the trigger completions
    pub index: String,
    /// Document type used when indexing triggers
    pub doc_type: String,
}

impl BangsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bangs_file: env::var("BANGS_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            elasticsearch: ElasticsearchConfig {
                url: env::var("ELASTICSEARCH_URL").unwrap_or(defaults.elasticsearch.url),
                index: env::var("ELASTICSEARCH_BANGS_INDEX")
                    .unwrap_or(defaults.elasticsearch.index),
                doc_type: env::var("ELASTICSEARCH_BANGS_TYPE")
                    .unwrap_or(defaults.elasticsearch.doc_type),
            },
            suggest_limit: env::var("BANG_SUGGEST_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.suggest_limit),
            suggest_timeout_ms: env::var("BANG_SUGGEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.suggest_timeout_ms),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.suggest_limit == 0 {
            return Err("Suggest limit must be greater than 0".to_string());
        }
        if self.suggest_timeout_ms == 0 {
            return Err("Suggest timeout must be greater than 0".to_string());
        }
        if self.elasticsearch.index.trim().is_empty() {
            return Err("Elasticsearch bangs index must not be empty".to_string());
        }
        if let Err(e) = Url::parse(&self.elasticsearch.url) {
            return Err(format!(
                "Invalid Elasticsearch URL {:?}: {}",
                self.elasticsearch.url, e
            ));
        }
        Ok(())
    }

    pub fn suggest_timeout(&self) -> Duration {
        Duration::from_millis(self.suggest_timeout_ms)
    }
}

impl Default for BangsConfig {
    fn default() -> Self {
        Self {
            bangs_file: None,
            elasticsearch: ElasticsearchConfig {
                url: "http://127.0.0.1:9200".to_string(),
                index: "test-bangs".to_string(),
                doc_type: "bang".to_string(),
            },
            suggest_limit: 10,
            suggest_timeout_ms: 2000,
        }
    }
}
