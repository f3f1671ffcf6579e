// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Bang service orchestration
//!
//! Ties the read-only registry to a suggestion backend: redirect detection,
//! enriched autocomplete and index rebuilds.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::BangsConfig;
use super::elasticsearch::ElasticsearchSuggester;
use super::region::{LanguageTag, RegionCode};
use super::registry::BangRegistry;
use super::suggester::BangSuggester;
use super::types::{Results, SuggestError, Suggestion};

/// Triggers offered when the user has typed a lone `!`
const DEFAULT_SUGGESTIONS: [&str; 5] = ["g", "a", "b", "r", "w"];

/// Main bang service shared across request handlers
#[derive(Clone)]
pub struct BangService {
    registry: Arc<BangRegistry>,
    suggester: Arc<dyn BangSuggester>,
    suggest_limit: usize,
    suggest_timeout: Duration,
}

impl BangService {
    /// Create a service from an existing registry and backend
    pub fn new(
        registry: Arc<BangRegistry>,
        suggester: Arc<dyn BangSuggester>,
        config: &BangsConfig,
    ) -> Self {
        Self {
            registry,
            suggester,
            suggest_limit: config.suggest_limit,
            suggest_timeout: config.suggest_timeout(),
        }
    }

    /// Build the registry and the Elasticsearch backend from configuration
    ///
    /// A registry that fails its invariants is returned as an error; the
    /// caller must not serve requests with it.
    pub fn from_config(config: &BangsConfig) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let registry = BangRegistry::from_config(config)?;
        info!("Loaded {} bangs", registry.len());

        let suggester =
            ElasticsearchSuggester::new(&config.elasticsearch, config.suggest_timeout())?;

        Ok(Self::new(Arc::new(registry), Arc::new(suggester), config))
    }

    pub fn registry(&self) -> &BangRegistry {
        &self.registry
    }

    /// Detect a !bang and build its redirect URL
    pub fn detect(&self, query: &str, region: &RegionCode, lang: &LanguageTag) -> Option<String> {
        self.registry.detect(query, region, lang)
    }

    /// Autocomplete !bang triggers for `prefix`
    ///
    /// Raw backend hits are named from the registry, in backend order.
    /// Backend errors are returned unchanged; a cancelled or timed-out call
    /// returns an error and never a partial result.
    pub async fn suggest(
        &self,
        prefix: &str,
        limit: usize,
        cancel: &CancellationToken,
    ) -> Result<Results, SuggestError> {
        let fetch = tokio::time::timeout(
            self.suggest_timeout,
            self.suggester.suggest_results(prefix, limit),
        );

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Bang suggest cancelled for {:?}", prefix);
                return Err(SuggestError::Cancelled);
            }
            result = fetch => match result {
                Ok(results) => results?,
                Err(_) => {
                    warn!(
                        "Suggestion backend {} timed out after {:?}",
                        self.suggester.name(),
                        self.suggest_timeout
                    );
                    return Err(SuggestError::Timeout {
                        timeout_ms: self.suggest_timeout.as_millis() as u64,
                    });
                }
            },
        };

        Ok(Results {
            suggestions: self.registry.enrich(raw.suggestions),
        })
    }

    /// Bang completions for a raw search-box query
    ///
    /// The query is trimmed first, so `" !g"` routes like `"!g"`.
    ///
    /// * a lone `!` gets a fixed shortlist without touching the backend
    /// * `!prefix` is sent to the backend with the configured limit
    ///
    /// # Returns
    /// `None` when the query is not a bang completion (or no trigger
    /// matched), so the caller can fall back to ordinary query completion
    pub async fn autocomplete(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Results>, SuggestError> {
        let q = query.trim();

        if q == "!" {
            return Ok(Some(self.default_suggestions()));
        }

        if q.len() > 1 && q.starts_with('!') {
            let results = self.suggest(q, self.suggest_limit, cancel).await?;
            if !results.is_empty() {
                return Ok(Some(results));
            }
        }

        Ok(None)
    }

    fn default_suggestions(&self) -> Results {
        let suggestions = DEFAULT_SUGGESTIONS
            .iter()
            .filter_map(|trigger| {
                self.registry.find(trigger).map(|bang| Suggestion {
                    trigger: trigger.to_string(),
                    name: bang.name.clone(),
                })
            })
            .collect();

        Results { suggestions }
    }

    /// Recreate the backend index so registry changes take effect
    pub async fn rebuild_index(&self) -> Result<(), SuggestError> {
        if self.suggester.index_exists().await? {
            debug!("Dropping existing bang index on {}", self.suggester.name());
            self.suggester.delete_index().await?;
        }

        self.suggester.setup(self.registry.bangs()).await?;
        info!(
            "Rebuilt {} bang index with {} bangs",
            self.suggester.name(),
            self.registry.len()
        );
        Ok(())
    }
}
