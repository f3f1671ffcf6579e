// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Suggestion backend trait definition

use async_trait::async_trait;

use super::types::{Bang, Results, SuggestError};

/// Trait for !bang autocomplete backends
///
/// A backend keeps a prefix index over every trigger in the registry and
/// answers completion queries with raw trigger hits. Names are filled in
/// afterwards by [`BangService`](super::service::BangService).
#[async_trait]
pub trait BangSuggester: Send + Sync {
    /// Check whether the trigger index exists
    async fn index_exists(&self) -> Result<bool, SuggestError>;

    /// Drop the trigger index
    async fn delete_index(&self) -> Result<(), SuggestError>;

    /// Build the trigger index from scratch
    ///
    /// # Arguments
    /// * `bangs` - Every bang in the registry; all of their triggers are indexed
    async fn setup(&self, bangs: &[Bang]) -> Result<(), SuggestError>;

    /// Fetch raw trigger completions
    ///
    /// # Arguments
    /// * `prefix` - What the user has typed so far
    /// * `limit` - Maximum number of hits to return
    ///
    /// # Returns
    /// Hits in backend order, with `name` left empty
    async fn suggest_results(&self, prefix: &str, limit: usize) -> Result<Results, SuggestError>;

    /// Get the backend name for logging
    fn name(&self) -> &'static str;
}
