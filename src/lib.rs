// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod bangs;
pub mod cli;

// Re-export main types
pub use bangs::{
    Bang, BangError, BangRegistry, BangService, BangSuggester, BangsConfig,
    ElasticsearchSuggester, LanguageTag, RegionCode, Results, SuggestError, Suggestion,
};
