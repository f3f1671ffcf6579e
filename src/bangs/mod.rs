// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! !bang resolution and autocomplete
//!
//! Turns shortcut tokens such as `!g` or `w!` in a search query into a
//! redirect URL for an external site, and autocompletes bang triggers.
//!
//! Key features:
//! - Read-only registry loaded once from TOML, shared by `Arc`
//! - Region-aware URL templates with a mandatory `default` fallback
//! - Per-bang text transforms (e.g. canonical Wikipedia titles)
//! - Pluggable suggestion backend (Elasticsearch in production)
//! - Cancellable, time-bounded suggestion lookups

pub mod config;
mod detect;
pub mod elasticsearch;
pub mod region;
pub mod registry;
pub mod service;
pub mod suggester;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use config::{BangsConfig, ElasticsearchConfig};
pub use elasticsearch::ElasticsearchSuggester;
pub use region::{LanguageTag, RegionCode};
pub use registry::{BangRegistry, DuplicateTrigger, PreferredBang, ValidationReport};
pub use service::BangService;
pub use suggester::BangSuggester;
pub use transform::Transform;
pub use types::{Bang, BangError, Results, SuggestError, Suggestion, DEFAULT_REGION};
