// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for bang resolution and autocomplete

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::region::RegionCode;
use super::transform::Transform;

/// Region key every bang must define a template for
pub const DEFAULT_REGION: &str = "default";

/// Placeholder replaced by the remainder of the query
pub const TERM_PLACEHOLDER: &str = "{{{term}}}";

/// Placeholder replaced by the caller's language tag
pub const LANG_PLACEHOLDER: &str = "{{{lang}}}";

/// A single !bang definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bang {
    /// Display name (e.g., "Google")
    pub name: String,
    /// Icon shown next to the bang in UI layers
    #[serde(default)]
    pub favicon: String,
    /// Lowercase strings that invoke this bang
    pub triggers: Vec<String>,
    /// URL templates keyed by lowercase region code or `default`
    pub regions: HashMap<String, String>,
    /// Text transforms applied to the remainder, in order
    #[serde(default, rename = "functions")]
    pub transforms: Vec<Transform>,
}

impl Bang {
    /// Returns true if `key` is one of this bang's triggers
    pub fn has_trigger(&self, key: &str) -> bool {
        self.triggers.iter().any(|t| t == key)
    }

    /// Resolve the URL template for a region, falling back to `default`
    pub fn template_for(&self, region: &RegionCode) -> Option<&str> {
        self.regions
            .get(region.as_str())
            .or_else(|| self.regions.get(DEFAULT_REGION))
            .map(String::as_str)
    }

    /// Run the remainder through every transform, left to right
    pub fn apply_transforms(&self, remainder: String) -> String {
        self.transforms
            .iter()
            .fold(remainder, |text, transform| transform.apply(&text))
    }
}

/// An individual !bang autocomplete suggestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub trigger: String,
    #[serde(default)]
    pub name: String,
}

impl Suggestion {
    /// A raw backend hit with no name attached yet
    pub fn raw(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            name: String::new(),
        }
    }
}

/// Results of an autocomplete query
///
/// Always serialized as an object; top-level JSON arrays are avoided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

impl Results {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }
}

/// Errors raised while building the bang registry
#[derive(Debug, Error)]
pub enum BangError {
    /// A bang is missing its `default` region template
    #[error("{name:?} bang needs a default region")]
    MissingDefaultRegion {
        /// Name of the offending bang
        name: String,
    },

    /// A trigger is empty once whitespace is trimmed
    #[error("{name:?} bang has an empty trigger")]
    EmptyTrigger { name: String },

    /// Two region keys of one bang collide after lowercasing
    #[error("{name:?} bang defines region {region:?} more than once")]
    DuplicateRegion { name: String, region: String },

    /// The bang data file could not be read
    #[error("failed to read bangs file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bang data file is not valid TOML or has the wrong shape
    #[error("invalid bangs data: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that can occur while talking to a suggestion backend
#[derive(Debug, Error)]
pub enum SuggestError {
    /// API error returned by the backend
    #[error("Suggest API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Backend request timed out
    #[error("Suggest timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The caller cancelled the request
    #[error("Suggest request cancelled")]
    Cancelled,

    /// The request never reached the backend
    #[error("Suggest transport error: {0}")]
    Transport(String),

    /// The backend answered with a body we could not decode
    #[error("Suggest response decode error: {0}")]
    Decode(String),

    /// The backend was configured with an unusable address
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}
