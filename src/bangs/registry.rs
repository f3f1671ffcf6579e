// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Read-only registry of !bangs
//!
//! Built once at startup from a TOML data file (or the built-in set) and
//! shared by `Arc` afterwards. Lookups are linear scans in registry order,
//! so earlier bangs shadow later ones when triggers collide.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::config::BangsConfig;
use super::types::{Bang, BangError, Suggestion, DEFAULT_REGION};

const BUILTIN_BANGS: &str = include_str!("../../data/bangs.toml");

/// Bangs offered when the user has no valid preference, as (trigger, name)
const DEFAULT_PREFERRED: [(&str, &str); 4] = [
    ("g", "Google"),
    ("b", "Bing"),
    ("a", "Amazon"),
    ("yt", "YouTube"),
];

#[derive(Debug, Deserialize)]
struct BangsFile {
    #[serde(default, rename = "bang")]
    bangs: Vec<Bang>,
}

/// Ordered, immutable collection of bangs
#[derive(Debug, Clone)]
pub struct BangRegistry {
    bangs: Vec<Bang>,
}

/// A bang the user asked to see, with the trigger they used for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredBang<'a> {
    pub trigger: String,
    pub bang: &'a Bang,
}

/// A trigger claimed by more than one bang
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTrigger {
    pub trigger: String,
    /// Bang that wins lookups (registered first)
    pub winner: String,
    /// Bang that can never be reached through this trigger
    pub shadowed: String,
}

/// Non-fatal findings about the registry contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub duplicate_triggers: Vec<DuplicateTrigger>,
    /// Names of bangs without a favicon
    pub missing_favicons: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_triggers.is_empty() && self.missing_favicons.is_empty()
    }
}

impl BangRegistry {
    /// Build a registry, failing if any bang lacks a `default` template
    ///
    /// Triggers and region keys are trimmed and lowercased. A trigger that
    /// ends up empty, or two region keys that end up equal, are errors.
    pub fn new(bangs: Vec<Bang>) -> Result<Self, BangError> {
        let mut normalised = Vec::with_capacity(bangs.len());

        for mut bang in bangs {
            let mut triggers = Vec::with_capacity(bang.triggers.len());
            for trigger in std::mem::take(&mut bang.triggers) {
                let trigger = trigger.trim().to_lowercase();
                if trigger.is_empty() {
                    return Err(BangError::EmptyTrigger { name: bang.name });
                }
                triggers.push(trigger);
            }
            bang.triggers = triggers;

            let mut regions = HashMap::with_capacity(bang.regions.len());
            for (region, template) in std::mem::take(&mut bang.regions) {
                let region = region.trim().to_lowercase();
                if regions.contains_key(&region) {
                    return Err(BangError::DuplicateRegion {
                        name: bang.name,
                        region,
                    });
                }
                regions.insert(region, template);
            }
            bang.regions = regions;

            if !bang.regions.contains_key(DEFAULT_REGION) {
                return Err(BangError::MissingDefaultRegion { name: bang.name });
            }

            normalised.push(bang);
        }

        let registry = Self { bangs: normalised };

        for dup in registry.validate().duplicate_triggers {
            warn!(
                "Trigger {:?} of {} is shadowed by {}",
                dup.trigger, dup.shadowed, dup.winner
            );
        }
        debug!("Bang registry built with {} bangs", registry.len());

        Ok(registry)
    }

    /// Parse a TOML document of `[[bang]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self, BangError> {
        let file: BangsFile = toml::from_str(content)?;
        Self::new(file.bangs)
    }

    /// Load a TOML data file from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BangError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BangError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The bang set compiled into the crate
    pub fn builtin() -> Result<Self, BangError> {
        Self::from_toml_str(BUILTIN_BANGS)
    }

    /// Load the configured data file, or the built-in set when none is set
    pub fn from_config(config: &BangsConfig) -> Result<Self, BangError> {
        match &config.bangs_file {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Iterate over bangs in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Bang> {
        self.bangs.iter()
    }

    pub fn bangs(&self) -> &[Bang] {
        &self.bangs
    }

    pub fn len(&self) -> usize {
        self.bangs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bangs.is_empty()
    }

    /// First bang, in registry order, owning `trigger`
    pub fn find(&self, trigger: &str) -> Option<&Bang> {
        self.bangs.iter().find(|b| b.has_trigger(trigger))
    }

    /// Attach bang names to raw backend hits, keeping their order
    ///
    /// Hits with no owning bang keep an empty name.
    pub fn enrich(&self, suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
        suggestions
            .into_iter()
            .map(|mut s| {
                if let Some(bang) = self.find(&s.trigger) {
                    s.name = bang.name.clone();
                }
                s
            })
            .collect()
    }

    /// Resolve a comma-separated list of preferred triggers
    ///
    /// Unknown triggers are skipped. If nothing valid remains the default
    /// shortlist is returned instead.
    pub fn preferred(&self, triggers: &str) -> Vec<PreferredBang<'_>> {
        let chosen: Vec<PreferredBang<'_>> = triggers
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .filter_map(|t| self.find(&t).map(|bang| PreferredBang { trigger: t, bang }))
            .collect();

        if !chosen.is_empty() {
            return chosen;
        }

        DEFAULT_PREFERRED
            .iter()
            .filter_map(|(trigger, name)| {
                self.bangs
                    .iter()
                    .find(|b| b.name == *name)
                    .map(|bang| PreferredBang {
                        trigger: trigger.to_string(),
                        bang,
                    })
            })
            .collect()
    }

    /// Report duplicate triggers and missing favicons
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for bang in &self.bangs {
            if bang.favicon.trim().is_empty() {
                report.missing_favicons.push(bang.name.clone());
            }

            for trigger in &bang.triggers {
                match owners.get(trigger.as_str()) {
                    Some(winner) => report.duplicate_triggers.push(DuplicateTrigger {
                        trigger: trigger.clone(),
                        winner: winner.to_string(),
                        shadowed: bang.name.clone(),
                    }),
                    None => {
                        owners.insert(trigger, &bang.name);
                    }
                }
            }
        }

        report
    }
}
