// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! !bang detection and redirect URL construction

use tracing::{debug, error};

use super::region::{LanguageTag, RegionCode};
use super::registry::BangRegistry;
use super::types::{LANG_PLACEHOLDER, TERM_PLACEHOLDER};

impl BangRegistry {
    /// Detect a !bang in `query` and build its redirect URL
    ///
    /// Only the first `!`-marked token is considered: if it matches no
    /// trigger, later tokens are not examined. Both `!g` and `g!` styles
    /// are accepted; a lone `!` never is.
    ///
    /// The remainder and language are substituted as-is. Escaping them for
    /// a URL is the caller's job.
    ///
    /// # Returns
    /// The redirect URL, or `None` if the query holds no known bang
    pub fn detect(&self, query: &str, region: &RegionCode, lang: &LanguageTag) -> Option<String> {
        let mut fields: Vec<&str> = query.split_whitespace().collect();

        let (position, key) = fields
            .iter()
            .enumerate()
            .find(|(_, field)| is_marked(field))
            .map(|(i, field)| (i, field.trim_matches('!').to_lowercase()))?;

        let bang = self.find(&key)?;

        fields.remove(position);
        let remainder = bang.apply_transforms(fields.join(" "));

        let Some(template) = bang.template_for(region) else {
            // Registry construction guarantees a default template
            error!("{:?} bang has no template for {} or default", bang.name, region);
            return None;
        };

        debug!("Bang {:?} matched trigger {:?}", bang.name, key);

        Some(
            template
                .replace(TERM_PLACEHOLDER, &remainder)
                .replace(LANG_PLACEHOLDER, lang.as_str()),
        )
    }
}

/// A token is a trigger candidate if it starts or ends with `!`
fn is_marked(field: &str) -> bool {
    field != "!" && (field.starts_with('!') || field.ends_with('!'))
}
