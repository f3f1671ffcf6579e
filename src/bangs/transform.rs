// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text transforms applied to the query remainder before template expansion

use serde::{Deserialize, Serialize};

/// A pure string-to-string transform
///
/// Named in the bang data file by its camelCase identifier, e.g.
/// `functions = ["wikipediaCanonical"]`. Unknown names fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transform {
    /// Canonical Wikipedia article title: "bob maRLey" -> "Bob_Marley"
    WikipediaCanonical,
}

impl Transform {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Transform::WikipediaCanonical => wikipedia_canonical(text),
        }
    }
}

/// Some regional titles come out wrong, e.g. Spanish titles keep lowercase
/// articles ("De_la_Tierra_a_la_Luna").
fn wikipedia_canonical(text: &str) -> String {
    title_case(&text.to_lowercase()).replace(' ', "_")
}

/// Upper-case the first letter of every word
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_separator = true;

    for c in text.chars() {
        if prev_separator {
            out.push(to_title(c));
        } else {
            out.push(c);
        }
        prev_separator = is_separator(c);
    }

    out
}

/// Single-char titlecase mapping
///
/// Differs from uppercase for the Latin digraphs (`ǆ` -> `ǅ`) and for Greek
/// letters with ypogegrammeni (`ᾳ` -> `ᾼ`). Characters whose uppercase form
/// is more than one char (`ß`, `ﬁ`) are left alone.
fn to_title(c: char) -> char {
    match c {
        'Ǆ' | 'ǅ' | 'ǆ' => 'ǅ',
        'Ǉ' | 'ǈ' | 'ǉ' => 'ǈ',
        'Ǌ' | 'ǋ' | 'ǌ' => 'ǋ',
        'Ǳ' | 'ǲ' | 'ǳ' => 'ǲ',
        '\u{1F80}'..='\u{1FAF}' => char::from_u32(c as u32 | 0x08).unwrap_or(c),
        '\u{1FB3}' => '\u{1FBC}',
        '\u{1FC3}' => '\u{1FCC}',
        '\u{1FF3}' => '\u{1FFC}',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

fn is_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}
