/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{HexKeyId, KeyRecord};

static EMBEDDED_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_.+\-]+@[A-Za-z0-9\-]+\.[A-Za-z0-9\-.]+").unwrap());

/// How a search string is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPattern {
    /// Upper-cased hex without the `0x` prefix. Always matched as a substring.
    KeyId(String),
    FreeText(String),
}

impl SearchPattern {
    pub fn classify(query: &str) -> Self {
        if query.starts_with("0x") || HexKeyId::is_hex_key_id(query) {
            let normalized = query.to_uppercase();
            let normalized = normalized.strip_prefix("0X").unwrap_or(normalized.as_str());
            SearchPattern::KeyId(normalized.to_string())
        } else {
            SearchPattern::FreeText(query.to_string())
        }
    }

    pub fn matches_key_id(&self, record: &KeyRecord) -> bool {
        match self {
            SearchPattern::KeyId(normalized) => key_id_matches(normalized, record),
            SearchPattern::FreeText(_) => false,
        }
    }
}

/// `normalized` must already be upper-case.
pub fn key_id_matches(normalized: &str, record: &KeyRecord) -> bool {
    record.fingerprint.to_uppercase().contains(normalized) || record.keyid.to_uppercase().contains(normalized)
}

/// The first email address found anywhere in `query`.
pub fn extract_email(query: &str) -> Option<&str> {
    EMBEDDED_EMAIL.find(query).map(|m| m.as_str())
}

/// Case-insensitive comparison of the raw query against the email and every user id.
pub fn text_matches(query: &str, record: &KeyRecord, exact: bool) -> bool {
    let query = query.to_lowercase();
    let candidates = std::iter::once(&record.email).chain(record.uids.iter());
    for candidate in candidates {
        let candidate = candidate.to_lowercase();
        let hit = match exact {
            true => candidate == query,
            false => candidate.contains(query.as_str()),
        };
        if hit {
            return true;
        }
    }
    false
}

/// Filter used by the `index` operation: identity text first, then key id for hex-looking queries.
pub fn index_matches(query: &str, pattern: &SearchPattern, record: &KeyRecord, exact: bool) -> bool {
    text_matches(query, record, exact) || pattern.matches_key_id(record)
}
