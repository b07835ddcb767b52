/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::KeyserverError;

static EMAIL_CHARACTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.+\-@]+$").unwrap());
static HEX_KEY_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Fa-f0-9]{8,40}$").unwrap());

/// Identity of a key file, i.e. the lower-cased file stem.
///
/// Only letters, digits and `_.+-@` are accepted, which keeps user input from
/// ever forming a path outside the key directory.
#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct Email {
    email: String,
}

impl Email {
    pub fn parse(email: &str) -> Result<Self, KeyserverError> {
        if !EMAIL_CHARACTERS.is_match(email) {
            return Err(KeyserverError::InvalidIdentifier(format!("Invalid email format: {}", email)));
        }
        Ok(Self {
            email: email.to_lowercase(),
        })
    }

    pub fn parse_option(email: &str) -> Option<Email> {
        Self::parse(email).ok()
    }

    pub fn get_email(&self) -> &str {
        &self.email
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.email, extension)
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.get_email())
    }
}

/// A key id or fingerprint given as 8 to 40 hex digits.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct HexKeyId {
    normalized: String,
}

impl HexKeyId {
    pub fn parse(keyid: &str) -> Result<Self, KeyserverError> {
        if !HEX_KEY_ID.is_match(keyid) {
            return Err(KeyserverError::InvalidIdentifier(format!(
                "Expected 8 to 40 hex digits but got: {}",
                keyid
            )));
        }
        Ok(Self {
            normalized: keyid.to_ascii_uppercase(),
        })
    }

    pub fn is_hex_key_id(candidate: &str) -> bool {
        HEX_KEY_ID.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }
}

/// Metadata of one key file, derived on every request and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyRecord {
    pub email: String,
    pub filename: String,
    pub keyid: String,
    pub fingerprint: String,
    pub algo: String,
    pub keylen: String,
    pub created: String,
    pub expires: String,
    pub flags: String,
    pub uids: Vec<String>,
    pub content: String,
}

impl KeyRecord {
    pub fn summary(&self) -> KeySummary {
        KeySummary {
            email: self.email.clone(),
            url: format!("/keys/{}", self.email),
            keyid: self.keyid.clone(),
            fingerprint: self.fingerprint.clone(),
            created: self.created.clone(),
            expires: self.expires.clone(),
            algo: self.algo.clone(),
            keylen: self.keylen.clone(),
            flags: self.flags.clone(),
            uids: self.uids.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KeySummary {
    pub email: String,
    pub url: String,
    pub keyid: String,
    pub fingerprint: String,
    pub created: String,
    pub expires: String,
    pub algo: String,
    pub keylen: String,
    pub flags: String,
    pub uids: Vec<String>,
}
