/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use tracing::{debug, info};

use crate::errors::KeyserverError;
use crate::lookup::LookupService;
use crate::search::extract_email;
use crate::types::{Email, KeyRecord};

impl LookupService {
    /// The key file named after `email`, which must be importable.
    pub(super) fn record_by_email(&self, email: &str) -> Result<KeyRecord, KeyserverError> {
        let email = Email::parse(email)?;
        self.directory
            .find(&email)
            .and_then(|key_file| self.extractor.extract_or_log(&key_file))
            .ok_or_else(|| KeyserverError::NotFound(email.to_string()))
    }

    /// Treats the whole query as a file name. Queries that can't name a file are skipped.
    pub(super) fn record_by_filename(&self, search: &str) -> Option<KeyRecord> {
        let email = Email::parse_option(search)?;
        let record = self
            .directory
            .find(&email)
            .and_then(|key_file| self.extractor.extract_or_log(&key_file));
        if record.is_some() {
            debug!("Direct file name match for {}", email);
        }
        record
    }

    pub(super) fn record_by_embedded_email(&self, search: &str, exact: bool) -> Option<KeyRecord> {
        let email = extract_email(search)?;
        info!("Email search: {} (extracted from {})", email, search);
        if exact && email.to_lowercase() != search.to_lowercase() {
            debug!("Exact search for {} does not equal extracted email {}", search, email);
            return None;
        }
        self.record_by_email(email).ok()
    }
}
