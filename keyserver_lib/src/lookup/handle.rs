/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use crate::lookup::LookupService;
use crate::search::key_id_matches;
use crate::types::KeyRecord;

impl LookupService {
    /// First record in file name order whose key id or fingerprint contains `normalized`.
    /// Files after the hit are never imported.
    pub(super) fn first_by_key_id(&self, normalized: &str) -> Option<KeyRecord> {
        self.directory
            .list_key_files()
            .iter()
            .filter_map(|key_file| self.extractor.extract_or_log(key_file))
            .find(|record| key_id_matches(normalized, record))
    }
}
