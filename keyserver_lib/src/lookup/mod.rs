/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::sync::Arc;

use tracing::{info, warn};

pub use params::{LookupQuery, LookupRequest, Operation};

use crate::config::KeyserverConfig;
use crate::errors::KeyserverError;
use crate::extraction::KeyInfoExtractor;
use crate::hkp::{format_index, KeyDownload};
use crate::key_storage::KeyDirectory;
use crate::openpgp::{OpenPgpBackend, SequoiaBackend};
use crate::search::{index_matches, SearchPattern};
use crate::types::{HexKeyId, KeyRecord, KeySummary};

mod email;
mod handle;
pub mod params;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupResponse {
    Key(KeyDownload),
    Index(String),
}

/// Answers HKP lookups from the key directory. Every call reads the directory afresh.
#[derive(Clone, Debug)]
pub struct LookupService {
    directory: KeyDirectory,
    extractor: KeyInfoExtractor,
}

impl LookupService {
    pub fn new(config: &KeyserverConfig, backend: Arc<dyn OpenPgpBackend>) -> Self {
        Self {
            directory: KeyDirectory::from_config(config),
            extractor: KeyInfoExtractor::new(backend, config.scratch_dir.clone()),
        }
    }

    pub fn from_config(config: &KeyserverConfig) -> Self {
        Self::new(config, Arc::new(SequoiaBackend::new()))
    }

    #[tracing::instrument(skip(self))]
    pub fn lookup(&self, request: &LookupRequest) -> Result<LookupResponse, KeyserverError> {
        info!(
            "Lookup request: op={:?}, search={:?}, options={:?}, fingerprint={}, exact={}",
            request.op, request.search, request.options, request.fingerprint, request.exact
        );
        match (request.op, request.search.as_deref()) {
            (Operation::Get, Some(search)) => self
                .get(search, request.exact, request.machine_readable())
                .map(LookupResponse::Key),
            // Without a search term there is nothing to get.
            (Operation::Get, None) => Err(KeyserverError::InvalidOperation("get without search".to_string())),
            (Operation::Index, search) => Ok(LookupResponse::Index(self.index(
                search,
                request.exact,
                request.fingerprint,
            ))),
        }
    }

    /// The `get` operation. Strategies are tried in order and the first hit wins:
    /// the query as a file name, then key id or embedded email depending on the query.
    #[tracing::instrument(skip(self))]
    pub fn get(&self, search: &str, exact: bool, machine_readable: bool) -> Result<KeyDownload, KeyserverError> {
        info!("Key retrieval request: op=get, search={}", search);
        let record = match self.record_by_filename(search) {
            Some(record) => Some(record),
            None => match SearchPattern::classify(search) {
                SearchPattern::KeyId(normalized) => {
                    info!("Key ID/fingerprint search: {}", search);
                    self.first_by_key_id(normalized.as_str())
                }
                SearchPattern::FreeText(_) => self.record_by_embedded_email(search, exact),
            },
        };

        match record {
            Some(record) => {
                info!("Key found for search: {}", search);
                Ok(KeyDownload::new(&record.content, machine_readable))
            }
            None => {
                warn!("Key not found for search: {}", search);
                Err(KeyserverError::NotFound(search.to_string()))
            }
        }
    }

    /// The `index` operation. No match is an empty listing, not an error.
    #[tracing::instrument(skip(self))]
    pub fn index(&self, search: Option<&str>, exact: bool, show_fingerprint: bool) -> String {
        let records = self.list_all();
        let records: Vec<KeyRecord> = match search {
            Some(query) => {
                let pattern = SearchPattern::classify(query);
                records
                    .into_iter()
                    .filter(|record| index_matches(query, &pattern, record, exact))
                    .collect()
            }
            None => records,
        };
        info!("Index lists {} keys", records.len());
        format_index(&records, show_fingerprint)
    }

    /// Key lookup addressed by key id or fingerprint in the path.
    #[tracing::instrument(skip(self))]
    pub fn get_by_key_id(&self, keyid: &str) -> Result<KeyDownload, KeyserverError> {
        info!("Direct key lookup by ID: {}", keyid);
        let keyid = HexKeyId::parse(keyid)?;
        let record = self
            .first_by_key_id(keyid.as_str())
            .ok_or_else(|| KeyserverError::NotFound(keyid.as_str().to_string()))?;
        Ok(KeyDownload::new(&record.content, false).with_filename(format!("{}.asc", keyid.as_str())))
    }

    /// Key lookup by the file name only.
    #[tracing::instrument(skip(self))]
    pub fn get_by_email(&self, email: &str) -> Result<KeyDownload, KeyserverError> {
        let record = self.record_by_email(email)?;
        Ok(KeyDownload::new(&record.content, false))
    }

    pub fn list_all(&self) -> Vec<KeyRecord> {
        self.extractor.list_all(&self.directory)
    }

    pub fn list_summaries(&self) -> Vec<KeySummary> {
        self.list_all().iter().map(KeyRecord::summary).collect()
    }
}
