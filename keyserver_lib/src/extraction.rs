/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, error, info};

use crate::errors::ExtractionError;
use crate::key_storage::{KeyDirectory, KeyFile};
use crate::openpgp::{KeyDescription, OpenPgpBackend, ScratchKeyring};
use crate::types::KeyRecord;
use crate::utils::expiration::is_expired;

/// EdDSA and ECDH, which don't always report a key size.
const CURVE25519_ALGORITHMS: [&str; 2] = ["22", "18"];
const CURVE25519_KEY_LENGTH: &str = "256";

/// Turns key files into `KeyRecord`s by importing them into a fresh scratch keyring.
#[derive(Clone, Debug)]
pub struct KeyInfoExtractor {
    backend: Arc<dyn OpenPgpBackend>,
    scratch_dir: Option<PathBuf>,
}

impl KeyInfoExtractor {
    pub fn new(backend: Arc<dyn OpenPgpBackend>, scratch_dir: Option<PathBuf>) -> Self {
        Self { backend, scratch_dir }
    }

    #[tracing::instrument(skip(self), fields(file = %key_file.filename()))]
    pub fn extract(&self, key_file: &KeyFile) -> Result<KeyRecord, ExtractionError> {
        info!("Extracting key info from {}", key_file.path().display());
        let content = key_file
            .read_content()
            .map_err(|e| ExtractionError::ReadFailure(key_file.path().to_path_buf(), e))?;

        // Dropping the keyring removes it, whichever way this function returns.
        let keyring = ScratchKeyring::new(self.scratch_dir.as_deref())
            .map_err(|e| ExtractionError::extraction(key_file.path(), anyhow!(e)))?;

        let import_result = self
            .backend
            .import_armored(content.as_bytes(), &keyring)
            .map_err(|e| ExtractionError::extraction(key_file.path(), e))?;
        let fingerprint = import_result
            .fingerprints
            .into_iter()
            .next()
            .ok_or_else(|| ExtractionError::extraction(key_file.path(), anyhow!("Failed to import key")))?;
        debug!("Extracted fingerprint: {}", fingerprint);

        let description = self
            .backend
            .describe(fingerprint.as_str(), &keyring)
            .map_err(|e| ExtractionError::extraction(key_file.path(), e))?
            .ok_or_else(|| {
                ExtractionError::extraction(
                    key_file.path(),
                    anyhow!("Failed to retrieve key details for {}", fingerprint),
                )
            })?;

        let record = build_record(key_file, fingerprint, description, content);
        info!(
            "Successfully extracted key info for {} (ID: {})",
            record.filename, record.keyid
        );
        Ok(record)
    }

    /// Like `extract`, but failures are logged and turned into `None`.
    pub fn extract_or_log(&self, key_file: &KeyFile) -> Option<KeyRecord> {
        match self.extract(key_file) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Records for every key file that can be extracted, in directory order.
    #[tracing::instrument(skip(self))]
    pub fn list_all(&self, directory: &KeyDirectory) -> Vec<KeyRecord> {
        directory
            .list_key_files()
            .iter()
            .filter_map(|key_file| self.extract_or_log(key_file))
            .collect()
    }
}

fn build_record(key_file: &KeyFile, fingerprint: String, description: KeyDescription, content: String) -> KeyRecord {
    let keylen = match description.keylen {
        Some(keylen) if !keylen.is_empty() => keylen,
        _ if CURVE25519_ALGORITHMS.contains(&description.algo.as_str()) => CURVE25519_KEY_LENGTH.to_string(),
        _ => String::new(),
    };
    let expires = description.expires.unwrap_or_default();
    let flags = match is_expired(expires.as_str()) {
        true => "e".to_string(),
        false => String::new(),
    };
    KeyRecord {
        email: key_file.email().to_string(),
        filename: key_file.filename().to_string(),
        keyid: description.keyid,
        fingerprint,
        algo: description.algo,
        keylen,
        created: description.created,
        expires,
        flags,
        uids: description.uids,
        content,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    use tempfile::tempdir;

    use super::*;
    use crate::openpgp::{ImportResult, SequoiaBackend};
    use crate::testing::{armored, generate_cert, generate_expired_cert, generate_sha1_bound_cert, write_key_file};
    use crate::utils::expiration::system_time_to_timestamp;

    fn sequoia_extractor() -> KeyInfoExtractor {
        KeyInfoExtractor::new(Arc::new(SequoiaBackend::new()), None)
    }

    /// Reports a fixed description and remembers which keyrings it was handed.
    #[derive(Debug, Default)]
    struct StubBackend {
        description: Option<KeyDescription>,
        fail_import: bool,
        keyrings: Mutex<Vec<PathBuf>>,
    }

    impl OpenPgpBackend for StubBackend {
        fn import_armored(&self, _data: &[u8], keyring: &ScratchKeyring) -> Result<ImportResult, anyhow::Error> {
            self.keyrings.lock().unwrap().push(keyring.path().to_path_buf());
            if self.fail_import {
                return Err(anyhow!("import failed"));
            }
            Ok(ImportResult {
                fingerprints: vec!["ABCDEF0123456789ABCDEF0123456789ABCDEF01".into()],
            })
        }

        fn describe(&self, _fingerprint: &str, _keyring: &ScratchKeyring) -> Result<Option<KeyDescription>, anyhow::Error> {
            Ok(self.description.clone())
        }
    }

    fn description(algo: &str, keylen: Option<&str>, expires: Option<&str>) -> KeyDescription {
        KeyDescription {
            keyid: "0123456789ABCDEF".into(),
            algo: algo.into(),
            keylen: keylen.map(String::from),
            created: "1600000000".into(),
            expires: expires.map(String::from),
            uids: vec!["Stub <stub@example.com>".into()],
        }
    }

    fn stub_record(backend: StubBackend) -> (Result<KeyRecord, ExtractionError>, Arc<StubBackend>) {
        let dir = tempdir().unwrap();
        write_key_file(dir.path(), "Stub@Example.com.pgp", "stub content");
        let directory = KeyDirectory::new(dir.path(), "pgp");
        let backend = Arc::new(backend);
        let extractor = KeyInfoExtractor::new(backend.clone(), None);
        let result = extractor.extract(&directory.list_key_files()[0]);
        (result, backend)
    }

    #[test]
    fn extracts_record_from_key_file() {
        let dir = tempdir().unwrap();
        let cert = generate_cert(&["Bob <bob@example.com>"], None, None);
        write_key_file(dir.path(), "bob@example.com.pgp", &armored(&cert));
        let directory = KeyDirectory::new(dir.path(), "pgp");

        let record = sequoia_extractor().extract(&directory.list_key_files()[0]).unwrap();
        assert_eq!(record.email, "bob@example.com");
        assert_eq!(record.filename, "bob@example.com.pgp");
        assert_eq!(record.fingerprint, cert.fingerprint().to_hex());
        assert_eq!(record.keyid, cert.keyid().to_hex());
        assert_eq!(record.uids, vec!["Bob <bob@example.com>".to_string()]);
        assert_eq!(record.expires, "");
        assert_eq!(record.flags, "");
        assert_eq!(record.content, armored(&cert));
    }

    #[test]
    fn email_comes_from_filename_not_userid() {
        let dir = tempdir().unwrap();
        let cert = generate_cert(&["Mallory <mallory@example.com>"], None, None);
        write_key_file(dir.path(), "alice@example.com.pgp", &armored(&cert));
        let directory = KeyDirectory::new(dir.path(), "pgp");

        let records = sequoia_extractor().list_all(&directory);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "alice@example.com");
    }

    #[test]
    fn expired_key_is_flagged() {
        let dir = tempdir().unwrap();
        let cert = generate_expired_cert(&["Old <old@example.com>"]);
        write_key_file(dir.path(), "old@example.com.pgp", &armored(&cert));
        let directory = KeyDirectory::new(dir.path(), "pgp");

        let record = sequoia_extractor().extract(&directory.list_key_files()[0]).unwrap();
        assert!(!record.expires.is_empty());
        assert_eq!(record.flags, "e");
        assert!(is_expired(&record.expires));
    }

    #[test]
    fn sha1_bound_expired_key_is_flagged() {
        let dir = tempdir().unwrap();
        let day = Duration::from_secs(60 * 60 * 24);
        let created = SystemTime::now() - day * 3;
        let cert = generate_sha1_bound_cert("Old <old@example.com>", created, day);
        write_key_file(dir.path(), "old@example.com.pgp", &armored(&cert));
        let directory = KeyDirectory::new(dir.path(), "pgp");

        let records = sequoia_extractor().list_all(&directory);
        assert_eq!(records.len(), 1);
        let expected = system_time_to_timestamp(created).unwrap() + day.as_secs();
        assert_eq!(records[0].expires, expected.to_string());
        assert_eq!(records[0].flags, "e");
    }

    #[test]
    fn list_all_skips_broken_files() {
        let dir = tempdir().unwrap();
        let cert = generate_cert(&["Bob <bob@example.com>"], None, None);
        write_key_file(dir.path(), "bob@example.com.pgp", &armored(&cert));
        write_key_file(dir.path(), "broken@example.com.pgp", "not a key at all");
        fs::write(dir.path().join("binary@example.com.pgp"), [0xffu8, 0x00, 0xfe]).unwrap();
        let directory = KeyDirectory::new(dir.path(), "pgp");

        let records = sequoia_extractor().list_all(&directory);
        let emails: Vec<&str> = records.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(emails, vec!["bob@example.com"]);
    }

    #[test]
    fn unreadable_file_is_read_failure() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("binary@example.com.pgp"), [0xffu8, 0x00, 0xfe]).unwrap();
        let directory = KeyDirectory::new(dir.path(), "pgp");
        let result = sequoia_extractor().extract(&directory.list_key_files()[0]);
        assert!(matches!(result, Err(ExtractionError::ReadFailure(_, _))));
    }

    #[test]
    fn keylen_defaults_for_curve25519() {
        let (record, _) = stub_record(StubBackend {
            description: Some(description("22", None, None)),
            ..StubBackend::default()
        });
        assert_eq!(record.unwrap().keylen, "256");

        let (record, _) = stub_record(StubBackend {
            description: Some(description("18", Some(""), None)),
            ..StubBackend::default()
        });
        assert_eq!(record.unwrap().keylen, "256");
    }

    #[test]
    fn keylen_stays_empty_for_other_algorithms() {
        let (record, _) = stub_record(StubBackend {
            description: Some(description("1", None, None)),
            ..StubBackend::default()
        });
        assert_eq!(record.unwrap().keylen, "");
    }

    #[test]
    fn reported_keylen_wins() {
        let (record, _) = stub_record(StubBackend {
            description: Some(description("1", Some("4096"), None)),
            ..StubBackend::default()
        });
        assert_eq!(record.unwrap().keylen, "4096");
    }

    #[test]
    fn invalid_expiry_is_not_flagged() {
        let (record, _) = stub_record(StubBackend {
            description: Some(description("22", None, Some("soon"))),
            ..StubBackend::default()
        });
        let record = record.unwrap();
        assert_eq!(record.expires, "soon");
        assert_eq!(record.flags, "");
    }

    #[test]
    fn missing_description_is_extraction_failure() {
        let (result, _) = stub_record(StubBackend::default());
        assert!(matches!(result, Err(ExtractionError::ExtractionFailure(_, _))));
    }

    #[test]
    fn scratch_keyring_removed_after_success_and_failure() {
        let (result, backend) = stub_record(StubBackend {
            description: Some(description("22", None, None)),
            ..StubBackend::default()
        });
        assert!(result.is_ok());
        let (result, failing) = stub_record(StubBackend {
            fail_import: true,
            ..StubBackend::default()
        });
        assert!(result.is_err());

        let keyrings: Vec<PathBuf> = backend
            .keyrings
            .lock()
            .unwrap()
            .iter()
            .chain(failing.keyrings.lock().unwrap().iter())
            .cloned()
            .collect();
        assert_eq!(keyrings.len(), 2);
        assert!(keyrings.iter().all(|path| !path.exists()));
    }

    #[test]
    fn scratch_keyring_lives_under_configured_dir() {
        let scratch_root = tempdir().unwrap();
        let dir = tempdir().unwrap();
        write_key_file(dir.path(), "stub@example.com.pgp", "stub content");
        let directory = KeyDirectory::new(dir.path(), "pgp");
        let backend = Arc::new(StubBackend {
            description: Some(description("22", None, None)),
            ..StubBackend::default()
        });
        let extractor = KeyInfoExtractor::new(backend.clone(), Some(scratch_root.path().to_path_buf()));
        extractor.extract(&directory.list_key_files()[0]).unwrap();

        let keyrings = backend.keyrings.lock().unwrap();
        assert!(keyrings[0].starts_with(scratch_root.path()));
    }
}
