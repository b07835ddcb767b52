/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::fs::File;

use anyhow::anyhow;
use sequoia_openpgp::cert::prelude::*;
use sequoia_openpgp::parse::Parse;
use sequoia_openpgp::policy::{NullPolicy, Policy, StandardPolicy};
use sequoia_openpgp::serialize::Serialize;
use tracing::debug;

use crate::openpgp::{ImportResult, KeyDescription, OpenPgpBackend, ScratchKeyring};
use crate::utils::armor::parse_certs;
use crate::utils::expiration::system_time_to_timestamp;

/// `OpenPgpBackend` on top of sequoia. Imported certs are stored in the scratch keyring
/// as `<FINGERPRINT>.pgp` without secret key material.
#[derive(Clone, Debug, Default)]
pub struct SequoiaBackend {}

impl SequoiaBackend {
    pub fn new() -> Self {
        SequoiaBackend {}
    }
}

impl OpenPgpBackend for SequoiaBackend {
    #[tracing::instrument(skip(data))]
    fn import_armored(&self, data: &[u8], keyring: &ScratchKeyring) -> Result<ImportResult, anyhow::Error> {
        let mut fingerprints = vec![];
        for cert in parse_certs(data)? {
            // Secret keys never end up in a keyring, not even a temporary one.
            let cert = cert.strip_secret_key_material();
            let fingerprint = cert.fingerprint().to_hex();
            let path = keyring
                .cert_path(fingerprint.as_str())
                .ok_or_else(|| anyhow!("Unsupported fingerprint {}", fingerprint))?;
            let mut file = File::create(path)?;
            cert.export(&mut file)?;
            fingerprints.push(fingerprint);
        }
        debug!("Key import result: {} keys imported", fingerprints.len());
        Ok(ImportResult { fingerprints })
    }

    #[tracing::instrument]
    fn describe(&self, fingerprint: &str, keyring: &ScratchKeyring) -> Result<Option<KeyDescription>, anyhow::Error> {
        let path = match keyring.cert_path(fingerprint) {
            Some(path) if path.is_file() => path,
            _ => return Ok(None),
        };
        let cert = Cert::from_file(&path)?;
        let primary_amalgamation = cert.primary_key();
        let primary = primary_amalgamation.key();

        let algo = u8::from(primary.pk_algo()).to_string();
        let keylen = primary.mpis().bits().map(|bits| bits.to_string());
        let created = system_time_to_timestamp(primary.creation_time())
            .ok_or_else(|| anyhow!("Creation time of {} predates the epoch", fingerprint))?
            .to_string();

        let expires = expiration_time(&cert).map(|t| t.to_string());

        let uids = cert
            .userids()
            .map(|uida| String::from_utf8_lossy(uida.userid().value()).into_owned())
            .collect();

        Ok(Some(KeyDescription {
            keyid: cert.keyid().to_hex(),
            algo,
            keylen,
            created,
            expires,
            uids,
        }))
    }
}

/// Expiration of the primary key under the standard policy. Certs the standard policy
/// rejects, e.g. SHA-1 self-signed ones, are read without any policy so their expiry isn't lost.
fn expiration_time(cert: &Cert) -> Option<u64> {
    let standard_policy = StandardPolicy::new();
    let null_policy = NullPolicy::new();
    let policies: [&dyn Policy; 2] = [&standard_policy, &null_policy];
    for policy in policies {
        match cert.with_policy(policy, None) {
            Ok(valid_cert) => {
                return valid_cert
                    .primary_key()
                    .key_expiration_time()
                    .and_then(system_time_to_timestamp)
            }
            Err(e) => debug!("No valid binding for {} under {:?}: {}", cert.fingerprint(), policy, e),
        }
    }
    None
}
