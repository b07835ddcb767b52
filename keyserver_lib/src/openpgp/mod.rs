/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::fmt::Debug;

pub use scratch::ScratchKeyring;
pub use sequoia::SequoiaBackend;

pub mod scratch;
pub mod sequoia;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportResult {
    pub fingerprints: Vec<String>,
}

/// Metadata of an imported key, in the shape the HKP index needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDescription {
    pub keyid: String,
    pub algo: String,
    pub keylen: Option<String>,
    pub created: String,
    pub expires: Option<String>,
    pub uids: Vec<String>,
}

/// The OpenPGP engine used to look into key files.
///
/// Both operations work on a caller supplied scratch keyring, an implementation
/// must not keep any state of its own between calls.
pub trait OpenPgpBackend: Debug + Send + Sync {
    fn import_armored(&self, data: &[u8], keyring: &ScratchKeyring) -> Result<ImportResult, anyhow::Error>;
    fn describe(&self, fingerprint: &str, keyring: &ScratchKeyring) -> Result<Option<KeyDescription>, anyhow::Error>;
}
