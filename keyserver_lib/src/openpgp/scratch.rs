/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::types::HexKeyId;

/// A throwaway keyring directory. It is removed when the value is dropped.
#[derive(Debug)]
pub struct ScratchKeyring {
    dir: TempDir,
}

impl ScratchKeyring {
    pub fn new(parent: Option<&Path>) -> Result<Self, std::io::Error> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("keyring-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };
        debug!("Created scratch keyring at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Location of the cert with the given fingerprint inside this keyring.
    /// Anything but a hex fingerprint is refused.
    pub fn cert_path(&self, fingerprint: &str) -> Option<PathBuf> {
        HexKeyId::parse(fingerprint)
            .ok()
            .map(|fpr| self.path().join(format!("{}.pgp", fpr.as_str())))
    }
}
