/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::config::KeyserverConfig;
use crate::errors::KeyserverError;
use crate::types::Email;

/// Read-only view of a directory holding one public key file per email address.
#[derive(Clone, Debug)]
pub struct KeyDirectory {
    dir: PathBuf,
    extension: String,
}

/// A key file found in the directory. The email is the lower-cased file stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyFile {
    path: PathBuf,
    email: String,
    filename: String,
}

impl KeyFile {
    fn from_path(path: PathBuf) -> Option<Self> {
        let filename = path.file_name()?.to_str()?.to_string();
        let email = path.file_stem()?.to_str()?.to_lowercase();
        Some(Self { path, email, filename })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn read_content(&self) -> Result<String, std::io::Error> {
        fs::read_to_string(&self.path)
    }
}

impl KeyDirectory {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.to_string(),
        }
    }

    pub fn from_config(config: &KeyserverConfig) -> Self {
        Self::new(config.keys_dir.clone(), config.key_extension.as_str())
    }

    /// All key files in the directory, sorted by file name.
    #[tracing::instrument]
    pub fn list_key_files(&self) -> Vec<KeyFile> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to list key directory {}: {}", self.dir.display(), e);
                return vec![];
            }
        };
        let mut files: Vec<KeyFile> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.has_key_extension(path))
            .filter_map(KeyFile::from_path)
            .collect();
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        debug!("Found {} key files in {}", files.len(), self.dir.display());
        files
    }

    /// The key file named after `email`, if it exists.
    pub fn find(&self, email: &Email) -> Option<KeyFile> {
        let path = self.dir.join(email.file_name(self.extension.as_str()));
        match path.is_file() {
            true => KeyFile::from_path(path),
            false => None,
        }
    }

    /// Raw content of the key file for an email-shaped identifier.
    #[tracing::instrument]
    pub fn read_raw(&self, identifier: &str) -> Result<String, KeyserverError> {
        let email = Email::parse(identifier)?;
        let key_file = self
            .find(&email)
            .ok_or_else(|| KeyserverError::NotFound(email.to_string()))?;
        key_file.read_content().map_err(|e| {
            error!("Error reading key file for {}: {}", email, e);
            KeyserverError::NotFound(email.to_string())
        })
    }

    fn has_key_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str())
    }
}
