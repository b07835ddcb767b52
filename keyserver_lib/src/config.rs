/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct KeyserverConfig {
    #[serde(default = "default_keys_dir")]
    pub keys_dir: PathBuf,
    /// Parent directory for the per-extraction scratch keyrings. Defaults to the system temp dir.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    #[serde(default = "default_key_extension")]
    pub key_extension: String,
}

impl KeyserverConfig {
    pub fn new(keys_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys_dir: keys_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for KeyserverConfig {
    fn default() -> Self {
        Self {
            keys_dir: default_keys_dir(),
            scratch_dir: None,
            key_extension: default_key_extension(),
        }
    }
}

fn default_keys_dir() -> PathBuf {
    PathBuf::from("/app/keys/public")
}

fn default_key_extension() -> String {
    "pgp".to_string()
}
