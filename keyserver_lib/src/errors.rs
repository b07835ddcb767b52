/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Errors that are reported to the client of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyserverError {
    InvalidIdentifier(String),
    InvalidOperation(String),
    InvalidParameter(String),
    NotFound(String),
}

impl Display for KeyserverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyserverError::InvalidIdentifier(s) => write!(f, "Invalid identifier: {}", s),
            KeyserverError::InvalidOperation(op) => write!(f, "Invalid operation: {}", op),
            KeyserverError::InvalidParameter(s) => write!(f, "Invalid parameter: {}", s),
            KeyserverError::NotFound(s) => write!(f, "Key not found for {}", s),
        }
    }
}

impl std::error::Error for KeyserverError {}

/// Per-file failures while deriving a `KeyRecord`.
/// These never reach the client, the affected file is left out of the result set.
#[derive(Debug)]
pub enum ExtractionError {
    ReadFailure(PathBuf, std::io::Error),
    ExtractionFailure(PathBuf, anyhow::Error),
}

impl ExtractionError {
    pub fn extraction(path: &std::path::Path, error: anyhow::Error) -> Self {
        ExtractionError::ExtractionFailure(path.to_path_buf(), error)
    }
}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::ReadFailure(p, e) => write!(f, "Error reading key file {}: {}", p.display(), e),
            ExtractionError::ExtractionFailure(p, e) => {
                write!(f, "Error extracting key info for {}: {:#}", p.display(), e)
            }
        }
    }
}

impl std::error::Error for ExtractionError {}
