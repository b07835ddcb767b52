/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::str::FromStr;

use crate::errors::KeyserverError;

const SEARCH_MAX_CHARS: usize = 256;
const OPTIONS_MAX_CHARS: usize = 100;
const MACHINE_READABLE: &str = "mr";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Get,
    Index,
}

impl FromStr for Operation {
    type Err = KeyserverError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op {
            "get" => Ok(Operation::Get),
            "index" => Ok(Operation::Index),
            _ => Err(KeyserverError::InvalidOperation(op.to_string())),
        }
    }
}

/// Query parameters of `/pks/lookup` as they arrive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LookupQuery {
    pub op: Option<String>,
    pub search: Option<String>,
    pub options: Option<String>,
    pub fingerprint: Option<String>,
    pub exact: Option<String>,
}

/// A validated lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupRequest {
    pub op: Operation,
    pub search: Option<String>,
    pub options: Vec<String>,
    pub fingerprint: bool,
    pub exact: bool,
}

impl LookupRequest {
    pub fn parse(query: &LookupQuery) -> Result<Self, KeyserverError> {
        let op = query
            .op
            .as_deref()
            .ok_or_else(|| KeyserverError::InvalidOperation("missing".to_string()))?
            .parse::<Operation>()?;

        if let Some(search) = &query.search {
            check_length("search", search, SEARCH_MAX_CHARS)?;
        }
        let options = match &query.options {
            Some(options) => {
                check_length("options", options, OPTIONS_MAX_CHARS)?;
                options.split(',').map(|o| o.to_string()).collect()
            }
            None => vec![],
        };

        Ok(Self {
            op,
            search: query.search.clone(),
            options,
            fingerprint: parse_switch("fingerprint", query.fingerprint.as_deref())?,
            exact: parse_switch("exact", query.exact.as_deref())?,
        })
    }

    pub fn machine_readable(&self) -> bool {
        self.options.iter().any(|o| o == MACHINE_READABLE)
    }
}

fn check_length(name: &str, value: &str, max: usize) -> Result<(), KeyserverError> {
    let length = value.chars().count();
    if length == 0 || length > max {
        return Err(KeyserverError::InvalidParameter(format!(
            "{} must be between 1 and {} characters",
            name, max
        )));
    }
    Ok(())
}

fn parse_switch(name: &str, value: Option<&str>) -> Result<bool, KeyserverError> {
    match value {
        None | Some("off") => Ok(false),
        Some("on") => Ok(true),
        Some(other) => Err(KeyserverError::InvalidParameter(format!(
            "{} must be 'on' or 'off' but got '{}'",
            name, other
        ))),
    }
}
