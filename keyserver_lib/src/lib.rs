/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

pub mod config;
pub mod errors;
pub mod extraction;
pub mod hkp;
pub mod key_storage;
pub mod lookup;
pub mod openpgp;
pub mod search;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
