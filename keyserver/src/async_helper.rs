/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use anyhow::anyhow;

/// Runs directory scans and OpenPGP work off the async workers.
pub async fn blocking<F, T>(job: F) -> Result<T, anyhow::Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| anyhow!("Blocking task failed: {}", e))
}
