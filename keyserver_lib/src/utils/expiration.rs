/*
 * Copyright (c) 2021. Erik Escher. PortuLock Keyserver. GPL-3.0-only.
 * SPDX-License-Identifier: GPL-3.0-only
 */

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use num_traits::cast::ToPrimitive;
use tracing::warn;

pub fn current_time() -> DateTime<Utc> {
    Utc::now()
}

pub fn current_timestamp() -> i64 {
    current_time().timestamp()
}

/// Unix timestamp of `time`, `None` for times before the epoch.
pub fn system_time_to_timestamp(time: SystemTime) -> Option<u64> {
    DateTime::<Utc>::from(time).timestamp().to_u64()
}

/// Whether a decimal Unix timestamp lies in the past.
///
/// This is evaluated against the clock on every call. An empty timestamp means the key
/// never expires, unparseable ones are treated the same way.
pub fn is_expired(expires: &str) -> bool {
    if expires.is_empty() {
        return false;
    }
    match expires.parse::<i64>() {
        Ok(timestamp) => timestamp < current_timestamp(),
        Err(_) => {
            warn!("Invalid expiration timestamp: {}", expires);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Not;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    #[test]
    fn future_timestamp_not_expired() {
        let expiration = current_timestamp() + 60;
        assert!(is_expired(&expiration.to_string()).not());
    }

    #[test]
    fn expired() {
        let expiration = current_timestamp() - 20;
        assert!(is_expired(&expiration.to_string()));
    }

    #[test]
    fn empty_or_invalid_never_expires() {
        assert!(is_expired("").not());
        assert!(is_expired("tomorrow").not());
    }

    #[test]
    fn converts_system_time() {
        let time = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        assert_eq!(system_time_to_timestamp(time), Some(1_600_000_000));
        assert_eq!(system_time_to_timestamp(UNIX_EPOCH - Duration::from_secs(1)), None);
    }
}
