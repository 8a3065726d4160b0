// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic version identifiers for machine configurations.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use sy_engine::MachineConfig;

/// Version identifier for a configuration at a point in time:
/// the first 8 hex characters of the SHA-256 of the canonical JSON form,
/// joined with the UTC timestamp.
///
/// Config maps preserve declaration order, so the same configuration always
/// hashes the same.
pub fn config_version(
    config: &MachineConfig,
    timestamp_ms: u64,
) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_vec(config)?;
    let digest = Sha256::digest(&canonical);
    let mut hash = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        hash.push_str(&format!("{byte:02x}"));
    }
    let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64)
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    Ok(format!("{hash}-{timestamp}"))
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
