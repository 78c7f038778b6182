// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration
//!
//! Tunables for a drop exchange instance. Relay servers, identities and
//! contacts are not configuration here; they live in the
//! [`DropRegistry`](crate::registry::DropRegistry).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DropError, DropResult};

/// Default delay between two poll rounds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default capacity of the send command queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Configuration for a drop exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    /// Delay between poll rounds in milliseconds (0 = no delay).
    poll_interval_ms: u64,

    /// Maximum queued send commands before senders block.
    command_capacity: usize,
}

impl Default for DropConfig {
    fn default() -> Self {
        DropConfig {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }
}

impl DropConfig {
    /// Sets the poll interval. Negative values are rejected.
    pub fn set_poll_interval_ms(&mut self, interval_ms: i64) -> DropResult<()> {
        self.poll_interval_ms = validate_poll_interval(interval_ms)?;
        Ok(())
    }

    /// Builder form of [`set_poll_interval_ms`](Self::set_poll_interval_ms).
    pub fn with_poll_interval_ms(mut self, interval_ms: i64) -> DropResult<Self> {
        self.set_poll_interval_ms(interval_ms)?;
        Ok(self)
    }

    /// Sets the send command queue capacity (at least 1).
    pub fn with_command_capacity(mut self, capacity: usize) -> DropResult<Self> {
        if capacity == 0 {
            return Err(DropError::InvalidConfiguration(
                "command capacity must be at least 1".into(),
            ));
        }
        self.command_capacity = capacity;
        Ok(self)
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn command_capacity(&self) -> usize {
        self.command_capacity
    }
}

/// Validates a poll interval given in milliseconds.
pub(crate) fn validate_poll_interval(interval_ms: i64) -> DropResult<u64> {
    u64::try_from(interval_ms).map_err(|_| {
        DropError::InvalidConfiguration(format!(
            "poll interval must be greater or equal 0 (got {interval_ms})"
        ))
    })
}
