// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Transport Trait
//!
//! Platform-agnostic abstraction for talking to drop relays.

use super::error::NetworkError;
use crate::relay::DropUrl;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Status recorded for a post that got no response at all.
pub const STATUS_UNREACHABLE: u16 = 0;

/// Transport trait for relay communication.
///
/// # Synchronous Interface
///
/// Methods block the calling thread until the relay answered. Platform
/// implementations may internally use async runtimes but expose a
/// blocking interface here. Implementations are shared between the send
/// listener and the poller, hence `&self` and `Sync`.
pub trait DropTransport: Send + Sync {
    /// Posts one envelope to a relay URL, returning the response status.
    ///
    /// A non-success status is a value, not an error; errors mean no
    /// status was obtained.
    fn post(&self, url: &DropUrl, envelope: &[u8]) -> TransportResult<u16>;

    /// Fetches all pending blobs from a relay URL, in relay order.
    fn fetch(&self, url: &DropUrl) -> TransportResult<Vec<Vec<u8>>>;
}
