// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error Types
//!
//! Unified error type for drop exchange operations. Per-blob decode
//! failures during retrieval are absorbed and never surface here; only
//! send-time failures, command-boundary violations and internal invariant
//! violations do.

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::network::NetworkError;

/// Unified error type for drop exchange operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    /// The assembled envelope does not fit the format's payload size.
    #[error("payload too large: {size} bytes exceeds maximum of {max}")]
    PayloadTooLarge { size: usize, max: usize },

    /// A format was handed a blob tagged with another version.
    #[error("binary format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u8, found: u8 },

    /// The send command must have exactly one listener.
    #[error("send command must have exactly one listener (listener count = {listeners})")]
    ListenerCardinality { listeners: usize },

    /// Configuration value rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Acknowledged delivery is not implemented.
    #[error("acknowledged delivery is not supported")]
    UnsupportedDeliveryMode,

    /// The message declares a sender other than the contact's owner.
    #[error("message sender {declared} is not the owner {owner} of the contact")]
    SenderMismatch { declared: String, owner: String },

    /// Relay URL rejected.
    #[error("invalid relay url: {0}")]
    InvalidUrl(String),

    /// Payload (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Cryptographic operation failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Transport operation failed.
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
}

impl From<serde_json::Error> for DropError {
    fn from(err: serde_json::Error) -> Self {
        DropError::Serialization(err.to_string())
    }
}

/// Result type for drop exchange operations.
pub type DropResult<T> = Result<T, DropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let errors = vec![
            (
                DropError::PayloadTooLarge { size: 4000, max: 1877 },
                "payload too large: 4000 bytes exceeds maximum of 1877",
            ),
            (
                DropError::ListenerCardinality { listeners: 0 },
                "send command must have exactly one listener (listener count = 0)",
            ),
            (
                DropError::VersionMismatch { expected: 0, found: 1 },
                "binary format version mismatch: expected 0, found 1",
            ),
            (
                DropError::WorkerPanicked("poller"),
                "poller thread panicked",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_conversions() {
        let err: DropError = CryptoError::RandomFailed.into();
        assert!(matches!(err, DropError::Crypto(_)));

        let err: DropError = NetworkError::Timeout.into();
        assert!(matches!(err, DropError::Network(NetworkError::Timeout)));

        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err: DropError = json_err.into();
        assert!(matches!(err, DropError::Serialization(_)));
    }
}
