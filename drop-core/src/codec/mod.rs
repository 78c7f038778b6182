// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Versioned Envelope Codec
//!
//! Every binary drop starts with a one-byte format version. A
//! [`DropFormat`] knows how to seal messages in its version and how to
//! open blobs carrying its tag; the [`FormatRegistry`] maps version bytes
//! to formats so new versions can be added without touching the retrieval
//! loop.
//!
//! Opening is two-phase: [`DropFormat::open`] validates the frame
//! (version and size), then [`SealedDrop::disassemble`] is attempted once
//! per local identity.

pub mod registry;
pub mod v0;

use thiserror::Error;

use crate::contact::Contact;
use crate::error::DropResult;
use crate::identity::Identity;
use crate::message::DropMessage;

pub use registry::FormatRegistry;
pub use v0::{BinaryDropMessageV0, V0Format};

/// Reasons a blob cannot be turned into a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u8, found: u8 },

    #[error("invalid size for version {version}: {size} bytes")]
    InvalidSize { version: u8, size: usize },

    #[error("spoofed sender: message claims {declared}")]
    SpoofedSender { declared: String },

    #[error("unknown binary drop message version {0}")]
    UnknownVersion(u8),

    #[error("empty drop message")]
    Empty,
}

/// One binary envelope format version.
pub trait DropFormat: Send + Sync {
    /// Version tag carried in byte 0.
    fn version(&self) -> u8;

    /// Largest serialized message this format can carry.
    fn max_payload_size(&self) -> usize;

    /// Encrypts `message` for `recipient`, signed by `sender`.
    fn seal(&self, message: &DropMessage, sender: &Identity, recipient: &Contact)
        -> DropResult<Vec<u8>>;

    /// Validates the frame of `blob` without decrypting it.
    fn open<'a>(&self, blob: &'a [u8]) -> Result<Box<dyn SealedDrop + 'a>, DecodeError>;
}

/// A framed but still encrypted drop.
pub trait SealedDrop {
    /// Attempts to decrypt with `identity`.
    ///
    /// `Ok(None)` means the drop is not addressed to this identity.
    fn disassemble(&self, identity: &Identity) -> Result<Option<DropMessage>, DecodeError>;
}
