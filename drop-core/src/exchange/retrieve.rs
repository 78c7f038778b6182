// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Blob Retrieval
//!
//! Turns the blobs fetched from one relay into authenticated messages.
//! Every blob ends in exactly one [`BlobOutcome`]. Hostile or malformed
//! input is always skipped; only a broken format registration is fatal.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

use crate::codec::{DecodeError, FormatRegistry};
use crate::contact::Contact;
use crate::error::{DropError, DropResult};
use crate::events::{DropEvent, EventDispatcher};
use crate::identity::Identity;
use crate::message::DropMessage;
use crate::relay::DropUrl;

/// Why a blob was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Zero-length blob.
    Empty,
    /// Frame or sender authentication rejected.
    Decode(DecodeError),
    /// None of the identities could decrypt it.
    NotAddressed,
    /// Decrypted, but the declared sender is not a known contact.
    UnknownSender(String),
}

/// Result of processing one blob.
#[derive(Debug, Clone, PartialEq)]
pub enum BlobOutcome {
    /// Authenticated message, bound to its sending contact.
    Accepted(DropMessage),
    Skipped(SkipReason),
    /// Invariant violation; aborts the retrieval.
    Fatal(DropError),
}

/// Processes the blobs of one relay.
pub struct Retrieval<'a> {
    formats: &'a FormatRegistry,
    relay: &'a DropUrl,
    observer: Option<&'a EventDispatcher>,
}

impl<'a> Retrieval<'a> {
    pub fn new(formats: &'a FormatRegistry, relay: &'a DropUrl) -> Self {
        Retrieval {
            formats,
            relay,
            observer: None,
        }
    }

    /// Reports raw messages and spoof attempts to `events`.
    pub fn with_observer(mut self, events: &'a EventDispatcher) -> Self {
        self.observer = Some(events);
        self
    }

    /// Processes `blobs` in order and returns the accepted messages.
    ///
    /// Contacts are matched in a fresh random order on every call.
    pub fn run<B>(
        &self,
        blobs: &[B],
        identities: &[Arc<Identity>],
        contacts: &[Contact],
    ) -> DropResult<Vec<DropMessage>>
    where
        B: AsRef<[u8]>,
    {
        let mut accepted = Vec::new();
        self.for_each(blobs, identities, contacts, |message| accepted.push(message))?;
        Ok(accepted)
    }

    /// Like [`Retrieval::run`], but hands each accepted message to `f` as
    /// soon as its blob is processed. Messages handed over before a fatal
    /// error stay delivered.
    ///
    /// Returns the number of accepted messages.
    pub fn for_each<B, F>(
        &self,
        blobs: &[B],
        identities: &[Arc<Identity>],
        contacts: &[Contact],
        mut f: F,
    ) -> DropResult<usize>
    where
        B: AsRef<[u8]>,
        F: FnMut(DropMessage),
    {
        let mut contacts = contacts.to_vec();
        contacts.shuffle(&mut OsRng);

        let mut accepted = 0;
        for blob in blobs {
            match self.process(blob.as_ref(), identities, &contacts) {
                BlobOutcome::Accepted(message) => {
                    accepted += 1;
                    f(message);
                }
                BlobOutcome::Skipped(reason) => {
                    debug!(relay = %self.relay, reason = ?reason, "drop skipped");
                }
                BlobOutcome::Fatal(err) => return Err(err),
            }
        }
        Ok(accepted)
    }

    /// Decides the outcome of a single blob.
    pub fn process(
        &self,
        blob: &[u8],
        identities: &[Arc<Identity>],
        contacts: &[Contact],
    ) -> BlobOutcome {
        let version = match blob.first() {
            Some(&version) => version,
            None => {
                debug!(relay = %self.relay, "empty drop");
                return BlobOutcome::Skipped(SkipReason::Empty);
            }
        };

        let format = match self.formats.get(version) {
            Some(format) => format,
            None => {
                warn!(relay = %self.relay, version, "unknown binary drop message version");
                return BlobOutcome::Skipped(SkipReason::Decode(DecodeError::UnknownVersion(
                    version,
                )));
            }
        };

        let sealed = match format.open(blob) {
            Ok(sealed) => sealed,
            Err(err) => return self.rejected(err),
        };

        for identity in identities {
            let mut message = match sealed.disassemble(identity) {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(err) => return self.rejected(err),
            };

            if let Some(events) = self.observer {
                events.dispatch(DropEvent::RawMessage {
                    relay: self.relay.clone(),
                    message: message.clone(),
                });
            }

            for contact in contacts {
                if contact.key_id() == message.sender_key_id() && message.register_sender(contact)
                {
                    debug!(relay = %self.relay, contact = contact.key_id(), "drop accepted");
                    return BlobOutcome::Accepted(message);
                }
            }

            // Decrypted, so it was meant for this identity.
            info!(
                relay = %self.relay,
                sender = message.sender_key_id(),
                "drop from unknown sender"
            );
            return BlobOutcome::Skipped(SkipReason::UnknownSender(
                message.sender_key_id().to_string(),
            ));
        }

        BlobOutcome::Skipped(SkipReason::NotAddressed)
    }

    fn rejected(&self, err: DecodeError) -> BlobOutcome {
        match err {
            DecodeError::VersionMismatch { expected, found } => {
                error!(
                    relay = %self.relay,
                    expected,
                    found,
                    "format registered under the wrong version"
                );
                BlobOutcome::Fatal(DropError::VersionMismatch { expected, found })
            }
            DecodeError::InvalidSize { version, size } => {
                info!(relay = %self.relay, version, size, "invalid binary drop message size");
                BlobOutcome::Skipped(SkipReason::Decode(err))
            }
            DecodeError::SpoofedSender { ref declared } => {
                warn!(
                    relay = %self.relay,
                    declared_sender = declared.as_str(),
                    spoofed_sender = true,
                    "spoofed drop sender, ignoring drop"
                );
                if let Some(events) = self.observer {
                    events.dispatch(DropEvent::SpoofDetected {
                        relay: self.relay.clone(),
                        declared_sender: declared.clone(),
                    });
                }
                BlobOutcome::Skipped(SkipReason::Decode(err))
            }
            DecodeError::UnknownVersion(version) => {
                warn!(relay = %self.relay, version, "unknown binary drop message version");
                BlobOutcome::Skipped(SkipReason::Decode(err))
            }
            DecodeError::Empty => BlobOutcome::Skipped(SkipReason::Empty),
        }
    }
}
