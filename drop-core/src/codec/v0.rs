// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Binary Drop Message, Version 0
//!
//! Fixed-size envelope so relays learn nothing from message length.
//!
//! ```text
//! version (1) || ephemeral X25519 key (32) || nonce (24) || ciphertext (1991)
//! ```
//!
//! The ciphertext is XChaCha20-Poly1305 over
//!
//! ```text
//! signature (64) || signer Ed25519 key (32) || length (u16 BE) || json || zero padding
//! ```
//!
//! with the 57-byte header as associated data. The key is
//! HKDF-SHA256(X25519(ephemeral, recipient)). The signature covers the
//! header followed by the length-prefixed, padded body.

use rand::rngs::OsRng;
use tracing::debug;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey};

use super::{DecodeError, DropFormat, SealedDrop};
use crate::contact::Contact;
use crate::crypto::encryption::{self, NONCE_SIZE, TAG_SIZE};
use crate::crypto::signing::{PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use crate::crypto::{CryptoError, PublicKey, Signature, SymmetricKey, HKDF};
use crate::error::{DropError, DropResult};
use crate::identity::Identity;
use crate::message::DropMessage;

/// Version tag.
pub const VERSION: u8 = 0;

/// Total size of every version 0 envelope.
pub const MESSAGE_SIZE: usize = 2048;

const EPHEMERAL_KEY_SIZE: usize = 32;
const HEADER_SIZE: usize = 1 + EPHEMERAL_KEY_SIZE + NONCE_SIZE;
const PLAINTEXT_SIZE: usize = MESSAGE_SIZE - HEADER_SIZE - TAG_SIZE;
const BODY_SIZE: usize = PLAINTEXT_SIZE - SIGNATURE_SIZE - PUBLIC_KEY_SIZE;
const LENGTH_SIZE: usize = 2;

/// Largest serialized message a version 0 envelope can carry.
pub const MAX_PAYLOAD_SIZE: usize = BODY_SIZE - LENGTH_SIZE;

const KDF_INFO: &[u8] = b"drop-v0";

/// The version 0 format.
#[derive(Debug, Clone, Copy, Default)]
pub struct V0Format;

impl DropFormat for V0Format {
    fn version(&self) -> u8 {
        VERSION
    }

    fn max_payload_size(&self) -> usize {
        MAX_PAYLOAD_SIZE
    }

    fn seal(
        &self,
        message: &DropMessage,
        sender: &Identity,
        recipient: &Contact,
    ) -> DropResult<Vec<u8>> {
        BinaryDropMessageV0::assemble(message, sender, recipient)
    }

    fn open<'a>(&self, blob: &'a [u8]) -> Result<Box<dyn SealedDrop + 'a>, DecodeError> {
        Ok(Box::new(BinaryDropMessageV0::from_bytes(blob)?))
    }
}

/// A framed version 0 envelope.
#[derive(Debug, Clone, Copy)]
pub struct BinaryDropMessageV0<'a> {
    bytes: &'a [u8],
}

impl<'a> BinaryDropMessageV0<'a> {
    /// Validates version tag and size.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        match bytes.first() {
            None => return Err(DecodeError::Empty),
            Some(&VERSION) => {}
            Some(&found) => {
                return Err(DecodeError::VersionMismatch {
                    expected: VERSION,
                    found,
                })
            }
        }
        if bytes.len() != MESSAGE_SIZE {
            return Err(DecodeError::InvalidSize {
                version: VERSION,
                size: bytes.len(),
            });
        }
        Ok(BinaryDropMessageV0 { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Encrypts and signs `message` for `recipient`.
    pub fn assemble(
        message: &DropMessage,
        sender: &Identity,
        recipient: &Contact,
    ) -> DropResult<Vec<u8>> {
        let payload = message.to_json()?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(DropError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = X25519PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&X25519PublicKey::from(*recipient.encryption_key()));
        let key = envelope_key(shared.as_bytes())?;
        let nonce = encryption::random_nonce()?;

        let mut envelope = Vec::with_capacity(MESSAGE_SIZE);
        envelope.push(VERSION);
        envelope.extend_from_slice(ephemeral_public.as_bytes());
        envelope.extend_from_slice(&nonce);

        let mut body = Vec::with_capacity(BODY_SIZE);
        body.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        body.extend_from_slice(&payload);
        body.resize(BODY_SIZE, 0);

        let signature = sender.sign(&signed_data(&envelope, &body));

        let mut plaintext = Vec::with_capacity(PLAINTEXT_SIZE);
        plaintext.extend_from_slice(signature.as_bytes());
        plaintext.extend_from_slice(sender.signing_public_key().as_bytes());
        plaintext.extend_from_slice(&body);

        let ciphertext = encryption::seal(&key, &nonce, &envelope, &plaintext)?;
        envelope.extend_from_slice(&ciphertext);
        debug_assert_eq!(envelope.len(), MESSAGE_SIZE);

        Ok(envelope)
    }
}

impl SealedDrop for BinaryDropMessageV0<'_> {
    fn disassemble(&self, identity: &Identity) -> Result<Option<DropMessage>, DecodeError> {
        let (header, ciphertext) = self.bytes.split_at(HEADER_SIZE);

        let mut ephemeral_public = [0u8; EPHEMERAL_KEY_SIZE];
        ephemeral_public.copy_from_slice(&header[1..1 + EPHEMERAL_KEY_SIZE]);
        let nonce = &header[1 + EPHEMERAL_KEY_SIZE..];

        let key = match envelope_key(&identity.diffie_hellman(&ephemeral_public)) {
            Ok(key) => key,
            Err(_) => return Ok(None),
        };
        let plaintext = match encryption::open(&key, nonce, header, ciphertext) {
            Ok(plaintext) => plaintext,
            Err(_) => return Ok(None),
        };

        let (signature_bytes, rest) = plaintext.split_at(SIGNATURE_SIZE);
        let (signer_bytes, body) = rest.split_at(PUBLIC_KEY_SIZE);

        let length = u16::from_be_bytes([body[0], body[1]]) as usize;
        if length > MAX_PAYLOAD_SIZE {
            debug!(length, "decrypted drop declares oversized payload");
            return Ok(None);
        }
        let message = match DropMessage::from_json(&body[LENGTH_SIZE..LENGTH_SIZE + length]) {
            Ok(message) => message,
            Err(err) => {
                debug!(error = %err, "decrypted drop carries unparsable payload");
                return Ok(None);
            }
        };

        let mut signer = [0u8; PUBLIC_KEY_SIZE];
        signer.copy_from_slice(signer_bytes);
        let signer = PublicKey::from_bytes(signer);
        let mut signature = [0u8; SIGNATURE_SIZE];
        signature.copy_from_slice(signature_bytes);

        let authentic = signer.verify(&signed_data(header, body), &Signature::from_bytes(signature));
        if !authentic || signer.fingerprint() != message.sender_key_id() {
            return Err(DecodeError::SpoofedSender {
                declared: message.sender_key_id().to_string(),
            });
        }

        Ok(Some(message))
    }
}

fn envelope_key(shared_secret: &[u8; 32]) -> Result<SymmetricKey, CryptoError> {
    Ok(SymmetricKey::from_bytes(HKDF::derive_key(
        None,
        shared_secret,
        KDF_INFO,
    )?))
}

fn signed_data(header: &[u8], body: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(header.len() + body.len());
    data.extend_from_slice(header);
    data.extend_from_slice(body);
    data
}
