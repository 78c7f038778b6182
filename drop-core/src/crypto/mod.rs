// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Cryptographic Primitives
//!
//! Building blocks for drop envelopes: Ed25519 signatures, HKDF-SHA256 key
//! derivation and XChaCha20-Poly1305 authenticated encryption.

pub mod encryption;
pub mod kdf;
pub mod signing;

use thiserror::Error;

pub use encryption::{SymmetricKey, NONCE_SIZE, TAG_SIZE};
pub use kdf::HKDF;
pub use signing::{PublicKey, Signature, SigningKeyPair};

/// Crypto error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("System random number generator failed")]
    RandomFailed,
    #[error("Invalid key material")]
    InvalidKey,
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed: data may be corrupted or wrong key")]
    DecryptionFailed,
}

/// Fills a fixed-size array from the system RNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CryptoError> {
    use ring::rand::{SecureRandom, SystemRandom};

    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| CryptoError::RandomFailed)?;
    Ok(bytes)
}
