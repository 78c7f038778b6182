// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Identity
//!
//! A local identity owns an Ed25519 signing keypair (outgoing drops are
//! signed with it) and an X25519 keypair (incoming drops are addressed to
//! it). Both are derived from a single master seed.

use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::crypto::{self, CryptoError, PublicKey, Signature, SigningKeyPair, HKDF};

/// Domain separation label for the exchange key.
const EXCHANGE_SEED_INFO: &[u8] = b"Drop_Exchange_Seed";

/// Local identity capable of decrypting drops and signing outgoing ones.
pub struct Identity {
    /// Master seed for deterministic key derivation (32 bytes).
    master_seed: [u8; 32],
    /// Ed25519 signing keypair.
    signing_keypair: SigningKeyPair,
    /// X25519 secret used to open envelopes addressed to this identity.
    exchange_secret: StaticSecret,
    /// X25519 public key (cached).
    exchange_public_key: [u8; 32],
    /// Human readable alias.
    alias: String,
}

impl Drop for Identity {
    fn drop(&mut self) {
        self.master_seed.zeroize();
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("alias", &self.alias)
            .field("key_id", &self.key_id())
            .finish_non_exhaustive()
    }
}

impl Identity {
    /// Creates a new identity with a random master seed.
    pub fn create(alias: &str) -> Result<Self, CryptoError> {
        let master_seed = crypto::random_bytes::<32>()?;
        Self::from_seed(master_seed, alias)
    }

    /// Restores an identity from its master seed.
    pub fn from_seed(master_seed: [u8; 32], alias: &str) -> Result<Self, CryptoError> {
        let signing_keypair = SigningKeyPair::from_seed(&master_seed)?;

        let exchange_seed = HKDF::derive_key(Some(&master_seed), &[], EXCHANGE_SEED_INFO)?;
        let exchange_secret = StaticSecret::from(exchange_seed);
        let exchange_public_key = *X25519PublicKey::from(&exchange_secret).as_bytes();

        Ok(Identity {
            master_seed,
            signing_keypair,
            exchange_secret,
            exchange_public_key,
            alias: alias.to_string(),
        })
    }

    /// Returns the alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Key identifier: hex fingerprint of the signing key.
    ///
    /// Drops declare their sender by this identifier.
    pub fn key_id(&self) -> String {
        self.signing_keypair.public_key().fingerprint()
    }

    /// Returns the public signing key.
    pub fn signing_public_key(&self) -> PublicKey {
        self.signing_keypair.public_key()
    }

    /// Returns the X25519 public key drops must be sealed to.
    pub fn encryption_public_key(&self) -> &[u8; 32] {
        &self.exchange_public_key
    }

    /// Signs a message using this identity's signing key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_keypair.sign(message)
    }

    /// X25519 key agreement with a peer (or ephemeral) public key.
    pub(crate) fn diffie_hellman(&self, their_public: &[u8; 32]) -> [u8; 32] {
        let shared = self
            .exchange_secret
            .diffie_hellman(&X25519PublicKey::from(*their_public));
        *shared.as_bytes()
    }
}
