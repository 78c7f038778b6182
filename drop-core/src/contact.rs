// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Contact
//!
//! A known peer: the key identifier its drops are matched against, the
//! keys needed to seal drops to it, the relay URLs it polls, and the local
//! identity that owns the relationship.

use std::sync::Arc;

use crate::crypto::PublicKey;
use crate::identity::Identity;
use crate::relay::DropUrl;

/// A known peer reachable through one or more relay URLs.
#[derive(Clone, Debug)]
pub struct Contact {
    /// Hex fingerprint of the peer's signing key.
    key_id: String,
    /// The peer's Ed25519 public key.
    signing_key: PublicKey,
    /// The peer's X25519 key drops are sealed to.
    encryption_key: [u8; 32],
    /// Relay URLs the peer polls.
    drop_urls: Vec<DropUrl>,
    /// Display alias.
    alias: String,
    /// Local identity that owns this contact.
    owner: Arc<Identity>,
}

impl Contact {
    /// Creates a contact from the peer's public key material.
    pub fn new(
        owner: Arc<Identity>,
        signing_key: PublicKey,
        encryption_key: [u8; 32],
        drop_urls: Vec<DropUrl>,
    ) -> Self {
        Contact {
            key_id: signing_key.fingerprint(),
            signing_key,
            encryption_key,
            drop_urls,
            alias: String::new(),
            owner,
        }
    }

    /// Creates a contact for the public half of `peer`.
    pub fn for_identity(owner: Arc<Identity>, peer: &Identity, drop_urls: Vec<DropUrl>) -> Self {
        Contact::new(
            owner,
            peer.signing_public_key(),
            *peer.encryption_public_key(),
            drop_urls,
        )
        .with_alias(peer.alias())
    }

    /// Sets the display alias.
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    /// Returns the verification key identifier.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn signing_key(&self) -> &PublicKey {
        &self.signing_key
    }

    pub fn encryption_key(&self) -> &[u8; 32] {
        &self.encryption_key
    }

    pub fn drop_urls(&self) -> &[DropUrl] {
        &self.drop_urls
    }

    /// Adds a relay URL unless already present.
    pub fn add_drop_url(&mut self, url: DropUrl) {
        if !self.drop_urls.contains(&url) {
            self.drop_urls.push(url);
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the local identity that owns this contact.
    pub fn owner(&self) -> &Arc<Identity> {
        &self.owner
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id && self.owner.key_id() == other.owner.key_id()
    }
}

impl Eq for Contact {}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> DropUrl {
        DropUrl::parse(s).unwrap()
    }

    #[test]
    fn test_contact_for_identity() {
        let owner = Arc::new(Identity::create("bob").unwrap());
        let peer = Identity::create("alice").unwrap();

        let contact = Contact::for_identity(
            owner.clone(),
            &peer,
            vec![url("https://drop.example/abc")],
        );

        assert_eq!(contact.key_id(), peer.key_id());
        assert_eq!(contact.encryption_key(), peer.encryption_public_key());
        assert_eq!(contact.alias(), "alice");
        assert_eq!(contact.owner().key_id(), owner.key_id());
    }

    #[test]
    fn test_add_drop_url_deduplicates() {
        let owner = Arc::new(Identity::create("bob").unwrap());
        let peer = Identity::create("alice").unwrap();
        let mut contact =
            Contact::for_identity(owner, &peer, vec![url("https://drop.example/abc")]);

        contact.add_drop_url(url("https://drop.example/abc"));
        contact.add_drop_url(url("https://other.example/abc"));

        assert_eq!(contact.drop_urls().len(), 2);
    }

    #[test]
    fn test_equality_includes_owner() {
        let bob = Arc::new(Identity::create("bob").unwrap());
        let carol = Arc::new(Identity::create("carol").unwrap());
        let peer = Identity::create("alice").unwrap();

        let a = Contact::for_identity(bob.clone(), &peer, vec![]);
        let b = Contact::for_identity(bob, &peer, vec![]);
        let c = Contact::for_identity(carol, &peer, vec![]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
