// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Fixtures

use std::sync::Arc;

use drop_core::{
    Contact, DropExchange, DropFormat, DropMessage, DropUrl, Identity, MockTransport,
    ModelObject, V0Format,
};
use serde::{Deserialize, Serialize};

/// Plain text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: &str) -> Self {
        TextMessage { text: text.into() }
    }
}

impl ModelObject for TextMessage {
    const MODEL_NAME: &'static str = "text_message";
}

pub fn identity(alias: &str) -> Arc<Identity> {
    Arc::new(Identity::create(alias).unwrap())
}

pub fn url(s: &str) -> DropUrl {
    DropUrl::parse(s).unwrap()
}

/// Two identities that know each other.
pub struct Peers {
    pub alice: Arc<Identity>,
    pub bob: Arc<Identity>,
    /// Alice's record of Bob.
    pub bob_at_alice: Contact,
    /// Bob's record of Alice.
    pub alice_at_bob: Contact,
}

impl Peers {
    pub fn new(relays: &[DropUrl]) -> Self {
        let alice = identity("alice");
        let bob = identity("bob");
        Peers {
            bob_at_alice: Contact::for_identity(alice.clone(), &bob, relays.to_vec()),
            alice_at_bob: Contact::for_identity(bob.clone(), &alice, relays.to_vec()),
            alice,
            bob,
        }
    }

    /// A version 0 envelope from Alice to Bob.
    pub fn envelope(&self, text: &str) -> Vec<u8> {
        let message = DropMessage::new(&self.alice, &TextMessage::new(text)).unwrap();
        V0Format
            .seal(&message, &self.alice, &self.bob_at_alice)
            .unwrap()
    }
}

pub fn exchange(transport: &Arc<MockTransport>) -> DropExchange {
    DropExchange::builder(transport.clone()).build()
}

/// Routes library logs to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
