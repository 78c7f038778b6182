// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Relay Roundtrip Integration Tests
//!
//! Two exchanges sharing one in-memory relay.

use std::sync::Arc;

use drop_core::{
    Contact, DropExchange, DropServer, DropServers, DropUrl, Identity, MockTransport,
    ModelObject,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Greeting {
    text: String,
}

impl ModelObject for Greeting {
    const MODEL_NAME: &'static str = "greeting";
}

/// Test: Alice sends, Bob retrieves from the same relays
#[test]
fn test_send_then_retrieve_across_relays() {
    let transport = Arc::new(MockTransport::new());
    let primary = DropUrl::parse("https://primary.example/drop").unwrap();
    let backup = DropUrl::parse("https://backup.example/drop").unwrap();

    let alice = Arc::new(Identity::create("alice").unwrap());
    let bob = Arc::new(Identity::create("bob").unwrap());
    let bob_at_alice =
        Contact::for_identity(alice.clone(), &bob, vec![primary.clone(), backup.clone()]);
    let alice_at_bob = Contact::for_identity(bob.clone(), &alice, vec![primary.clone()]);

    let alice_exchange = DropExchange::builder(transport.clone()).build();
    let bob_exchange = DropExchange::builder(transport.clone()).build();
    bob_exchange.registry().set_drop_servers(
        DropServers::new()
            .with_server(DropServer::new(primary.clone()))
            .with_server(DropServer::new(backup.clone())),
    );
    bob_exchange.registry().set_identities(vec![bob.clone()]);
    bob_exchange.registry().set_contacts(vec![alice_at_bob.clone()]);

    // Send
    let sent = alice_exchange
        .send_object(
            &Greeting {
                text: "hello bob".into(),
            },
            &bob_at_alice,
        )
        .unwrap();
    assert_eq!(sent.contact_results()[0].status_codes(), &[200, 200]);

    // Retrieve: one copy per relay
    let retrieved = bob_exchange.retrieve_all().unwrap();
    let messages: Vec<_> = retrieved.into_iter().flat_map(|(_, m)| m).collect();
    assert_eq!(messages.len(), 2);
    for message in &messages {
        assert_eq!(message.sender_contact(), Some(&alice_at_bob));
        assert_eq!(
            message.payload::<Greeting>().unwrap(),
            Greeting {
                text: "hello bob".into()
            }
        );
    }
    assert_eq!(messages[0].acknowledge_id(), messages[1].acknowledge_id());

    // Drained
    assert!(bob_exchange.retrieve_all().unwrap().iter().all(|(_, m)| m.is_empty()));
}

/// Test: a reply travels back with the roles swapped
#[test]
fn test_reply_roundtrip() {
    let transport = Arc::new(MockTransport::new());
    let relay = DropUrl::parse("https://relay.example").unwrap();

    let alice = Arc::new(Identity::create("alice").unwrap());
    let bob = Arc::new(Identity::create("bob").unwrap());
    let bob_at_alice = Contact::for_identity(alice.clone(), &bob, vec![relay.clone()]);
    let alice_at_bob = Contact::for_identity(bob.clone(), &alice, vec![relay.clone()]);
    let exchange = DropExchange::builder(transport).build();

    exchange
        .send_object(&Greeting { text: "ping".into() }, &bob_at_alice)
        .unwrap();
    let received = exchange
        .retrieve(&relay, &[bob.clone()], &[alice_at_bob.clone()])
        .unwrap();
    assert_eq!(received.len(), 1);

    exchange
        .send_object(&Greeting { text: "pong".into() }, &alice_at_bob)
        .unwrap();
    let replies = exchange
        .retrieve(&relay, &[alice.clone()], &[bob_at_alice.clone()])
        .unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].payload::<Greeting>().unwrap().text, "pong");
    assert_eq!(replies[0].sender_key_id(), bob.key_id());
}
