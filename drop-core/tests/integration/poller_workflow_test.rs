// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Poller Workflow Integration Tests
//!
//! Start an exchange, send through the command channel and observe the
//! received-message notifications.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use drop_core::codec::v0;
use drop_core::{
    BinaryDropMessageV0, CallbackHandler, Contact, DecodeError, DropConfig, DropEvent,
    DropExchange, DropFormat, DropMessage, DropResult, DropServer, DropServers, DropUrl,
    FormatRegistry, Identity, MockTransport, ModelObject, SealedDrop, V0Format,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Note {
    text: String,
}

impl ModelObject for Note {
    const MODEL_NAME: &'static str = "note";
}

struct Setup {
    transport: Arc<MockTransport>,
    relay: DropUrl,
    alice: Arc<Identity>,
    bob_at_alice: Contact,
    alice_at_bob: Contact,
    exchange: DropExchange,
}

fn setup(formats: FormatRegistry) -> Setup {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let transport = Arc::new(MockTransport::new());
    let relay = DropUrl::parse("https://relay.example").unwrap();
    let alice = Arc::new(Identity::create("alice").unwrap());
    let bob = Arc::new(Identity::create("bob").unwrap());
    let bob_at_alice = Contact::for_identity(alice.clone(), &bob, vec![relay.clone()]);
    let alice_at_bob = Contact::for_identity(bob.clone(), &alice, vec![relay.clone()]);

    let exchange = DropExchange::builder(transport.clone())
        .config(DropConfig::default().with_poll_interval_ms(10).unwrap())
        .formats(formats)
        .build();
    exchange.registry().set_drop_servers(
        DropServers::new().with_server(DropServer::new(relay.clone())),
    );
    exchange.registry().set_identities(vec![bob]);
    exchange.registry().set_contacts(vec![alice_at_bob.clone()]);

    Setup {
        transport,
        relay,
        alice,
        bob_at_alice,
        alice_at_bob,
        exchange,
    }
}

fn next_received(events: &Receiver<DropEvent>) -> (DropUrl, DropMessage) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Ok(DropEvent::MessageReceived { relay, message }) =
            events.recv_timeout(Duration::from_millis(100))
        {
            return (relay, message);
        }
    }
    panic!("no message received");
}

/// Test: a message sent through the command channel is picked up by the poller
#[test]
fn test_send_command_to_received_notification() {
    let setup = setup(FormatRegistry::default());
    let events = setup.exchange.events().subscribe();
    let running = setup.exchange.start().unwrap();

    let result = running
        .sender()
        .send_object(&Note { text: "hi".into() }, &setup.bob_at_alice)
        .unwrap();
    assert_eq!(result.contact_results()[0].status_codes(), &[200]);

    let (relay, message) = next_received(&events);
    assert_eq!(relay, setup.relay);
    assert_eq!(message.sender_contact(), Some(&setup.alice_at_bob));
    assert_eq!(message.payload::<Note>().unwrap().text, "hi");

    running.stop().unwrap();
}

/// Test: snapshot updates are seen by a running poller
#[test]
fn test_poller_sees_registry_updates() {
    let setup = setup(FormatRegistry::default());
    setup.exchange.registry().set_contacts(vec![]);
    let received = Arc::new(AtomicUsize::new(0));
    {
        let received = received.clone();
        setup
            .exchange
            .events()
            .add_handler(Arc::new(CallbackHandler::new(move |event| {
                if let DropEvent::MessageReceived { .. } = event {
                    received.fetch_add(1, Ordering::SeqCst);
                }
            })));
    }
    let events = setup.exchange.events().subscribe();
    let running = setup.exchange.start().unwrap();

    // Unknown sender: consumed from the relay but not accepted.
    setup
        .exchange
        .send_object(&Note { text: "early".into() }, &setup.bob_at_alice)
        .unwrap();
    let deadline = Instant::now() + Duration::from_secs(10);
    while setup.transport.pending(&setup.relay) > 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(setup.transport.pending(&setup.relay), 0);

    setup
        .exchange
        .registry()
        .set_contacts(vec![setup.alice_at_bob.clone()]);
    setup
        .exchange
        .send_object(&Note { text: "late".into() }, &setup.bob_at_alice)
        .unwrap();

    let (_, message) = next_received(&events);
    assert_eq!(message.payload::<Note>().unwrap().text, "late");
    running.stop().unwrap();
    assert_eq!(received.load(Ordering::SeqCst), 1);
}

/// Test: stopping does not wait for the poll interval
#[test]
fn test_stop_interrupts_long_interval() {
    let setup = setup(FormatRegistry::default());
    setup.exchange.set_poll_interval_ms(3_600_000).unwrap();
    let running = setup.exchange.start().unwrap();
    assert!(running.is_running());

    let started = Instant::now();
    running.stop().unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
}

/// Test: dropping the handle stops the workers
#[test]
fn test_drop_stops_workers() {
    let setup = setup(FormatRegistry::default());
    drop(setup.exchange.start().unwrap());

    assert_eq!(setup.exchange.command_bus().listener_count(), 0);
    let running = setup.exchange.start().unwrap();
    running.stop().unwrap();
}

/// A version 0 decoder registered under the wrong version byte.
struct MislabelledFormat;

impl DropFormat for MislabelledFormat {
    fn version(&self) -> u8 {
        3
    }

    fn max_payload_size(&self) -> usize {
        v0::MAX_PAYLOAD_SIZE
    }

    fn seal(
        &self,
        message: &DropMessage,
        sender: &Identity,
        recipient: &Contact,
    ) -> DropResult<Vec<u8>> {
        V0Format.seal(message, sender, recipient)
    }

    fn open<'a>(&self, blob: &'a [u8]) -> Result<Box<dyn SealedDrop + 'a>, DecodeError> {
        Ok(Box::new(BinaryDropMessageV0::from_bytes(blob)?))
    }
}

/// Test: an invariant violation stops the poller and is reported
#[test]
fn test_fatal_error_stops_poller() {
    let mut formats = FormatRegistry::default();
    formats.register(Arc::new(MislabelledFormat));
    let setup = setup(formats);
    let events = setup.exchange.events().subscribe();

    let message = DropMessage::new(&setup.alice, &Note { text: "hi".into() }).unwrap();
    let mut blob = V0Format
        .seal(&message, &setup.alice, &setup.bob_at_alice)
        .unwrap();
    blob[0] = 3;
    setup.transport.queue_drop(&setup.relay, blob);

    let running = setup.exchange.start().unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut reported = None;
    while reported.is_none() && Instant::now() < deadline {
        if let Ok(DropEvent::Error { message }) = events.recv_timeout(Duration::from_millis(100))
        {
            reported = Some(message);
        }
    }
    assert!(reported.unwrap().contains("version mismatch"));

    let deadline = Instant::now() + Duration::from_secs(10);
    while running.is_running() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(!running.is_running());
    running.stop().unwrap();
}
