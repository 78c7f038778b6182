// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Drop Exchange
//!
//! Orchestrates sending drops to contacts and retrieving drops from relay
//! servers.
//!
//! The [`DropExchange`] is cheap to clone; clones share the transport,
//! registry, event dispatcher and send command bus. [`DropExchange::start`]
//! runs the background poller and the send command listener until the
//! returned [`RunningExchange`] is stopped or dropped.

mod poller;
mod result;
mod retrieve;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::codec::FormatRegistry;
use crate::command::{DropSender, SendCommandBus};
use crate::config::{validate_poll_interval, DropConfig};
use crate::contact::Contact;
use crate::error::{DropError, DropResult};
use crate::events::{DropEvent, EventDispatcher};
use crate::identity::Identity;
use crate::message::{DropMessage, ModelObject};
use crate::network::{DropTransport, STATUS_UNREACHABLE};
use crate::registry::DropRegistry;
use crate::relay::{DropServer, DropUrl};

pub use poller::RunningExchange;
pub use result::{ContactSendResult, SendResult};
pub use retrieve::{BlobOutcome, Retrieval, SkipReason};

/// How a send waits for delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Post and report the relay status codes.
    #[default]
    Unacknowledged,
    /// Wait for the recipient's acknowledgement. Not supported yet.
    Acknowledged,
}

struct ExchangeInner {
    transport: Arc<dyn DropTransport>,
    formats: FormatRegistry,
    registry: Arc<DropRegistry>,
    events: Arc<EventDispatcher>,
    poll_interval_ms: AtomicU64,
    commands: SendCommandBus,
}

/// The drop exchange orchestrator.
#[derive(Clone)]
pub struct DropExchange {
    inner: Arc<ExchangeInner>,
}

impl std::fmt::Debug for DropExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropExchange")
            .field("formats", &self.inner.formats)
            .field("poll_interval", &self.poll_interval())
            .field("commands", &self.inner.commands)
            .finish_non_exhaustive()
    }
}

impl DropExchange {
    /// Starts building an exchange on top of `transport`.
    pub fn builder(transport: Arc<dyn DropTransport>) -> DropExchangeBuilder {
        DropExchangeBuilder::new(transport)
    }

    /// Sends `message` to every contact.
    ///
    /// Contacts are processed in order. A relay that cannot be reached is
    /// recorded with status [`STATUS_UNREACHABLE`] and does not stop the
    /// remaining posts.
    pub fn send(&self, message: &DropMessage, contacts: &[Contact]) -> DropResult<SendResult> {
        self.send_with_mode(message, contacts, DeliveryMode::Unacknowledged)
    }

    pub fn send_with_mode(
        &self,
        message: &DropMessage,
        contacts: &[Contact],
        mode: DeliveryMode,
    ) -> DropResult<SendResult> {
        match mode {
            DeliveryMode::Unacknowledged => self.send_and_forget(message, contacts),
            DeliveryMode::Acknowledged => Err(DropError::UnsupportedDeliveryMode),
        }
    }

    /// Posts `message` to every relay URL of every contact.
    ///
    /// Each contact's envelope is sealed by the contact's owner, which must
    /// be the message's declared sender.
    pub fn send_and_forget(
        &self,
        message: &DropMessage,
        contacts: &[Contact],
    ) -> DropResult<SendResult> {
        for contact in contacts {
            let owner = contact.owner().key_id();
            if owner != message.sender_key_id() {
                return Err(DropError::SenderMismatch {
                    declared: message.sender_key_id().to_string(),
                    owner,
                });
            }
        }

        let format = self.inner.formats.outbound();
        let mut result = SendResult::new();

        for contact in contacts {
            let envelope = format.seal(message, contact.owner(), contact)?;
            let mut contact_result = ContactSendResult::new(contact);

            for url in contact.drop_urls() {
                let status = match self.inner.transport.post(url, &envelope) {
                    Ok(status) => status,
                    Err(err) => {
                        warn!(relay = %url, error = %err, "failed to post drop");
                        STATUS_UNREACHABLE
                    }
                };
                debug!(relay = %url, contact = contact.key_id(), status, "drop posted");
                contact_result.push_status(status);
            }

            result.push(contact_result);
        }

        info!(
            contacts = result.len(),
            version = format.version(),
            "drop message sent"
        );
        Ok(result)
    }

    /// Sends `message` to a single contact.
    pub fn send_to(&self, message: &DropMessage, contact: &Contact) -> DropResult<SendResult> {
        self.send(message, std::slice::from_ref(contact))
    }

    /// Wraps `object` in a message from the contact's owner and sends it.
    pub fn send_object<T: ModelObject>(
        &self,
        object: &T,
        contact: &Contact,
    ) -> DropResult<SendResult> {
        let message = DropMessage::new(contact.owner(), object)?;
        self.send_to(&message, contact)
    }

    /// Fetches the drops pending on `relay` and returns those addressed to
    /// one of `identities` from one of `contacts`.
    ///
    /// Malformed, foreign and spoofed drops are skipped. Only a format
    /// registry inconsistency is returned as an error.
    pub fn retrieve(
        &self,
        relay: &DropUrl,
        identities: &[Arc<Identity>],
        contacts: &[Contact],
    ) -> DropResult<Vec<DropMessage>> {
        let mut messages = Vec::new();
        self.retrieve_each(relay, identities, contacts, |message| messages.push(message))?;
        Ok(messages)
    }

    fn retrieve_each<F>(
        &self,
        relay: &DropUrl,
        identities: &[Arc<Identity>],
        contacts: &[Contact],
        f: F,
    ) -> DropResult<usize>
    where
        F: FnMut(DropMessage),
    {
        let blobs = match self.inner.transport.fetch(relay) {
            Ok(blobs) => blobs,
            Err(err) => {
                warn!(relay = %relay, error = %err, "failed to fetch drops");
                return Ok(0);
            }
        };
        debug!(relay = %relay, count = blobs.len(), "fetched drops");

        Retrieval::new(&self.inner.formats, relay)
            .with_observer(&self.inner.events)
            .for_each(&blobs, identities, contacts, f)
    }

    /// Retrieves from every relay server of the current snapshot.
    ///
    /// A fatal error discards what earlier relays returned. Use
    /// [`DropExchange::poll_once`] to have messages broadcast as they are
    /// accepted.
    pub fn retrieve_all(&self) -> DropResult<Vec<(DropServer, Vec<DropMessage>)>> {
        let snapshot = self.inner.registry.snapshot();
        let mut retrieved = Vec::with_capacity(snapshot.servers.len());
        for server in snapshot.servers.iter() {
            let messages = self.retrieve(server.url(), &snapshot.identities, &snapshot.contacts)?;
            retrieved.push((server.clone(), messages));
        }
        Ok(retrieved)
    }

    /// Runs one poll cycle and broadcasts every accepted message.
    ///
    /// Each message is broadcast as soon as it is accepted, so a fatal
    /// error only stops the messages that follow it.
    ///
    /// Returns the number of messages received.
    pub fn poll_once(&self) -> DropResult<usize> {
        let snapshot = self.inner.registry.snapshot();
        let mut received = 0;
        for server in snapshot.servers.iter() {
            let relay = server.url();
            received += self.retrieve_each(
                relay,
                &snapshot.identities,
                &snapshot.contacts,
                |message| {
                    info!(
                        relay = %relay,
                        sender = message.sender_key_id(),
                        model = message.model_object(),
                        "drop message received"
                    );
                    self.inner.events.dispatch(DropEvent::MessageReceived {
                        relay: relay.clone(),
                        message,
                    });
                },
            )?;
        }
        Ok(received)
    }

    /// Changes the delay between poll cycles. Negative values are rejected.
    pub fn set_poll_interval_ms(&self, interval_ms: i64) -> DropResult<()> {
        let interval_ms = validate_poll_interval(interval_ms)?;
        self.inner
            .poll_interval_ms
            .store(interval_ms, Ordering::Relaxed);
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.inner.poll_interval_ms.load(Ordering::Relaxed))
    }

    pub fn registry(&self) -> &Arc<DropRegistry> {
        &self.inner.registry
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.inner.events
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.inner.formats
    }

    pub fn command_bus(&self) -> &SendCommandBus {
        &self.inner.commands
    }

    /// Handle for sending through the command channel.
    pub fn sender(&self) -> DropSender {
        self.inner.commands.sender()
    }

    /// Spawns the poller and the send command listener.
    ///
    /// Fails with [`DropError::ListenerCardinality`] if the send command
    /// already has a listener, e.g. because the exchange is running.
    pub fn start(&self) -> DropResult<RunningExchange> {
        RunningExchange::spawn(self.clone())
    }
}

/// Builder for [`DropExchange`].
pub struct DropExchangeBuilder {
    transport: Arc<dyn DropTransport>,
    registry: Option<Arc<DropRegistry>>,
    config: DropConfig,
    formats: FormatRegistry,
    events: Option<Arc<EventDispatcher>>,
}

impl DropExchangeBuilder {
    fn new(transport: Arc<dyn DropTransport>) -> Self {
        DropExchangeBuilder {
            transport,
            registry: None,
            config: DropConfig::default(),
            formats: FormatRegistry::default(),
            events: None,
        }
    }

    /// Shares an existing registry instead of starting empty.
    pub fn registry(mut self, registry: Arc<DropRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(mut self, config: DropConfig) -> Self {
        self.config = config;
        self
    }

    pub fn formats(mut self, formats: FormatRegistry) -> Self {
        self.formats = formats;
        self
    }

    pub fn events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> DropExchange {
        DropExchange {
            inner: Arc::new(ExchangeInner {
                transport: self.transport,
                formats: self.formats,
                registry: self.registry.unwrap_or_default(),
                events: self.events.unwrap_or_default(),
                poll_interval_ms: AtomicU64::new(self.config.poll_interval_ms()),
                commands: SendCommandBus::new(self.config.command_capacity()),
            }),
        }
    }
}
