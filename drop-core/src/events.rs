// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Event System
//!
//! Notifications broadcast by a running drop exchange. Any number of
//! handlers may be registered; each receives every event.

use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::message::DropMessage;
use crate::relay::DropUrl;

/// Events emitted by a drop exchange.
#[derive(Debug, Clone)]
pub enum DropEvent {
    /// An authenticated message was received.
    MessageReceived {
        /// Relay the message was fetched from.
        relay: DropUrl,
        /// The message, bound to its sending contact.
        message: DropMessage,
    },

    /// A drop was decrypted but its sender is not yet authenticated.
    RawMessage {
        relay: DropUrl,
        message: DropMessage,
    },

    /// A drop addressed to us failed sender authentication.
    SpoofDetected {
        relay: DropUrl,
        /// Sender key identifier the drop claimed.
        declared_sender: String,
    },

    /// The poller hit an unrecoverable error and stopped.
    Error {
        /// Error description.
        message: String,
    },
}

/// Event handler trait.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: DropEvent);
}

/// Simple callback-based event handler.
pub struct CallbackHandler<F>
where
    F: Fn(DropEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(DropEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(DropEvent) + Send + Sync,
{
    fn on_event(&self, event: DropEvent) {
        (self.callback)(event);
    }
}

/// Forwards events into a channel.
struct ChannelHandler {
    sender: parking_lot::Mutex<mpsc::Sender<DropEvent>>,
}

impl EventHandler for ChannelHandler {
    fn on_event(&self, event: DropEvent) {
        // A dropped receiver just stops listening.
        let _ = self.sender.lock().send(event);
    }
}

/// Event dispatcher for managing multiple handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        EventDispatcher::default()
    }

    /// Adds an event handler.
    pub fn add_handler(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.write().push(handler);
    }

    /// Returns a receiver getting every event dispatched from now on.
    pub fn subscribe(&self) -> mpsc::Receiver<DropEvent> {
        let (sender, receiver) = mpsc::channel();
        self.add_handler(Arc::new(ChannelHandler {
            sender: parking_lot::Mutex::new(sender),
        }));
        receiver
    }

    /// Removes all handlers.
    pub fn clear_handlers(&self) {
        self.handlers.write().clear();
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: DropEvent) {
        let handlers = self.handlers.read().clone();
        for handler in &handlers {
            handler.on_event(event.clone());
        }
    }
}
