// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Send Command Boundary
//!
//! Sending is requested through a bounded command channel that must have
//! exactly one listener. Delivering a send command to nobody, or to two
//! handlers, would silently drop or duplicate a message, so both cases
//! fail loudly with [`DropError::ListenerCardinality`].
//!
//! Each binding opens its own channel and closes it when the listener is
//! dropped, so a command can only ever reach the listener that was bound
//! when it was queued. [`DropSender`] fails when no listener is bound and
//! waits for the handler's reply, so send-time errors reach the caller.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::contact::Contact;
use crate::error::{DropError, DropResult};
use crate::exchange::SendResult;
use crate::message::{DropMessage, ModelObject};

/// A request to send one message to a set of contacts.
#[derive(Debug)]
pub struct SendCommand {
    message: DropMessage,
    contacts: Vec<Contact>,
    reply: SyncSender<DropResult<SendResult>>,
}

impl SendCommand {
    pub fn message(&self) -> &DropMessage {
        &self.message
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Sends the outcome back to the waiting sender.
    pub fn respond(self, result: DropResult<SendResult>) {
        // The sender may have given up waiting.
        let _ = self.reply.send(result);
    }
}

pub(crate) enum Command {
    Send(SendCommand),
    Shutdown,
}

struct BusState {
    capacity: usize,
    /// Sending end of the bound listener's channel.
    slot: Mutex<Option<SyncSender<Command>>>,
}

/// The send command channel.
#[derive(Clone)]
pub struct SendCommandBus {
    state: Arc<BusState>,
}

impl std::fmt::Debug for SendCommandBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendCommandBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl SendCommandBus {
    /// Creates a bus queuing at most `capacity` commands.
    pub fn new(capacity: usize) -> Self {
        SendCommandBus {
            state: Arc::new(BusState {
                capacity,
                slot: Mutex::new(None),
            }),
        }
    }

    /// Binds the single listener.
    ///
    /// Fails while another listener is bound.
    pub fn bind(&self) -> DropResult<SendCommandListener> {
        let mut slot = self.state.slot.lock();
        if slot.is_some() {
            return Err(DropError::ListenerCardinality { listeners: 2 });
        }

        let (sender, receiver) = mpsc::sync_channel(self.state.capacity);
        *slot = Some(sender);
        Ok(SendCommandListener {
            receiver,
            state: self.state.clone(),
        })
    }

    pub fn listener_count(&self) -> usize {
        usize::from(self.state.slot.lock().is_some())
    }

    /// Returns a handle for issuing send commands.
    pub fn sender(&self) -> DropSender {
        DropSender {
            state: self.state.clone(),
        }
    }

    /// Asks the bound listener to stop after the queued commands.
    pub(crate) fn shutdown(&self) {
        let sender = self.state.slot.lock().clone();
        if let Some(sender) = sender {
            let _ = sender.send(Command::Shutdown);
        }
    }
}

/// The bound end of the send command channel.
///
/// Dropping the listener unbinds it and closes its channel. The bus can
/// then be bound again, starting from an empty queue.
pub struct SendCommandListener {
    receiver: Receiver<Command>,
    state: Arc<BusState>,
}

impl SendCommandListener {
    /// Blocks for the next send command.
    ///
    /// Returns `None` once the bus is shut down.
    pub fn next_command(&self) -> Option<SendCommand> {
        match self.receiver.recv() {
            Ok(Command::Send(command)) => Some(command),
            Ok(Command::Shutdown) | Err(_) => None,
        }
    }
}

impl Drop for SendCommandListener {
    fn drop(&mut self) {
        *self.state.slot.lock() = None;
        // Nobody will handle what is still queued. Anything sent after the
        // drain is dropped with the receiver and fails on the sender side.
        while let Ok(command) = self.receiver.try_recv() {
            if let Command::Send(command) = command {
                command.respond(Err(DropError::ListenerCardinality { listeners: 0 }));
            }
        }
    }
}

/// Handle for sending drops through the command channel.
#[derive(Clone)]
pub struct DropSender {
    state: Arc<BusState>,
}

impl std::fmt::Debug for DropSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropSender").finish_non_exhaustive()
    }
}

impl DropSender {
    /// Sends `message` to every contact and waits for the per-contact
    /// status codes.
    pub fn send(&self, message: DropMessage, contacts: Vec<Contact>) -> DropResult<SendResult> {
        let sender = self.state.slot.lock().clone();
        let Some(sender) = sender else {
            return Err(DropError::ListenerCardinality { listeners: 0 });
        };

        let (reply, response) = mpsc::sync_channel(1);
        let command = SendCommand {
            message,
            contacts,
            reply,
        };
        // Blocks while the queue is full; fails once the listener is gone.
        if sender.send(Command::Send(command)).is_err() {
            debug!("send command listener went away before queuing");
            return Err(DropError::ListenerCardinality { listeners: 0 });
        }
        drop(sender);

        response.recv().unwrap_or_else(|_| {
            debug!("send command dropped without reply");
            Err(DropError::ListenerCardinality { listeners: 0 })
        })
    }

    /// Sends `message` to a single contact.
    pub fn send_to(&self, message: DropMessage, contact: &Contact) -> DropResult<SendResult> {
        self.send(message, vec![contact.clone()])
    }

    /// Wraps `object` in a message from the contact's owner and sends it.
    pub fn send_object<T: ModelObject>(
        &self,
        object: &T,
        contact: &Contact,
    ) -> DropResult<SendResult> {
        let message = DropMessage::new(contact.owner(), object)?;
        self.send_to(message, contact)
    }
}
