// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Relay, Identity and Contact Registry
//!
//! The relay servers, own identities and contacts are shared between the
//! poller and send handling. They are held as one immutable
//! [`DropSnapshot`]; readers clone the current `Arc` at the start of an
//! operation and writers publish a replacement, so an iteration never sees
//! a half-applied update.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::contact::Contact;
use crate::identity::Identity;
use crate::relay::DropServers;

/// A consistent view of the exchange configuration.
#[derive(Debug, Clone, Default)]
pub struct DropSnapshot {
    pub servers: DropServers,
    pub identities: Vec<Arc<Identity>>,
    pub contacts: Vec<Contact>,
}

/// Holder of the current [`DropSnapshot`].
#[derive(Debug, Default)]
pub struct DropRegistry {
    current: RwLock<Arc<DropSnapshot>>,
}

impl DropRegistry {
    pub fn new(snapshot: DropSnapshot) -> Self {
        DropRegistry {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<DropSnapshot> {
        self.current.read().clone()
    }

    /// Replaces the whole snapshot.
    pub fn publish(&self, snapshot: DropSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    /// Publishes a modified copy of the current snapshot.
    ///
    /// Concurrent updates are serialized, so none is lost.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut DropSnapshot),
    {
        let mut current = self.current.write();
        let mut next = (**current).clone();
        f(&mut next);
        *current = Arc::new(next);
    }

    pub fn set_drop_servers(&self, servers: DropServers) {
        self.update(|snapshot| snapshot.servers = servers);
    }

    pub fn set_identities(&self, identities: Vec<Arc<Identity>>) {
        self.update(|snapshot| snapshot.identities = identities);
    }

    pub fn set_contacts(&self, contacts: Vec<Contact>) {
        self.update(|snapshot| snapshot.contacts = contacts);
    }
}
