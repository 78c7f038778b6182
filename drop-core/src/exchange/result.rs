// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Send results.
//!
//! Append-only: one [`ContactSendResult`] per contact in send order, and
//! one status code per relay URL of that contact. No pass/fail verdict is
//! computed here.

use crate::contact::Contact;

/// Status codes obtained for one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSendResult {
    contact_key_id: String,
    status_codes: Vec<u16>,
}

impl ContactSendResult {
    pub fn new(contact: &Contact) -> Self {
        ContactSendResult {
            contact_key_id: contact.key_id().to_string(),
            status_codes: Vec::new(),
        }
    }

    pub fn push_status(&mut self, status: u16) {
        self.status_codes.push(status);
    }

    pub fn contact_key_id(&self) -> &str {
        &self.contact_key_id
    }

    /// One code per relay URL, in the contact's URL order.
    pub fn status_codes(&self) -> &[u16] {
        &self.status_codes
    }
}

/// Outcome of sending one message to a set of contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendResult {
    contacts: Vec<ContactSendResult>,
}

impl SendResult {
    pub fn new() -> Self {
        SendResult::default()
    }

    pub fn push(&mut self, result: ContactSendResult) {
        self.contacts.push(result);
    }

    pub fn contact_results(&self) -> &[ContactSendResult] {
        &self.contacts
    }

    /// First result recorded for the contact with `key_id`.
    pub fn for_contact(&self, key_id: &str) -> Option<&ContactSendResult> {
        self.contacts.iter().find(|r| r.contact_key_id == key_id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactSendResult> {
        self.contacts.iter()
    }
}
