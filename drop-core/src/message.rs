// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Drop Messages
//!
//! The logical content of a drop: a typed payload plus the key identifier
//! of the identity claiming to have sent it. A received message is only
//! authenticated once it has been bound to a known contact whose key
//! identifier matches the declared sender.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::contact::Contact;
use crate::error::{DropError, DropResult};
use crate::identity::Identity;

/// Drop message format version.
pub const DROP_MESSAGE_VERSION: u32 = 1;

/// A payload type that can travel inside a drop.
///
/// `MODEL_NAME` is carried on the wire so receivers can dispatch on it.
pub trait ModelObject: Serialize + DeserializeOwned {
    const MODEL_NAME: &'static str;
}

/// A drop message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropMessage {
    version: u32,
    /// Unix timestamp when the message was created.
    created_at: u64,
    /// Identifier a receiver may acknowledge.
    acknowledge_id: String,
    /// Declared sender key identifier.
    sender: String,
    /// Payload type name.
    model_object: String,
    /// Payload.
    data: serde_json::Value,
    /// Verified sending contact, set once on acceptance.
    #[serde(skip)]
    sender_contact: Option<Contact>,
}

impl PartialEq for DropMessage {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.created_at == other.created_at
            && self.acknowledge_id == other.acknowledge_id
            && self.sender == other.sender
            && self.model_object == other.model_object
            && self.data == other.data
    }
}

impl DropMessage {
    /// Wraps `object` into a message declared as sent by `sender`.
    pub fn new<T: ModelObject>(sender: &Identity, object: &T) -> DropResult<Self> {
        let data = serde_json::to_value(object)?;
        Ok(Self::from_parts(sender.key_id(), T::MODEL_NAME, data))
    }

    /// Builds a message from an already serialized payload.
    pub fn from_parts(sender_key_id: String, model_object: &str, data: serde_json::Value) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        DropMessage {
            version: DROP_MESSAGE_VERSION,
            created_at,
            acknowledge_id: uuid::Uuid::new_v4().to_string(),
            sender: sender_key_id,
            model_object: model_object.to_string(),
            data,
            sender_contact: None,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn acknowledge_id(&self) -> &str {
        &self.acknowledge_id
    }

    /// Key identifier the message claims as its sender.
    pub fn sender_key_id(&self) -> &str {
        &self.sender
    }

    pub fn model_object(&self) -> &str {
        &self.model_object
    }

    /// Raw JSON payload.
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Decodes the payload as `T`.
    ///
    /// Fails if the message carries another model type.
    pub fn payload<T: ModelObject>(&self) -> DropResult<T> {
        if self.model_object != T::MODEL_NAME {
            return Err(DropError::Serialization(format!(
                "expected model object {}, found {}",
                T::MODEL_NAME,
                self.model_object
            )));
        }
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Binds the message to the contact that sent it.
    ///
    /// Succeeds only once, and only for a contact whose key identifier
    /// equals the declared sender.
    pub fn register_sender(&mut self, contact: &Contact) -> bool {
        if self.sender_contact.is_some() || contact.key_id() != self.sender {
            return false;
        }
        self.sender_contact = Some(contact.clone());
        true
    }

    /// The verified sending contact, if the message has been accepted.
    pub fn sender_contact(&self) -> Option<&Contact> {
        self.sender_contact.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sender_contact.is_some()
    }

    /// Serializes the message (without its sender binding).
    pub fn to_json(&self) -> DropResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parses a serialized message. The result is unauthenticated.
    pub fn from_json(bytes: &[u8]) -> DropResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
