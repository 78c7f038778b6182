// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Drop Core Library
//!
//! Message exchange core of a decentralized encrypted messaging protocol.
//! Peers deposit encrypted envelopes ("drops") on untrusted relay servers;
//! recipients poll the relays, decrypt what is addressed to them and
//! authenticate the sender against their contacts.
//!
//! All cryptographic operations use the audited `ring` crate, plus
//! `x25519-dalek` and `chacha20poly1305` for envelope encryption.

pub mod codec;
pub mod command;
pub mod config;
pub mod contact;
pub mod crypto;
pub mod error;
pub mod events;
pub mod exchange;
pub mod identity;
pub mod message;
pub mod network;
pub mod registry;
pub mod relay;

pub use codec::{BinaryDropMessageV0, DecodeError, DropFormat, FormatRegistry, SealedDrop, V0Format};
pub use command::{DropSender, SendCommand, SendCommandBus, SendCommandListener};
pub use config::DropConfig;
pub use contact::Contact;
pub use crypto::{CryptoError, PublicKey, Signature, SigningKeyPair, SymmetricKey};
pub use error::{DropError, DropResult};
pub use events::{CallbackHandler, DropEvent, EventDispatcher, EventHandler};
pub use exchange::{
    BlobOutcome, ContactSendResult, DeliveryMode, DropExchange, DropExchangeBuilder, Retrieval,
    RunningExchange, SendResult, SkipReason,
};
pub use identity::Identity;
pub use message::{DropMessage, ModelObject};
pub use network::{DropTransport, MockTransport, NetworkError, STATUS_UNREACHABLE};
pub use registry::{DropRegistry, DropSnapshot};
pub use relay::{DropServer, DropServers, DropUrl};
