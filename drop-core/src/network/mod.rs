// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network + Transport Layer
//!
//! Relays are dumb blob stores: a drop is posted to a relay URL and every
//! pending blob can be fetched back from it. The [`DropTransport`] trait
//! abstracts the concrete protocol; [`MockTransport`] is an in-memory
//! relay for tests.
//!
//! # Example
//!
//! ```ignore
//! use drop_core::network::{DropTransport, MockTransport};
//!
//! let transport = MockTransport::new();
//! let status = transport.post(&url, &envelope)?;
//! let blobs = transport.fetch(&url)?;
//! ```

mod error;
mod mock;
mod transport;

pub use error::NetworkError;
pub use mock::MockTransport;
pub use transport::{DropTransport, TransportResult, STATUS_UNREACHABLE};
