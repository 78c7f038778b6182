// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration Tests for Drop Core
//!
//! These tests run complete exchanges: two parties sharing relays, the
//! background poller, and the send command listener.
//!
//! Run with: cargo test --test integration

mod poller_workflow_test;
mod relay_roundtrip_test;
