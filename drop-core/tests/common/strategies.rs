// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Adversarial relay content.

use drop_core::codec::v0;
use proptest::prelude::*;

/// Arbitrary bytes of any plausible upload size.
pub fn arbitrary_blob() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

/// Correctly sized version 0 frames with random contents.
pub fn random_v0_frame() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), v0::MESSAGE_SIZE - 1).prop_map(|rest| {
        let mut blob = Vec::with_capacity(v0::MESSAGE_SIZE);
        blob.push(v0::VERSION);
        blob.extend(rest);
        blob
    })
}

/// Blobs whose version tag is not registered by default.
pub fn unknown_version_blob() -> impl Strategy<Value = Vec<u8>> {
    (1u8..=255, prop::collection::vec(any::<u8>(), 0..2100)).prop_map(|(version, rest)| {
        let mut blob = vec![version];
        blob.extend(rest);
        blob
    })
}
