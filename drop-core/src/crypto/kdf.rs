// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! HKDF Key Derivation Function
//!
//! HKDF-SHA256 (RFC 5869) on top of `ring::hkdf`. Envelope keys and
//! per-identity exchange seeds are both 32 bytes.

use ring::hkdf::{Salt, HKDF_SHA256};

use super::CryptoError;

/// HKDF-SHA256 key derivation.
pub struct HKDF;

impl HKDF {
    /// Extract-then-Expand producing a 32-byte key.
    ///
    /// If salt is None, uses a string of HashLen zeros.
    pub fn derive_key(
        salt: Option<&[u8]>,
        ikm: &[u8],
        info: &[u8],
    ) -> Result<[u8; 32], CryptoError> {
        let salt = Salt::new(HKDF_SHA256, salt.unwrap_or(&[0u8; 32]));
        let info = [info];
        let prk = salt.extract(ikm);
        let okm = prk
            .expand(&info, HKDF_SHA256)
            .map_err(|_| CryptoError::InvalidKey)?;

        let mut key = [0u8; 32];
        okm.fill(&mut key).map_err(|_| CryptoError::InvalidKey)?;
        Ok(key)
    }
}
