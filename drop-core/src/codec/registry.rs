// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Format Registry
//!
//! Maps version bytes to envelope formats and names the format used for
//! outgoing drops.

use std::collections::HashMap;
use std::sync::Arc;

use super::v0::V0Format;
use super::DropFormat;
use crate::error::{DropError, DropResult};

/// Version byte → format lookup.
#[derive(Clone)]
pub struct FormatRegistry {
    formats: HashMap<u8, Arc<dyn DropFormat>>,
    outbound: Arc<dyn DropFormat>,
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut versions: Vec<_> = self.formats.keys().copied().collect();
        versions.sort_unstable();
        f.debug_struct("FormatRegistry")
            .field("versions", &versions)
            .field("outbound", &self.outbound.version())
            .finish()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        FormatRegistry::new(Arc::new(V0Format))
    }
}

impl FormatRegistry {
    /// Creates a registry with `outbound` as the only and outgoing format.
    pub fn new(outbound: Arc<dyn DropFormat>) -> Self {
        let mut formats = HashMap::new();
        formats.insert(outbound.version(), outbound.clone());
        FormatRegistry { formats, outbound }
    }

    /// Registers a format under its own version, replacing any previous one.
    pub fn register(&mut self, format: Arc<dyn DropFormat>) {
        self.formats.insert(format.version(), format);
    }

    /// Selects the format used for outgoing drops. It must be registered.
    pub fn set_outbound(&mut self, version: u8) -> DropResult<()> {
        let format = self.formats.get(&version).cloned().ok_or_else(|| {
            DropError::InvalidConfiguration(format!("no format registered for version {version}"))
        })?;
        self.outbound = format;
        Ok(())
    }

    /// Looks up the format for a version byte.
    pub fn get(&self, version: u8) -> Option<&Arc<dyn DropFormat>> {
        self.formats.get(&version)
    }

    /// Format used for outgoing drops.
    pub fn outbound(&self) -> &Arc<dyn DropFormat> {
        &self.outbound
    }

    pub fn versions(&self) -> Vec<u8> {
        let mut versions: Vec<_> = self.formats.keys().copied().collect();
        versions.sort_unstable();
        versions
    }
}
