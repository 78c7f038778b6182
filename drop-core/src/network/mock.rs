// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock Transport
//!
//! In-memory relay implementing [`DropTransport`] for tests.

use std::collections::{HashMap, HashSet, VecDeque};

use parking_lot::Mutex;

use super::error::NetworkError;
use super::transport::{DropTransport, TransportResult};
use crate::relay::DropUrl;

/// Mock transport for testing.
///
/// Behaves like a relay: a successfully posted envelope (2xx status) is
/// stored under its URL and handed out by the next `fetch` of that URL.
/// Status codes can be scripted per URL, errors injected, and blobs queued
/// directly.
///
/// # Example
///
/// ```ignore
/// let transport = MockTransport::new();
/// transport.queue_status(&url, 500);
/// transport.queue_drop(&url, vec![7, 1, 2, 3]);
///
/// assert_eq!(transport.post(&url, &envelope)?, 500);
/// assert_eq!(transport.fetch(&url)?.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

#[derive(Debug)]
struct MockState {
    /// Every post attempt, in order.
    posted: Vec<(DropUrl, Vec<u8>)>,
    /// Scripted statuses per URL, consumed one per post.
    statuses: HashMap<DropUrl, VecDeque<u16>>,
    /// Status for posts without a scripted one.
    default_status: u16,
    /// Blobs waiting to be fetched.
    drops: HashMap<DropUrl, Vec<Vec<u8>>>,
    /// URLs whose operations always fail.
    unreachable: HashSet<DropUrl>,
    /// Error to inject on the next operation.
    inject_error: Option<NetworkError>,
    fetch_count: usize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a mock relay answering 200 to every post.
    pub fn new() -> Self {
        MockTransport {
            state: Mutex::new(MockState {
                posted: Vec::new(),
                statuses: HashMap::new(),
                default_status: 200,
                drops: HashMap::new(),
                unreachable: HashSet::new(),
                inject_error: None,
                fetch_count: 0,
            }),
        }
    }

    /// Scripts the status of the next unscripted post to `url`.
    pub fn queue_status(&self, url: &DropUrl, status: u16) {
        self.state
            .lock()
            .statuses
            .entry(url.clone())
            .or_default()
            .push_back(status);
    }

    /// Sets the status used when nothing is scripted.
    pub fn set_default_status(&self, status: u16) {
        self.state.lock().default_status = status;
    }

    /// Places a raw blob on the relay.
    pub fn queue_drop(&self, url: &DropUrl, blob: Vec<u8>) {
        self.state
            .lock()
            .drops
            .entry(url.clone())
            .or_default()
            .push(blob);
    }

    /// Makes every operation on `url` fail.
    pub fn set_unreachable(&self, url: &DropUrl) {
        self.state.lock().unreachable.insert(url.clone());
    }

    /// Injects an error to be returned on the next operation.
    pub fn inject_error(&self, error: NetworkError) {
        self.state.lock().inject_error = Some(error);
    }

    /// Returns all post attempts made so far.
    pub fn posted(&self) -> Vec<(DropUrl, Vec<u8>)> {
        self.state.lock().posted.clone()
    }

    /// Number of blobs waiting on `url`.
    pub fn pending(&self, url: &DropUrl) -> usize {
        self.state.lock().drops.get(url).map_or(0, Vec::len)
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetch_count
    }
}

impl MockState {
    fn check_error(&mut self, url: &DropUrl) -> TransportResult<()> {
        if let Some(err) = self.inject_error.take() {
            return Err(err);
        }
        if self.unreachable.contains(url) {
            return Err(NetworkError::ConnectionFailed(format!("{url} unreachable")));
        }
        Ok(())
    }
}

impl DropTransport for MockTransport {
    fn post(&self, url: &DropUrl, envelope: &[u8]) -> TransportResult<u16> {
        let mut state = self.state.lock();
        state.posted.push((url.clone(), envelope.to_vec()));
        state.check_error(url)?;

        let default_status = state.default_status;
        let status = state
            .statuses
            .get_mut(url)
            .and_then(VecDeque::pop_front)
            .unwrap_or(default_status);

        if (200..300).contains(&status) {
            state
                .drops
                .entry(url.clone())
                .or_default()
                .push(envelope.to_vec());
        }
        Ok(status)
    }

    fn fetch(&self, url: &DropUrl) -> TransportResult<Vec<Vec<u8>>> {
        let mut state = self.state.lock();
        state.fetch_count += 1;
        state.check_error(url)?;
        Ok(state.drops.remove(url).unwrap_or_default())
    }
}
