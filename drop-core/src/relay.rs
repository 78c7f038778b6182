// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Relay Servers
//!
//! Drop URLs and the set of relay servers that are polled for incoming
//! drops. Servers are unique by URL; insertion order carries no meaning.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DropError, DropResult};

/// Validated relay URL (`http` or `https`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DropUrl {
    url: String,
}

impl DropUrl {
    /// Parses and validates a relay URL.
    pub fn parse(input: &str) -> DropResult<Self> {
        let parsed = Url::parse(input).map_err(|e| DropError::InvalidUrl(format!("{input}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DropError::InvalidUrl(format!(
                    "{input}: unsupported scheme {other}"
                )))
            }
        }
        if parsed.host_str().is_none() {
            return Err(DropError::InvalidUrl(format!("{input}: missing host")));
        }

        Ok(DropUrl {
            url: parsed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for DropUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl FromStr for DropUrl {
    type Err = DropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DropUrl::parse(s)
    }
}

impl TryFrom<String> for DropUrl {
    type Error = DropError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DropUrl::parse(&value)
    }
}

impl From<DropUrl> for String {
    fn from(value: DropUrl) -> Self {
        value.url
    }
}

/// A relay server that is polled for drops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropServer {
    url: DropUrl,
}

impl DropServer {
    pub fn new(url: DropUrl) -> Self {
        DropServer { url }
    }

    pub fn url(&self) -> &DropUrl {
        &self.url
    }
}

/// Set of configured relay servers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropServers {
    #[serde(default)]
    servers: HashSet<DropServer>,
}

impl DropServers {
    /// Creates an empty set.
    pub fn new() -> Self {
        DropServers::default()
    }

    /// Adds a server. Returns false if it was already present.
    pub fn insert(&mut self, server: DropServer) -> bool {
        self.servers.insert(server)
    }

    /// Adds a server (builder style).
    pub fn with_server(mut self, server: DropServer) -> Self {
        self.servers.insert(server);
        self
    }

    /// Removes a server. Returns false if it was not present.
    pub fn remove(&mut self, server: &DropServer) -> bool {
        self.servers.remove(server)
    }

    pub fn contains(&self, server: &DropServer) -> bool {
        self.servers.contains(server)
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropServer> {
        self.servers.iter()
    }
}

impl FromIterator<DropServer> for DropServers {
    fn from_iter<I: IntoIterator<Item = DropServer>>(iter: I) -> Self {
        DropServers {
            servers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_urls() {
        assert!(DropUrl::parse("https://drop.example/x0ZbQ").is_ok());
        assert!(DropUrl::parse("http://localhost:5000/abc").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_urls() {
        assert!(matches!(
            DropUrl::parse("not a url"),
            Err(DropError::InvalidUrl(_))
        ));
        assert!(matches!(
            DropUrl::parse("ftp://drop.example/abc"),
            Err(DropError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_servers_unique_by_url() {
        let url = DropUrl::parse("https://drop.example/abc").unwrap();
        let mut servers = DropServers::new();

        assert!(servers.is_empty());
        assert!(servers.insert(DropServer::new(url.clone())));
        assert!(!servers.insert(DropServer::new(url)));
        assert_eq!(servers.len(), 1);
    }

    #[test]
    fn test_servers_equality_ignores_order() {
        let a = DropServer::new(DropUrl::parse("https://a.example/1").unwrap());
        let b = DropServer::new(DropUrl::parse("https://b.example/1").unwrap());

        let first: DropServers = vec![a.clone(), b.clone()].into_iter().collect();
        let second = DropServers::new().with_server(b).with_server(a);

        assert_eq!(first, second);
    }

    #[test]
    fn test_drop_url_serde() {
        let url = DropUrl::parse("https://drop.example/abc").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://drop.example/abc\"");

        let bad: Result<DropUrl, _> = serde_json::from_str("\"mailto:x@example\"");
        assert!(bad.is_err());
    }
}
