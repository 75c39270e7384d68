// Copyright (C) 2025 Joseph Sacchini
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU Affero General Public License as published by the Free
// Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! wirewizard-types: Record types reported for locally configured WireGuard
//! interfaces.
//!
//! These are plain owned values. The C boundary flattens them into its own
//! `#[repr(C)]` layouts; the CLI serializes them as JSON.

#![warn(missing_docs)]

use serde::Serialize;

/// Interface names discovered in the search locations, in scan order.
///
/// Never empty: discovery reports `None` instead of an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InterfaceList(Vec<String>);

impl InterfaceList {
    /// Wrap a list of names, returning `None` when there are none.
    pub fn new(names: Vec<String>) -> Option<Self> {
        if names.is_empty() { None } else { Some(Self(names)) }
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the names in order.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Take ownership of the names.
    pub fn into_names(self) -> Vec<String> {
        self.0
    }
}

/// Local side of a [`ConfigRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceSection {
    /// Base64 private key, empty when unknown.
    pub private_key: String,
    /// Base64 public key.
    pub public_key: String,
    /// UDP listen port, 0 when unknown.
    pub listen_port: u16,
    /// `Address` line of the configuration file.
    pub address: String,
    /// `DNS` line of the configuration file.
    pub dns: String,
}

/// Remote side of a [`ConfigRecord`]. Only the first peer is ever reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeerSection {
    /// Base64 public key of the peer.
    pub public_key: String,
    /// `host:port` of the peer, empty when the device has none.
    pub endpoint: String,
    /// Allowed-IP ranges as `addr/prefix`, comma-joined in device order.
    pub allowed_ips: String,
    /// `PersistentKeepalive` line of the configuration file.
    pub persistent_keepalive: String,
    /// `PresharedKey` line of the configuration file.
    pub preshared_key: String,
}

/// Identity and addressing of one interface and its first peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigRecord {
    /// Interface fields.
    pub interface: InterfaceSection,
    /// First-peer fields.
    pub peer: PeerSection,
}

/// Live statistics of an interface's first peer, already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsRecord {
    /// e.g. `"1 minute, 30 seconds ago"`, `"now"` or `"never"`.
    pub last_handshake: String,
    /// e.g. `"1.50 KB received, 0.00 B sent"`.
    pub transfer: String,
}

/// A freshly generated key pair rendered as base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPairText {
    /// Base64 private key.
    pub private_key: String,
    /// Base64 public key derived from `private_key`.
    pub public_key: String,
}
