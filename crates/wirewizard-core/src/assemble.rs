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

//! Assembly of [`ConfigRecord`] and [`StatsRecord`] from a live device and
//! the on-disk configuration files.
//!
//! `assemble_*` return the reason a record could not be built; `read_*` are
//! the absence-only views used by the C boundary and log the reason at debug
//! level.

use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;
use wirewizard_types::{ConfigRecord, InterfaceSection, PeerSection, StatsRecord};

use crate::conf::ConfFields;
use crate::device::{Device, DeviceClient, DeviceError};
use crate::format;
use crate::keys::{KeyError, PrivateKey, encode_key};
use crate::settings::SearchPaths;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("device-control client unavailable: {0}")]
    ClientUnavailable(#[source] DeviceError),

    #[error(transparent)]
    NotLive(DeviceError),

    #[error("device {0} has no peers")]
    NoPeers(String),

    #[error("no key pair in configuration files for {0}")]
    NoKeys(String),

    #[error("invalid private key in configuration files for {name}: {source}")]
    InvalidPrivateKey {
        name: String,
        #[source]
        source: KeyError,
    },
}

/// Build the configuration record for `name`.
///
/// A live device with at least one peer supplies keys, port and the first
/// peer; address, DNS, keepalive and preshared key come from the files. When
/// the device cannot be found the key pair is recovered from the files alone.
pub fn assemble_config<C: DeviceClient>(
    paths: &SearchPaths,
    name: &str,
) -> Result<ConfigRecord, LookupError> {
    let mut client = C::open().map_err(LookupError::ClientUnavailable)?;

    match client.device(name) {
        Ok(device) => live_config(paths, name, &device),
        Err(e) => {
            debug!(interface = name, error = %e, "device not live, reading keys from files");
            file_config(paths, name)
        }
    }
}

pub fn read_config<C: DeviceClient>(paths: &SearchPaths, name: &str) -> Option<ConfigRecord> {
    absent_on_error(name, assemble_config::<C>(paths, name))
}

fn live_config(
    paths: &SearchPaths,
    name: &str,
    device: &Device,
) -> Result<ConfigRecord, LookupError> {
    let peer = device
        .first_peer()
        .ok_or_else(|| LookupError::NoPeers(name.to_string()))?;
    let fields = ConfFields::read(paths, name);

    Ok(ConfigRecord {
        interface: InterfaceSection {
            private_key: device.private_key.as_ref().map(encode_key).unwrap_or_default(),
            public_key: device.public_key.as_ref().map(encode_key).unwrap_or_default(),
            listen_port: device.listen_port,
            address: fields.address,
            dns: fields.dns,
        },
        peer: PeerSection {
            public_key: encode_key(&peer.public_key),
            endpoint: peer.endpoint.map(|ep| ep.to_string()).unwrap_or_default(),
            allowed_ips: peer.allowed_ips_text(),
            persistent_keepalive: fields.persistent_keepalive,
            preshared_key: fields.preshared_key,
        },
    })
}

// The file's PublicKey line belongs to the [Peer] section, so the interface
// key is always derived from PrivateKey.
fn file_config(paths: &SearchPaths, name: &str) -> Result<ConfigRecord, LookupError> {
    let fields = ConfFields::read(paths, name);
    if fields.private_key.is_empty() || fields.public_key.is_empty() {
        return Err(LookupError::NoKeys(name.to_string()));
    }

    let private = PrivateKey::from_base64(&fields.private_key).map_err(|source| {
        LookupError::InvalidPrivateKey {
            name: name.to_string(),
            source,
        }
    })?;

    Ok(ConfigRecord {
        interface: InterfaceSection {
            public_key: private.public_key().to_base64(),
            ..Default::default()
        },
        peer: PeerSection {
            public_key: fields.public_key,
            ..Default::default()
        },
    })
}

/// Build the statistics record for `name` as of `now`. Only a live device
/// with at least one peer has statistics.
pub fn assemble_stats<C: DeviceClient>(
    name: &str,
    now: SystemTime,
) -> Result<StatsRecord, LookupError> {
    let mut client = C::open().map_err(LookupError::ClientUnavailable)?;
    let device = client.device(name).map_err(LookupError::NotLive)?;
    let peer = device
        .first_peer()
        .ok_or_else(|| LookupError::NoPeers(name.to_string()))?;

    Ok(StatsRecord {
        last_handshake: format::handshake_age(peer.last_handshake, now),
        transfer: format::transfer(peer.rx_bytes, peer.tx_bytes),
    })
}

pub fn read_stats<C: DeviceClient>(name: &str) -> Option<StatsRecord> {
    absent_on_error(name, assemble_stats::<C>(name, SystemTime::now()))
}

fn absent_on_error<T>(name: &str, result: Result<T, LookupError>) -> Option<T> {
    result
        .inspect_err(|e| debug!(interface = name, error = %e, "reporting interface as absent"))
        .ok()
}
