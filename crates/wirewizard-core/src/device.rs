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

//! Read-only access to live WireGuard devices.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("not supported on this platform")]
    Unsupported,

    #[error("failed to open device-control socket: {0}")]
    Connect(String),

    #[error("device {name} unavailable: {reason}")]
    Lookup { name: String, reason: String },
}

/// Snapshot of a device as reported by the kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub private_key: Option<[u8; 32]>,
    pub public_key: Option<[u8; 32]>,
    pub listen_port: u16,
    pub peers: Vec<Peer>,
}

impl Device {
    pub fn first_peer(&self) -> Option<&Peer> {
        self.peers.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peer {
    pub public_key: [u8; 32],
    pub endpoint: Option<SocketAddr>,
    pub allowed_ips: Vec<(IpAddr, u8)>,
    /// Time since the Unix epoch; zero when no handshake happened yet.
    pub last_handshake: Duration,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl Peer {
    /// `addr/prefix` ranges joined with `,` in device order.
    pub fn allowed_ips_text(&self) -> String {
        self.allowed_ips
            .iter()
            .map(|(addr, prefix)| format!("{addr}/{prefix}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A handle on the device-control facility, closed when dropped.
pub trait DeviceClient: Sized {
    fn open() -> Result<Self, DeviceError>;
    fn device(&mut self, name: &str) -> Result<Device, DeviceError>;
}

#[cfg(target_os = "linux")]
pub type CurrentClient = linux::UapiClient;

#[cfg(not(target_os = "linux"))]
pub type CurrentClient = StubClient;

// -- Stub client for non-Linux --

pub struct StubClient;

impl DeviceClient for StubClient {
    fn open() -> Result<Self, DeviceError> {
        Err(DeviceError::Unsupported)
    }

    fn device(&mut self, _name: &str) -> Result<Device, DeviceError> {
        Err(DeviceError::Unsupported)
    }
}

// -- Linux implementation --

#[cfg(target_os = "linux")]
pub mod linux {
    use tracing::debug;
    use wireguard_uapi::{DeviceInterface, WgSocket, get};

    use super::{Device, DeviceClient, DeviceError, Peer};

    /// Generic-netlink client; the socket closes with the value.
    pub struct UapiClient {
        socket: WgSocket,
    }

    impl DeviceClient for UapiClient {
        fn open() -> Result<Self, DeviceError> {
            let socket = WgSocket::connect().map_err(|e| DeviceError::Connect(e.to_string()))?;
            Ok(Self { socket })
        }

        fn device(&mut self, name: &str) -> Result<Device, DeviceError> {
            let device = self
                .socket
                .get_device(DeviceInterface::from_name(name))
                .map_err(|e| DeviceError::Lookup {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;

            debug!(
                interface = name,
                listen_port = device.listen_port,
                peer_count = device.peers.len(),
                "read wireguard device"
            );
            Ok(snapshot(device))
        }
    }

    fn snapshot(device: get::Device) -> Device {
        Device {
            private_key: device.private_key,
            public_key: device.public_key,
            listen_port: device.listen_port,
            peers: device.peers.into_iter().map(snapshot_peer).collect(),
        }
    }

    fn snapshot_peer(peer: get::Peer) -> Peer {
        Peer {
            public_key: peer.public_key,
            endpoint: peer.endpoint,
            allowed_ips: peer
                .allowed_ips
                .into_iter()
                .map(|ip| (ip.ipaddr, ip.cidr_mask))
                .collect(),
            last_handshake: peer.last_handshake_time,
            rx_bytes: peer.rx_bytes,
            tx_bytes: peer.tx_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn allowed_ips_keep_device_order() {
        let peer = Peer {
            allowed_ips: vec![
                (IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)), 24),
                (IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
                (IpAddr::V4(Ipv4Addr::new(192, 168, 1, 7)), 32),
            ],
            ..Default::default()
        };
        assert_eq!(peer.allowed_ips_text(), "10.0.0.0/24,::/0,192.168.1.7/32");
    }

    #[test]
    fn no_allowed_ips_is_empty() {
        assert_eq!(Peer::default().allowed_ips_text(), "");
    }

    #[test]
    fn stub_never_opens() {
        assert!(matches!(StubClient::open(), Err(DeviceError::Unsupported)));
    }
}
