// Shared fixtures for the boundary tests. Included with `mod support;`.
#![allow(dead_code)]

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use rand::{CryptoRng, RngCore};
use wirewizard_core::{Device, DeviceClient, DeviceError, Peer};

// RFC 7748 section 6.1, Alice and Bob.
pub const ALICE_PRIVATE: &str = "dwdtCnMYpX08FsFyUbJmRd9ML4frwJkqsXf7pR25LCo=";
pub const ALICE_PUBLIC: &str = "hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo=";
pub const BOB_PUBLIC: &str = "3p7bfXt9wbTTW2HC7OQ1Nz+DQ8hbeGdNrfx+FG+IK08=";

/// Every name resolves to the same device with one peer.
pub struct LiveClient;

impl DeviceClient for LiveClient {
    fn open() -> Result<Self, DeviceError> {
        Ok(LiveClient)
    }

    fn device(&mut self, _name: &str) -> Result<Device, DeviceError> {
        Ok(Device {
            private_key: Some([1; 32]),
            public_key: Some([2; 32]),
            listen_port: 51820,
            peers: vec![Peer {
                public_key: [3; 32],
                endpoint: Some(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)), 51820)),
                allowed_ips: vec![(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)), 24)],
                last_handshake: Duration::ZERO,
                rx_bytes: 1_536,
                tx_bytes: 0,
            }],
        })
    }
}

/// Opens, but knows no devices.
pub struct EmptyClient;

impl DeviceClient for EmptyClient {
    fn open() -> Result<Self, DeviceError> {
        Ok(EmptyClient)
    }

    fn device(&mut self, name: &str) -> Result<Device, DeviceError> {
        Err(DeviceError::Lookup {
            name: name.into(),
            reason: "no such device".into(),
        })
    }
}

pub struct BrokenRng;

impl RngCore for BrokenRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {}

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
        Err(rand::Error::new("entropy source unavailable"))
    }
}

impl CryptoRng for BrokenRng {}

pub fn write_conf(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(format!("{name}.conf")), contents).unwrap();
}
