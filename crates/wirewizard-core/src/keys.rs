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

//! Curve25519 keys as WireGuard encodes them: 32 raw bytes, standard base64.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

use wirewizard_types::KeyPairText;

pub const KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to decode base64 key: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to read random bytes: {0}")]
    Entropy(#[from] rand::Error),
}

pub fn encode_key(bytes: &[u8; KEY_LEN]) -> String {
    BASE64.encode(bytes)
}

pub fn decode_key(b64: &str) -> Result<[u8; KEY_LEN], KeyError> {
    let bytes = BASE64.decode(b64)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| KeyError::InvalidLength(len))
}

#[derive(Clone)]
pub struct PrivateKey([u8; KEY_LEN]);

impl PrivateKey {
    /// Draw a fresh key from `rng` and clamp it the way `wg genkey` does.
    pub fn generate_from<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, GenerateError> {
        let mut bytes = [0u8; KEY_LEN];
        rng.try_fill_bytes(&mut bytes)?;
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
        Ok(Self(bytes))
    }

    pub fn from_base64(b64: &str) -> Result<Self, KeyError> {
        decode_key(b64).map(Self)
    }

    pub fn public_key(&self) -> PublicKey {
        let secret = StaticSecret::from(self.0);
        PublicKey(X25519PublicKey::from(&secret).to_bytes())
    }

    pub fn to_base64(&self) -> String {
        encode_key(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey([u8; KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_base64(&self) -> String {
        encode_key(&self.0)
    }
}

/// Generate a key pair from the OS random source.
pub fn generate() -> Result<KeyPairText, GenerateError> {
    generate_with(&mut OsRng)
}

pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<KeyPairText, GenerateError> {
    let private = PrivateKey::generate_from(rng)?;
    Ok(KeyPairText {
        public_key: private.public_key().to_base64(),
        private_key: private.to_base64(),
    })
}
