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

//! Line scanner for `<interface>.conf` files.
//!
//! Only `Key = Value` lines starting at column zero are recognised. Every
//! candidate file is read in search order and a later assignment overwrites
//! an earlier one, so the last file that defines a key wins.

use std::fs;

use tracing::debug;

use crate::settings::SearchPaths;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfFields {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
    pub dns: String,
    pub persistent_keepalive: String,
    pub preshared_key: String,
}

impl ConfFields {
    pub fn read(paths: &SearchPaths, name: &str) -> Self {
        let mut fields = Self::default();
        for path in paths.config_files(name) {
            match fs::read(&path) {
                Ok(bytes) => {
                    debug!(path = %path.display(), "scanning configuration file");
                    fields.apply(&String::from_utf8_lossy(&bytes));
                }
                Err(e) => debug!(path = %path.display(), error = %e, "skipping configuration file"),
            }
        }
        fields
    }

    pub fn apply(&mut self, contents: &str) {
        for line in contents.lines() {
            self.apply_line(line);
        }
    }

    fn apply_line(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(" = ") else {
            return;
        };
        let slot = match key {
            "PrivateKey" => &mut self.private_key,
            "PublicKey" => &mut self.public_key,
            "Address" => &mut self.address,
            "DNS" => &mut self.dns,
            "PersistentKeepalive" => &mut self.persistent_keepalive,
            "PresharedKey" => &mut self.preshared_key,
            _ => return,
        };
        *slot = value.to_string();
    }
}
