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

//! wirewizard-core: Discovery and inspection of locally configured WireGuard
//! interfaces.
//!
//! Every operation is a self-contained, blocking request. The search
//! directories are passed in explicitly and the device-control backend is a
//! type parameter, so nothing here keeps state between calls.

pub mod assemble;
pub mod conf;
pub mod device;
pub mod discovery;
pub mod format;
pub mod keys;
pub mod settings;

pub use assemble::{LookupError, assemble_config, assemble_stats, read_config, read_stats};
pub use device::{CurrentClient, Device, DeviceClient, DeviceError, Peer};
pub use discovery::discover;
pub use settings::{SearchPaths, Settings, SettingsError};
