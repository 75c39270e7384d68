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

//! C ABI over wirewizard-core for the desktop front-end.
//!
//! Each exported function is an independent request. Results are allocated
//! here and owned by the caller until handed back to the matching `free*`
//! function; null means "not available" and is safe to free.

#![allow(non_snake_case)]

use std::ffi::{CStr, c_char};
use std::ptr;

use rand::{CryptoRng, RngCore};
use tracing::warn;
use wirewizard_core::{CurrentClient, DeviceClient, SearchPaths, discover, keys, settings};

pub mod logging;
pub mod response;

pub use response::{ConfigResponse, InterfacesNameResponse, StatsResponse};

fn search_paths() -> SearchPaths {
    match settings::from_env() {
        Ok(settings) => settings.search_paths(),
        Err(e) => {
            warn!(error = %e, "ignoring settings, using default search paths");
            SearchPaths::default()
        }
    }
}

/// Borrow a caller-supplied interface name; null or non-UTF-8 is `None`.
///
/// # Safety
///
/// `name` must be null or point to a NUL-terminated string that outlives the
/// returned borrow.
unsafe fn interface_name<'a>(name: *const c_char) -> Option<&'a str> {
    if name.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(name) }.to_str().ok()
}

pub fn interfaces_response(paths: &SearchPaths) -> *mut InterfacesNameResponse {
    discover(paths)
        .and_then(InterfacesNameResponse::into_raw)
        .unwrap_or(ptr::null_mut())
}

pub fn config_response<C: DeviceClient>(paths: &SearchPaths, name: &str) -> *mut ConfigResponse {
    wirewizard_core::read_config::<C>(paths, name)
        .map(ConfigResponse::into_raw)
        .unwrap_or(ptr::null_mut())
}

pub fn stats_response<C: DeviceClient>(name: &str) -> *mut StatsResponse {
    wirewizard_core::read_stats::<C>(name)
        .map(StatsResponse::into_raw)
        .unwrap_or(ptr::null_mut())
}

/// Generate a key pair into the two out-slots, or return a failure message
/// and leave them untouched.
///
/// # Safety
///
/// `priv_key` and `pub_key` must each be null or valid for a pointer write.
pub unsafe fn generate_keys_with<R: RngCore + CryptoRng>(
    rng: &mut R,
    priv_key: *mut *mut c_char,
    pub_key: *mut *mut c_char,
) -> *mut c_char {
    if priv_key.is_null() || pub_key.is_null() {
        return response::into_c_string("key output slot is null".to_string());
    }

    match keys::generate_with(rng) {
        Ok(pair) => {
            unsafe {
                *priv_key = response::into_c_string(pair.private_key);
                *pub_key = response::into_c_string(pair.public_key);
            }
            ptr::null_mut()
        }
        Err(e) => {
            warn!(error = %e, "key generation failed");
            response::into_c_string(e.to_string())
        }
    }
}

// -- Exported symbols --

#[unsafe(no_mangle)]
pub extern "C" fn readInterfacesName() -> *mut InterfacesNameResponse {
    logging::init();
    interfaces_response(&search_paths())
}

/// # Safety
///
/// `name` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn readConfig(name: *const c_char) -> *mut ConfigResponse {
    logging::init();
    match unsafe { interface_name(name) } {
        Some(name) => config_response::<CurrentClient>(&search_paths(), name),
        None => ptr::null_mut(),
    }
}

/// # Safety
///
/// `name` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn readStats(name: *const c_char) -> *mut StatsResponse {
    logging::init();
    match unsafe { interface_name(name) } {
        Some(name) => stats_response::<CurrentClient>(name),
        None => ptr::null_mut(),
    }
}

/// # Safety
///
/// `priv_key` and `pub_key` must be valid for a pointer write. Strings
/// written or returned are released with [`freeString`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn generateKeys(
    priv_key: *mut *mut c_char,
    pub_key: *mut *mut c_char,
) -> *mut c_char {
    logging::init();
    unsafe { generate_keys_with(&mut rand::rngs::OsRng, priv_key, pub_key) }
}

/// # Safety
///
/// `interfaces` must be null or a pointer returned by [`readInterfacesName`]
/// that has not been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn freeInterfacesName(interfaces: *mut InterfacesNameResponse) {
    unsafe { response::release_interfaces(interfaces) }
}

/// # Safety
///
/// `cfg` must be null or a pointer returned by [`readConfig`] that has not
/// been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn freeConfig(cfg: *mut ConfigResponse) {
    unsafe { response::release_config(cfg) }
}

/// # Safety
///
/// `stats` must be null or a pointer returned by [`readStats`] that has not
/// been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn freeStats(stats: *mut StatsResponse) {
    unsafe { response::release_stats(stats) }
}

/// # Safety
///
/// `text` must be null or a string produced by [`generateKeys`] that has not
/// been freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn freeString(text: *mut c_char) {
    unsafe { response::release_c_string(text) }
}
