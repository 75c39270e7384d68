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

//! `#[repr(C)]` layouts handed across the boundary, and their release.
//!
//! Every string is a `CString`, every struct and pointer array a `Box`, all
//! leaked into raw pointers on the way out and rebuilt exactly once by the
//! matching `release_*` function.

use std::ffi::{CString, c_char, c_int};
use std::ptr;

use wirewizard_types::{ConfigRecord, InterfaceList, StatsRecord};

#[repr(C)]
pub struct InterfacesNameResponse {
    pub names: *mut *mut c_char,
    pub count: c_int,
}

#[repr(C)]
pub struct ConfigResponse {
    pub interface_priv_key: *mut c_char,
    pub interface_pub_key: *mut c_char,
    pub interface_listen_port: c_int,
    pub interface_address: *mut c_char,
    pub interface_dns: *mut c_char,
    pub peer_pub_key: *mut c_char,
    pub peer_endpoint_address: *mut c_char,
    pub peer_allowed_ips: *mut c_char,
    pub peer_persistent_keepalive: *mut c_char,
    pub peer_preshared_key: *mut c_char,
}

#[repr(C)]
pub struct StatsResponse {
    pub last_handshake_time: *mut c_char,
    pub transfer: *mut c_char,
}

/// Copy `text` into a caller-owned C string, cut at the first interior NUL.
pub fn into_c_string(mut text: String) -> *mut c_char {
    if let Some(nul) = text.find('\0') {
        text.truncate(nul);
    }
    match CString::new(text) {
        Ok(c) => c.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
///
/// `text` must be null or come from [`into_c_string`], and must not be used
/// afterwards.
pub unsafe fn release_c_string(text: *mut c_char) {
    if !text.is_null() {
        // SAFETY: produced by `CString::into_raw` and released only once.
        drop(unsafe { CString::from_raw(text) });
    }
}

impl InterfacesNameResponse {
    /// `None` when the list is too long for a C `int` count.
    pub fn into_raw(list: InterfaceList) -> Option<*mut Self> {
        let count = c_int::try_from(list.len()).ok()?;
        let names: Box<[*mut c_char]> = list.into_names().into_iter().map(into_c_string).collect();
        let names = Box::into_raw(names).cast::<*mut c_char>();
        Some(Box::into_raw(Box::new(Self { names, count })))
    }
}

/// # Safety
///
/// `response` must be null or come from [`InterfacesNameResponse::into_raw`],
/// and must not be used afterwards.
pub unsafe fn release_interfaces(response: *mut InterfacesNameResponse) {
    if response.is_null() {
        return;
    }
    let response = unsafe { Box::from_raw(response) };
    if !response.names.is_null() {
        let len = usize::try_from(response.count).unwrap_or(0);
        // SAFETY: `names` is the leaked `Box<[_]>` of exactly `count` entries.
        let names = unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(response.names, len)) };
        for &name in names.iter() {
            unsafe { release_c_string(name) };
        }
    }
}

impl ConfigResponse {
    pub fn into_raw(record: ConfigRecord) -> *mut Self {
        let ConfigRecord { interface, peer } = record;
        Box::into_raw(Box::new(Self {
            interface_priv_key: into_c_string(interface.private_key),
            interface_pub_key: into_c_string(interface.public_key),
            interface_listen_port: c_int::from(interface.listen_port),
            interface_address: into_c_string(interface.address),
            interface_dns: into_c_string(interface.dns),
            peer_pub_key: into_c_string(peer.public_key),
            peer_endpoint_address: into_c_string(peer.endpoint),
            peer_allowed_ips: into_c_string(peer.allowed_ips),
            peer_persistent_keepalive: into_c_string(peer.persistent_keepalive),
            peer_preshared_key: into_c_string(peer.preshared_key),
        }))
    }
}

/// # Safety
///
/// `response` must be null or come from [`ConfigResponse::into_raw`], and
/// must not be used afterwards.
pub unsafe fn release_config(response: *mut ConfigResponse) {
    if response.is_null() {
        return;
    }
    let response = unsafe { Box::from_raw(response) };
    for text in [
        response.interface_priv_key,
        response.interface_pub_key,
        response.interface_address,
        response.interface_dns,
        response.peer_pub_key,
        response.peer_endpoint_address,
        response.peer_allowed_ips,
        response.peer_persistent_keepalive,
        response.peer_preshared_key,
    ] {
        unsafe { release_c_string(text) };
    }
}

impl StatsResponse {
    pub fn into_raw(record: StatsRecord) -> *mut Self {
        Box::into_raw(Box::new(Self {
            last_handshake_time: into_c_string(record.last_handshake),
            transfer: into_c_string(record.transfer),
        }))
    }
}

/// # Safety
///
/// `response` must be null or come from [`StatsResponse::into_raw`], and
/// must not be used afterwards.
pub unsafe fn release_stats(response: *mut StatsResponse) {
    if response.is_null() {
        return;
    }
    let response = unsafe { Box::from_raw(response) };
    unsafe {
        release_c_string(response.last_handshake_time);
        release_c_string(response.transfer);
    }
}
