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

//! Human-readable rendering of handshake ages and transfer counters.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Render the age of a handshake reported as time since the Unix epoch.
///
/// A zero timestamp means the peer never completed a handshake. A timestamp
/// later than `now` counts as zero elapsed.
pub fn handshake_age(last_handshake: Duration, now: SystemTime) -> String {
    if last_handshake.is_zero() {
        return "never".to_string();
    }

    let elapsed = UNIX_EPOCH
        .checked_add(last_handshake)
        .and_then(|at| now.duration_since(at).ok())
        .unwrap_or_default();
    elapsed_ago(elapsed)
}

/// Render an elapsed duration as `"1 day, 5 seconds ago"`, or `"now"` below
/// one second.
pub fn elapsed_ago(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        return "now".to_string();
    }

    let secs = elapsed.as_secs();
    let parts = [
        (secs / 86_400, "day"),
        (secs / 3_600 % 24, "hour"),
        (secs / 60 % 60, "minute"),
        (secs % 60, "second"),
    ];

    let rendered: Vec<String> = parts
        .iter()
        .filter(|(value, _)| *value != 0)
        .map(|(value, unit)| {
            let plural = if *value == 1 { "" } else { "s" };
            format!("{value} {unit}{plural}")
        })
        .collect();

    if rendered.is_empty() {
        return "now".to_string();
    }
    format!("{} ago", rendered.join(", "))
}

/// Scale a byte count by 1024 up to TB and render it with two decimals.
pub fn bytes(count: u64) -> String {
    let mut value = count as f64;
    let mut unit = 0;
    // TB is terminal, larger counts just grow the numeral.
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", BYTE_UNITS[unit])
}

pub fn transfer(received: u64, sent: u64) -> String {
    format!("{} received, {} sent", bytes(received), bytes(sent))
}
