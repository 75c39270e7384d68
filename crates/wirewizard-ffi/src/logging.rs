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

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable enabling diagnostics on stderr, as an `EnvFilter`
/// directive such as `debug` or `wirewizard_core=trace`.
pub const LOG_ENV: &str = "WIREWIZARD_LOG";

static INIT: Once = Once::new();

/// Install a stderr subscriber once per process when [`LOG_ENV`] is set.
///
/// Leaves any subscriber the host process installed in place.
pub fn init() {
    INIT.call_once(|| {
        use tracing_subscriber::fmt;

        let Ok(directive) = std::env::var(LOG_ENV) else {
            return;
        };
        let _ = fmt()
            .with_env_filter(filter_for(&directive))
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Parse `directive`, falling back to `warn` when it is not a valid filter.
fn filter_for(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}
