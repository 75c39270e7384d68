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

use std::fs;

use tracing::debug;
use wirewizard_types::InterfaceList;

use crate::settings::{CONF_SUFFIX, SearchPaths};

/// List every `<name>.conf` entry across the search directories.
///
/// Directories are scanned in order and each one's entries sorted by file
/// name. Unreadable directories are skipped. Names found in several
/// directories are reported once per directory.
pub fn discover(paths: &SearchPaths) -> Option<InterfaceList> {
    let mut names = Vec::new();

    for dir in paths.dirs() {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping search directory");
                continue;
            }
        };

        let mut files: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| !entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|file| file.ends_with(CONF_SUFFIX))
            .collect();
        files.sort();

        debug!(dir = %dir.display(), count = files.len(), "scanned search directory");
        names.extend(
            files
                .into_iter()
                .map(|mut file| {
                    file.truncate(file.len() - CONF_SUFFIX.len());
                    file
                }),
        );
    }

    InterfaceList::new(names)
}
