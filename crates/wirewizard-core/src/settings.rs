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

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_SEARCH_DIRS: [&str; 2] = ["/etc/wireguard", "/usr/local/etc/wireguard"];
pub const CONF_SUFFIX: &str = ".conf";

/// Environment variable naming the settings file read by the C boundary.
pub const SETTINGS_ENV: &str = "WIREWIZARD_SETTINGS";

/// Directories holding `<interface>.conf` files, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Candidate configuration files for `name`, one per directory.
    ///
    /// The name is appended to the directory verbatim, so an absolute name
    /// does not escape the search directory the way `Path::join` would.
    pub fn config_files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.dirs.iter().map(move |dir| {
            let mut path = OsString::from(dir.as_os_str());
            path.push("/");
            path.push(name);
            path.push(CONF_SUFFIX);
            PathBuf::from(path)
        })
    }
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DIRS.iter().map(PathBuf::from).collect())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,
}

impl Settings {
    /// Configured search paths, or the defaults when none are listed.
    pub fn search_paths(&self) -> SearchPaths {
        if self.search_dirs.is_empty() {
            SearchPaths::default()
        } else {
            SearchPaths::new(self.search_dirs.clone())
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load(path: &Path) -> Result<Settings, SettingsError> {
    debug!(path = %path.display(), "loading settings");

    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let settings: Settings = toml::from_str(&contents)?;
            info!(
                path = %path.display(),
                search_dirs = settings.search_dirs.len(),
                "loaded settings"
            );
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings file not found, using defaults");
            Ok(Settings::default())
        }
        Err(e) => Err(SettingsError::Read(e)),
    }
}

/// Load the file named by [`SETTINGS_ENV`], or defaults when it is unset.
pub fn from_env() -> Result<Settings, SettingsError> {
    match std::env::var_os(SETTINGS_ENV) {
        Some(path) if !path.is_empty() => load(Path::new(&path)),
        _ => Ok(Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_search_order() {
        let paths = SearchPaths::default();
        assert_eq!(
            paths.dirs(),
            &[PathBuf::from("/etc/wireguard"), PathBuf::from("/usr/local/etc/wireguard")]
        );
    }

    #[test]
    fn config_files_follow_dir_order() {
        let files: Vec<PathBuf> = SearchPaths::default().config_files("wg0").collect();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/etc/wireguard/wg0.conf"),
                PathBuf::from("/usr/local/etc/wireguard/wg0.conf"),
            ]
        );
    }

    #[test]
    fn absolute_name_stays_inside_dir() {
        let paths = SearchPaths::new(vec![PathBuf::from("/etc/wireguard")]);
        let files: Vec<PathBuf> = paths.config_files("/tmp/x").collect();
        assert_eq!(files, vec![PathBuf::from("/etc/wireguard//tmp/x.conf")]);
    }

    #[test]
    fn parse_empty_settings() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.search_paths(), SearchPaths::default());
    }

    #[test]
    fn parse_custom_dirs() {
        let settings: Settings = toml::from_str(r#"search_dirs = ["/opt/wg", "/srv/wg"]"#).unwrap();
        assert_eq!(
            settings.search_paths().dirs(),
            &[PathBuf::from("/opt/wg"), PathBuf::from("/srv/wg")]
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load(&dir.path().join("absent.toml")).unwrap();
        assert!(settings.search_dirs.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "search_dirs = 5").unwrap();
        assert!(matches!(load(&path), Err(SettingsError::Parse(_))));
    }
}
