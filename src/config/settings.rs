//! Application settings and paths.
//!
//! Settings are read from the first file found among: the `--config` path,
//! `./config/config.json`, `./config/config.toml`, and the XDG config
//! directory (`settings.json` or `settings.toml`). Files ending in `.toml`
//! are parsed as TOML, everything else as JSON.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ToolConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project-local configuration directory, relative to the working directory.
pub const LOCAL_CONFIG_DIR: &str = "config";

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/reconnoiter)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve XDG directories. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "reconnoiter", "reconnoiter")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Settings files in the user config directory, in lookup order.
    pub fn settings_files(&self) -> [PathBuf; 2] {
        [
            self.config_dir.join("settings.json"),
            self.config_dir.join("settings.toml"),
        ]
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Append log records to this file. Console-only logging when unset.
    pub log_file: Option<PathBuf>,
    /// Debug-level logging.
    pub verbose: bool,
    /// nmap binary.
    pub nmap_path: String,
    /// masscan binary.
    pub masscan_path: String,
    /// Directory under which `hostDiscovery/` and `portScan/` are created.
    pub output_root: PathBuf,
    /// Kill external tools after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_file: None,
            verbose: false,
            nmap_path: "nmap".to_string(),
            masscan_path: "masscan".to_string(),
            output_root: PathBuf::from("."),
            timeout_secs: None,
        }
    }
}

impl AppSettings {
    /// Load settings from a specific file, choosing the format by extension.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let is_toml = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Ok(toml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// Find the settings file to use, if any.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = Path::new(LOCAL_CONFIG_DIR);
        let mut candidates = vec![local.join("config.json"), local.join("config.toml")];
        if let Ok(paths) = Paths::new() {
            candidates.extend(paths.settings_files());
        }
        candidates.into_iter().find(|p| p.is_file())
    }

    /// Load settings, falling back to defaults.
    ///
    /// A missing or undecodable file is not fatal; the error is returned
    /// alongside the defaults so the caller can report it once logging is up.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<ConfigError>) {
        match Self::locate(explicit) {
            Some(path) => match Self::load_from(&path) {
                Ok(settings) => (settings, None),
                Err(e) => (Self::default(), Some(e)),
            },
            None => (Self::default(), None),
        }
    }

    /// Tool timeout as a duration.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Tool configuration derived from these settings.
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig::default()
            .with_nmap_path(self.nmap_path.clone())
            .with_masscan_path(self.masscan_path.clone())
            .with_output_root(self.output_root.clone())
            .with_timeout(self.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.nmap_path, "nmap");
        assert_eq!(settings.output_root, PathBuf::from("."));
        assert!(settings.log_file.is_none());
        assert!(settings.timeout().is_none());
    }

    #[test]
    fn test_load_json_with_partial_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"verbose": true, "log_file": "/var/log/recon.log"}"#,
        )
        .unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert!(settings.verbose);
        assert_eq!(settings.log_file, Some(PathBuf::from("/var/log/recon.log")));
        assert_eq!(settings.masscan_path, "masscan");
    }

    #[test]
    fn test_load_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "nmap_path = \"/usr/local/bin/nmap\"\ntimeout_secs = 900\n",
        )
        .unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.nmap_path, "/usr/local/bin/nmap");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(900)));
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let (settings, error) = AppSettings::load_or_default(Some(&path));
        assert_eq!(settings, AppSettings::default());
        assert!(matches!(error, Some(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_explicit_file_reports_read_error() {
        let dir = tempdir().unwrap();
        let (settings, error) = AppSettings::load_or_default(Some(&dir.path().join("absent.json")));
        assert_eq!(settings, AppSettings::default());
        assert!(matches!(error, Some(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_tool_config_from_settings() {
        let settings = AppSettings {
            output_root: PathBuf::from("/srv/recon"),
            timeout_secs: Some(60),
            ..AppSettings::default()
        };
        let tool = settings.tool_config();
        assert_eq!(tool.output_root, PathBuf::from("/srv/recon"));
        assert_eq!(tool.timeout, Some(Duration::from_secs(60)));
        assert_eq!(tool.nmap_path, "nmap");
    }
}
