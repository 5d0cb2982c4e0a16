//! Process-wide settings, loaded once from a JSON file.
//!
//! ```json
//! {
//!   "pythonVersions": ["3.12.3", "3.11.9"],
//!   "fallbackVersion": "3.10.3",
//!   "channel": "conda-forge",
//!   "micromambaDir": "/opt/bibimamba"
//! }
//! ```

use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use crate::env_spec::FALLBACK_PYTHON_VERSION;
use crate::error::ConfigError;
use crate::micromamba::{self, ExecutableSource};

pub const DEFAULT_CHANNEL: &str = "conda-forge";

/// Versions offered when the config does not list any, newest first.
pub const DEFAULT_PYTHON_VERSIONS: &[&str] = &[
    "3.12.3", "3.12.2", "3.12.1", "3.12.0", "3.11.9", "3.11.8", "3.11.7", "3.11.6", "3.11.5",
    "3.11.4", "3.11.3", "3.11.2", "3.11.1", "3.11.0", "3.10.9", "3.10.8", "3.10.7", "3.10.6",
    "3.10.5", "3.10.4", "3.10.3", "3.10.2", "3.10.1", "3.10.0", "3.9.19", "3.9.18", "3.9.17",
    "3.9.16", "3.9.15", "3.9.14", "3.9.13", "3.9.12", "3.9.11", "3.9.10", "3.9.9", "3.9.8",
    "3.9.7", "3.9.6", "3.9.5", "3.9.4", "3.9.3", "3.9.2", "3.9.1", "3.9.0", "3.8.19", "3.8.18",
    "3.8.17", "3.8.16", "3.8.15", "3.8.14", "3.8.13", "3.8.12", "3.8.11", "3.8.10", "3.8.9",
    "3.8.8", "3.8.7", "3.8.6", "3.8.5", "3.8.4", "3.8.3", "3.8.2", "3.8.1", "3.8.0", "3.7.17",
    "3.7.16", "3.7.15", "3.7.14", "3.7.13", "3.7.12", "3.7.11", "3.7.10", "3.7.9", "3.7.8",
    "3.7.7", "3.7.6", "3.7.5", "3.7.4", "3.7.3", "3.7.2", "3.7.1", "3.7.0", "3.6.15", "3.6.14",
    "3.6.13", "3.6.12", "3.6.11", "3.6.10", "3.6.9", "3.6.8", "3.6.7", "3.6.6", "3.6.5", "3.6.4",
    "3.6.3", "3.6.2", "3.6.1", "3.6.0", "3.5.10", "3.5.8", "3.5.7", "3.5.6", "3.5.5", "3.5.4",
    "3.5.3", "3.5.2", "3.5.1", "3.5.0", "3.4.10", "3.4.9", "3.4.8", "3.4.7", "3.4.6", "3.4.5",
    "3.4.4", "3.4.3", "3.4.2", "3.4.1", "3.4.0", "3.3.7", "3.3.6", "3.3.5", "3.3.4", "3.3.3",
    "3.3.2", "3.3.1", "3.3.0", "3.2.6", "3.2.5", "3.2.4", "3.2.3", "3.2.2", "3.2.1", "3.2",
    "3.1.5", "3.1.4", "3.1.3", "3.1.2", "3.1.1", "3.1", "3.0.1", "3.0", "2.7.18", "2.7.17",
    "2.7.16", "2.7.15", "2.7.14", "2.7.13", "2.7.12", "2.7.11", "2.7.10", "2.7.9", "2.7.8",
    "2.7.7", "2.7.6", "2.7.5", "2.7.4", "2.7.3", "2.7.2", "2.7.1", "2.7",
];

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    /// Selectable versions, in display order.
    pub python_versions: Vec<String>,
    /// Used when the selected version has no dot.
    pub fallback_version: String,
    pub channel: String,
    /// Directory searched for `micromamba*`.
    pub micromamba_dir: Option<PathBuf>,
    /// Explicit micromamba name or path; wins over `micromamba_dir`.
    pub micromamba: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            python_versions: DEFAULT_PYTHON_VERSIONS.iter().map(|v| v.to_string()).collect(),
            fallback_version: FALLBACK_PYTHON_VERSION.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            micromamba_dir: None,
            micromamba: None,
        }
    }
}

impl Config {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.python_versions.is_empty() {
            return Err(ConfigError::NoVersions);
        }
        if !config.fallback_version.contains('.') {
            return Err(ConfigError::InvalidFallback(config.fallback_version));
        }
        if config.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }
        Ok(config)
    }

    /// Reads `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the built-in defaults;
    /// a missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Config::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Config::from_json(&path, &text)
            }
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Config::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Where to find micromamba; `dir_override` comes from the command line.
    pub fn executable_source(
        &self,
        dir_override: Option<&Path>,
    ) -> std::io::Result<ExecutableSource> {
        if let Some(name) = &self.micromamba {
            return Ok(ExecutableSource::Named(name.clone()));
        }
        let dir = match dir_override.or(self.micromamba_dir.as_deref()) {
            Some(dir) => dir.to_path_buf(),
            None => micromamba::default_dir()?,
        };
        Ok(ExecutableSource::Directory(dir))
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bibimamba").join("config.json"))
}

/// Installs `config` as the process-wide configuration.
pub fn init(config: Config) -> Result<&'static Config, ConfigError> {
    CONFIG.set(config).map_err(|_| ConfigError::AlreadyInitialized)?;
    CONFIG.get().ok_or(ConfigError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_deduplicated() {
        let mut seen = std::collections::HashSet::new();
        for v in DEFAULT_PYTHON_VERSIONS {
            assert!(seen.insert(*v), "duplicate version {v}");
        }
        assert_eq!(DEFAULT_PYTHON_VERSIONS[0], "3.12.3");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_json(Path::new("c.json"), r#"{"channel":"defaults"}"#).unwrap();
        assert_eq!(cfg.channel, "defaults");
        assert_eq!(cfg.fallback_version, FALLBACK_PYTHON_VERSION);
        assert_eq!(cfg.python_versions.len(), DEFAULT_PYTHON_VERSIONS.len());
    }

    #[test]
    fn rejects_empty_version_list() {
        let err = Config::from_json(Path::new("c.json"), r#"{"pythonVersions":[]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoVersions));
    }

    #[test]
    fn rejects_dotless_fallback() {
        for fallback in ["latest", ""] {
            let text = format!(r#"{{"fallbackVersion":"{fallback}"}}"#);
            let err = Config::from_json(Path::new("c.json"), &text).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidFallback(ref v) if v == fallback));
        }
    }

    #[test]
    fn rejects_empty_channel() {
        let err = Config::from_json(Path::new("c.json"), r#"{"channel":" "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyChannel));
    }

    // the only test touching the process-wide config
    #[test]
    fn init_installs_once() {
        let cfg = Config {
            channel: "defaults".into(),
            ..Config::default()
        };
        let installed = init(cfg.clone()).unwrap();
        assert_eq!(installed, &cfg);
        assert!(matches!(init(Config::default()), Err(ConfigError::AlreadyInitialized)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Config::from_json(Path::new("c.json"), r#"{"pythonVersion":"3.9"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&tmp.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn loads_file_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"pythonVersions":["3.11.9","3.10.3"],"micromambaDir":"/opt/mm"}"#,
        )
        .unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.python_versions, vec!["3.11.9", "3.10.3"]);
        assert_eq!(
            cfg.executable_source(None).unwrap(),
            ExecutableSource::Directory(PathBuf::from("/opt/mm"))
        );
    }

    #[test]
    fn explicit_executable_wins() {
        let cfg = Config {
            micromamba: Some("micromamba".into()),
            micromamba_dir: Some("/opt/mm".into()),
            ..Config::default()
        };
        assert_eq!(
            cfg.executable_source(Some(Path::new("/other"))).unwrap(),
            ExecutableSource::Named("micromamba".into())
        );
    }

    #[test]
    fn command_line_dir_overrides_config_dir() {
        let cfg = Config {
            micromamba_dir: Some("/opt/mm".into()),
            ..Config::default()
        };
        assert_eq!(
            cfg.executable_source(Some(Path::new("/other"))).unwrap(),
            ExecutableSource::Directory(PathBuf::from("/other"))
        );
    }
}
