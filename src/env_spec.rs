//! Naming of a Python environment from an installation root and a version.
//!
//! Everything here is pure path arithmetic; nothing touches the filesystem.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Prefix shared by the subdirectory and the environment name.
pub const NAME_PREFIX: &str = "conda_python_";

/// Version used when the selected one has no `.` in it.
pub const FALLBACK_PYTHON_VERSION: &str = "3.10.3";

#[cfg(windows)]
const PYTHON_EXE: &str = "python.exe";
#[cfg(not(windows))]
const PYTHON_EXE: &str = "python";

/// Everything derived from one `(root, version)` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSpec {
    root_path: PathBuf,
    version: String,
    major_minor: String,
    subdir_name: String,
    subdir_path: PathBuf,
    environment_name: String,
    interpreter_path: PathBuf,
}

impl EnvironmentSpec {
    /// Derives the spec using the built-in fallback version.
    pub fn derive(root: impl AsRef<Path>, version: &str) -> Self {
        Self::derive_with_fallback(root, version, FALLBACK_PYTHON_VERSION)
    }

    /// Derives the spec, substituting `fallback` when `version` has no dot.
    pub fn derive_with_fallback(root: impl AsRef<Path>, version: &str, fallback: &str) -> Self {
        let root = root.as_ref();
        let version = if version.contains('.') {
            version
        } else {
            tracing::debug!(selected = version, fallback, "version has no dot, using fallback");
            fallback
        };

        let major_minor = major_minor(version);
        let subdir_name = format!("{NAME_PREFIX}{major_minor}");
        let environment_name = format!("{NAME_PREFIX}{version}");

        Self {
            root_path: root.to_path_buf(),
            version: version.to_string(),
            subdir_path: root.join(&subdir_name),
            interpreter_path: root.join("envs").join(&environment_name).join(PYTHON_EXE),
            major_minor,
            subdir_name,
            environment_name,
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The effective version, after fallback substitution.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn major_minor(&self) -> &str {
        &self.major_minor
    }

    pub fn subdir_name(&self) -> &str {
        &self.subdir_name
    }

    /// Root prefix handed to micromamba; must not exist before creation.
    pub fn subdir_path(&self) -> &Path {
        &self.subdir_path
    }

    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// Interpreter whose presence short-circuits creation.
    pub fn interpreter_path(&self) -> &Path {
        &self.interpreter_path
    }

    /// Directory micromamba creates the environment in.
    pub fn prefix_env_dir(&self) -> PathBuf {
        self.subdir_path.join("envs").join(&self.environment_name)
    }

    /// Interpreter location inside the created prefix.
    pub fn prefix_interpreter_path(&self) -> PathBuf {
        let env_dir = self.prefix_env_dir();
        if cfg!(windows) {
            env_dir.join("python.exe")
        } else {
            env_dir.join("bin").join("python")
        }
    }
}

/// First two dot-separated components of `version`.
pub fn major_minor(version: &str) -> String {
    version.split('.').take(2).collect::<Vec<_>>().join(".")
}
