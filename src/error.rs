use std::path::PathBuf;
use thiserror::Error;

/// Failures while creating an environment.
#[derive(Debug, Error)]
pub enum CreateError {
    #[error("no micromamba executable found under [{location}]")]
    MissingExecutable { location: String },

    #[error("failed to start {exe}: {source}")]
    Spawn {
        exe: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("micromamba exited with code {code}")]
    ProcessFailed {
        code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CreateError {
    /// Exit code the whole application should terminate with, if fatal.
    pub fn fatal_exit_code(&self) -> Option<i32> {
        match self {
            CreateError::ProcessFailed { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// A request rejected before any work starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Please select installation root")]
    EmptyRootPath,

    #[error("'{}' is not an existing directory", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Please remove '{}'", path.display())]
    TargetAlreadyExists { subdir_name: String, path: PathBuf },

    #[error("An environment is already being created")]
    Busy,
}

impl RequestError {
    /// Short heading for the warning dialog.
    pub fn title(&self) -> String {
        match self {
            RequestError::EmptyRootPath => "Empty Path".to_string(),
            RequestError::RootNotDirectory(_) => "Invalid Path".to_string(),
            RequestError::TargetAlreadyExists { subdir_name, .. } => format!("Exist {subdir_name}"),
            RequestError::Busy => "Busy".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config lists no python versions")]
    NoVersions,

    #[error("fallback version '{0}' must contain a '.'")]
    InvalidFallback(String),

    #[error("config channel is empty")]
    EmptyChannel,

    #[error("configuration already initialized")]
    AlreadyInitialized,
}
