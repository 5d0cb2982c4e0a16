//! Request validation and the one-operation-at-a-time guard.
//!
//! Shared by the command line and the window, so both refuse the same
//! requests with the same messages.

use std::path::Path;

use crate::creator::Outcome;
use crate::env_spec::EnvironmentSpec;
use crate::error::{CreateError, RequestError};
use crate::worker::Completion;

/// Validates a request and derives its spec.
pub fn prepare(root: &str, version: &str, fallback: &str) -> Result<EnvironmentSpec, RequestError> {
    if root.trim().is_empty() {
        return Err(RequestError::EmptyRootPath);
    }

    let root_path = Path::new(root);
    if !root_path.is_dir() {
        return Err(RequestError::RootNotDirectory(root_path.to_path_buf()));
    }

    let spec = EnvironmentSpec::derive_with_fallback(root_path, version, fallback);
    if spec.subdir_path().exists() {
        let path = spec
            .subdir_path()
            .canonicalize()
            .unwrap_or_else(|_| spec.subdir_path().to_path_buf());
        return Err(RequestError::TargetAlreadyExists {
            subdir_name: spec.subdir_name().to_string(),
            path,
        });
    }

    Ok(spec)
}

/// Tracks whether a creation is in flight.
#[derive(Debug, Default)]
pub struct Session {
    in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Validates the request and marks the session busy.
    pub fn begin(
        &mut self,
        root: &str,
        version: &str,
        fallback: &str,
    ) -> Result<EnvironmentSpec, RequestError> {
        if self.in_flight {
            return Err(RequestError::Busy);
        }
        let spec = prepare(root, version, fallback)?;
        self.in_flight = true;
        Ok(spec)
    }

    /// Releases the session without a completion, e.g. when the worker
    /// could not be started.
    pub fn abort(&mut self) {
        self.in_flight = false;
    }

    pub fn finish(
        &mut self,
        completion: Completion,
    ) -> (EnvironmentSpec, Result<Outcome, CreateError>) {
        self.in_flight = false;
        (completion.spec, completion.result)
    }
}
