//! The one background thread that runs a creation.

use std::{
    io,
    process::{Command, Output},
    thread,
};

use crate::creator::{EnvironmentCreator, Outcome};
use crate::env_spec::EnvironmentSpec;
use crate::error::CreateError;

/// What the worker hands back when it is done.
///
/// Carries the spec the worker actually used, so the UI never has to
/// rebuild it from fields the user may have edited in the meantime.
#[derive(Debug)]
pub struct Completion {
    pub spec: EnvironmentSpec,
    pub result: Result<Outcome, CreateError>,
}

/// Runs `creator` for `spec` on a new thread and calls `on_finished` exactly once.
pub fn spawn<F>(
    creator: EnvironmentCreator,
    spec: EnvironmentSpec,
    on_finished: F,
) -> io::Result<thread::JoinHandle<()>>
where
    F: FnOnce(Completion) + Send + 'static,
{
    spawn_with(creator, spec, |cmd| cmd.output(), on_finished)
}

/// Same as [`spawn`], with `exec` standing in for running micromamba.
pub fn spawn_with<E, F>(
    creator: EnvironmentCreator,
    spec: EnvironmentSpec,
    exec: E,
    on_finished: F,
) -> io::Result<thread::JoinHandle<()>>
where
    E: FnOnce(&mut Command) -> io::Result<Output> + Send + 'static,
    F: FnOnce(Completion) + Send + 'static,
{
    thread::Builder::new()
        .name("env-creator".into())
        .spawn(move || {
            let _span = tracing::info_span!("create", env = spec.environment_name()).entered();
            let result = creator.create_with(&spec, exec);
            on_finished(Completion { spec, result });
        })
}
