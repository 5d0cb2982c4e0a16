//! Runs micromamba to create one environment.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use crate::env_spec::EnvironmentSpec;
use crate::error::CreateError;
use crate::micromamba::ExecutableSource;

/// How a creation request ended, short of a fatal process failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// micromamba ran and exited 0.
    Created,
    /// The interpreter was already there; nothing was run.
    Skipped,
    /// No micromamba was found; nothing was run.
    NoExecutable { location: String },
}

#[derive(Debug, Clone)]
pub struct EnvironmentCreator {
    source: ExecutableSource,
    channel: String,
}

impl EnvironmentCreator {
    pub fn new(source: ExecutableSource, channel: impl Into<String>) -> Self {
        Self {
            source,
            channel: channel.into(),
        }
    }

    pub fn create(&self, spec: &EnvironmentSpec) -> Result<Outcome, CreateError> {
        self.create_with(spec, |cmd| cmd.output())
    }

    /// Same as [`create`](Self::create), with `exec` standing in for running the command.
    pub fn create_with(
        &self,
        spec: &EnvironmentSpec,
        exec: impl FnOnce(&mut Command) -> io::Result<Output>,
    ) -> Result<Outcome, CreateError> {
        let exe = match self.source.resolve() {
            Ok(exe) => exe,
            Err(CreateError::MissingExecutable { location }) => {
                tracing::warn!("NO micromamba under [{location}]");
                return Ok(Outcome::NoExecutable { location });
            }
            Err(err) => return Err(err),
        };
        tracing::info!("micromamba [{}]", exe.display());

        if spec.interpreter_path().exists() {
            tracing::info!(
                interpreter = %spec.interpreter_path().display(),
                "interpreter already present, skipping"
            );
            return Ok(Outcome::Skipped);
        }

        let mut cmd = build_command(&exe, spec, &self.channel);
        tracing::debug!(?cmd, "invoking micromamba");
        let output = exec(&mut cmd).map_err(|source| CreateError::Spawn {
            exe: exe.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            tracing::info!(target: "bibimamba::micromamba", "{line}");
        }

        if !output.status.success() {
            // no code means killed by a signal
            let code = output.status.code().unwrap_or(1);
            tracing::error!(code, "{}", stderr.trim_end());
            return Err(CreateError::ProcessFailed {
                code,
                stdout,
                stderr,
            });
        }

        Ok(Outcome::Created)
    }
}

/// Arguments passed to micromamba for `spec`.
pub fn create_args(spec: &EnvironmentSpec, channel: &str) -> Vec<OsString> {
    vec![
        "create".into(),
        "--yes".into(),
        "-n".into(),
        spec.environment_name().into(),
        format!("python={}", spec.version()).into(),
        "-c".into(),
        channel.into(),
        "--root-prefix".into(),
        spec.subdir_path().as_os_str().to_owned(),
    ]
}

fn build_command(exe: &Path, spec: &EnvironmentSpec, channel: &str) -> Command {
    let mut c = Command::new(exe);
    c.args(create_args(spec, channel))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        c.creation_flags(CREATE_NO_WINDOW);
    }
    c
}

/// Interpreter path worth showing to the user once `outcome` is known.
pub fn resulting_interpreter(spec: &EnvironmentSpec, outcome: &Outcome) -> Option<PathBuf> {
    match outcome {
        Outcome::Created => Some(spec.prefix_interpreter_path()),
        Outcome::Skipped => Some(spec.interpreter_path().to_path_buf()),
        Outcome::NoExecutable { .. } => None,
    }
}
