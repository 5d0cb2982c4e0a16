//! Finding the micromamba executable to run.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::error::CreateError;

const EXE_PREFIX: &str = "micromamba";

/// Where to look for micromamba.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableSource {
    /// A name or path resolved through `which`.
    Named(String),
    /// A directory searched for `micromamba*` files.
    Directory(PathBuf),
}

impl ExecutableSource {
    pub fn resolve(&self) -> Result<PathBuf, CreateError> {
        match self {
            ExecutableSource::Named(name) => {
                which::which(name).map_err(|_| CreateError::MissingExecutable {
                    location: name.clone(),
                })
            }
            ExecutableSource::Directory(dir) => locate_in(dir),
        }
    }
}

/// Directory next to the running binary, unless `BIBIMAMBA_HOME` says otherwise.
pub fn default_dir() -> io::Result<PathBuf> {
    if let Ok(home) = std::env::var("BIBIMAMBA_HOME") {
        return Ok(PathBuf::from(home));
    }
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent"))
}

fn is_candidate(file_name: &str) -> bool {
    if !file_name.starts_with(EXE_PREFIX) {
        return false;
    }
    if cfg!(windows) {
        file_name.to_ascii_lowercase().ends_with(".exe")
    } else {
        true
    }
}

/// A regular file with an execute bit, following symlinks.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Picks the most recently modified `micromamba*` file in `dir`.
pub fn locate_in(dir: &Path) -> Result<PathBuf, CreateError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CreateError::MissingExecutable {
                location: dir.display().to_string(),
            })
        }
        Err(source) => {
            return Err(CreateError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut candidates: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !is_candidate(&name.to_string_lossy()) {
            continue;
        }
        let path = entry.path();
        // lstat, so a symlink's own mtime counts
        let Ok(meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        if meta.is_dir() || !is_executable(&path) {
            continue;
        }
        let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        candidates.push((mtime, path));
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    let (_, newest) = candidates
        .into_iter()
        .next()
        .ok_or_else(|| CreateError::MissingExecutable {
            location: dir.display().to_string(),
        })?;

    fs::canonicalize(&newest).map_err(|source| CreateError::Io {
        path: newest,
        source,
    })
}
