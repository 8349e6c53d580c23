use anyhow::{Context, Result};
use std::{
    env, io,
    path::{Path, PathBuf},
};

/// Variable holding the single connection descriptor
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Variable naming the env file loaded at startup
pub const ENV_FILE: &str = "DBPROBE_ENV_FILE";

const DEFAULT_ENV_FILE: &str = ".env";

/// Path of the env file, `DBPROBE_ENV_FILE` or `.env`
#[must_use]
pub fn env_file() -> PathBuf {
    env::var_os(ENV_FILE).map_or_else(|| PathBuf::from(DEFAULT_ENV_FILE), PathBuf::from)
}

/// Load variables from `path` into the process environment
///
/// Variables already set are not overridden. Returns `false` when the file
/// does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but can not be read or parsed
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("failed to load env file {}", path.display())),
    }
}
