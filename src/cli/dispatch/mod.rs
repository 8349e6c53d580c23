use crate::{
    cli::actions::{Action, Settings},
    descriptor::{Candidate, ConnectionDescriptor},
    error::Error,
    report::OutputFormat,
    tls::{TlsConfig, TlsMode},
};
use anyhow::{Result, anyhow};
use clap::ArgMatches;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Extract TLS overrides from the command line
fn extract_tls_config(matches: &ArgMatches) -> Result<TlsConfig> {
    let mode = matches
        .get_one::<String>("tls-mode")
        .map(|m| m.parse::<TlsMode>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);

    Ok(TlsConfig {
        mode,
        ca: path("tls-ca"),
        cert: path("tls-cert"),
        key: path("tls-key"),
    })
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// Candidates take precedence over `--dsn`/`DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigurationMissing` if neither a descriptor nor a candidate is
/// configured
pub fn dispatch(matches: &ArgMatches, env_file: &Path) -> Result<Action> {
    let timeout = matches.get_one::<u16>("timeout").copied().unwrap_or(10);
    let pause = matches.get_one::<u64>("pause").copied().unwrap_or(1000);

    let format = matches
        .get_one::<String>("format")
        .map(|f| f.parse::<OutputFormat>().map_err(|e| anyhow!(e)))
        .transpose()?
        .unwrap_or_default();

    let settings = Settings {
        connect_timeout: Duration::from_secs(timeout.into()),
        pause: Duration::from_millis(pause),
        tls: extract_tls_config(matches)?,
        format,
        show_secret: matches.get_flag("show-secret"),
        env_file: env_file.to_path_buf(),
    };

    let candidates: Vec<Candidate> = matches
        .get_many::<String>("candidate")
        .map(|values| {
            values
                .filter(|value| !value.trim().is_empty())
                .enumerate()
                .map(|(index, value)| Candidate::parse(value, index + 1))
                .collect()
        })
        .unwrap_or_default();

    if !candidates.is_empty() {
        return Ok(Action::FirstSuccess {
            candidates,
            settings,
        });
    }

    let dsn = matches
        .get_one::<String>("dsn")
        .map(|dsn| dsn.as_str().trim())
        .filter(|dsn| !dsn.is_empty())
        .ok_or(Error::ConfigurationMissing)?;

    Ok(Action::Single {
        descriptor: ConnectionDescriptor::new(dsn),
        settings,
    })
}
