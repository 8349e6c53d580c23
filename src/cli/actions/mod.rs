mod run;

use crate::{
    descriptor::{Candidate, ConnectionDescriptor},
    probe::{ConnectivityProbe, DatabaseProber, ProbeResult},
    report::{OutputFormat, Reporter},
    tls::TlsConfig,
};
use std::{io::Write, path::PathBuf, time::Duration};

/// Settings shared by every action
#[derive(Debug, Clone)]
pub struct Settings {
    pub connect_timeout: Duration,
    pub pause: Duration,
    pub tls: TlsConfig,
    pub format: OutputFormat,
    pub show_secret: bool,
    pub env_file: PathBuf,
}

impl Settings {
    /// Build a database backed probe reporting to `out`
    pub fn probe<W: Write>(&self, out: W) -> ConnectivityProbe<DatabaseProber, W> {
        let reporter = Reporter::new(out, self.format)
            .show_secret(self.show_secret)
            .env_file(self.env_file.display().to_string());

        ConnectivityProbe::new(
            DatabaseProber::new(self.tls.clone(), self.connect_timeout),
            reporter,
            self.pause,
        )
    }
}

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    /// Probe the configured `DATABASE_URL`
    Single {
        descriptor: ConnectionDescriptor,
        settings: Settings,
    },
    /// Probe candidates until one works
    FirstSuccess {
        candidates: Vec<Candidate>,
        settings: Settings,
    },
}

impl Action {
    /// Execute the action
    pub async fn execute(self) -> ProbeResult {
        run::execute(self).await
    }
}
