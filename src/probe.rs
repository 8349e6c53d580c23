//! Connectivity probes
//!
//! A probe connects with a bounded wait, runs `SELECT version()`, reports
//! and releases the connection. Every error is captured here and turned into
//! `ProbeResult::Failure`; nothing from the transport escapes.

use crate::{
    descriptor::{Candidate, ConnectionDescriptor},
    error::{Error, Result},
    queries,
    report::Reporter,
    tls::TlsConfig,
};
use std::{future::Future, io::Write, time::Duration};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Bound on connection establishment
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between two candidates
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Outcome of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success { server_version_summary: String },
    Failure { reason: String },
}

impl ProbeResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcome of probing a list of candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateOutcome {
    /// Result of the winning candidate, or of the last one attempted
    pub result: ProbeResult,
    /// Index of the first candidate that succeeded
    pub winner: Option<usize>,
    pub attempted: usize,
}

/// Keep the first comma-delimited segment of a version string
///
/// `"PostgreSQL 15.2, compiled by ..."` becomes `"PostgreSQL 15.2"`.
#[must_use]
pub fn summarize_version(version: &str) -> String {
    version
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Fetches the raw server version for a descriptor
///
/// Implementations must release the connection before returning.
pub trait Prober {
    fn server_version(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> impl Future<Output = Result<String>>;
}

/// Prober backed by real database connections
#[derive(Debug, Clone)]
pub struct DatabaseProber {
    tls: TlsConfig,
    connect_timeout: Duration,
}

impl DatabaseProber {
    #[must_use]
    pub const fn new(tls: TlsConfig, connect_timeout: Duration) -> Self {
        Self {
            tls,
            connect_timeout,
        }
    }
}

impl Prober for DatabaseProber {
    async fn server_version(&self, descriptor: &ConnectionDescriptor) -> Result<String> {
        queries::server_version(descriptor, &self.tls, self.connect_timeout).await
    }
}

/// Runs probes and reports each attempt
pub struct ConnectivityProbe<P, W> {
    prober: P,
    reporter: Reporter<W>,
    pause: Duration,
}

impl<P: Prober, W: Write> ConnectivityProbe<P, W> {
    pub const fn new(prober: P, reporter: Reporter<W>, pause: Duration) -> Self {
        Self {
            prober,
            reporter,
            pause,
        }
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    /// Probe one descriptor
    pub async fn probe_single(&mut self, descriptor: &ConnectionDescriptor) -> ProbeResult {
        self.attempt(None, descriptor).await
    }

    /// Probe candidates in order, stopping at the first success
    ///
    /// When every candidate fails the outcome carries the last failure.
    pub async fn probe_first_success(&mut self, candidates: &[Candidate]) -> CandidateOutcome {
        let mut outcome = CandidateOutcome {
            result: ProbeResult::Failure {
                reason: "no candidates configured".to_string(),
            },
            winner: None,
            attempted: 0,
        };

        if candidates.is_empty() {
            return outcome;
        }

        self.reporter.banner("Testing connection candidates");

        for (index, candidate) in candidates.iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                sleep(self.pause).await;
            }

            let result = self
                .attempt(Some(candidate.name.as_str()), &candidate.descriptor)
                .await;
            outcome.attempted += 1;

            let found = result.is_success();
            outcome.result = result;

            if found {
                info!(candidate = %candidate.name, "found working descriptor");
                outcome.winner = Some(index);
                self.reporter.working_found(candidate);
                return outcome;
            }
        }

        self.reporter.none_found(outcome.attempted);
        outcome
    }

    async fn attempt(&mut self, name: Option<&str>, descriptor: &ConnectionDescriptor) -> ProbeResult {
        self.reporter.attempt_started(name, descriptor);

        let start = Instant::now();
        let result = match self.prober.server_version(descriptor).await {
            Ok(version) => ProbeResult::Success {
                server_version_summary: summarize_version(&version),
            },
            Err(e) => {
                if matches!(e, Error::MalformedDescriptor(_))
                    && let Some(hint) = descriptor.reserved_character_hint()
                {
                    self.reporter.hint(hint);
                }

                let reason = descriptor.redact(&e.to_string()).into_owned();
                debug!(descriptor = %descriptor.masked(), %reason, "probe failed");
                ProbeResult::Failure { reason }
            }
        };
        let elapsed = start.elapsed();

        self.reporter
            .attempt_finished(name, descriptor, &result, elapsed);
        result
    }
}
