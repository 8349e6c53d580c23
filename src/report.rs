use crate::{
    descriptor::{Candidate, ConnectionDescriptor},
    envs::DATABASE_URL,
    probe::ProbeResult,
};
use chrono::Utc;
use serde::Serialize;
use std::{fmt, io::Write, str::FromStr, time::Duration};
use tracing::warn;

/// Maximum number of characters of a failure reason shown on the console
pub const REASON_LIMIT: usize = 80;

const RULE_WIDTH: usize = 70;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per attempt
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}")),
        }
    }
}

#[derive(Serialize, Debug)]
struct Attempt<'a> {
    time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    target: String,
    runtime_ms: u64,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Cut `text` to at most `limit` characters
#[must_use]
pub fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text.get(..end).unwrap_or(text),
        None => text,
    }
}

/// Writes probe progress to the console (or any writer)
///
/// Descriptors only ever reach the writer through `masked()`, unless
/// `show_secret` is set for the working-descriptor banner.
pub struct Reporter<W> {
    out: W,
    format: OutputFormat,
    show_secret: bool,
    env_file: String,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            show_secret: false,
            env_file: ".env".to_string(),
        }
    }

    /// Print the working descriptor unmasked
    #[must_use]
    pub fn show_secret(mut self, show_secret: bool) -> Self {
        self.show_secret = show_secret;
        self
    }

    /// Env file named in the guidance to persist a working descriptor
    #[must_use]
    pub fn env_file(mut self, env_file: impl Into<String>) -> Self {
        self.env_file = env_file.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    const fn is_text(&self) -> bool {
        matches!(self.format, OutputFormat::Text)
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{args}") {
            warn!("failed to write report: {e}");
        }
    }

    fn rule(&mut self) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line(format_args!("{rule}"));
    }

    pub fn banner(&mut self, title: &str) {
        if self.is_text() {
            self.rule();
            self.line(format_args!("{title}"));
            self.rule();
        }
    }

    pub fn attempt_started(&mut self, name: Option<&str>, descriptor: &ConnectionDescriptor) {
        if !self.is_text() {
            return;
        }

        match name {
            Some(name) => {
                self.line(format_args!("\n[{name}]"));
                self.line(format_args!("Testing: {}", descriptor.masked()));
            }
            None => self.line(format_args!("Testing connection to {}", descriptor.masked())),
        }
    }

    pub fn hint(&mut self, hint: &str) {
        if self.is_text() {
            self.line(format_args!("Hint: {hint}"));
        }
    }

    pub fn attempt_finished(
        &mut self,
        name: Option<&str>,
        descriptor: &ConnectionDescriptor,
        result: &ProbeResult,
        elapsed: Duration,
    ) {
        match self.format {
            OutputFormat::Text => match result {
                ProbeResult::Success {
                    server_version_summary,
                } => {
                    self.line(format_args!("[SUCCESS] Connected!"));
                    self.line(format_args!("Server version: {server_version_summary}"));
                }
                ProbeResult::Failure { reason } => {
                    self.line(format_args!("[FAIL] {}", truncate(reason, REASON_LIMIT)));
                }
            },
            OutputFormat::Json => {
                let (status, version, error) = match result {
                    ProbeResult::Success {
                        server_version_summary,
                    } => ("success", Some(server_version_summary.as_str()), None),
                    ProbeResult::Failure { reason } => ("failure", None, Some(reason.as_str())),
                };
                let attempt = Attempt {
                    time: Utc::now().to_rfc3339(),
                    name,
                    target: descriptor.masked(),
                    runtime_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    status,
                    version,
                    error,
                };
                match serde_json::to_string(&attempt) {
                    Ok(serialized) => self.line(format_args!("{serialized}")),
                    Err(e) => warn!("failed to serialize attempt: {e}"),
                }
            }
        }
    }

    /// Banner for the first candidate that worked
    pub fn working_found(&mut self, candidate: &Candidate) {
        if !self.is_text() {
            return;
        }

        self.line(format_args!(""));
        self.banner("WORKING CONNECTION STRING FOUND!");
        let env_file = self.env_file.clone();
        self.line(format_args!("Use this in {env_file}:"));
        if self.show_secret {
            self.line(format_args!("{}={}", DATABASE_URL, candidate.descriptor.as_str()));
        } else {
            self.line(format_args!("{}={}", DATABASE_URL, candidate.descriptor.masked()));
            self.line(format_args!(
                "(credentials masked, rerun with --show-secret to print them)"
            ));
        }
    }

    pub fn none_found(&mut self, attempted: usize) {
        if self.is_text() {
            self.line(format_args!(""));
            self.line(format_args!(
                "No working connection string found ({attempted} attempted)"
            ));
        }
    }
}
