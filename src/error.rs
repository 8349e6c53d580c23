use std::time::Duration;
use thiserror::Error;

/// Errors raised while configuring or running a probe
#[derive(Debug, Error)]
pub enum Error {
    /// Neither `DATABASE_URL` nor any candidate was configured
    #[error("DATABASE_URL not found in environment variables")]
    ConfigurationMissing,

    /// The descriptor could not be parsed or names an unsupported scheme
    #[error("malformed connection descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// Transport, TLS or authentication failure while connecting
    #[error("connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// The connection was established but the diagnostic query failed
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Classify an error returned while establishing a connection
    #[must_use]
    pub fn from_connect(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(e) => Self::MalformedDescriptor(e.to_string()),
            other => Self::Connection(other),
        }
    }
}
