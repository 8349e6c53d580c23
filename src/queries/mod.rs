pub mod mysql;
pub mod postgres;

use crate::{
    descriptor::ConnectionDescriptor,
    error::{Error, Result},
    tls::TlsConfig,
};
use std::time::Duration;
use tracing::debug;

/// Read-only liveness query, supported by both drivers
pub const VERSION_QUERY: &str = "SELECT version()";

/// Database driver selected from the descriptor scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    MySql,
}

impl Driver {
    /// Pick the driver for a descriptor
    ///
    /// # Errors
    ///
    /// Returns `MalformedDescriptor` when the scheme is missing or unsupported
    pub fn from_descriptor(descriptor: &ConnectionDescriptor) -> Result<Self> {
        match descriptor.scheme().map(str::to_ascii_lowercase).as_deref() {
            Some("postgres" | "postgresql") => Ok(Self::Postgres),
            Some("mysql" | "mariadb") => Ok(Self::MySql),
            Some(other) => Err(Error::MalformedDescriptor(format!(
                "unsupported scheme: {other}"
            ))),
            None => Err(Error::MalformedDescriptor(
                "missing scheme, expected <postgres|postgresql|mysql|mariadb>://".to_string(),
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }
}

/// Reject credentials the URL parser would silently misread
///
/// # Errors
///
/// Returns `MalformedDescriptor` when the userinfo contains a raw `@`
pub fn check_credentials(descriptor: &ConnectionDescriptor) -> Result<()> {
    if descriptor.has_unescaped_credentials() {
        return Err(Error::MalformedDescriptor(
            "unescaped '@' in the credentials".to_string(),
        ));
    }
    Ok(())
}

/// Connect, run the version query and close the connection
///
/// # Errors
///
/// Returns an error if the descriptor is malformed, the connection can not be
/// established within `connect_timeout` or the query fails
pub async fn server_version(
    descriptor: &ConnectionDescriptor,
    tls: &TlsConfig,
    connect_timeout: Duration,
) -> Result<String> {
    let driver = Driver::from_descriptor(descriptor)?;

    debug!(
        driver = driver.as_str(),
        descriptor = %descriptor.masked(),
        ?connect_timeout,
        "connecting"
    );

    match driver {
        Driver::Postgres => postgres::server_version(descriptor, tls, connect_timeout).await,
        Driver::MySql => mysql::server_version(descriptor, tls, connect_timeout).await,
    }
}
