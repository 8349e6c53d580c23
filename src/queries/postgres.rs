use super::{VERSION_QUERY, check_credentials};
use crate::{
    descriptor::ConnectionDescriptor,
    error::{Error, Result},
    tls::{TlsConfig, TlsMode},
};
use sqlx::{
    ConnectOptions, Connection,
    postgres::{PgConnectOptions, PgSslMode},
};
use std::{str::FromStr, time::Duration};
use tokio::time::timeout;
use tracing::debug;

/// Build connect options from the descriptor, applying TLS overrides
///
/// # Errors
///
/// Returns `MalformedDescriptor` if the descriptor can not be parsed or its
/// credentials contain an unescaped `@`
pub fn connect_options(descriptor: &ConnectionDescriptor, tls: &TlsConfig) -> Result<PgConnectOptions> {
    check_credentials(descriptor)?;

    let mut options = PgConnectOptions::from_str(descriptor.as_str())
        .map_err(|e| Error::MalformedDescriptor(e.to_string()))?
        .application_name(env!("CARGO_PKG_NAME"));

    if let Some(mode) = tls.mode {
        options = options.ssl_mode(match mode {
            TlsMode::Disable => PgSslMode::Disable,
            TlsMode::Require => PgSslMode::Require,
            TlsMode::VerifyCA => PgSslMode::VerifyCa,
            TlsMode::VerifyFull => PgSslMode::VerifyFull,
        });
    }

    if let Some(ca_path) = &tls.ca {
        options = options.ssl_root_cert(ca_path);
    }

    // Apply client certificate if provided
    if let (Some(cert_path), Some(key_path)) = (&tls.cert, &tls.key) {
        options = options.ssl_client_cert(cert_path).ssl_client_key(key_path);
    }

    Ok(options)
}

/// Connect to `PostgreSQL`, fetch `version()` and close the connection
///
/// # Errors
///
/// Returns an error if connecting times out or fails, or if the query fails
pub async fn server_version(
    descriptor: &ConnectionDescriptor,
    tls: &TlsConfig,
    connect_timeout: Duration,
) -> Result<String> {
    let options = connect_options(descriptor, tls)?;

    let mut conn = timeout(connect_timeout, options.connect())
        .await
        .map_err(|_| Error::Timeout(connect_timeout))?
        .map_err(Error::from_connect)?;

    let version = sqlx::query_scalar::<_, String>(VERSION_QUERY)
        .fetch_one(&mut conn)
        .await;

    // close before looking at the query result
    if let Err(e) = conn.close().await {
        debug!("failed to close postgres connection: {e}");
    }

    version.map_err(Error::Query)
}
