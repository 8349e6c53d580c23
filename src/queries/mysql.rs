use super::{VERSION_QUERY, check_credentials};
use crate::{
    descriptor::ConnectionDescriptor,
    error::{Error, Result},
    tls::{TlsConfig, TlsMode},
};
use sqlx::{
    ConnectOptions, Connection,
    mysql::{MySqlConnectOptions, MySqlSslMode},
};
use std::{str::FromStr, time::Duration};
use tokio::time::timeout;
use tracing::debug;

/// Build connect options from the descriptor, applying TLS overrides
///
/// `mariadb://` descriptors are accepted as an alias of `mysql://`.
///
/// # Errors
///
/// Returns `MalformedDescriptor` if the descriptor can not be parsed or its
/// credentials contain an unescaped `@`
pub fn connect_options(
    descriptor: &ConnectionDescriptor,
    tls: &TlsConfig,
) -> Result<MySqlConnectOptions> {
    check_credentials(descriptor)?;

    let mut options = MySqlConnectOptions::from_str(descriptor.as_str())
        .map_err(|e| Error::MalformedDescriptor(e.to_string()))?;

    if let Some(mode) = tls.mode {
        options = options.ssl_mode(match mode {
            TlsMode::Disable => MySqlSslMode::Disabled,
            TlsMode::Require => MySqlSslMode::Required,
            TlsMode::VerifyCA => MySqlSslMode::VerifyCa,
            TlsMode::VerifyFull => MySqlSslMode::VerifyIdentity,
        });
    }

    if let Some(ca_path) = &tls.ca {
        options = options.ssl_ca(ca_path);
    }

    if let (Some(cert_path), Some(key_path)) = (&tls.cert, &tls.key) {
        options = options.ssl_client_cert(cert_path).ssl_client_key(key_path);
    }

    Ok(options)
}

/// Connect to MySQL/MariaDB, fetch `version()` and close the connection
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

    if let Err(e) = conn.close().await {
        debug!("failed to close mysql connection: {e}");
    }

    version.map_err(Error::Query)
}
