//! Core connection type

use super::properties::Properties;
use super::state::ConnectionState;
use crate::driver::{Driver, Session};
use crate::{Error, Result};
use std::fmt;

/// Where the server lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
    database: Option<String>,
}

impl Endpoint {
    /// Lower-cased URL scheme that selected the driver
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, if the URL carried one
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Default database, if any
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

/// User name and password
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: Option<String>,
}

impl Credentials {
    /// User name
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Password, if any
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Connection descriptor
///
/// Everything a driver needs to open a session. Immutable once built: use
/// [`ConnectionConfig::builder`] or
/// [`ConnectionInfo::to_config`](crate::client::ConnectionInfo::to_config).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    endpoint: Endpoint,
    credentials: Credentials,
    options: Properties,
}

impl ConnectionConfig {
    /// User name used when none is given
    pub const DEFAULT_USER: &'static str = "root";

    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```
    /// use taos_connect::{ConnectionConfig, Properties};
    ///
    /// let config = ConnectionConfig::builder("taos-rs", "localhost")
    ///     .port(6041)
    ///     .database("power")
    ///     .user("root")
    ///     .password("taosdata")
    ///     .option(Properties::TIME_ZONE, "UTC-8")
    ///     .build();
    ///
    /// assert_eq!(config.endpoint().database(), Some("power"));
    /// assert_eq!(config.options().timezone(), Some("UTC-8"));
    /// ```
    pub fn builder(scheme: impl Into<String>, host: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into(),
            port: None,
            database: None,
            user: None,
            password: None,
            options: Properties::new(),
        }
    }

    /// Server endpoint
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Credentials
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Options forwarded to the driver
    pub fn options(&self) -> &Properties {
        &self.options
    }
}

/// Builder for [`ConnectionConfig`]
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    scheme: String,
    host: String,
    port: Option<u16>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
    options: Properties,
}

impl ConnectionConfigBuilder {
    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the default database
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the user name
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Add a single option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.set(key, value);
        self
    }

    /// Add every option in `options`, overwriting existing keys
    pub fn options(mut self, options: Properties) -> Self {
        self.options.merge(&options);
        self
    }

    /// Build the descriptor
    pub fn build(self) -> ConnectionConfig {
        ConnectionConfig {
            endpoint: Endpoint {
                scheme: self.scheme,
                host: self.host,
                port: self.port,
                database: self.database,
            },
            credentials: Credentials {
                user: self
                    .user
                    .unwrap_or_else(|| ConnectionConfig::DEFAULT_USER.to_string()),
                password: self.password,
            },
            options: self.options,
        }
    }
}

/// An open database session
///
/// Owned by the caller. The session is released exactly once: by
/// [`close`](Connection::close) or, failing that, when the connection is
/// dropped.
pub struct Connection {
    session: Option<Box<dyn Session>>,
    state: ConnectionState,
    driver: &'static str,
    config: ConnectionConfig,
}

impl Connection {
    /// Open a session through `driver`
    pub fn open(driver: &dyn Driver, config: ConnectionConfig) -> Result<Self> {
        let mut state = ConnectionState::Initial;
        let endpoint = config.endpoint();
        let span = tracing::info_span!(
            "connect",
            driver = driver.name(),
            host = %endpoint.host(),
            port = endpoint.port().unwrap_or_else(|| driver.default_port()),
            database = endpoint.database().unwrap_or(""),
            user = %config.credentials().user(),
        );
        let _enter = span.enter();

        state.transition(ConnectionState::Connecting)?;
        match driver.connect(&config) {
            Ok(session) => {
                state.transition(ConnectionState::Open)?;
                crate::metrics::counters::connection_opened(driver.name());
                tracing::info!("connection open");
                Ok(Self {
                    session: Some(session),
                    state,
                    driver: driver.name(),
                    config,
                })
            }
            Err(err) => {
                state.transition(ConnectionState::Closed)?;
                crate::metrics::counters::connection_failed(driver.name(), err.sql_state());
                tracing::debug!(
                    sql_state = err.sql_state(),
                    code = err.error_code(),
                    "connection failed: {}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Get current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether the session has been released
    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Name of the driver that opened the session
    pub fn driver_name(&self) -> &'static str {
        self.driver
    }

    /// Descriptor the session was opened with
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Ask the server for its version
    pub fn server_version(&mut self) -> Result<String> {
        self.session_mut()?.server_version()
    }

    /// Release the session
    ///
    /// Closing an already closed connection is a no-op.
    pub fn close(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        self.state.transition(ConnectionState::Closed)?;
        crate::metrics::counters::connection_closed(self.driver);
        let result = session.close();
        tracing::info!(driver = self.driver, "connection closed");
        result
    }

    fn session_mut(&mut self) -> Result<&mut (dyn Session + 'static)> {
        match self.session.as_mut() {
            Some(session) => Ok(session.as_mut()),
            None => Err(Error::ConnectionClosed),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("driver", &self.driver)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::warn!(driver = self.driver, "error closing connection: {}", err);
        }
    }
}
