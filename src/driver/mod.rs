//! Driver and session traits
//!
//! A [`Driver`] turns a [`ConnectionConfig`] into an open [`Session`]. Drivers
//! are looked up by URL scheme through the
//! [`DriverManager`](crate::client::DriverManager).

mod rest;

pub use rest::{RestDriver, HTTP_CONNECT_TIMEOUT, USE_SSL};

use crate::connection::ConnectionConfig;
use crate::Result;

/// Connection factory for one or more URL schemes
pub trait Driver: Send + Sync {
    /// Short name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Lower-case URL schemes this driver accepts, without any `jdbc:` prefix
    fn schemes(&self) -> &[&'static str];

    /// Port used when the URL does not carry one
    fn default_port(&self) -> u16;

    /// Whether this driver accepts `scheme` (case-insensitive)
    fn accepts(&self, scheme: &str) -> bool {
        self.schemes().iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }

    /// Open a session. A single blocking attempt, no retries.
    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn Session>>;
}

/// Driver-side state of an open connection
pub trait Session: Send {
    /// Ask the server for its version
    fn server_version(&mut self) -> Result<String>;

    /// Release the session. Called exactly once.
    fn close(self: Box<Self>) -> Result<()>;
}
