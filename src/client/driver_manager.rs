//! Driver registry
//!
//! Maps URL schemes to drivers. [`DriverManager`] is the process-wide
//! registry, pre-populated with the built-in drivers; [`DriverRegistry`] is
//! the same thing as a value, for callers that want an isolated set.

use super::connection_string::ConnectionInfo;
use crate::connection::{Connection, Properties};
use crate::driver::{Driver, RestDriver};
use crate::{Error, Result};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// A set of drivers keyed by the schemes they accept
#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<Vec<Arc<dyn Driver>>>,
}

impl DriverRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in drivers
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(RestDriver));
        registry
    }

    /// Add a driver. A later registration wins over earlier ones for the
    /// schemes they share.
    pub fn register(&self, driver: Arc<dyn Driver>) {
        tracing::debug!(driver = driver.name(), schemes = ?driver.schemes(), "driver registered");
        self.drivers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, driver);
    }

    /// Remove every driver called `name`. Returns whether any was removed.
    pub fn deregister(&self, name: &str) -> bool {
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);
        let before = drivers.len();
        drivers.retain(|d| d.name() != name);
        before != drivers.len()
    }

    /// Names of the registered drivers, most recent first
    pub fn driver_names(&self) -> Vec<&'static str> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|d| d.name())
            .collect()
    }

    /// Driver for `scheme`, if any
    pub fn driver_for_scheme(&self, scheme: &str) -> Option<Arc<dyn Driver>> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.accepts(scheme))
            .cloned()
    }

    /// Driver that accepts `url`
    pub fn driver(&self, url: &str) -> Result<Arc<dyn Driver>> {
        let info = ConnectionInfo::parse(url)?;
        self.driver_for_scheme(&info.scheme)
            .ok_or_else(|| Error::NoSuitableDriver(ConnectionInfo::redact(url)))
    }

    /// Open a connection to `url` with `props`.
    ///
    /// `props` are moved into the connection descriptor; URL parameters
    /// override entries with the same key.
    pub fn get_connection(&self, url: &str, props: Properties) -> Result<Connection> {
        let result = ConnectionInfo::parse(url).and_then(|info| {
            let driver = self
                .driver_for_scheme(&info.scheme)
                .ok_or_else(|| Error::NoSuitableDriver(ConnectionInfo::redact(url)))?;
            Ok((info, driver))
        });

        let (info, driver) = match result {
            Ok(found) => found,
            Err(err) => {
                crate::metrics::counters::connection_failed("unresolved", err.sql_state());
                tracing::debug!(url = %ConnectionInfo::redact(url), "{}", err);
                return Err(err);
            }
        };

        Connection::open(driver.as_ref(), info.to_config(props))
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.driver_names())
            .finish()
    }
}

fn global() -> &'static DriverRegistry {
    static REGISTRY: OnceLock<DriverRegistry> = OnceLock::new();
    REGISTRY.get_or_init(DriverRegistry::with_defaults)
}

/// Process-wide driver registry
///
/// # Examples
///
/// ```no_run
/// use taos_connect::{DriverManager, Properties};
///
/// let props = Properties::new().with(Properties::CHARSET, "UTF-8");
/// let conn = DriverManager::get_connection(
///     "jdbc:TAOS-RS://localhost:6041/power?user=root&password=taosdata",
///     props,
/// )?;
/// println!("connected via {}", conn.driver_name());
/// # Ok::<(), taos_connect::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DriverManager;

impl DriverManager {
    /// Add a driver to the process-wide registry
    pub fn register(driver: Arc<dyn Driver>) {
        global().register(driver)
    }

    /// Remove every driver called `name`
    pub fn deregister(name: &str) -> bool {
        global().deregister(name)
    }

    /// Names of the registered drivers
    pub fn driver_names() -> Vec<&'static str> {
        global().driver_names()
    }

    /// Driver that accepts `url`
    pub fn driver(url: &str) -> Result<Arc<dyn Driver>> {
        global().driver(url)
    }

    /// Open a connection through the driver registered for the URL scheme
    pub fn get_connection(url: &str, props: Properties) -> Result<Connection> {
        global().get_connection(url, props)
    }
}
