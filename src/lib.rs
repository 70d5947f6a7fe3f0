//! taos-connect: driver-registry connection layer for TDengine
//!
//! A connection is requested from the [`DriverManager`] with a scheme-qualified
//! URL and a set of [`Properties`]. The URL scheme selects a registered
//! [`Driver`]; the driver opens a session and hands back a [`Connection`] that
//! releases it exactly once, either through [`Connection::close`] or on drop.
//!
//! ```no_run
//! use taos_connect::{DriverManager, Properties};
//!
//! let mut props = Properties::new();
//! props.set(Properties::CHARSET, "UTF-8");
//! props.set(Properties::LOCALE, "en_US.UTF-8");
//! props.set(Properties::TIME_ZONE, "UTC-8");
//!
//! match DriverManager::get_connection(
//!     "jdbc:TAOS-RS://localhost:6041?user=root&password=taosdata",
//!     props,
//! ) {
//!     Ok(_conn) => println!("Connected"),
//!     Err(err) => {
//!         println!("SQLState: {}", err.sql_state());
//!         println!("Error Code: {}", err.error_code());
//!         println!("Message: {}", err.message());
//!     }
//! }
//! ```
//!
//! Built-in drivers:
//! * `TAOS-RS` (REST through taosAdapter), see [`driver::RestDriver`]
//!
//! Other schemes resolve once a driver for them is registered with
//! [`DriverManager::register`].

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod connection;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod runtime;

pub use client::{ConnectionInfo, DriverManager};
pub use connection::{Connection, ConnectionConfig, ConnectionState, Properties};
pub use driver::{Driver, Session};
pub use error::{Error, ErrorRecord, Result};
