//! Connection management
//!
//! This module handles:
//! * Connection descriptor (endpoint, credentials, options)
//! * Connection properties
//! * Connection lifecycle and release
//! * State machine enforcement

mod conn;
mod properties;
mod state;

pub use conn::{Connection, ConnectionConfig, ConnectionConfigBuilder, Credentials, Endpoint};
pub use properties::Properties;
pub use state::ConnectionState;
